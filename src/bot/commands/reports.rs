use crate::bot::{Context, Error};
use crate::utils::format::{
    create_error_embed, create_info_embed, format_attendance_list, format_name_set,
};

/// Show attendance records, for one employee or everyone
#[poise::command(slash_command)]
pub async fn attendance(
    ctx: Context<'_>,
    #[description = "Employee name; omit for everyone"] employee: Option<String>,
) -> Result<(), Error> {
    let data = ctx.data();
    let frame = data.time_source.frame();

    let records = match &employee {
        Some(name) => match data.tracker.attendance_for(name) {
            Ok(records) => records,
            Err(e) => {
                let embed = create_error_embed("Error", &e.to_string());
                ctx.send(poise::CreateReply::default().embed(embed)).await?;
                return Ok(());
            }
        },
        None => data.tracker.ledger.all(),
    };

    let title = match &employee {
        Some(name) => format!("Attendance for {}", name),
        None => "Attendance".to_string(),
    };

    let embed = create_info_embed(&title, &format_attendance_list(&records, frame));
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// List employees who clocked in late today
#[poise::command(slash_command)]
pub async fn late_today(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let late = data.tracker.late_today(data.time_source.now());

    let description = if late.is_empty() {
        "No employees are late today!".to_string()
    } else {
        format_name_set(&late)
    };

    let embed = create_info_embed(&format!("Late employees ({})", late.len()), &description);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// List employees who have not clocked in today
#[poise::command(slash_command)]
pub async fn not_clocked_in(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let missing = data.tracker.not_clocked_in_today(data.time_source.now());

    let description = if missing.is_empty() {
        "All employees have clocked in today!".to_string()
    } else {
        format_name_set(&missing)
    };

    let embed = create_info_embed(
        &format!("Not clocked in yet ({})", missing.len()),
        &description,
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
