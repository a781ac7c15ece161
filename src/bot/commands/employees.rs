use crate::bot::{Context, Error};
use crate::error::TrackerError;
use crate::import;
use crate::store::models::NewEmployee;
use crate::utils::format::{format_employee_list, format_error_message, format_success_message};
use crate::utils::time::parse_time_string;
use poise::serenity_prelude as serenity;

/// Register a single employee
#[poise::command(slash_command)]
pub async fn register(
    ctx: Context<'_>,
    #[description = "Employee name"] name: String,
    #[description = "Department"] department: String,
    #[description = "Manager"] manager: String,
    #[description = "Scheduled start, HH:MM"] start: String,
    #[description = "Scheduled end, HH:MM"] end: String,
    #[description = "IANA timezone, e.g. Asia/Tokyo"] timezone: Option<String>,
) -> Result<(), Error> {
    let tracker = &ctx.data().tracker;

    let start_time = match parse_time_string(&start) {
        Ok(time) => time,
        Err(e) => {
            ctx.say(format_error_message(&e.to_string())).await?;
            return Ok(());
        }
    };

    let end_time = match parse_time_string(&end) {
        Ok(time) => time,
        Err(e) => {
            ctx.say(format_error_message(&e.to_string())).await?;
            return Ok(());
        }
    };

    let timezone = match &timezone {
        Some(zone) => match zone.trim().parse() {
            Ok(tz) => Some(tz),
            Err(_) => {
                let e = TrackerError::InvalidTimezone(zone.clone());
                ctx.say(format_error_message(&e.to_string())).await?;
                return Ok(());
            }
        },
        None => None,
    };

    let new = NewEmployee {
        name: name.clone(),
        department,
        manager,
        start_time,
        end_time,
        timezone,
    };

    match tracker.directory.register(new) {
        Ok(id) => {
            let msg = format_success_message(&format!("Registered {} as employee #{}", name, id));
            ctx.say(msg).await?;
        }
        Err(e) => {
            ctx.say(format_error_message(&e.to_string())).await?;
        }
    }

    Ok(())
}

/// Change the timezone an employee's schedule is interpreted in
#[poise::command(slash_command)]
pub async fn set_timezone(
    ctx: Context<'_>,
    #[description = "Employee name"] employee: String,
    #[description = "IANA timezone, e.g. Europe/Berlin"] timezone: String,
) -> Result<(), Error> {
    let tracker = &ctx.data().tracker;

    let found = match tracker.directory.find(&employee) {
        Ok(found) => found,
        Err(e) => {
            ctx.say(format_error_message(&e.to_string())).await?;
            return Ok(());
        }
    };

    match tracker.directory.set_timezone(found.id, &timezone) {
        Ok(()) => {
            let msg = format_success_message(&format!(
                "{} is now scheduled in {}",
                employee,
                timezone.trim()
            ));
            ctx.say(msg).await?;
        }
        Err(e) => {
            ctx.say(format_error_message(&e.to_string())).await?;
        }
    }

    Ok(())
}

/// Bulk-register employees from an attached CSV file
#[poise::command(slash_command, rename = "import")]
pub async fn import_employees(
    ctx: Context<'_>,
    #[description = "CSV with Employee Name, Department, Manager, Working Hours Start, Working Hours End"]
    file: serenity::Attachment,
) -> Result<(), Error> {
    let tracker = &ctx.data().tracker;

    let data = match file.download().await {
        Ok(data) => data,
        Err(e) => {
            let msg = format_error_message(&format!("Could not download the attachment: {}", e));
            ctx.say(msg).await?;
            return Ok(());
        }
    };

    let rows = match import::parse_employee_csv(&data) {
        Ok(rows) => rows,
        Err(e) => {
            ctx.say(format_error_message(&e.to_string())).await?;
            return Ok(());
        }
    };

    let summary = tracker.directory.bulk_register(rows);

    let mut response = format_success_message(&format!(
        "Imported {} employee(s) from {}",
        summary.registered.len(),
        file.filename
    ));
    for (name, reason) in &summary.rejected {
        response.push_str(&format!("\n⚠️ Skipped {}: {}", name, reason));
    }
    ctx.say(response).await?;

    Ok(())
}

/// List all registered employees
#[poise::command(slash_command)]
pub async fn employees(ctx: Context<'_>) -> Result<(), Error> {
    let list = ctx.data().tracker.directory.list();
    ctx.say(format_employee_list(&list)).await?;
    Ok(())
}
