use crate::bot::{Context, Error};
use crate::utils::format::{format_error_message, format_hours, format_success_message};

/// Clock an employee in
#[poise::command(slash_command)]
pub async fn clock_in(
    ctx: Context<'_>,
    #[description = "Employee name"] employee: String,
    #[description = "Remarks"] remarks: Option<String>,
    #[description = "Override the employee's timezone first"] timezone: Option<String>,
    #[description = "Clock-in latitude"] latitude: Option<f64>,
    #[description = "Clock-in longitude"] longitude: Option<f64>,
) -> Result<(), Error> {
    let data = ctx.data();
    let now = data.time_source.now();

    // Timezone reassignment before the record is created, so "today" and the
    // schedule are already read in the new zone.
    if let Some(zone) = &timezone {
        let result = data
            .tracker
            .directory
            .find(&employee)
            .and_then(|found| data.tracker.directory.set_timezone(found.id, zone));
        if let Err(e) = result {
            ctx.say(format_error_message(&e.to_string())).await?;
            return Ok(());
        }
    }

    let country = match (latitude, longitude) {
        (Some(lat), Some(lon)) => Some(data.geocoder.country_or_unknown(lat, lon).await),
        _ => None,
    };

    let remarks = remarks.unwrap_or_default();
    match data.tracker.clock_in(&employee, &remarks, country, now) {
        Ok(record) => {
            let frame = data.time_source.frame();
            let mut msg = format!(
                "{} clocked in at {}. Status: {}",
                record.employee_name,
                frame.format_instant(record.clock_in),
                record.status.as_str()
            );
            if let Some(country) = &record.country {
                msg.push_str(&format!(" ({})", country));
            }
            ctx.say(format_success_message(&msg)).await?;
        }
        Err(e) => {
            ctx.say(format_error_message(&e.to_string())).await?;
        }
    }

    Ok(())
}

/// Clock an employee out
#[poise::command(slash_command)]
pub async fn clock_out(
    ctx: Context<'_>,
    #[description = "Employee name"] employee: String,
    #[description = "Remarks"] remarks: Option<String>,
) -> Result<(), Error> {
    let data = ctx.data();
    let now = data.time_source.now();
    let remarks = remarks.unwrap_or_default();

    match data.tracker.clock_out(&employee, &remarks, now) {
        Ok(record) => {
            let frame = data.time_source.frame();
            let hours = record.worked_hours.unwrap_or_default();
            let msg = format_success_message(&format!(
                "{} clocked out at {}, worked {} hours",
                record.employee_name,
                record
                    .clock_out
                    .map(|instant| frame.format_instant(instant))
                    .unwrap_or_default(),
                format_hours(hours)
            ));
            ctx.say(msg).await?;
        }
        Err(e) => {
            ctx.say(format_error_message(&e.to_string())).await?;
        }
    }

    Ok(())
}
