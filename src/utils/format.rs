use std::collections::BTreeSet;

use poise::serenity_prelude as serenity;

use crate::store::models::{AttendanceRecord, Employee};
use crate::utils::time::ReferenceFrame;

pub fn format_error_message(error: &str) -> String {
    format!("❌ **Error**: {}", error)
}

pub fn format_success_message(message: &str) -> String {
    format!("✅ {}", message)
}

pub fn format_hours(hours: f64) -> String {
    // Display rounding only; the ledger keeps the exact value.
    format!("{:.2}", hours)
}

pub fn format_name_set(names: &BTreeSet<String>) -> String {
    names.iter().cloned().collect::<Vec<_>>().join(", ")
}

pub fn format_employee_list(employees: &[Employee]) -> String {
    if employees.is_empty() {
        return "No employees registered yet".to_string();
    }

    let mut out = String::new();
    for employee in employees {
        let zone = employee
            .timezone
            .map(|tz| format!(" [{}]", tz))
            .unwrap_or_default();
        out.push_str(&format!(
            "#{} **{}** ({}, manager: {}) {} to {}{}\n",
            employee.id,
            employee.name,
            employee.department,
            employee.manager,
            employee.start_time.format("%H:%M"),
            employee.end_time.format("%H:%M"),
            zone,
        ));
    }
    out
}

pub fn format_attendance_list(records: &[AttendanceRecord], frame: ReferenceFrame) -> String {
    if records.is_empty() {
        return "No attendance records yet".to_string();
    }

    let mut out = String::new();
    for record in records {
        let clock_out = match record.clock_out {
            Some(instant) => frame.format_instant(instant),
            None => "still working".to_string(),
        };
        let hours = record
            .worked_hours
            .map(|h| format!(" ({} h)", format_hours(h)))
            .unwrap_or_default();
        let country = record
            .country
            .as_deref()
            .map(|c| format!(" from {}", c))
            .unwrap_or_default();
        let remarks = if record.remarks.is_empty() {
            String::new()
        } else {
            format!(" | {}", record.remarks)
        };

        out.push_str(&format!(
            "📅 {} **{}**: 🟢 {} to 🔴 {}{} [{}]{}{}\n",
            record.date,
            record.employee_name,
            frame.format_instant(record.clock_in),
            clock_out,
            hours,
            record.status.as_str(),
            country,
            remarks,
        ));
    }
    out
}

pub fn create_error_embed(title: &str, description: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title)
        .description(description)
        .color(0xff0000) // Red
        .timestamp(chrono::Utc::now())
}

pub fn create_info_embed(title: &str, description: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title)
        .description(description)
        .color(0x3498db) // Blue
        .timestamp(chrono::Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hours_display_two_decimals() {
        assert_eq!(format_hours(8.5), "8.50");
        assert_eq!(format_hours(7.999), "8.00");
    }

    #[test]
    fn name_set_joins_in_order() {
        let names: BTreeSet<String> = ["Bob", "Ann"].iter().map(|s| s.to_string()).collect();
        assert_eq!(format_name_set(&names), "Ann, Bob");
    }
}
