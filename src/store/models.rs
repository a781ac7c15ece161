use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub department: String,
    pub manager: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Zone the schedule is interpreted in. Falls back to the configured
    /// time-source frame when absent.
    pub timezone: Option<Tz>,
}

/// Registration input before an id has been assigned.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub department: String,
    pub manager: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub timezone: Option<Tz>,
}

/// Fixed at clock-in, never recomputed at clock-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    OnTime,
    Late,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::OnTime => "On Time",
            AttendanceStatus::Late => "Late",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub employee_id: i64,
    pub employee_name: String,
    /// Calendar date in the employee's reference frame.
    pub date: NaiveDate,
    pub clock_in: DateTime<Utc>,
    pub clock_out: Option<DateTime<Utc>>,
    /// Exact elapsed seconds divided by 3600, no rounding stored.
    pub worked_hours: Option<f64>,
    pub status: AttendanceStatus,
    pub country: Option<String>,
    pub remarks: String,
}

impl AttendanceRecord {
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }
}
