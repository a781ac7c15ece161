use chrono::NaiveDate;
use thiserror::Error;

/// Attendance domain errors. Every failure is local to the operation that
/// raised it and leaves prior state unchanged.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Employee not found: {0}")]
    NotFound(String),

    #[error("Employee name already registered: {0}")]
    DuplicateName(String),

    #[error("{0} already has an attendance record for {1}")]
    DuplicateClockIn(String, NaiveDate),

    #[error("{0} has no open clock-in")]
    NoOpenClockIn(String),

    #[error("Clock-out time is earlier than the clock-in time")]
    InvalidInterval,

    #[error("Import file is missing required columns: {}", .0.join(", "))]
    Schema(Vec<String>),

    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),

    #[error("Location lookup failed: {0}")]
    LocationUnavailable(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
