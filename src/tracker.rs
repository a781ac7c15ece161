use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};

use crate::error::Result;
use crate::store::directory::EmployeeDirectory;
use crate::store::ledger::AttendanceLedger;
use crate::store::models::{AttendanceRecord, AttendanceStatus, Employee};
use crate::utils::time::ReferenceFrame;

pub const DEFAULT_GRACE_MINUTES: i64 = 30;

/// Ties the directory, the ledger and the lateness policy together. Every
/// operation takes `now` as a parameter so behavior is deterministic under
/// test; the bot layer feeds it from the configured time source.
pub struct AttendanceTracker {
    pub directory: EmployeeDirectory,
    pub ledger: AttendanceLedger,
    default_frame: ReferenceFrame,
    grace: Duration,
}

impl AttendanceTracker {
    pub fn new(default_frame: ReferenceFrame, grace: Duration) -> Self {
        Self {
            directory: EmployeeDirectory::new(),
            ledger: AttendanceLedger::new(),
            default_frame,
            grace,
        }
    }

    /// An employee's own timezone wins over the configured frame.
    fn frame_for(&self, employee: &Employee) -> ReferenceFrame {
        employee
            .timezone
            .map(ReferenceFrame::Civil)
            .unwrap_or(self.default_frame)
    }

    /// Late only when the clock-in is strictly past scheduled start plus the
    /// grace period; exactly on the deadline is still on time.
    fn evaluate_lateness(&self, employee: &Employee, now: DateTime<Utc>) -> AttendanceStatus {
        let frame = self.frame_for(employee);
        let scheduled_start = frame.instant(frame.today(now), employee.start_time);

        if now > scheduled_start + self.grace {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::OnTime
        }
    }

    pub fn clock_in(
        &self,
        name: &str,
        remarks: &str,
        country: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<AttendanceRecord> {
        let employee = self.directory.find(name)?;
        let frame = self.frame_for(&employee);
        let status = self.evaluate_lateness(&employee, now);

        let record = AttendanceRecord {
            employee_id: employee.id,
            employee_name: employee.name,
            date: frame.today(now),
            clock_in: now,
            clock_out: None,
            worked_hours: None,
            status,
            country,
            remarks: remarks.to_string(),
        };

        // The ledger deduplicates (employee, date) under its own lock.
        self.ledger.insert_open(record)
    }

    pub fn clock_out(&self, name: &str, remarks: &str, now: DateTime<Utc>) -> Result<AttendanceRecord> {
        let employee = self.directory.find(name)?;
        self.ledger.close_open(employee.id, &employee.name, now, remarks)
    }

    /// Employees whose record for their own "today" carries a Late status.
    pub fn late_today(&self, now: DateTime<Utc>) -> BTreeSet<String> {
        self.directory
            .list()
            .into_iter()
            .filter(|employee| {
                let today = self.frame_for(employee).today(now);
                self.ledger
                    .record_for_day(employee.id, today)
                    .is_some_and(|record| record.status == AttendanceStatus::Late)
            })
            .map(|employee| employee.name)
            .collect()
    }

    /// Employees with no record at all for their own "today". Reported at any
    /// time of day, even before their scheduled start.
    pub fn not_clocked_in_today(&self, now: DateTime<Utc>) -> BTreeSet<String> {
        self.directory
            .list()
            .into_iter()
            .filter(|employee| {
                let today = self.frame_for(employee).today(now);
                self.ledger.record_for_day(employee.id, today).is_none()
            })
            .map(|employee| employee.name)
            .collect()
    }

    pub fn attendance_for(&self, name: &str) -> Result<Vec<AttendanceRecord>> {
        let employee = self.directory.find(name)?;
        Ok(self.ledger.records_for(employee.id))
    }
}
