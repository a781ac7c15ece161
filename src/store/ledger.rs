use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{Result, TrackerError};
use crate::store::models::AttendanceRecord;

/// In-memory attendance ledger keyed by (employee, date). Each key moves
/// through NoRecord -> Open -> Closed and nothing ever leaves Closed.
pub struct AttendanceLedger {
    records: Mutex<BTreeMap<(i64, NaiveDate), AttendanceRecord>>,
}

impl AttendanceLedger {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(BTreeMap::new()),
        }
    }

    /// Insert-if-absent: the duplicate check and the insert happen under one
    /// lock acquisition, so concurrent clock-ins cannot both land. Any
    /// existing record for the key, open or closed, rejects the new one.
    pub fn insert_open(&self, record: AttendanceRecord) -> Result<AttendanceRecord> {
        let mut records = self.records.lock().expect("ledger lock poisoned");
        let key = (record.employee_id, record.date);

        if records.contains_key(&key) {
            return Err(TrackerError::DuplicateClockIn(
                record.employee_name.clone(),
                record.date,
            ));
        }

        records.insert(key, record.clone());
        Ok(record)
    }

    /// Closes the most recent open record for an employee, setting clock-out,
    /// worked hours and remarks. The record is untouched on failure.
    pub fn close_open(
        &self,
        employee_id: i64,
        employee_name: &str,
        now: DateTime<Utc>,
        remarks: &str,
    ) -> Result<AttendanceRecord> {
        let mut records = self.records.lock().expect("ledger lock poisoned");

        let open = records
            .range_mut((employee_id, NaiveDate::MIN)..=(employee_id, NaiveDate::MAX))
            .map(|(_, record)| record)
            .filter(|record| record.is_open())
            .max_by_key(|record| record.clock_in);

        let Some(record) = open else {
            return Err(TrackerError::NoOpenClockIn(employee_name.to_string()));
        };

        // Clock skew or a misconfigured zone can put "now" before the stored
        // clock-in; refuse rather than record negative hours.
        if now < record.clock_in {
            return Err(TrackerError::InvalidInterval);
        }

        let elapsed = now.signed_duration_since(record.clock_in);
        record.clock_out = Some(now);
        record.worked_hours = Some(elapsed.num_seconds() as f64 / 3600.0);
        record.remarks = remarks.to_string();
        Ok(record.clone())
    }

    pub fn record_for_day(&self, employee_id: i64, date: NaiveDate) -> Option<AttendanceRecord> {
        let records = self.records.lock().expect("ledger lock poisoned");
        records.get(&(employee_id, date)).cloned()
    }

    pub fn records_for(&self, employee_id: i64) -> Vec<AttendanceRecord> {
        let records = self.records.lock().expect("ledger lock poisoned");
        records
            .range((employee_id, NaiveDate::MIN)..=(employee_id, NaiveDate::MAX))
            .map(|(_, record)| record.clone())
            .collect()
    }

    /// Snapshot of every record, ordered by employee then date.
    pub fn all(&self) -> Vec<AttendanceRecord> {
        let records = self.records.lock().expect("ledger lock poisoned");
        records.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::AttendanceStatus;
    use chrono::TimeZone;

    fn record(employee_id: i64, day: u32, hour: u32) -> AttendanceRecord {
        AttendanceRecord {
            employee_id,
            employee_name: "Ann".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            clock_in: Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap(),
            clock_out: None,
            worked_hours: None,
            status: AttendanceStatus::OnTime,
            country: None,
            remarks: String::new(),
        }
    }

    #[test]
    fn second_insert_for_same_day_is_rejected() {
        let ledger = AttendanceLedger::new();
        ledger.insert_open(record(1, 2, 9)).unwrap();

        assert!(matches!(
            ledger.insert_open(record(1, 2, 10)),
            Err(TrackerError::DuplicateClockIn(_, _))
        ));
        assert_eq!(ledger.records_for(1).len(), 1);
    }

    #[test]
    fn closed_record_still_blocks_reinsert() {
        let ledger = AttendanceLedger::new();
        ledger.insert_open(record(1, 2, 9)).unwrap();
        ledger
            .close_open(1, "Ann", Utc.with_ymd_and_hms(2025, 6, 2, 17, 0, 0).unwrap(), "")
            .unwrap();

        assert!(matches!(
            ledger.insert_open(record(1, 2, 18)),
            Err(TrackerError::DuplicateClockIn(_, _))
        ));
    }

    #[test]
    fn close_without_open_record_leaves_ledger_unchanged() {
        let ledger = AttendanceLedger::new();
        let result = ledger.close_open(1, "Ann", Utc::now(), "");
        assert!(matches!(result, Err(TrackerError::NoOpenClockIn(_))));
        assert!(ledger.all().is_empty());
    }

    #[test]
    fn close_picks_the_most_recent_open_record() {
        let ledger = AttendanceLedger::new();
        ledger.insert_open(record(1, 2, 9)).unwrap();
        ledger.insert_open(record(1, 3, 9)).unwrap();

        let closed = ledger
            .close_open(1, "Ann", Utc.with_ymd_and_hms(2025, 6, 3, 17, 0, 0).unwrap(), "")
            .unwrap();

        assert_eq!(closed.date, NaiveDate::from_ymd_opt(2025, 6, 3).unwrap());
        // The older record is still open.
        let day_two = ledger
            .record_for_day(1, NaiveDate::from_ymd_opt(2025, 6, 2).unwrap())
            .unwrap();
        assert!(day_two.is_open());
    }

    #[test]
    fn negative_interval_is_rejected_without_mutation() {
        let ledger = AttendanceLedger::new();
        ledger.insert_open(record(1, 2, 9)).unwrap();

        let before_clock_in = Utc.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap();
        assert!(matches!(
            ledger.close_open(1, "Ann", before_clock_in, "oops"),
            Err(TrackerError::InvalidInterval)
        ));

        let record = ledger
            .record_for_day(1, NaiveDate::from_ymd_opt(2025, 6, 2).unwrap())
            .unwrap();
        assert!(record.is_open());
        assert!(record.remarks.is_empty());
    }

    #[test]
    fn worked_hours_are_exact_fractions() {
        let ledger = AttendanceLedger::new();
        ledger.insert_open(record(1, 2, 9)).unwrap();

        let closed = ledger
            .close_open(1, "Ann", Utc.with_ymd_and_hms(2025, 6, 2, 17, 30, 0).unwrap(), "done")
            .unwrap();

        assert_eq!(closed.worked_hours, Some(8.5));
        assert_eq!(closed.remarks, "done");
    }
}
