//! Bulk employee import from CSV attachments or a seed file.

use csv::StringRecord;

use crate::error::{Result, TrackerError};
use crate::store::models::NewEmployee;
use crate::utils::time::parse_time_string;

pub const REQUIRED_COLUMNS: [&str; 5] = [
    "Employee Name",
    "Department",
    "Manager",
    "Working Hours Start",
    "Working Hours End",
];

/// Parses the whole file up front: a missing required column or a malformed
/// row fails the batch before anything is registered.
pub fn parse_employee_csv(data: &[u8]) -> Result<Vec<NewEmployee>> {
    let mut reader = csv::Reader::from_reader(data);
    let headers = reader
        .headers()
        .map_err(|e| TrackerError::Validation(format!("Unreadable CSV header: {}", e)))?
        .clone();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !headers.iter().any(|h| h.trim() == **required))
        .map(|required| required.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(TrackerError::Schema(missing));
    }

    let name_idx = column(&headers, "Employee Name")?;
    let department_idx = column(&headers, "Department")?;
    let manager_idx = column(&headers, "Manager")?;
    let start_idx = column(&headers, "Working Hours Start")?;
    let end_idx = column(&headers, "Working Hours End")?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let line = index + 2;
        let record =
            record.map_err(|e| TrackerError::Validation(format!("CSV line {}: {}", line, e)))?;

        let start_time = parse_time_string(field(&record, start_idx))
            .map_err(|e| TrackerError::Validation(format!("Line {}: {}", line, e)))?;
        let end_time = parse_time_string(field(&record, end_idx))
            .map_err(|e| TrackerError::Validation(format!("Line {}: {}", line, e)))?;

        rows.push(NewEmployee {
            name: field(&record, name_idx).to_string(),
            department: field(&record, department_idx).to_string(),
            manager: field(&record, manager_idx).to_string(),
            start_time,
            end_time,
            timezone: None,
        });
    }

    Ok(rows)
}

fn column(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| TrackerError::Schema(vec![name.to_string()]))
}

fn field<'a>(record: &'a StringRecord, index: usize) -> &'a str {
    record.get(index).unwrap_or("").trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    const GOOD: &str = "\
Employee Name,Department,Manager,Working Hours Start,Working Hours End
Ann,Engineering,Bea,09:00,17:00
Bob,Sales,Cho,08:30:00,16:30:00
";

    #[test]
    fn parses_well_formed_rows() {
        let rows = parse_employee_csv(GOOD.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Ann");
        assert_eq!(rows[0].start_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        // HH:MM:SS is accepted alongside HH:MM.
        assert_eq!(rows[1].start_time, NaiveTime::from_hms_opt(8, 30, 0).unwrap());
    }

    #[test]
    fn missing_columns_fail_with_their_names() {
        let data = "Employee Name,Department\nAnn,Engineering\n";
        let err = parse_employee_csv(data.as_bytes()).unwrap_err();
        match err {
            TrackerError::Schema(missing) => {
                assert_eq!(
                    missing,
                    vec![
                        "Manager".to_string(),
                        "Working Hours Start".to_string(),
                        "Working Hours End".to_string(),
                    ]
                );
            }
            other => panic!("expected Schema error, got {:?}", other),
        }
    }

    #[test]
    fn malformed_time_fails_the_batch() {
        let data = "\
Employee Name,Department,Manager,Working Hours Start,Working Hours End
Ann,Engineering,Bea,nine,17:00
";
        assert!(matches!(
            parse_employee_csv(data.as_bytes()),
            Err(TrackerError::Validation(_))
        ));
    }

    #[test]
    fn header_order_does_not_matter() {
        let data = "\
Manager,Working Hours End,Employee Name,Working Hours Start,Department
Bea,17:00,Ann,09:00,Engineering
";
        let rows = parse_employee_csv(data.as_bytes()).unwrap();
        assert_eq!(rows[0].name, "Ann");
        assert_eq!(rows[0].manager, "Bea");
        assert_eq!(rows[0].department, "Engineering");
    }
}
