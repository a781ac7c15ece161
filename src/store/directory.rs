use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono_tz::Tz;

use crate::error::{Result, TrackerError};
use crate::store::models::{Employee, NewEmployee};

/// In-memory employee registry. Ids are sequential from 1 and never reused;
/// employees are never deleted.
pub struct EmployeeDirectory {
    inner: RwLock<Inner>,
}

struct Inner {
    employees: BTreeMap<i64, Employee>,
    next_id: i64,
}

/// Outcome of a bulk registration. Schema problems are caught before this
/// stage; only per-row rejections (duplicate names, blank fields) land here.
#[derive(Debug)]
pub struct ImportSummary {
    pub registered: Vec<i64>,
    pub rejected: Vec<(String, TrackerError)>,
}

impl EmployeeDirectory {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                employees: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    pub fn register(&self, new: NewEmployee) -> Result<i64> {
        validate(&new)?;
        let mut inner = self.inner.write().expect("directory lock poisoned");
        inner.insert(new)
    }

    /// Registers a batch under one lock acquisition so accepted rows get a
    /// contiguous run of ids. A bad row is skipped, not fatal to the batch.
    pub fn bulk_register(&self, rows: Vec<NewEmployee>) -> ImportSummary {
        let mut inner = self.inner.write().expect("directory lock poisoned");
        let mut summary = ImportSummary {
            registered: Vec::new(),
            rejected: Vec::new(),
        };

        for row in rows {
            let name = row.name.clone();
            match validate(&row).and_then(|_| inner.insert(row)) {
                Ok(id) => summary.registered.push(id),
                Err(e) => summary.rejected.push((name, e)),
            }
        }

        summary
    }

    pub fn set_timezone(&self, employee_id: i64, zone_name: &str) -> Result<()> {
        let tz: Tz = zone_name
            .trim()
            .parse()
            .map_err(|_| TrackerError::InvalidTimezone(zone_name.to_string()))?;

        let mut inner = self.inner.write().expect("directory lock poisoned");
        let employee = inner
            .employees
            .get_mut(&employee_id)
            .ok_or_else(|| TrackerError::NotFound(format!("employee #{}", employee_id)))?;
        employee.timezone = Some(tz);
        Ok(())
    }

    pub fn find(&self, name: &str) -> Result<Employee> {
        let inner = self.inner.read().expect("directory lock poisoned");
        inner
            .employees
            .values()
            .find(|e| e.name == name)
            .cloned()
            .ok_or_else(|| TrackerError::NotFound(name.to_string()))
    }

    /// Snapshot of all employees in id order.
    pub fn list(&self) -> Vec<Employee> {
        let inner = self.inner.read().expect("directory lock poisoned");
        inner.employees.values().cloned().collect()
    }
}

impl Inner {
    fn insert(&mut self, new: NewEmployee) -> Result<i64> {
        if self.employees.values().any(|e| e.name == new.name) {
            return Err(TrackerError::DuplicateName(new.name));
        }

        let id = self.next_id;
        self.next_id += 1;
        self.employees.insert(
            id,
            Employee {
                id,
                name: new.name,
                department: new.department,
                manager: new.manager,
                start_time: new.start_time,
                end_time: new.end_time,
                timezone: new.timezone,
            },
        );
        Ok(id)
    }
}

fn validate(new: &NewEmployee) -> Result<()> {
    for (field, value) in [
        ("Employee Name", &new.name),
        ("Department", &new.department),
        ("Manager", &new.manager),
    ] {
        if value.trim().is_empty() {
            return Err(TrackerError::Validation(format!(
                "{} must not be blank",
                field
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn ann() -> NewEmployee {
        NewEmployee {
            name: "Ann".to_string(),
            department: "Engineering".to_string(),
            manager: "Bea".to_string(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            timezone: None,
        }
    }

    fn named(name: &str) -> NewEmployee {
        NewEmployee {
            name: name.to_string(),
            ..ann()
        }
    }

    #[test]
    fn assigns_sequential_ids_starting_at_one() {
        let directory = EmployeeDirectory::new();
        assert_eq!(directory.register(named("Ann")).unwrap(), 1);
        assert_eq!(directory.register(named("Bob")).unwrap(), 2);
        assert_eq!(directory.register(named("Carol")).unwrap(), 3);
    }

    #[test]
    fn rejects_duplicate_names() {
        let directory = EmployeeDirectory::new();
        directory.register(ann()).unwrap();
        assert!(matches!(
            directory.register(ann()),
            Err(TrackerError::DuplicateName(_))
        ));
        assert_eq!(directory.list().len(), 1);
    }

    #[test]
    fn rejects_blank_required_fields() {
        let directory = EmployeeDirectory::new();
        let mut row = ann();
        row.department = "  ".to_string();
        assert!(matches!(
            directory.register(row),
            Err(TrackerError::Validation(_))
        ));
        assert!(directory.list().is_empty());
    }

    #[test]
    fn find_unknown_name_is_not_found() {
        let directory = EmployeeDirectory::new();
        assert!(matches!(
            directory.find("Nobody"),
            Err(TrackerError::NotFound(_))
        ));
    }

    #[test]
    fn bulk_register_keeps_ids_contiguous_and_skips_duplicates() {
        let directory = EmployeeDirectory::new();
        directory.register(named("Ann")).unwrap();

        let summary = directory.bulk_register(vec![named("Bob"), named("Ann"), named("Carol")]);

        assert_eq!(summary.registered, vec![2, 3]);
        assert_eq!(summary.rejected.len(), 1);
        assert_eq!(summary.rejected[0].0, "Ann");
        assert!(matches!(
            summary.rejected[0].1,
            TrackerError::DuplicateName(_)
        ));
    }

    #[test]
    fn set_timezone_updates_the_employee() {
        let directory = EmployeeDirectory::new();
        let id = directory.register(ann()).unwrap();

        directory.set_timezone(id, "Asia/Tokyo").unwrap();
        assert_eq!(
            directory.find("Ann").unwrap().timezone,
            Some(chrono_tz::Asia::Tokyo)
        );
    }

    #[test]
    fn set_timezone_rejects_unknown_employee_and_zone() {
        let directory = EmployeeDirectory::new();
        let id = directory.register(ann()).unwrap();

        assert!(matches!(
            directory.set_timezone(id + 1, "Asia/Tokyo"),
            Err(TrackerError::NotFound(_))
        ));
        assert!(matches!(
            directory.set_timezone(id, "Atlantis/Nowhere"),
            Err(TrackerError::InvalidTimezone(_))
        ));
        assert_eq!(directory.find("Ann").unwrap().timezone, None);
    }
}
