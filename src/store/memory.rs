use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use super::{AttendanceStore, StoreError, StoreResult};
use crate::model::{
    attendance::{Attendance, AttendanceEntry, AttendancePatch, DayWindow, NewAttendance},
    company::Company,
    employee::Employee,
    project::Project,
};

#[derive(Default)]
struct Records {
    companies: BTreeMap<u64, Company>,
    employees: BTreeMap<u64, Employee>,
    projects: BTreeMap<u64, Project>,
    attendances: BTreeMap<u64, Attendance>,
}

impl Records {
    fn next_attendance_id(&self) -> u64 {
        self.attendances.keys().next_back().map_or(1, |id| id + 1)
    }

    /// Same rule as the MySQL unique key: one row per employee per check-in
    /// day. Rows without a check-in never collide.
    fn day_taken(&self, employee_id: u64, candidate: &Attendance) -> bool {
        let Some(day) = candidate.check_in.map(|at| at.date()) else {
            return false;
        };
        self.attendances.values().any(|row| {
            row.id != candidate.id
                && row.employee_id == employee_id
                && row.check_in.map(|at| at.date()) == Some(day)
        })
    }
}

/// In-process store with the same semantics as [`super::MySqlStore`].
/// Backs the test suite and local runs without a database.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Records>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Records> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Records> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_company(&self, company: Company) {
        self.write().companies.insert(company.id, company);
    }

    pub fn add_employee(&self, employee: Employee) {
        self.write().employees.insert(employee.id, employee);
    }

    pub fn add_project(&self, project: Project) {
        self.write().projects.insert(project.id, project);
    }

    /// Inserts a row as-is, bypassing the per-day rule (for seeding history).
    pub fn add_attendance(&self, attendance: Attendance) {
        self.write().attendances.insert(attendance.id, attendance);
    }

    pub fn employee(&self, id: u64) -> Option<Employee> {
        self.read().employees.get(&id).cloned()
    }

    /// All rows for `employee_id`, in id order.
    pub fn attendances_of(&self, employee_id: u64) -> Vec<Attendance> {
        self.read()
            .attendances
            .values()
            .filter(|row| row.employee_id == employee_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn find_employee(&self, id: u64) -> StoreResult<Option<Employee>> {
        Ok(self.employee(id))
    }

    async fn find_employees_by_user(&self, bim_user: &str) -> StoreResult<Vec<Employee>> {
        Ok(self
            .read()
            .employees
            .values()
            .filter(|employee| employee.bim_user.as_deref() == Some(bim_user))
            .cloned()
            .collect())
    }

    async fn set_employee_credential(
        &self,
        employee_id: u64,
        credential: &str,
    ) -> StoreResult<()> {
        if let Some(employee) = self.write().employees.get_mut(&employee_id) {
            employee.bim_password = Some(credential.to_owned());
        }
        Ok(())
    }

    async fn find_company(&self, id: u64) -> StoreResult<Option<Company>> {
        Ok(self.read().companies.get(&id).cloned())
    }

    async fn company_projects(&self, company_id: u64) -> StoreResult<Vec<Project>> {
        Ok(self
            .read()
            .projects
            .values()
            .filter(|project| project.company_id == Some(company_id))
            .cloned()
            .collect())
    }

    async fn find_project(&self, id: u64) -> StoreResult<Option<Project>> {
        Ok(self.read().projects.get(&id).cloned())
    }

    async fn find_attendance_in(
        &self,
        employee_id: u64,
        window: DayWindow,
    ) -> StoreResult<Option<Attendance>> {
        Ok(self
            .read()
            .attendances
            .values()
            .filter(|row| row.employee_id == employee_id)
            .filter(|row| row.check_in.is_some_and(|at| window.contains(at)))
            .max_by_key(|row| (row.check_in, row.id))
            .cloned())
    }

    async fn list_attendances(
        &self,
        employee_id: u64,
        limit: Option<u64>,
        offset: u64,
    ) -> StoreResult<Vec<AttendanceEntry>> {
        let records = self.read();
        let mut rows: Vec<&Attendance> = records
            .attendances
            .values()
            .filter(|row| row.employee_id == employee_id)
            .collect();
        // check_in desc, missing check-ins last, id desc on ties
        rows.sort_by(|a, b| {
            a.check_in
                .is_none()
                .cmp(&b.check_in.is_none())
                .then(b.check_in.cmp(&a.check_in))
                .then(b.id.cmp(&a.id))
        });

        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = limit.map_or(usize::MAX, |limit| {
            usize::try_from(limit).unwrap_or(usize::MAX)
        });
        Ok(rows
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|row| AttendanceEntry {
                id: row.id,
                check_in: row.check_in,
                check_out: row.check_out,
                project_id: row.project_id,
                project_name: row
                    .project_id
                    .and_then(|id| records.projects.get(&id))
                    .map(|project| project.name.clone()),
            })
            .collect())
    }

    async fn create_attendance(&self, new: &NewAttendance) -> StoreResult<u64> {
        let mut records = self.write();
        let row = Attendance {
            id: records.next_attendance_id(),
            employee_id: new.employee_id,
            check_in: new.check_in,
            check_out: new.check_out,
            project_id: None,
        };
        if records.day_taken(new.employee_id, &row) {
            return Err(StoreError::Duplicate);
        }
        let id = row.id;
        records.attendances.insert(id, row);
        Ok(id)
    }

    async fn update_attendance(&self, id: u64, patch: &AttendancePatch) -> StoreResult<()> {
        let mut records = self.write();
        let Some(mut row) = records.attendances.get(&id).cloned() else {
            return Ok(());
        };
        patch.apply(&mut row);
        if records.day_taken(row.employee_id, &row) {
            return Err(StoreError::Duplicate);
        }
        records.attendances.insert(id, row);
        Ok(())
    }

    async fn set_attendance_project(&self, id: u64, project_id: u64) -> StoreResult<()> {
        if let Some(row) = self.write().attendances.get_mut(&id) {
            row.project_id = Some(project_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 5, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[actix_web::test]
    async fn second_row_same_day_is_a_duplicate() {
        let store = MemoryStore::new();
        let first = NewAttendance {
            employee_id: 1,
            check_in: Some(at(4, 8)),
            check_out: None,
        };
        store.create_attendance(&first).await.unwrap();

        let second = NewAttendance {
            check_in: Some(at(4, 13)),
            ..first.clone()
        };
        assert!(matches!(
            store.create_attendance(&second).await,
            Err(StoreError::Duplicate)
        ));

        let next_day = NewAttendance {
            check_in: Some(at(5, 8)),
            ..first
        };
        assert!(store.create_attendance(&next_day).await.is_ok());
    }

    #[actix_web::test]
    async fn rows_without_check_in_never_collide() {
        let store = MemoryStore::new();
        let blank = NewAttendance {
            employee_id: 1,
            check_in: None,
            check_out: None,
        };
        store.create_attendance(&blank).await.unwrap();
        store.create_attendance(&blank).await.unwrap();

        assert_eq!(store.attendances_of(1).len(), 2);
    }

    #[actix_web::test]
    async fn window_lookup_returns_latest_check_in() {
        let store = MemoryStore::new();
        for (id, hour) in [(1, 8), (2, 14)] {
            store.add_attendance(Attendance {
                id,
                employee_id: 1,
                check_in: Some(at(4, hour)),
                check_out: None,
                project_id: None,
            });
        }

        let found = store
            .find_attendance_in(1, DayWindow::for_date(at(4, 0).date()))
            .await
            .unwrap();
        assert_eq!(found.map(|row| row.id), Some(2));
    }
}
