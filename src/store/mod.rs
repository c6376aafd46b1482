//! Record store seam.
//!
//! The gateway owns no data: employees, companies, projects and attendances
//! live in an external store reached through [`AttendanceStore`].

pub mod memory;
pub mod mysql;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{
    attendance::{Attendance, AttendanceEntry, AttendancePatch, DayWindow, NewAttendance},
    company::Company,
    employee::Employee,
    project::Project,
};

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A second attendance row for the same employee and check-in day.
    #[error("attendance already recorded for this employee on that day")]
    Duplicate,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    async fn find_employee(&self, id: u64) -> StoreResult<Option<Employee>>;

    /// Employees carrying this exact username, lowest id first.
    async fn find_employees_by_user(&self, bim_user: &str) -> StoreResult<Vec<Employee>>;

    async fn set_employee_credential(&self, employee_id: u64, credential: &str)
    -> StoreResult<()>;

    async fn find_company(&self, id: u64) -> StoreResult<Option<Company>>;

    async fn company_projects(&self, company_id: u64) -> StoreResult<Vec<Project>>;

    async fn find_project(&self, id: u64) -> StoreResult<Option<Project>>;

    /// Latest attendance whose check-in falls inside `window`.
    async fn find_attendance_in(
        &self,
        employee_id: u64,
        window: DayWindow,
    ) -> StoreResult<Option<Attendance>>;

    /// Attendances by check-in descending; rows without check-in sort last.
    /// `limit: None` returns every row past `offset`.
    async fn list_attendances(
        &self,
        employee_id: u64,
        limit: Option<u64>,
        offset: u64,
    ) -> StoreResult<Vec<AttendanceEntry>>;

    /// Returns the new row id, or [`StoreError::Duplicate`] when the employee
    /// already has a row for the check-in day.
    async fn create_attendance(&self, new: &NewAttendance) -> StoreResult<u64>;

    async fn update_attendance(&self, id: u64, patch: &AttendancePatch) -> StoreResult<()>;

    async fn set_attendance_project(&self, id: u64, project_id: u64) -> StoreResult<()>;
}
