use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::debug;

use super::{AttendanceStore, StoreError, StoreResult};
use crate::model::{
    attendance::{Attendance, AttendanceEntry, AttendancePatch, DayWindow, NewAttendance},
    company::Company,
    employee::Employee,
    project::Project,
};

const EMPLOYEE_COLUMNS: &str = "id, name, bim_user, bim_password, company_id";
const PROJECT_COLUMNS: &str = "id, name, company_id, code, codigo, nombre, description";
const ATTENDANCE_COLUMNS: &str = "id, employee_id, check_in, check_out, project_id";

/// MySQL-backed store. Schema lives in `migrations/`; the unique
/// `(employee_id, check_in_day)` key backs the one-row-per-day rule across
/// gateway instances.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::Duplicate;
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl AttendanceStore for MySqlStore {
    async fn find_employee(&self, id: u64) -> StoreResult<Option<Employee>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?");
        Ok(sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_employees_by_user(&self, bim_user: &str) -> StoreResult<Vec<Employee>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE bim_user = ? ORDER BY id");
        Ok(sqlx::query_as::<_, Employee>(&sql)
            .bind(bim_user)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn set_employee_credential(
        &self,
        employee_id: u64,
        credential: &str,
    ) -> StoreResult<()> {
        sqlx::query("UPDATE employees SET bim_password = ? WHERE id = ?")
            .bind(credential)
            .bind(employee_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_company(&self, id: u64) -> StoreResult<Option<Company>> {
        Ok(
            sqlx::query_as::<_, Company>("SELECT id, name FROM companies WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn company_projects(&self, company_id: u64) -> StoreResult<Vec<Project>> {
        let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE company_id = ? ORDER BY id");
        Ok(sqlx::query_as::<_, Project>(&sql)
            .bind(company_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_project(&self, id: u64) -> StoreResult<Option<Project>> {
        let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?");
        Ok(sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_attendance_in(
        &self,
        employee_id: u64,
        window: DayWindow,
    ) -> StoreResult<Option<Attendance>> {
        let sql = format!(
            r#"
            SELECT {ATTENDANCE_COLUMNS}
            FROM attendances
            WHERE employee_id = ?
            AND check_in >= ?
            AND check_in < ?
            ORDER BY check_in DESC, id DESC
            LIMIT 1
            "#
        );
        Ok(sqlx::query_as::<_, Attendance>(&sql)
            .bind(employee_id)
            .bind(window.start)
            .bind(window.end)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_attendances(
        &self,
        employee_id: u64,
        limit: Option<u64>,
        offset: u64,
    ) -> StoreResult<Vec<AttendanceEntry>> {
        debug!(employee_id, ?limit, offset, "Fetching attendances");
        Ok(sqlx::query_as::<_, AttendanceEntry>(
            r#"
            SELECT a.id, a.check_in, a.check_out, a.project_id, p.name AS project_name
            FROM attendances a
            LEFT JOIN projects p ON p.id = a.project_id
            WHERE a.employee_id = ?
            ORDER BY a.check_in IS NULL, a.check_in DESC, a.id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(employee_id)
        // MySQL has no OFFSET without LIMIT; the largest BIGINT UNSIGNED stands for "all"
        .bind(limit.unwrap_or(u64::MAX))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_attendance(&self, new: &NewAttendance) -> StoreResult<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendances (employee_id, check_in, check_out)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(new.employee_id)
        .bind(new.check_in)
        .bind(new.check_out)
        .execute(&self.pool)
        .await
        .map_err(classify)?;
        Ok(result.last_insert_id())
    }

    async fn update_attendance(&self, id: u64, patch: &AttendancePatch) -> StoreResult<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut sets = Vec::with_capacity(2);
        if patch.check_in.is_some() {
            sets.push("check_in = ?");
        }
        if patch.check_out.is_some() {
            sets.push("check_out = ?");
        }
        let sql = format!("UPDATE attendances SET {} WHERE id = ?", sets.join(", "));
        debug!(sql = %sql, id, "Updating attendance");

        let mut query = sqlx::query(&sql);
        if let Some(check_in) = patch.check_in {
            query = query.bind(check_in);
        }
        if let Some(check_out) = patch.check_out {
            query = query.bind(check_out);
        }
        query
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn set_attendance_project(&self, id: u64, project_id: u64) -> StoreResult<()> {
        sqlx::query("UPDATE attendances SET project_id = ? WHERE id = ?")
            .bind(project_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
