use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    model::{attendance::AttendanceEntry, project::Project},
    utils::fields::{lenient_id, lenient_timestamp, present, serialize_timestamp},
};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const EMPLOYEE_NOT_FOUND: &str = "Employee not found";
pub const PASSWORD_CHANGED: &str = "Password changed successfully";
pub const ATTENDANCE_RECORDED: &str = "Attendance recorded successfully";
pub const MALFORMED_REQUEST: &str = "Malformed request";

// ---------- requests ----------

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginReq {
    #[schema(example = "jperez")]
    #[serde(default)]
    pub bim_user: Option<String>,
    #[schema(example = "1234")]
    #[serde(default)]
    pub bim_password: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangePasswordReq {
    #[schema(example = "jperez")]
    #[serde(default)]
    pub bim_user: Option<String>,
    #[schema(example = "1234")]
    #[serde(default)]
    pub old_password: Option<String>,
    #[schema(example = "5678")]
    pub new_password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EmployeeReq {
    #[schema(example = 12, value_type = u64)]
    #[serde(default, deserialize_with = "lenient_id")]
    pub employee_id: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AttendanceListReq {
    #[schema(example = 12, value_type = u64)]
    #[serde(default, deserialize_with = "lenient_id")]
    pub employee_id: Option<u64>,
    /// Defaults to 10; non-integer values reset both limit and offset.
    #[schema(example = 10, value_type = Option<i64>)]
    #[serde(default, deserialize_with = "present")]
    pub limit: Option<Value>,
    /// Defaults to 0.
    #[schema(example = 0, value_type = Option<i64>)]
    #[serde(default, deserialize_with = "present")]
    pub offset: Option<Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AttendanceRecordReq {
    #[schema(example = 12, value_type = u64)]
    #[serde(default, deserialize_with = "lenient_id")]
    pub employee_id: Option<u64>,
    #[schema(example = "2026-03-02 08:15:00", value_type = Option<String>)]
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub check_in: Option<NaiveDateTime>,
    #[schema(example = "2026-03-02 17:30:00", value_type = Option<String>)]
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub check_out: Option<NaiveDateTime>,
    /// Project id; only applied when the day's row is created.
    #[schema(example = 4, value_type = Option<u64>)]
    #[serde(default, deserialize_with = "lenient_id")]
    pub project: Option<u64>,
}

// ---------- replies ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

/// `{status, message}` reply shared by plain acknowledgements and business errors.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageReply {
    pub status: Status,
    #[schema(example = "Invalid credentials", value_type = String)]
    pub message: &'static str,
}

impl MessageReply {
    pub fn ok(message: &'static str) -> Self {
        Self {
            status: Status::Ok,
            message,
        }
    }

    pub fn error(message: &'static str) -> Self {
        Self {
            status: Status::Error,
            message,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectSummary {
    #[schema(example = 4)]
    pub id: u64,
    #[schema(example = "Torre Norte")]
    pub name: String,
    #[schema(example = "TN-01")]
    pub code: String,
    #[schema(example = "Torre Norte Fase 1")]
    pub nombre: String,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            code: project.resolved_code().to_owned(),
            nombre: project.resolved_nombre().to_owned(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginReply {
    pub status: Status,
    #[schema(example = 12)]
    pub employee_id: u64,
    #[schema(example = "Juan Pérez")]
    pub employee_name: String,
    #[schema(example = 1, nullable = true)]
    pub company_id: Option<u64>,
    #[schema(example = "Constructora Andina", nullable = true)]
    pub company_name: Option<String>,
    pub bim_projects: Vec<ProjectSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckAttendanceReply {
    pub status: Status,
    pub checked_in: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceItem {
    #[schema(example = 31)]
    pub id: u64,
    #[schema(example = "2026-03-02 08:15:00", value_type = Option<String>)]
    #[serde(serialize_with = "serialize_timestamp")]
    pub check_in: Option<NaiveDateTime>,
    #[schema(example = "2026-03-02 17:30:00", value_type = Option<String>)]
    #[serde(serialize_with = "serialize_timestamp")]
    pub check_out: Option<NaiveDateTime>,
    #[schema(example = 4, nullable = true)]
    pub project_id: Option<u64>,
    #[schema(example = "Torre Norte", nullable = true)]
    pub project_name: Option<String>,
}

impl From<AttendanceEntry> for AttendanceItem {
    fn from(entry: AttendanceEntry) -> Self {
        Self {
            id: entry.id,
            check_in: entry.check_in,
            check_out: entry.check_out,
            project_id: entry.project_id,
            project_name: entry.project_name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceListReply {
    pub status: Status,
    pub attendances: Vec<AttendanceItem>,
}
