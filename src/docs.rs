use crate::models::{
    AttendanceItem, AttendanceListReply, AttendanceListReq, AttendanceRecordReq,
    ChangePasswordReq, CheckAttendanceReply, EmployeeReq, LoginReply, LoginReq, MessageReply,
    ProjectSummary, Status,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "BIM Attendance Gateway",
        version = "1.0.0",
        description = r#"
## BIM Attendance Gateway

JSON endpoints used by the BIM mobile app to sign employees in and record
their daily attendance against a project.

### Key Features
- **Employee login** returning the employee's company and its projects
- **Password change** for the mobile credential
- **Attendance** status, history and daily check-in / check-out

### Conventions
- Every endpoint is `POST` and public; the credential check happens in the payload.
- Bodies may be a bare object or a JSON-RPC envelope (`{"jsonrpc": "2.0", "params": {...}}`);
  replies mirror the request form.
- Business errors come back as HTTP 200 with `{"status": "error", "message": ...}`.
- Timestamps are server-local `YYYY-MM-DD HH:MM:SS`.
"#,
    ),
    paths(
        crate::api::employee::login,
        crate::api::employee::change_password,

        crate::api::attendance::check_attendance,
        crate::api::attendance::list_attendances,
        crate::api::attendance::record_attendance
    ),
    components(
        schemas(
            LoginReq,
            LoginReply,
            ProjectSummary,
            ChangePasswordReq,
            EmployeeReq,
            CheckAttendanceReply,
            AttendanceListReq,
            AttendanceListReply,
            AttendanceItem,
            AttendanceRecordReq,
            MessageReply,
            Status
        )
    ),
    tags(
        (name = "Employee", description = "Mobile login and credentials"),
        (name = "Attendance", description = "Daily attendance tracking"),
    )
)]
pub struct ApiDoc;
