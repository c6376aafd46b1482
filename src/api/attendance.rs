use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use super::{resolve_employee, rpc::Rpc, store_failure};
use crate::{
    model::attendance::{AttendancePatch, DayWindow, NewAttendance},
    models::{
        ATTENDANCE_RECORDED, AttendanceItem, AttendanceListReply, AttendanceListReq,
        AttendanceRecordReq, CheckAttendanceReply, EMPLOYEE_NOT_FOUND, EmployeeReq, MessageReply,
        Status,
    },
    store::{AttendanceStore, StoreError},
    utils::{clock::Clock, employee_lock::EmployeeLocks, pagination::Pagination},
};

/// Check-in status for today
///
/// Tells the mobile app which button to show: checked in means today's row
/// exists and has no check-out yet.
#[utoipa::path(
    post,
    path = "/bim/employee/check-attendance",
    request_body = EmployeeReq,
    responses(
        (status = 200, description = "Current status, or `Employee not found`", body = CheckAttendanceReply, example = json!({
            "status": "ok",
            "checked_in": true
        })),
        (status = 400, description = "Malformed request", body = MessageReply),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
#[instrument(name = "check_attendance", skip_all, fields(employee_id = ?call.params.employee_id))]
pub async fn check_attendance(
    call: Rpc<EmployeeReq>,
    store: web::Data<dyn AttendanceStore>,
    clock: web::Data<dyn Clock>,
) -> actix_web::Result<HttpResponse> {
    let Some(employee) = resolve_employee(store.get_ref(), call.params.employee_id).await? else {
        return Ok(call.reply(MessageReply::error(EMPLOYEE_NOT_FOUND)));
    };

    let window = DayWindow::for_date(clock.today());
    let today = store
        .find_attendance_in(employee.id, window)
        .await
        .map_err(store_failure)?;

    let checked_in = today.is_some_and(|row| row.check_out.is_none());
    info!(employee_id = employee.id, checked_in, "Attendance status");

    Ok(call.reply(CheckAttendanceReply {
        status: Status::Ok,
        checked_in,
    }))
}

/// List an employee's attendances
#[utoipa::path(
    post,
    path = "/bim/employee/attendances",
    request_body = AttendanceListReq,
    responses(
        (status = 200, description = "Attendances by check-in descending, or `Employee not found`", body = AttendanceListReply),
        (status = 400, description = "Malformed request", body = MessageReply),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
#[instrument(name = "list_attendances", skip_all, fields(employee_id = ?call.params.employee_id))]
pub async fn list_attendances(
    call: Rpc<AttendanceListReq>,
    store: web::Data<dyn AttendanceStore>,
) -> actix_web::Result<HttpResponse> {
    let Some(employee) = resolve_employee(store.get_ref(), call.params.employee_id).await? else {
        return Ok(call.reply(MessageReply::error(EMPLOYEE_NOT_FOUND)));
    };

    let page = Pagination::coerce(call.params.limit.as_ref(), call.params.offset.as_ref());
    debug!(limit = page.limit, offset = page.offset, "Pagination resolved");

    let attendances = store
        .list_attendances(employee.id, page.row_limit(), page.offset)
        .await
        .map_err(store_failure)?;

    Ok(call.reply(AttendanceListReply {
        status: Status::Ok,
        attendances: attendances.into_iter().map(AttendanceItem::from).collect(),
    }))
}

/// Record today's attendance
///
/// Creates the employee's row for today on the first call and updates it on
/// later ones. Updates only write the timestamps that were supplied.
#[utoipa::path(
    post,
    path = "/bim/employee/attendance",
    request_body = AttendanceRecordReq,
    responses(
        (status = 200, description = "Attendance recorded, or `Employee not found`", body = MessageReply, example = json!({
            "status": "ok",
            "message": "Attendance recorded successfully"
        })),
        (status = 400, description = "Malformed request", body = MessageReply),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
#[instrument(name = "record_attendance", skip_all, fields(employee_id = ?call.params.employee_id))]
pub async fn record_attendance(
    call: Rpc<AttendanceRecordReq>,
    store: web::Data<dyn AttendanceStore>,
    clock: web::Data<dyn Clock>,
    locks: web::Data<EmployeeLocks>,
) -> actix_web::Result<HttpResponse> {
    let Some(employee) = resolve_employee(store.get_ref(), call.params.employee_id).await? else {
        return Ok(call.reply(MessageReply::error(EMPLOYEE_NOT_FOUND)));
    };

    let lock = locks.for_employee(employee.id).await;
    let _held = lock.lock().await;

    record_for_day(store.get_ref(), employee.id, clock.today(), &call.params)
        .await
        .map_err(store_failure)?;

    Ok(call.reply(MessageReply::ok(ATTENDANCE_RECORDED)))
}

/// Find-or-create on the employee's row for `today`. Callers hold the
/// employee's lock.
async fn record_for_day(
    store: &dyn AttendanceStore,
    employee_id: u64,
    today: NaiveDate,
    req: &AttendanceRecordReq,
) -> Result<(), StoreError> {
    let patch = AttendancePatch {
        check_in: req.check_in,
        check_out: req.check_out,
    };

    if let Some(existing) = store
        .find_attendance_in(employee_id, DayWindow::for_date(today))
        .await?
    {
        match store.update_attendance(existing.id, &patch).await {
            Ok(()) => {}
            // The new check-in lands on a day that already has its own row.
            // Today's row keeps its check-in; the check-out is still written.
            Err(StoreError::Duplicate) => {
                warn!(
                    employee_id,
                    attendance_id = existing.id,
                    "Check-in collides with another day's row, not moved"
                );
                let rest = AttendancePatch {
                    check_in: None,
                    ..patch
                };
                store.update_attendance(existing.id, &rest).await?;
            }
            Err(e) => return Err(e),
        }
        info!(employee_id, attendance_id = existing.id, "Attendance updated");
        return Ok(());
    }

    let new = NewAttendance {
        employee_id,
        check_in: req.check_in,
        check_out: req.check_out,
    };
    let attendance_id = match store.create_attendance(&new).await {
        Ok(id) => id,
        // Another writer already holds the row for the check-in day; merge into it.
        Err(StoreError::Duplicate) => {
            let day = req.check_in.map_or(today, |at| at.date());
            let Some(winner) = store
                .find_attendance_in(employee_id, DayWindow::for_date(day))
                .await?
            else {
                return Err(StoreError::Duplicate);
            };
            store.update_attendance(winner.id, &patch).await?;
            warn!(employee_id, attendance_id = winner.id, "Concurrent create merged into existing row");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    if let Some(project_id) = req.project {
        match store.find_project(project_id).await? {
            Some(project) => store.set_attendance_project(attendance_id, project.id).await?,
            None => debug!(project_id, "Unknown project, not attached"),
        }
    }

    info!(employee_id, attendance_id, "Attendance created");
    Ok(())
}
