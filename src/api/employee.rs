use actix_web::{HttpResponse, web};
use tracing::{debug, error, info, instrument};

use super::{rpc::Rpc, store_failure};
use crate::{
    auth::password::CredentialScheme,
    model::employee::Employee,
    models::{
        ChangePasswordReq, INVALID_CREDENTIALS, LoginReply, LoginReq, MessageReply,
        PASSWORD_CHANGED, ProjectSummary, Status,
    },
    store::{AttendanceStore, StoreError},
};

/// First employee with this username whose stored credential matches.
/// Unknown user and wrong password are deliberately indistinguishable.
async fn find_by_credentials(
    store: &dyn AttendanceStore,
    scheme: CredentialScheme,
    bim_user: Option<&str>,
    password: Option<&str>,
) -> Result<Option<Employee>, StoreError> {
    let (Some(bim_user), Some(password)) = (bim_user, password) else {
        return Ok(None);
    };

    let candidates = store.find_employees_by_user(bim_user).await?;
    Ok(candidates.into_iter().find(|employee| {
        // collations may still pad or fold; the username must be byte-equal
        employee.bim_user.as_deref() == Some(bim_user)
            && employee
                .bim_password
                .as_deref()
                .is_some_and(|stored| scheme.matches(password, stored))
    }))
}

/// Employee login
#[utoipa::path(
    post,
    path = "/bim/employee/login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Employee authenticated. Unknown user or wrong password answers `{\"status\": \"error\", \"message\": \"Invalid credentials\"}`", body = LoginReply),
        (status = 400, description = "Malformed request", body = MessageReply),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
#[instrument(name = "employee_login", skip_all, fields(bim_user = ?call.params.bim_user))]
pub async fn login(
    call: Rpc<LoginReq>,
    store: web::Data<dyn AttendanceStore>,
    scheme: web::Data<CredentialScheme>,
) -> actix_web::Result<HttpResponse> {
    info!("Login request received");

    let employee = find_by_credentials(
        store.get_ref(),
        **scheme,
        call.params.bim_user.as_deref(),
        call.params.bim_password.as_deref(),
    )
    .await
    .map_err(store_failure)?;

    let Some(employee) = employee else {
        info!("Invalid credentials");
        return Ok(call.reply(MessageReply::error(INVALID_CREDENTIALS)));
    };

    let company = match employee.company_id {
        Some(company_id) => store
            .find_company(company_id)
            .await
            .map_err(store_failure)?,
        None => None,
    };
    debug!(company_id = ?company.as_ref().map(|c| c.id), "Company resolved");

    let projects = match &company {
        Some(company) => store
            .company_projects(company.id)
            .await
            .map_err(store_failure)?,
        None => Vec::new(),
    };
    debug!(projects = ?projects.iter().map(|p| p.id).collect::<Vec<_>>(), "Projects resolved");

    info!(employee_id = employee.id, "Login successful");

    Ok(call.reply(LoginReply {
        status: Status::Ok,
        employee_id: employee.id,
        employee_name: employee.name,
        company_id: company.as_ref().map(|c| c.id),
        company_name: company.map(|c| c.name),
        bim_projects: projects.iter().map(ProjectSummary::from).collect(),
    }))
}

/// Change employee password
#[utoipa::path(
    post,
    path = "/bim/employee/change-password",
    request_body = ChangePasswordReq,
    responses(
        (status = 200, description = "Password changed, or invalid credentials", body = MessageReply, example = json!({
            "status": "ok",
            "message": "Password changed successfully"
        })),
        (status = 400, description = "Malformed request", body = MessageReply),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
#[instrument(name = "employee_change_password", skip_all, fields(bim_user = ?call.params.bim_user))]
pub async fn change_password(
    call: Rpc<ChangePasswordReq>,
    store: web::Data<dyn AttendanceStore>,
    scheme: web::Data<CredentialScheme>,
) -> actix_web::Result<HttpResponse> {
    let employee = find_by_credentials(
        store.get_ref(),
        **scheme,
        call.params.bim_user.as_deref(),
        call.params.old_password.as_deref(),
    )
    .await
    .map_err(store_failure)?;

    let Some(employee) = employee else {
        info!("Employee not found or old password incorrect");
        return Ok(call.reply(MessageReply::error(INVALID_CREDENTIALS)));
    };

    let sealed = scheme.seal(&call.params.new_password).map_err(|e| {
        error!(error = %e, employee_id = employee.id, "Failed to seal credential");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    store
        .set_employee_credential(employee.id, &sealed)
        .await
        .map_err(store_failure)?;

    info!(employee_id = employee.id, "Password changed");

    Ok(call.reply(MessageReply::ok(PASSWORD_CHANGED)))
}
