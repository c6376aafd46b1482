pub mod attendance;
pub mod employee;
pub mod rpc;

use actix_web::error::ErrorInternalServerError;
use tracing::error;

use crate::{model::employee::Employee, store::AttendanceStore, store::StoreError};

fn store_failure(err: StoreError) -> actix_web::Error {
    error!(error = %err, "Record store failure");
    ErrorInternalServerError("Internal Server Error")
}

/// Employee by id; a missing id resolves to `None` like an unknown one.
async fn resolve_employee(
    store: &dyn AttendanceStore,
    employee_id: Option<u64>,
) -> actix_web::Result<Option<Employee>> {
    match employee_id {
        Some(id) => store.find_employee(id).await.map_err(store_failure),
        None => Ok(None),
    }
}
