use std::sync::Arc;

use actix_web::web::{self, Data};

use crate::{
    auth::password::CredentialScheme,
    store::AttendanceStore,
    utils::{clock::Clock, employee_lock::EmployeeLocks},
};

/// Process-wide resources, built once at startup and handed to every worker.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AttendanceStore>,
    pub clock: Arc<dyn Clock>,
    pub locks: EmployeeLocks,
    pub credentials: CredentialScheme,
}

impl AppState {
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(Data::from(self.store.clone()))
            .app_data(Data::from(self.clock.clone()))
            .app_data(Data::new(self.locks.clone()))
            .app_data(Data::new(self.credentials));
    }
}
