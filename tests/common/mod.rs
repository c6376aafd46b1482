#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use bim_attendance::{
    auth::password::CredentialScheme,
    model::{attendance::Attendance, company::Company, employee::Employee, project::Project},
    state::AppState,
    store::MemoryStore,
    utils::{clock::FixedClock, employee_lock::EmployeeLocks},
};

pub const JUAN: u64 = 12;
pub const ANA: u64 = 13;
pub const ANDINA: u64 = 1;

/// Boots the full route table over `$state` with limiters disabled.
#[macro_export]
macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(actix_web::App::new().configure(|cfg| {
            bim_attendance::routes::configure(
                cfg,
                &$state,
                bim_attendance::config::RateLimits::default(),
            )
        }))
        .await
    };
}

/// POSTs `$body` as JSON and returns `(status, json body)`.
#[macro_export]
macro_rules! post_json {
    ($app:expr, $path:expr, $body:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri($path)
            .set_json($body)
            .to_request();
        let resp = actix_web::test::call_service(&$app, req).await;
        let status = resp.status();
        let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
        (status, body)
    }};
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

pub fn at(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").unwrap()
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_scheme(CredentialScheme::Plaintext)
    }

    /// Seeded store, clock pinned to [`today`].
    pub fn with_scheme(credentials: CredentialScheme) -> Self {
        let store = Arc::new(MemoryStore::new());
        seed(&store, credentials);
        let state = AppState {
            store: store.clone(),
            clock: Arc::new(FixedClock(today())),
            locks: EmployeeLocks::default(),
            credentials,
        };
        Self { store, state }
    }

    pub fn add_attendance(&self, id: u64, employee_id: u64, check_in: &str, check_out: Option<&str>) {
        self.store.add_attendance(Attendance {
            id,
            employee_id,
            check_in: Some(at(check_in)),
            check_out: check_out.map(at),
            project_id: None,
        });
    }
}

fn seed(store: &MemoryStore, credentials: CredentialScheme) {
    store.add_company(Company {
        id: ANDINA,
        name: "Constructora Andina".into(),
    });
    store.add_company(Company {
        id: 2,
        name: "Obras del Sur".into(),
    });

    store.add_project(Project {
        id: 4,
        name: "Torre Norte".into(),
        company_id: Some(ANDINA),
        code: Some("TN-01".into()),
        nombre: Some("Torre Norte Fase 1".into()),
        ..Default::default()
    });
    store.add_project(Project {
        id: 5,
        name: "Puente Río Claro".into(),
        company_id: Some(ANDINA),
        codigo: Some("PRC".into()),
        description: Some("Puente vehicular".into()),
        ..Default::default()
    });
    store.add_project(Project {
        id: 9,
        name: "Hospital Sur".into(),
        company_id: Some(2),
        ..Default::default()
    });

    let seal = |raw: &str| credentials.seal(raw).unwrap();
    store.add_employee(Employee {
        id: JUAN,
        name: "Juan Pérez".into(),
        bim_user: Some("jperez".into()),
        bim_password: Some(seal("1234")),
        company_id: Some(ANDINA),
    });
    store.add_employee(Employee {
        id: ANA,
        name: "Ana Ruiz".into(),
        bim_user: Some("aruiz".into()),
        bim_password: Some(seal("abcd")),
        company_id: None,
    });
}
