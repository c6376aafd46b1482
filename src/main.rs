use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::{App, HttpServer, Responder, get};
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use bim_attendance::{
    config::Config,
    db::{init_db, run_migrations},
    docs::ApiDoc,
    routes,
    state::AppState,
    store::MySqlStore,
    utils::{clock::LocalClock, employee_lock::EmployeeLocks},
};

#[get("/")]
async fn index() -> impl Responder {
    "BIM attendance gateway"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(EnvFilter::new(&config.log_level))
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    info!(addr = %config.server_addr, scheme = ?config.credential_scheme, "Server starting...");

    let pool = init_db(&config.database_url, config.db_max_connections).await?;
    if config.run_migrations {
        run_migrations(&pool).await?;
        info!("Migrations applied");
    }

    let state = AppState {
        store: Arc::new(MySqlStore::new(pool)),
        clock: Arc::new(LocalClock),
        locks: EmployeeLocks::new(config.lock_capacity, config.lock_ttl),
        credentials: config.credential_scheme,
    };
    let limits = config.rate_limits;

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard matches JS/CSS assets
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .service(index)
            .configure(|cfg| routes::configure(cfg, &state, limits))
    })
    .bind(&config.server_addr)?
    .run()
    .await?;

    Ok(())
}
