use crate::{
    api::{attendance, employee, rpc::json_error_handler},
    config::RateLimits,
    state::AppState,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{
    HttpResponse,
    http::Method,
    middleware::{Condition, DefaultHeaders},
    web,
};

const ALLOW_HEADERS: &str = "Origin, X-Requested-With, Content-Type, Accept, Authorization";

/// Per-route limiter; `0` requests per minute disables it.
fn build_limiter(requests_per_min: u32) -> Condition<Governor<PeerIpKeyExtractor, NoOpMiddleware>> {
    let burst = requests_per_min.max(1);
    let per_ms = (60_000 / u64::from(burst)).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(burst)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("period and burst are non-zero");
    Condition::new(requests_per_min > 0, Governor::new(&cfg))
}

async fn preflight() -> HttpResponse {
    HttpResponse::NoContent()
        .insert_header(("Access-Control-Allow-Methods", "POST, OPTIONS"))
        .insert_header(("Access-Control-Allow-Headers", ALLOW_HEADERS))
        .insert_header(("Access-Control-Max-Age", "86400"))
        .finish()
}

pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState, limits: RateLimits) {
    state.register(cfg);
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler));

    // Public mobile endpoints, open CORS.
    cfg.service(
        web::scope("/bim/employee")
            .wrap(DefaultHeaders::new().add(("Access-Control-Allow-Origin", "*")))
            .service(
                web::resource("/login")
                    .wrap(build_limiter(limits.login_per_min))
                    .route(web::post().to(employee::login))
                    .route(web::method(Method::OPTIONS).to(preflight)),
            )
            .service(
                web::resource("/change-password")
                    .wrap(build_limiter(limits.login_per_min))
                    .route(web::post().to(employee::change_password))
                    .route(web::method(Method::OPTIONS).to(preflight)),
            )
            .service(
                web::resource("/check-attendance")
                    .wrap(build_limiter(limits.attendance_per_min))
                    .route(web::post().to(attendance::check_attendance))
                    .route(web::method(Method::OPTIONS).to(preflight)),
            )
            .service(
                web::resource("/attendances")
                    .wrap(build_limiter(limits.attendance_per_min))
                    .route(web::post().to(attendance::list_attendances))
                    .route(web::method(Method::OPTIONS).to(preflight)),
            )
            .service(
                web::resource("/attendance")
                    .wrap(build_limiter(limits.attendance_per_min))
                    .route(web::post().to(attendance::record_attendance))
                    .route(web::method(Method::OPTIONS).to(preflight)),
            ),
    );
}
