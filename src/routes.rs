use crate::{
    api::{dashboard, leave_request, user},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::Condition, web};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build the per-scope limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = 60_000 / u64::from(requests_per_min.max(1));
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms.max(1))
            .burst_size(requests_per_min.max(1))
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap_or_default();
        Governor::new(&cfg)
    }

    // RATE_PER_MIN=0 turns limiting off
    let limiter = Condition::new(
        config.rate_per_min > 0,
        build_limiter(config.rate_per_min),
    );

    cfg.service(
        web::scope(&config.api_prefix)
            .app_data(web::PayloadConfig::new(config.max_upload_bytes))
            .wrap(limiter)
            .service(web::resource("/users").route(web::get().to(user::list_users)))
            .service(web::resource("/me").route(web::get().to(user::me)))
            .service(web::resource("/status").route(web::get().to(dashboard::status)))
            .service(web::resource("/dashboard").route(web::get().to(dashboard::dashboard)))
            .service(web::resource("/audit").route(web::get().to(dashboard::audit_trail)))
            .service(web::resource("/export").route(web::get().to(dashboard::export_report)))
            .service(
                web::scope("/leave")
                    // /leave
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::my_leaves))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    // /leave/document
                    .service(
                        web::resource("/document")
                            .route(web::post().to(leave_request::create_leave_with_document)),
                    )
                    // /leave/types
                    .service(
                        web::resource("/types").route(web::get().to(leave_request::leave_types)),
                    )
                    // /leave/pending
                    .service(
                        web::resource("/pending").route(web::get().to(leave_request::pending_leaves)),
                    )
                    // /leave/{id}
                    .service(web::resource("/{id}").route(web::get().to(leave_request::get_leave)))
                    // /leave/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(leave_request::approve_leave)),
                    )
                    // /leave/{id}/reject
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(leave_request::reject_leave)),
                    )
                    // /leave/{id}/document
                    .service(
                        web::resource("/{id}/document")
                            .route(web::get().to(leave_request::get_document)),
                    ),
            ),
    );
}

// PICK USER
//  └─ X-User: <employee name from GET /users>

// EMPLOYEE
//  ├─ POST /leave, POST /leave/document
//  └─ GET /leave, GET /me

// MANAGER (own department only)
//  ├─ GET /leave/pending
//  ├─ PUT /leave/{id}/approve | /leave/{id}/reject
//  └─ GET /dashboard, GET /audit
