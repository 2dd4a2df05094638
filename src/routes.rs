use crate::{
    api::employee,
    auth::{handlers, middleware::auth_middleware},
    config::Config,
    error::AppError,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

/// Per-IP limiter allowing `requests_per_min` with an equal burst.
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);

    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("period and burst size are both non-zero");
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let signin_limiter = Arc::new(build_limiter(config.rate_signin_per_min));
    let signup_limiter = Arc::new(build_limiter(config.rate_signup_per_min));
    let reset_limiter = Arc::new(build_limiter(config.rate_reset_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Malformed bodies and ids are client errors in our own error shape
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::validation(err.to_string()).into()),
    );

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/signup")
                    .wrap(signup_limiter)
                    .route(web::post().to(handlers::signup)),
            )
            .service(
                web::resource("/signin")
                    .wrap(signin_limiter)
                    .route(web::post().to(handlers::signin)),
            )
            .service(
                web::resource("/reset-password")
                    .wrap(reset_limiter)
                    .route(web::post().to(handlers::reset_password)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::put().to(employee::update_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            ),
    );
}

// SIGNUP / SIGNIN
//  └─ token (ACCESS_TOKEN_TTL, default 1h)

// API REQUEST
//  └─ Authorization: Bearer token

// TOKEN EXPIRED
//  └─ sign in again; there is no refresh flow
