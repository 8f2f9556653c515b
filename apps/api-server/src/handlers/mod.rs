//! HTTP handlers and route configuration.

mod health;
mod menu;
mod orders;

#[cfg(test)]
mod tests;

use actix_web::{
    HttpRequest,
    error::{JsonPayloadError, PathError},
    guard, web,
};

use crate::middleware::error::AppError;
use crate::middleware::rate_limit::RateLimitMiddleware;
use crate::state::AppState;

/// Malformed JSON bodies become a plain 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
            AppError::BadRequest(err.to_string()).into()
        })
}

/// Unparseable path segments become a plain 400.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, _req: &HttpRequest| {
        AppError::BadRequest(err.to_string()).into()
    })
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/menu")
                    .service(
                        web::resource("")
                            .route(web::get().to(menu::list))
                            .route(web::post().to(menu::create)),
                    )
                    .route("/categories", web::get().to(menu::categories))
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(menu::update))
                            .route(web::delete().to(menu::delete)),
                    ),
            )
            .service(
                web::scope("/orders")
                    // Only placing an order is rate limited
                    .service(
                        web::resource("")
                            .guard(guard::Post())
                            .wrap(RateLimitMiddleware::new(
                                state.rate_limiter.clone(),
                                state.rate_limit.advisory(),
                                state.trust_proxy,
                            ))
                            .route(web::post().to(orders::create)),
                    )
                    // Registered before `/{key}` so it is not read as a phone number
                    .route("/health", web::get().to(health::orders_health))
                    .service(
                        web::resource("/{key}")
                            .route(web::get().to(orders::list_by_phone))
                            .route(web::put().to(orders::update_status)),
                    ),
            ),
    );
}
