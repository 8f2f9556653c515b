//! Middleware modules.

pub mod error;
pub mod rate_limit;

use actix_cors::Cors;
use actix_web::http::header;

/// Cross-origin policy for the configured front-end origins.
pub fn cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(3600)
}
