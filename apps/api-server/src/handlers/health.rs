//! Health check endpoint.

use actix_web::{HttpResponse, web};
use diner_shared::dto::HealthResponse;

use crate::state::AppState;

/// Liveness check against the order store.
///
/// GET /api/orders/health
pub async fn orders_health(state: web::Data<AppState>) -> HttpResponse {
    let (status, database, mut response) = match state.orders.ping().await {
        Ok(()) => ("healthy", "connected", HttpResponse::Ok()),
        Err(e) => {
            tracing::error!(error = %e, "Order store health check failed");
            ("unhealthy", "disconnected", HttpResponse::InternalServerError())
        }
    };

    response.json(HealthResponse {
        status: status.to_string(),
        database: database.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
