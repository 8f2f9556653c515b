//! Order endpoints.

use actix_web::{HttpResponse, web};
use diner_core::FieldError;
use diner_core::domain::{OrderStatus, PhoneNumber};
use diner_core::validation::{OrderInput, validate_order};
use diner_shared::ApiResponse;
use diner_shared::dto::UpdateStatusRequest;

use crate::middleware::error::{AppError, AppResult, not_found};
use crate::state::AppState;

/// POST /api/orders
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<OrderInput>,
) -> AppResult<HttpResponse> {
    let order = validate_order(&body).map_err(AppError::Validation)?;

    tracing::info!(
        phone = %order.phone_number.masked(),
        items = order.items.len(),
        "Placing order"
    );

    let stored = state.orders.create(order).await?;
    tracing::info!(order_id = stored.id, "Order placed");

    Ok(HttpResponse::Created().json(ApiResponse::ok(stored)))
}

/// GET /api/orders/{phone_number}
pub async fn list_by_phone(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let phone = PhoneNumber::parse(path.trim())
        .map_err(|e| AppError::field("phoneNumber", &e.to_string()))?;

    let orders = state.orders.list_by_phone(&phone).await?;
    tracing::debug!(phone = %phone.masked(), count = orders.len(), "Listed orders");

    Ok(HttpResponse::Ok().json(orders))
}

/// PUT /api/orders/{id}
pub async fn update_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateStatusRequest>,
) -> AppResult<HttpResponse> {
    let id = path.trim().parse::<i32>().ok().filter(|id| *id > 0);
    let status = body
        .status
        .as_deref()
        .and_then(|s| s.parse::<OrderStatus>().ok());

    let (id, status) = match (id, status) {
        (Some(id), Some(status)) => (id, status),
        (id, status) => {
            let mut errors = Vec::new();
            if id.is_none() {
                errors.push(FieldError::new("id", "Valid order ID is required"));
            }
            if status.is_none() {
                errors.push(FieldError::new("status", "Invalid order status"));
            }
            return Err(AppError::Validation(errors));
        }
    };

    let order = state
        .orders
        .update_status(id, status)
        .await
        .map_err(not_found("Order"))?;
    tracing::info!(order_id = id, status = %status, "Order status updated");

    Ok(HttpResponse::Ok().json(order))
}
