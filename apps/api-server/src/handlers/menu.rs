//! Menu catalog endpoints.

use actix_web::{HttpResponse, web};
use diner_core::validation::{MenuItemInput, validate_menu_item, validate_menu_patch};
use diner_shared::dto::MessageResponse;

use crate::middleware::error::{AppError, AppResult, not_found};
use crate::state::AppState;

/// GET /api/menu
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let items = state.menu.list_available().await?;
    Ok(HttpResponse::Ok().json(items))
}

/// GET /api/menu/categories
pub async fn categories(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let grouped = state.menu.list_available_grouped().await?;
    Ok(HttpResponse::Ok().json(grouped))
}

/// POST /api/menu
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<MenuItemInput>,
) -> AppResult<HttpResponse> {
    let item = validate_menu_item(&body).map_err(AppError::Validation)?;
    let created = state.menu.create(item).await?;
    Ok(HttpResponse::Created().json(created))
}

/// PUT /api/menu/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<MenuItemInput>,
) -> AppResult<HttpResponse> {
    let patch = validate_menu_patch(&body).map_err(AppError::Validation)?;
    let updated = state
        .menu
        .update(&path, patch)
        .await
        .map_err(not_found("Menu item"))?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/menu/{id}
pub async fn delete(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    state
        .menu
        .delete(&path)
        .await
        .map_err(not_found("Menu item"))?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Menu item deleted successfully")))
}
