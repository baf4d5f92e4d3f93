// handlers/public/categories.rs - Category reads

use axum::extract::State;

use crate::api::PathParam;
use crate::app::AppState;
use crate::database::models::Category;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /obtenerCategorias
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    let categories = state.categories().list().await?;
    Ok(ApiResponse::success(categories))
}

/// GET /obtenerCategoria/:id
pub async fn show(State(state): State<AppState>, PathParam(id): PathParam<i32>) -> ApiResult<Category> {
    let category = state
        .categories()
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Categoría no encontrada"))?;
    Ok(ApiResponse::success(category))
}
