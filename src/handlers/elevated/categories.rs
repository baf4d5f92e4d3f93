// handlers/elevated/categories.rs - Category writes

use axum::{extract::State, http::StatusCode};

use crate::api::{category_name, JsonBody, PathParam, RenameCategoryRequest};
use crate::app::AppState;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Mensaje};

const CATEGORY_NOT_FOUND: &str = "Categoría no encontrada";
const CATEGORY_EXISTS: &str = "La categoría ya existe.";
const CATEGORY_NAME_IN_USE: &str = "El nombre de categoría ya está en uso.";

/// POST /categoria/:nombre
pub async fn create(State(state): State<AppState>, PathParam(nombre): PathParam<String>) -> ApiResult<Mensaje> {
    let name = category_name(&nombre)?;
    let categories = state.categories();

    if categories.name_taken(&name, None).await? {
        return Err(ApiError::conflict(CATEGORY_EXISTS));
    }

    let category = categories.insert(&name).await.map_err(|e| match e {
        DatabaseError::Conflict(_) => ApiError::conflict(CATEGORY_EXISTS),
        other => other.into(),
    })?;

    tracing::info!("Created category {} '{}'", category.id, category.name);
    Ok(ApiResponse::message(StatusCode::CREATED, "Categoría creada exitosamente"))
}

/// PUT /editarCategoria/:id with `{"nombre": "..."}`
pub async fn rename(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
    JsonBody(request): JsonBody<RenameCategoryRequest>,
) -> ApiResult<Mensaje> {
    let name = request.name()?;
    let categories = state.categories();

    if !categories.exists(id).await? {
        return Err(ApiError::not_found(CATEGORY_NOT_FOUND));
    }
    if categories.name_taken(&name, Some(id)).await? {
        return Err(ApiError::conflict(CATEGORY_NAME_IN_USE));
    }

    categories.rename(id, &name).await.map_err(|e| match e {
        DatabaseError::Conflict(_) => ApiError::conflict(CATEGORY_NAME_IN_USE),
        DatabaseError::NotFound(_) => ApiError::not_found(CATEGORY_NOT_FOUND),
        other => other.into(),
    })?;

    tracing::info!("Renamed category {} to '{}'", id, name);
    Ok(ApiResponse::message(StatusCode::OK, "Categoría actualizada exitosamente"))
}

/// DELETE /eliminarCategoria/:id - movies in the category become uncategorized
pub async fn remove(State(state): State<AppState>, PathParam(id): PathParam<i32>) -> ApiResult<Mensaje> {
    if !state.categories().delete(id).await? {
        return Err(ApiError::not_found(CATEGORY_NOT_FOUND));
    }

    tracing::info!("Deleted category {}", id);
    Ok(ApiResponse::message(StatusCode::OK, "Categoría eliminada exitosamente"))
}
