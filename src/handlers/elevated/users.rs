// handlers/elevated/users.rs - Account administration

use axum::{extract::State, http::StatusCode};

use crate::api::{JsonBody, PathParam, UpdateUserRequest};
use crate::app::AppState;
use crate::auth::hash_password_blocking;
use crate::database::{
    models::{User, UserChanges},
    DatabaseError,
};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Mensaje};

const USER_NOT_FOUND: &str = "Usuario no encontrado";
const USERNAME_IN_USE: &str = "El nombre de usuario ya está en uso.";

/// GET /usuarios
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let users = state.credentials.list().await?;
    Ok(ApiResponse::success(users))
}

/// GET /usuario/:id
pub async fn show(State(state): State<AppState>, PathParam(id): PathParam<i32>) -> ApiResult<User> {
    let user = state
        .credentials
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;
    Ok(ApiResponse::success(user))
}

/// PUT /usuario/:id - omitted fields keep their values, an empty password keeps the hash
pub async fn update(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
    JsonBody(request): JsonBody<UpdateUserRequest>,
) -> ApiResult<Mensaje> {
    let current = state
        .credentials
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;

    let update = request.resolve(&current.username, &current.role)?;

    if state.credentials.username_taken(&update.username, Some(id)).await? {
        return Err(ApiError::conflict(USERNAME_IN_USE));
    }

    let password_hash = match update.password {
        Some(password) => Some(hash_password_blocking(password).await?),
        None => None,
    };

    let changes = UserChanges {
        username: update.username,
        password_hash,
        role: update.role,
    };
    state.credentials.update(id, changes).await.map_err(|e| match e {
        DatabaseError::Conflict(_) => ApiError::conflict(USERNAME_IN_USE),
        DatabaseError::NotFound(_) => ApiError::not_found(USER_NOT_FOUND),
        other => other.into(),
    })?;

    tracing::info!("Updated user {}", id);
    Ok(ApiResponse::message(StatusCode::OK, "Usuario actualizado exitosamente"))
}

/// DELETE /usuario/:id
pub async fn remove(State(state): State<AppState>, PathParam(id): PathParam<i32>) -> ApiResult<Mensaje> {
    if !state.credentials.delete(id).await? {
        return Err(ApiError::not_found(USER_NOT_FOUND));
    }

    tracing::info!("Deleted user {}", id);
    Ok(ApiResponse::message(StatusCode::OK, "Usuario eliminado exitosamente"))
}
