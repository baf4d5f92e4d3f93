// handlers/public/auth/register.rs - POST /usuario handler

use axum::{extract::State, http::StatusCode};

use crate::api::{JsonBody, RegisterUserRequest};
use crate::app::AppState;
use crate::auth::hash_password_blocking;
use crate::database::{models::NewUser, DatabaseError};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, Mensaje};

const USERNAME_EXISTS: &str = "El nombre de usuario ya existe.";

/// POST /usuario - Self-service registration
pub async fn register_post(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterUserRequest>,
) -> ApiResult<Mensaje> {
    let registration = request.validate()?;

    if state.credentials.username_taken(&registration.username, None).await? {
        return Err(ApiError::conflict(USERNAME_EXISTS));
    }

    let password_hash = hash_password_blocking(registration.password).await?;
    let new_user = NewUser {
        username: registration.username,
        password_hash,
        role: registration.role,
    };

    // The unique constraint still decides when two registrations race
    let user = state.credentials.insert(new_user).await.map_err(|e| match e {
        DatabaseError::Conflict(_) => ApiError::conflict(USERNAME_EXISTS),
        other => other.into(),
    })?;

    tracing::info!("Registered user '{}' with role '{}'", user.username, user.role);
    Ok(ApiResponse::message(StatusCode::CREATED, "Usuario creado exitosamente"))
}
