// handlers/public/auth/login.rs - POST /login handler

use axum::extract::State;
use serde::Serialize;

use crate::api::{JsonBody, LoginRequest};
use crate::app::AppState;
use crate::auth::verify_password_blocking;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// Carries both the English keys and the `nombreUsuario`/`rol` keys the
/// web client reads.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub role: String,
    #[serde(rename = "nombreUsuario")]
    pub nombre_usuario: String,
    pub rol: String,
}

/**
 * POST /login - Authenticate credentials and receive a token
 *
 * Expected Input:
 * ```json
 * { "username": "alice", "password": "secret", "role": "administrador" }
 * ```
 * `nombreUsuario` and `rol` are accepted as field aliases.
 *
 * Every failure is a 401; the message says which check failed.
 */
pub async fn login_post(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let username = request.normalized_username();

    let user = state
        .credentials
        .find_by_username(&username)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Login for unknown user '{}'", username);
            ApiError::unauthorized("Usuario no encontrado.")
        })?;

    if !verify_password_blocking(request.password.clone(), user.password_hash.clone()).await {
        tracing::warn!("Login for '{}' with wrong password", username);
        return Err(ApiError::unauthorized("Contraseña incorrecta."));
    }

    let role = user.role.to_lowercase();
    if role != request.normalized_role() {
        tracing::warn!("Login for '{}' with wrong role", username);
        return Err(ApiError::unauthorized("Rol incorrecto."));
    }

    let token = state.issuer.issue(&user.username, &role)?;
    tracing::info!("User '{}' logged in", user.username);

    Ok(ApiResponse::success(LoginResponse {
        token,
        nombre_usuario: user.username.clone(),
        username: user.username,
        rol: role.clone(),
        role,
    }))
}
