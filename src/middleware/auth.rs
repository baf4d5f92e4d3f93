use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{authorize, AuthError, TokenVerifier, ADMIN_ROLE};
use crate::database::{models::User, CredentialStore};
use crate::error::ApiError;

/// Identity resolved from a verified token and the credential store
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i32,
    pub username: String,
    pub role: String,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

/// Verify the bearer token in `headers` and resolve it to a stored user.
///
/// Steps, in order: extract the token, check signature and expiry, look the
/// username up in the store. Each request performs exactly one lookup.
pub async fn verify(
    headers: &HeaderMap,
    verifier: &TokenVerifier,
    store: &dyn CredentialStore,
) -> Result<AuthUser, AuthError> {
    let token = extract_bearer_token(headers).ok_or(AuthError::MissingToken)?;
    let claims = verifier.decode(token)?;

    let user = store
        .find_by_username(&claims.username)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token for unknown user '{}'", claims.username);
            AuthError::UserNotFound
        })?;

    Ok(AuthUser::from(user))
}

/// Gate for admin-only routes: verify, then authorize, then run the handler.
/// The resolved [`AuthUser`] is available to handlers as an extension.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = verify(request.headers(), &state.verifier, state.credentials.as_ref()).await?;
    authorize(&user, ADMIN_ROLE)?;

    tracing::debug!("Admin request by '{}' to {}", user.username, request.uri().path());
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Token from an `Authorization: Bearer <token>` header
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenIssuer;
    use crate::testing::MemoryCredentialStore;
    use axum::http::HeaderValue;
    use chrono::{Duration, Utc};

    const SECRET: &str = "gate-secret";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    async fn store_with_alice() -> MemoryCredentialStore {
        let store = MemoryCredentialStore::default();
        store.add("alice", "secret", "administrador").await;
        store.add("bob", "secret", "usuario").await;
        store
    }

    #[test]
    fn bearer_token_extraction() {
        assert_eq!(extract_bearer_token(&headers_with("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(extract_bearer_token(&headers_with("Basic YWxpY2U6c2VjcmV0")), None);
        assert_eq!(extract_bearer_token(&headers_with("bearer abc")), None);
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn missing_header_is_missing_token() {
        let store = store_with_alice().await;
        let verifier = TokenVerifier::new(SECRET);
        let result = verify(&HeaderMap::new(), &verifier, &store).await;
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[tokio::test]
    async fn malformed_prefix_is_missing_token() {
        let store = store_with_alice().await;
        let verifier = TokenVerifier::new(SECRET);
        let result = verify(&headers_with("Token abc"), &verifier, &store).await;
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[tokio::test]
    async fn bad_signature_is_invalid_token() {
        let store = store_with_alice().await;
        let verifier = TokenVerifier::new(SECRET);
        let token = TokenIssuer::new("other", Duration::hours(1)).issue("alice", "administrador").unwrap();

        let result = verify(&headers_with(&format!("Bearer {}", token)), &verifier, &store).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn expired_token_is_invalid_token() {
        let store = store_with_alice().await;
        let verifier = TokenVerifier::new(SECRET);
        let issued = Utc::now() - Duration::hours(2);
        let token = TokenIssuer::new(SECRET, Duration::hours(1))
            .issue_at("alice", "administrador", issued)
            .unwrap();

        let result = verify(&headers_with(&format!("Bearer {}", token)), &verifier, &store).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn unknown_user_is_user_not_found() {
        let store = store_with_alice().await;
        let verifier = TokenVerifier::new(SECRET);
        let token = TokenIssuer::new(SECRET, Duration::hours(1)).issue("mallory", "administrador").unwrap();

        let result = verify(&headers_with(&format!("Bearer {}", token)), &verifier, &store).await;
        assert!(matches!(result, Err(AuthError::UserNotFound)));
    }

    #[tokio::test]
    async fn valid_token_resolves_stored_identity() {
        let store = store_with_alice().await;
        let verifier = TokenVerifier::new(SECRET);
        let token = TokenIssuer::new(SECRET, Duration::hours(1)).issue("alice", "administrador").unwrap();

        let user = verify(&headers_with(&format!("Bearer {}", token)), &verifier, &store).await.unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, "administrador");
        assert!(authorize(&user, ADMIN_ROLE).is_ok());
    }

    #[tokio::test]
    async fn role_comes_from_the_store_not_the_token() {
        let store = store_with_alice().await;
        let verifier = TokenVerifier::new(SECRET);
        // bob is a plain user even if a token claims otherwise
        let token = TokenIssuer::new(SECRET, Duration::hours(1)).issue("bob", "administrador").unwrap();

        let user = verify(&headers_with(&format!("Bearer {}", token)), &verifier, &store).await.unwrap();
        assert_eq!(user.role, "usuario");
        assert!(matches!(authorize(&user, ADMIN_ROLE), Err(AuthError::Forbidden)));
    }
}
