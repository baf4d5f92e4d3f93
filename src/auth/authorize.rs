use super::AuthError;
use crate::middleware::AuthUser;

/// Role allowed through admin-only routes
pub const ADMIN_ROLE: &str = "administrador";

/// Roles are stored trimmed and lowercased
pub fn normalize_role(role: &str) -> String {
    role.trim().to_lowercase()
}

/// Usernames follow the same rule, so `Alice` and `alice ` are one account
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Allow the request only when the identity holds `required_role`
pub fn authorize(identity: &AuthUser, required_role: &str) -> Result<(), AuthError> {
    if identity.role.to_lowercase() == required_role.to_lowercase() {
        Ok(())
    } else {
        tracing::warn!(
            "User '{}' with role '{}' denied, '{}' required",
            identity.username,
            identity.role,
            required_role
        );
        Err(AuthError::Forbidden)
    }
}
