//! Identity tokens, password hashing and role checks.
//!
//! The request gate itself lives in `middleware::auth`; this module holds the
//! pieces it is built from so they can be exercised without HTTP.

pub mod authorize;
pub mod password;
pub mod token;

pub use authorize::{authorize, normalize_role, normalize_username, ADMIN_ROLE};
pub use password::{hash_password, hash_password_blocking, verify_password, verify_password_blocking};
pub use token::{Claims, TokenIssuer, TokenVerifier};

use thiserror::Error;

use crate::database::DatabaseError;

/// Failures of the authentication gate and the login flow around it
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token faltante")]
    MissingToken,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuario no encontrado")]
    UserNotFound,

    #[error("Acceso denegado: se requiere rol de administrador")]
    Forbidden,

    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Store(#[from] DatabaseError),
}
