pub mod auth;
pub mod response;

pub use auth::{require_admin, verify, AuthUser};
pub use response::{ApiResponse, ApiResult, Mensaje};
