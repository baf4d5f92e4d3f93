// handlers/elevated/mod.rs - Admin handlers
//
// Mounted behind `middleware::require_admin`, so every handler here runs
// only after the token was verified and the role authorized.

pub mod categories;
pub mod movies;
pub mod users;
