// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition, self-service registration and catalog reads.

pub mod auth;
pub mod categories;
pub mod movies;
