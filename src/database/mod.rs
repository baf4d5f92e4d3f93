pub mod categories;
pub mod manager;
pub mod models;
pub mod movies;
pub mod schema;
pub mod users;

pub use categories::CategoryRepository;
pub use manager::{DatabaseError, DatabaseManager};
pub use movies::{CategoryFilter, MovieRepository};
pub use schema::ensure_schema;
pub use users::{CredentialStore, PgCredentialStore};
