use async_trait::async_trait;
use sqlx::PgPool;

use super::models::{NewUser, User, UserChanges};
use super::DatabaseError;

/// Persistence seam for user accounts.
///
/// The token gate resolves every verified username through this trait, so it
/// is also what tests swap out to exercise authentication without Postgres.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DatabaseError>;

    async fn list(&self) -> Result<Vec<User>, DatabaseError>;

    /// True when another account (not `exclude_id`) already uses `username`
    async fn username_taken(&self, username: &str, exclude_id: Option<i32>) -> Result<bool, DatabaseError>;

    /// Fails with [`DatabaseError::Conflict`] when the username is taken
    async fn insert(&self, user: NewUser) -> Result<User, DatabaseError>;

    /// Fails with [`DatabaseError::NotFound`] for unknown ids
    async fn update(&self, id: i32, changes: UserChanges) -> Result<User, DatabaseError>;

    /// Returns false when nothing was deleted
    async fn delete(&self, id: i32) -> Result<bool, DatabaseError>;
}

/// Postgres-backed credential store over the `users` table
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, role FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, role FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, DatabaseError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, role FROM users ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn username_taken(&self, username: &str, exclude_id: Option<i32>) -> Result<bool, DatabaseError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM users WHERE username = $1 AND ($2::INTEGER IS NULL OR id <> $2)",
        )
        .bind(username)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.0 > 0)
    }

    async fn insert(&self, user: NewUser) -> Result<User, DatabaseError> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, role
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.role)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update(&self, id: i32, changes: UserChanges) -> Result<User, DatabaseError> {
        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = $2,
                password_hash = COALESCE($3, password_hash),
                role = $4
            WHERE id = $1
            RETURNING id, username, password_hash, role
            "#,
        )
        .bind(id)
        .bind(&changes.username)
        .bind(&changes.password_hash)
        .bind(&changes.role)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| DatabaseError::NotFound(format!("user {}", id)))
    }

    async fn delete(&self, id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
