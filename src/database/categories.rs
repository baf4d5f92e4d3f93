use sqlx::PgPool;

use super::models::Category;
use super::DatabaseError;

pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Category>, DatabaseError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at FROM categories ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    pub async fn find(&self, id: i32) -> Result<Option<Category>, DatabaseError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    pub async fn exists(&self, id: i32) -> Result<bool, DatabaseError> {
        Ok(self.find(id).await?.is_some())
    }

    /// True when another category (not `exclude_id`) already uses `name`
    pub async fn name_taken(&self, name: &str, exclude_id: Option<i32>) -> Result<bool, DatabaseError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM categories WHERE name = $1 AND ($2::INTEGER IS NULL OR id <> $2)",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.0 > 0)
    }

    pub async fn insert(&self, name: &str) -> Result<Category, DatabaseError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, created_at) VALUES ($1, now()) RETURNING id, name, created_at",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(category)
    }

    pub async fn rename(&self, id: i32, name: &str) -> Result<Category, DatabaseError> {
        let category = sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $2 WHERE id = $1 RETURNING id, name, created_at",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        category.ok_or_else(|| DatabaseError::NotFound(format!("category {}", id)))
    }

    /// Referencing movies keep existing with `category_id` set to NULL
    /// (`ON DELETE SET NULL` on `movies.category_id`).
    pub async fn delete(&self, id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
