use sqlx::PgPool;

use super::models::{Movie, MovieChanges, NewMovie};
use super::DatabaseError;

const MOVIE_COLUMNS: &str = "id, name, description, duration, image, category_id, created_at";

/// Which movies a category listing should return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Movies without a category
    Uncategorized,
    Category(i32),
}

pub struct MovieRepository {
    pool: PgPool,
}

impl MovieRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Movie>, DatabaseError> {
        let sql = format!("SELECT {} FROM movies ORDER BY id ASC", MOVIE_COLUMNS);
        let movies = sqlx::query_as::<_, Movie>(&sql).fetch_all(&self.pool).await?;
        Ok(movies)
    }

    pub async fn find(&self, id: i32) -> Result<Option<Movie>, DatabaseError> {
        let sql = format!("SELECT {} FROM movies WHERE id = $1", MOVIE_COLUMNS);
        let movie = sqlx::query_as::<_, Movie>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(movie)
    }

    pub async fn list_by_category(&self, filter: CategoryFilter) -> Result<Vec<Movie>, DatabaseError> {
        let movies = match filter {
            CategoryFilter::Uncategorized => {
                let sql = format!(
                    "SELECT {} FROM movies WHERE category_id IS NULL ORDER BY id ASC",
                    MOVIE_COLUMNS
                );
                sqlx::query_as::<_, Movie>(&sql).fetch_all(&self.pool).await?
            }
            CategoryFilter::Category(category_id) => {
                let sql = format!(
                    "SELECT {} FROM movies WHERE category_id = $1 ORDER BY id ASC",
                    MOVIE_COLUMNS
                );
                sqlx::query_as::<_, Movie>(&sql)
                    .bind(category_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(movies)
    }

    /// Case-insensitive substring match on the movie name
    pub async fn search_by_name(&self, fragment: &str) -> Result<Vec<Movie>, DatabaseError> {
        let sql = format!(
            r"SELECT {} FROM movies WHERE name ILIKE $1 ESCAPE '\' ORDER BY id ASC",
            MOVIE_COLUMNS
        );
        let movies = sqlx::query_as::<_, Movie>(&sql)
            .bind(like_pattern(fragment))
            .fetch_all(&self.pool)
            .await?;
        Ok(movies)
    }

    /// True when another movie (not `exclude_id`) already uses `name`
    pub async fn name_taken(&self, name: &str, exclude_id: Option<i32>) -> Result<bool, DatabaseError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM movies WHERE name = $1 AND ($2::INTEGER IS NULL OR id <> $2)",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.0 > 0)
    }

    pub async fn insert(&self, movie: NewMovie) -> Result<Movie, DatabaseError> {
        let sql = format!(
            r#"
            INSERT INTO movies (name, description, duration, image, category_id, created_at)
            VALUES ($1, $2, $3, $4, $5, now())
            RETURNING {}
            "#,
            MOVIE_COLUMNS
        );
        let created = sqlx::query_as::<_, Movie>(&sql)
            .bind(&movie.name)
            .bind(&movie.description)
            .bind(movie.duration)
            .bind(&movie.image)
            .bind(movie.category_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    pub async fn update(&self, id: i32, changes: MovieChanges) -> Result<Movie, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE movies
            SET name = $2, description = $3, duration = $4, image = $5, category_id = $6
            WHERE id = $1
            RETURNING {}
            "#,
            MOVIE_COLUMNS
        );
        let updated = sqlx::query_as::<_, Movie>(&sql)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.description)
            .bind(changes.duration)
            .bind(&changes.image)
            .bind(changes.category_id)
            .fetch_optional(&self.pool)
            .await?;

        updated.ok_or_else(|| DatabaseError::NotFound(format!("movie {}", id)))
    }

    /// Deletes the row and returns it, so the caller can drop its image file
    pub async fn delete(&self, id: i32) -> Result<Option<Movie>, DatabaseError> {
        let sql = format!("DELETE FROM movies WHERE id = $1 RETURNING {}", MOVIE_COLUMNS);
        let deleted = sqlx::query_as::<_, Movie>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(deleted)
    }
}

/// Wrap `fragment` in `%` wildcards, escaping LIKE metacharacters
fn like_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
