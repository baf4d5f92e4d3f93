use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const MAX_MOVIE_NAME_LEN: usize = 100;

/// Row of the `movies` table. The API shape lives in `api::format`.
#[derive(Debug, Clone, FromRow)]
pub struct Movie {
    pub id: i32,
    pub name: String,
    pub description: String,
    /// Minutes
    pub duration: i32,
    /// File name inside the upload directory
    pub image: Option<String>,
    pub category_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMovie {
    pub name: String,
    pub description: String,
    pub duration: i32,
    pub image: Option<String>,
    pub category_id: Option<i32>,
}

/// Full replacement values for an existing movie
#[derive(Debug, Clone)]
pub struct MovieChanges {
    pub name: String,
    pub description: String,
    pub duration: i32,
    pub image: Option<String>,
    pub category_id: Option<i32>,
}
