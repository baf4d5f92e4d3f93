use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

pub const MAX_CATEGORY_NAME_LEN: usize = 50;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: i32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "fechaCreacion")]
    pub created_at: DateTime<Utc>,
}
