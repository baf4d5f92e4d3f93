use sqlx::PgPool;
use tracing::info;

use super::DatabaseError;

/// Tables in dependency order. Statements are idempotent.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            SERIAL PRIMARY KEY,
        username      VARCHAR(50)  NOT NULL UNIQUE,
        password_hash VARCHAR(200) NOT NULL,
        role          VARCHAR(50)  NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id         SERIAL PRIMARY KEY,
        name       VARCHAR(50) NOT NULL UNIQUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS movies (
        id          SERIAL PRIMARY KEY,
        name        VARCHAR(100) NOT NULL UNIQUE,
        description TEXT         NOT NULL,
        duration    INTEGER      NOT NULL,
        image       VARCHAR(200),
        category_id INTEGER REFERENCES categories(id) ON DELETE SET NULL,
        created_at  TIMESTAMPTZ  NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS movies_category_id_idx ON movies (category_id)",
];

/// Advisory lock key serializing concurrent schema setup
const SCHEMA_LOCK_KEY: i64 = 0x6361_7461_6c6f_676f;

/// Create the catalog tables if they do not exist yet
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    // CREATE TABLE IF NOT EXISTS still races when two processes start together
    let mut tx = pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    info!("Database schema ready");
    Ok(())
}
