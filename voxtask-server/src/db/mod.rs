//! Database access for voxtask-server
//!
//! Single SQLite file in the root folder. Handlers never touch SQL directly;
//! they go through the functions in [`tasks`].

pub mod tasks;

use anyhow::{Context, Result};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Creates the database file and the tables if they are missing.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Path goes in as a filename, never through URL parsing
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);
    tracing::debug!("Connecting to database: {}", db_path.display());

    let pool = SqlitePool::connect_with(options)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Create the tasks table if it doesn't exist
///
/// AUTOINCREMENT keeps ids monotonic and prevents reuse after deletes.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            content TEXT NOT NULL,
            date TEXT NOT NULL,
            done INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_tasks_date ON tasks (date)")
        .execute(pool)
        .await?;

    tracing::info!("Database tables initialized (tasks)");

    Ok(())
}
