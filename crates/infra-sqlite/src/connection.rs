// SQLite Connection Pool Setup

use crate::StoreConfig;
use queuedesk_core::error::{AppError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Create SQLite connection pool (WAL mode for file databases)
///
/// In-memory databases are pinned to one long-lived connection: every new
/// connection to `:memory:` would open a separate, empty database.
pub async fn create_pool(config: &StoreConfig) -> Result<SqlitePool> {
    let in_memory = config.is_in_memory();

    if !in_memory {
        ensure_parent_dir(&config.database_url)?;
    }

    let mut options = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(map_sqlx_error)?
        .busy_timeout(config.busy_timeout)
        .create_if_missing(true);
    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        SqlitePoolOptions::new().max_connections(config.max_connections)
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(map_sqlx_error)?;

    debug!(
        database_url = %config.database_url,
        in_memory,
        "SQLite pool ready"
    );

    Ok(pool)
}

fn ensure_parent_dir(database_url: &str) -> Result<()> {
    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or(path);

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

// Helper to convert sqlx::Error to AppError with structured information
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLite error codes: https://www.sqlite.org/rescode.html
                match code_str {
                    "2067" | "1555" => AppError::Database(format!(
                        "Document already exists: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "275" => AppError::Database(format!(
                        "Document body rejected: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "5" => AppError::Database(format!(
                        "Database locked (SQLITE_BUSY): {}",
                        db_err.message()
                    )),
                    "13" => AppError::Database(format!("Database full: {}", db_err.message())),
                    _ => AppError::Database(format!(
                        "Database error [{}]: {}",
                        code_str,
                        db_err.message()
                    )),
                }
            } else {
                AppError::Database(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::PoolClosed => AppError::Database("Connection pool closed".to_string()),
        sqlx::Error::PoolTimedOut => {
            AppError::Database("Timed out acquiring a database connection".to_string())
        }
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Database(format!("Column not found: {}", col))
        }
        _ => AppError::Database(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_pool() {
        let pool = create_pool(&StoreConfig::in_memory()).await.unwrap();
        assert!(pool.acquire().await.is_ok());
    }

    #[tokio::test]
    async fn test_closed_pool_maps_to_database_error() {
        let pool = create_pool(&StoreConfig::in_memory()).await.unwrap();
        pool.close().await;

        let err = sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .map_err(map_sqlx_error)
            .unwrap_err();
        assert!(err.to_string().contains("pool closed"));
    }
}
