//! Shared persistence plumbing: the store error type and the Postgres pool.

use anyhow::{Context, Result};
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write (e.g. email already taken).
    #[error("duplicate record")]
    Duplicate,
    #[error("invalid stored value: {0}")]
    Decode(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Map unique violations to [`StoreError::Duplicate`], everything else to `Database`.
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        if is_unique_violation(&err) {
            Self::Duplicate
        } else {
            Self::Database(err)
        }
    }
}

/// Postgres `unique_violation` (SQLSTATE 23505).
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
        _ => false,
    }
}

/// Connect the shared pool.
///
/// # Errors
/// Returns an error if the database is unreachable or the DSN is invalid.
pub async fn connect(dsn: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .min_connections(1)
        .max_connections(10)
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect(dsn)
        .await
        .context("Failed to connect to database")
}
