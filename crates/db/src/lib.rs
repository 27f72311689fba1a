//! Persistence layer for the feature manager.
//!
//! - [`tables`] resolves prefixed table names once at startup.
//! - [`models`] holds row structs and request DTOs.
//! - [`repositories`] holds the SQL, one zero-sized repo per table group.
//! - [`stores`] defines the store interfaces consumed by the services,
//!   with a PostgreSQL and an in-memory implementation.

use featmgr_core::error::CoreError;
use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod stores;
pub mod tables;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the catalog schema migrations in `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Convert a driver error into the core taxonomy, tagging the failed operation.
pub(crate) fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> CoreError {
    tracing::error!(operation, error = %err, "Database operation failed");
    CoreError::Persistence(format!("{operation}: {err}"))
}
