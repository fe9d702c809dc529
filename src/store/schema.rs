//! Schema creation
//!
//! Tables are created with `IF NOT EXISTS` at startup; there is no migration
//! history.

use sqlx::AnyPool;

use super::{Backend, StoreError};

const SQLITE_SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS transactions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        amount REAL NOT NULL,
        description TEXT NOT NULL,
        user_id INTEGER NOT NULL REFERENCES users (id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS ix_transactions_user_id ON transactions (user_id)",
];

const POSTGRES_SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS transactions (
        id BIGSERIAL PRIMARY KEY,
        amount DOUBLE PRECISION NOT NULL,
        description TEXT NOT NULL,
        user_id BIGINT NOT NULL REFERENCES users (id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS ix_transactions_user_id ON transactions (user_id)",
];

/// Tables every deployment needs
pub const REQUIRED_TABLES: &[&str] = &["users", "transactions"];

pub(super) fn statements(backend: Backend) -> &'static [&'static str] {
    match backend {
        Backend::Sqlite => SQLITE_SCHEMA,
        Backend::Postgres => POSTGRES_SCHEMA,
    }
}

/// Create all tables and indexes that are missing.
///
/// Statements run one at a time: prepared statements cannot batch DDL on
/// Postgres.
pub(super) async fn ensure(pool: &AnyPool, backend: Backend) -> Result<(), StoreError> {
    let mut tx = pool.begin().await?;
    for statement in statements(backend) {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    tracing::debug!(backend = %backend, tables = ?REQUIRED_TABLES, "Schema ensured");
    Ok(())
}
