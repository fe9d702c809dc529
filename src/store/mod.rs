//! Store module
//!
//! Relational persistence for users and transactions. One code path serves
//! both the embedded SQLite backend and networked Postgres through sqlx's
//! `Any` driver.

mod error;
mod repository;
mod schema;

use std::fmt;

use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;

use crate::config::StoreConfig;

pub use error::StoreError;
pub use repository::UnitOfWork;
pub use schema::REQUIRED_TABLES;

/// Which engine a descriptor points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// In-process, file-backed (or in-memory). Single writer.
    Sqlite,
    /// Networked engine handling its own concurrency control
    Postgres,
}

impl Backend {
    /// Detect the backend from a connection URL
    pub fn from_url(url: &str) -> Result<Self, StoreError> {
        let scheme = url.split(':').next().unwrap_or_default();
        match scheme.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Backend::Sqlite),
            "postgres" | "postgresql" => Ok(Backend::Postgres),
            _ => Err(StoreError::UnsupportedBackend(redact_url(url))),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Sqlite => f.write_str("sqlite"),
            Backend::Postgres => f.write_str("postgres"),
        }
    }
}

/// Shared handle to the store. Cheap to clone; every clone uses the same pool.
#[derive(Debug, Clone)]
pub struct Store {
    pool: AnyPool,
    backend: Backend,
}

impl Store {
    /// Open a connection pool for the configured descriptor
    pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        sqlx::any::install_default_drivers();

        let backend = Backend::from_url(&config.database_url)?;
        let (url, max_connections) = match backend {
            // One connection serializes every writer through the same handle.
            // It also keeps `sqlite::memory:` a single shared database.
            Backend::Sqlite => (sqlite_url(&config.database_url), 1),
            Backend::Postgres => (config.database_url.clone(), config.max_connections),
        };

        let pool = pool_options(&url, max_connections)
            .connect(&url)
            .await
            .map_err(|source| StoreError::Connection {
                url: redact_url(&url),
                source,
            })?;

        tracing::info!(backend = %backend, max_connections, "Store opened");

        Ok(Self { pool, backend })
    }

    /// Open the store and make sure the schema exists
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let store = Self::open(config).await?;
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Create the users and transactions tables if absent. Idempotent.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        schema::ensure(&self.pool, self.backend).await
    }

    /// Simple connectivity check
    pub async fn verify_connection(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Start a unit of work.
    ///
    /// Nothing becomes visible to other units until [`UnitOfWork::commit`];
    /// dropping the unit rolls it back.
    pub async fn begin(&self) -> Result<UnitOfWork, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(UnitOfWork::new(tx))
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn pool_options(url: &str, max_connections: u32) -> AnyPoolOptions {
    let options = AnyPoolOptions::new().max_connections(max_connections);

    // An in-memory database lives exactly as long as its connection, so the
    // pool must never reap it.
    if is_memory_url(url) {
        return options
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }
    options
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// SQLite files are created on first start unless the descriptor says otherwise
fn sqlite_url(url: &str) -> String {
    if is_memory_url(url) || url.contains("mode=") {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}mode=rwc", url, separator)
}

/// Hide the password part of a descriptor before it reaches logs or errors
fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((credentials, host)) = rest.split_once('@') else {
        return url.to_string();
    };
    match credentials.split_once(':') {
        Some((user, _)) => format!("{}://{}:***@{}", scheme, user, host),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_url() {
        assert_eq!(Backend::from_url("sqlite://fintech.db").unwrap(), Backend::Sqlite);
        assert_eq!(Backend::from_url("sqlite::memory:").unwrap(), Backend::Sqlite);
        assert_eq!(
            Backend::from_url("postgres://u:p@localhost/db").unwrap(),
            Backend::Postgres
        );
        assert_eq!(
            Backend::from_url("postgresql://localhost/db").unwrap(),
            Backend::Postgres
        );
        assert!(matches!(
            Backend::from_url("mysql://localhost/db"),
            Err(StoreError::UnsupportedBackend(_))
        ));
        assert!(Backend::from_url("").is_err());
    }

    #[test]
    fn test_sqlite_url_adds_create_mode() {
        assert_eq!(sqlite_url("sqlite://fintech.db"), "sqlite://fintech.db?mode=rwc");
        assert_eq!(
            sqlite_url("sqlite://fintech.db?cache=shared"),
            "sqlite://fintech.db?cache=shared&mode=rwc"
        );
        assert_eq!(sqlite_url("sqlite://ro.db?mode=ro"), "sqlite://ro.db?mode=ro");
        assert_eq!(sqlite_url("sqlite::memory:"), "sqlite::memory:");
    }

    #[test]
    fn test_memory_pool_keeps_its_connection() {
        let options = pool_options("sqlite::memory:", 1);
        assert_eq!(options.get_min_connections(), 1);
        assert_eq!(options.get_idle_timeout(), None);
        assert_eq!(options.get_max_lifetime(), None);

        let options = pool_options("sqlite://fintech.db?mode=rwc", 1);
        assert_eq!(options.get_min_connections(), 0);
        assert!(options.get_idle_timeout().is_some());
    }

    #[tokio::test]
    async fn test_memory_store_outlives_idle_handles() {
        let store = Store::connect(&StoreConfig::new("sqlite::memory:")).await.unwrap();
        assert_eq!(store.pool.size(), 1);

        // Every unit of work goes back to the same connection and schema
        for _ in 0..3 {
            let mut uow = store.begin().await.unwrap();
            assert_eq!(uow.count_users().await.unwrap(), 0);
        }
        assert_eq!(store.pool.size(), 1);
    }

    #[test]
    fn test_redact_url() {
        assert_eq!(
            redact_url("postgres://app:hunter2@db:5432/fintech"),
            "postgres://app:***@db:5432/fintech"
        );
        assert_eq!(redact_url("postgres://app@db/fintech"), "postgres://app@db/fintech");
        assert_eq!(redact_url("sqlite://fintech.db"), "sqlite://fintech.db");
    }

    #[tokio::test]
    async fn test_open_unsupported_scheme_fails() {
        let err = Store::open(&StoreConfig::new("mysql://localhost/db"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedBackend(_)));
    }

    #[tokio::test]
    async fn test_open_unreachable_sqlite_path_fails() {
        let err = Store::open(&StoreConfig::new(
            "sqlite:///nonexistent-dir/definitely/missing/fintech.db",
        ))
        .await
        .unwrap_err();
        assert!(matches!(err, StoreError::Connection { .. }));
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let store = Store::connect(&StoreConfig::new("sqlite::memory:")).await.unwrap();
        store.ensure_schema().await.unwrap();
        store.verify_connection().await.unwrap();
        assert_eq!(store.backend(), Backend::Sqlite);
    }
}
