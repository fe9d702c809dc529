//! Store Errors
//!
//! Error types for store operations.

/// Errors that can occur in the store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Descriptor could not be opened or the engine is unreachable
    #[error("Cannot connect to store at {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: sqlx::Error,
    },

    /// Descriptor names a backend this build does not speak
    #[error("Unsupported store descriptor: {0}")]
    UnsupportedBackend(String),

    /// A UNIQUE constraint rejected the write
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// Any other database error
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    /// Check if this error is a uniqueness conflict
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation { .. })
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let constraint = db_err
                    .constraint()
                    .map(str::to_string)
                    .unwrap_or_else(|| db_err.message().to_string());
                return StoreError::UniqueViolation { constraint };
            }
        }
        StoreError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let err = StoreError::UniqueViolation {
            constraint: "users.username".to_string(),
        };
        assert!(err.is_unique_violation());

        let err = StoreError::UnsupportedBackend("mysql://x".to_string());
        assert!(!err.is_unique_violation());
    }

    #[test]
    fn test_non_database_errors_pass_through() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Database(sqlx::Error::RowNotFound)));
    }
}
