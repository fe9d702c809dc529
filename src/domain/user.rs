//! User entity

use serde::{Deserialize, Serialize};

use super::DomainError;

/// A persisted user, as read back from the store.
///
/// Deliberately not `Serialize`: the hash must never leave the service.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

impl From<User> for UserRecord {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// What callers get back after registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
}

/// A user ready for insertion but without an id yet.
///
/// Usernames and passwords are taken as given, empty strings included. Only
/// uniqueness is checked, and that needs the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    username: String,
    password_hash: String,
}

impl NewUser {
    /// Build from an already-hashed password
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Result<Self, DomainError> {
        // Every hasher yields a non-empty digest, even for an empty password
        let password_hash = password_hash.into();
        if password_hash.is_empty() {
            return Err(DomainError::invalid_field("password_hash", "must not be empty"));
        }

        Ok(Self {
            username: username.into(),
            password_hash,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }
}
