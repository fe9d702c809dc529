//! Password hashing
//!
//! New registrations are hashed with salted Argon2id by default. The unsalted
//! SHA-256 digest used by earlier deployments is still available so that
//! existing databases keep working, but it must be selected explicitly.

use std::fmt;
use std::str::FromStr;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher as _, SaltString};
use argon2::Argon2;
use sha2::{Digest, Sha256};

use super::DomainError;

/// Hashing scheme applied to plaintext passwords
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PasswordHasher {
    /// Argon2id with a random salt, PHC string output
    #[default]
    Argon2,
    /// Single round of unsalted SHA-256, lowercase hex
    Sha256,
}

impl PasswordHasher {
    pub fn hash(&self, password: &str) -> Result<String, DomainError> {
        match self {
            Self::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map(|hash| hash.to_string())
                    .map_err(|e| DomainError::PasswordHash(e.to_string()))
            }
            Self::Sha256 => Ok(sha256_hex(password)),
        }
    }

    /// Check a password against a stored hash of either format
    #[cfg(test)]
    pub(crate) fn verify(password: &str, stored: &str) -> bool {
        use argon2::password_hash::{PasswordHash, PasswordVerifier};

        if stored.starts_with("$argon2") {
            return match PasswordHash::new(stored) {
                Ok(parsed) => Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok(),
                Err(_) => false,
            };
        }

        sha256_hex(password) == stored
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Argon2 => "argon2",
            Self::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name that matches no known hasher
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown password hasher: {0}")]
pub struct UnknownHasher(pub String);

impl FromStr for PasswordHasher {
    type Err = UnknownHasher;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "argon2" | "argon2id" => Ok(Self::Argon2),
            "sha256" => Ok(Self::Sha256),
            other => Err(UnknownHasher(other.to_string())),
        }
    }
}

fn sha256_hex(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}
