//! Domain module
//!
//! Entities, shape validation and password hashing.

pub mod context;
pub mod error;
pub mod password;
pub mod transaction;
pub mod user;

pub use context::{OperationContext, CORRELATION_ID_HEADER};
pub use error::DomainError;
pub use password::PasswordHasher;
pub use transaction::{NewTransaction, Transaction};
pub use user::{NewUser, User, UserRecord};
