//! FinTech API Library
//!
//! User registration and transaction logging over a relational store.
//! Re-exports modules for the binary and for integration testing.

pub mod api;
pub mod config;
pub mod domain;
mod error;
pub mod handlers;
pub mod store;
pub mod telemetry;

pub use api::{build_router, AppState};
pub use config::Config;
pub use domain::{
    DomainError, NewTransaction, NewUser, PasswordHasher, Transaction, User, UserRecord,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use store::{Backend, Store, StoreError, UnitOfWork};
pub use telemetry::{NoopTelemetry, SharedTelemetry, Telemetry};
