//! Command Handlers module
//!
//! Each handler runs one operation inside its own unit of work:
//! validate, look up, mutate, commit, then report to telemetry.

mod commands;
mod query_handler;
mod transaction_handler;
mod user_handler;


pub use commands::*;
pub use query_handler::TransactionQueries;
pub use transaction_handler::CreateTransactionHandler;
pub use user_handler::RegisterUserHandler;
