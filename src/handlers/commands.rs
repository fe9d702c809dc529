//! Command definitions
//!
//! Commands represent intentions to change the system state.

use std::fmt;

use serde::Deserialize;

// =========================================================================
// RegisterUserCommand
// =========================================================================

/// Command to register a new user
#[derive(Clone, Deserialize)]
pub struct RegisterUserCommand {
    pub username: String,
    pub password: String,
}

impl RegisterUserCommand {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Keeps plaintext passwords out of logs and panic messages
impl fmt::Debug for RegisterUserCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterUserCommand")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

// =========================================================================
// CreateTransactionCommand
// =========================================================================

/// Command to log a transaction against an existing user
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateTransactionCommand {
    pub amount: f64,
    pub description: String,
    pub user_id: i64,
}

impl CreateTransactionCommand {
    pub fn new(amount: f64, description: impl Into<String>, user_id: i64) -> Self {
        Self {
            amount,
            description: description.into(),
            user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_command_debug_hides_password() {
        let cmd = RegisterUserCommand::new("alice", "pw1");
        let printed = format!("{:?}", cmd);

        assert!(printed.contains("alice"));
        assert!(!printed.contains("pw1"));
    }

    #[test]
    fn test_create_transaction_command() {
        let cmd = CreateTransactionCommand::new(42.5, "coffee", 1);

        assert_eq!(cmd.amount, 42.5);
        assert_eq!(cmd.description, "coffee");
        assert_eq!(cmd.user_id, 1);
    }
}
