//! Transaction entity

use serde::{Deserialize, Serialize};

use super::DomainError;

/// A persisted transaction. This is also the wire shape returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Transaction {
    pub id: i64,
    pub amount: f64,
    pub description: String,
    pub user_id: i64,
}

/// A transaction that has passed shape validation but has no id yet.
///
/// Amounts carry no sign, magnitude or precision rule; they only need to be
/// representable in the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    amount: f64,
    description: String,
    user_id: i64,
}

impl NewTransaction {
    pub fn new(
        amount: f64,
        description: impl Into<String>,
        user_id: i64,
    ) -> Result<Self, DomainError> {
        if !amount.is_finite() {
            return Err(DomainError::InvalidAmount(format!("{} is not a finite number", amount)));
        }

        Ok(Self {
            amount,
            description: description.into(),
            user_id,
        })
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }
}
