//! Read-side queries over transactions

use crate::domain::Transaction;
use crate::error::AppError;
use crate::store::Store;

/// Read-only transaction listings
#[derive(Debug, Clone)]
pub struct TransactionQueries {
    store: Store,
}

impl TransactionQueries {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Every transaction in insertion order; empty when none exist
    pub async fn list_all(&self) -> Result<Vec<Transaction>, AppError> {
        let mut uow = self.store.begin().await?;
        let transactions = uow.list_transactions().await?;
        Ok(transactions)
    }

    /// One user's transactions in insertion order
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Transaction>, AppError> {
        let mut uow = self.store.begin().await?;

        if uow.find_user_by_id(user_id).await?.is_none() {
            return Err(AppError::UserNotFound(user_id));
        }

        let transactions = uow.list_transactions_for_user(user_id).await?;
        Ok(transactions)
    }
}
