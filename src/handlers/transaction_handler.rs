//! Transaction Creation Handler

use tracing::Instrument;

use crate::domain::{NewTransaction, OperationContext, Transaction};
use crate::error::AppError;
use crate::store::Store;
use crate::telemetry::SharedTelemetry;

use super::CreateTransactionCommand;

/// Handler for logging a transaction
pub struct CreateTransactionHandler {
    store: Store,
    telemetry: SharedTelemetry,
}

impl CreateTransactionHandler {
    pub fn new(store: Store, telemetry: SharedTelemetry) -> Self {
        Self { store, telemetry }
    }

    /// Execute the create transaction command
    pub async fn execute(
        &self,
        command: CreateTransactionCommand,
        context: &OperationContext,
    ) -> Result<Transaction, AppError> {
        let span = tracing::info_span!(
            "create_transaction",
            correlation_id = %context.correlation_id,
            user_id = command.user_id,
        );

        self.create(command).instrument(span).await
    }

    async fn create(&self, command: CreateTransactionCommand) -> Result<Transaction, AppError> {
        let new_transaction =
            NewTransaction::new(command.amount, command.description, command.user_id)?;

        let mut uow = self.store.begin().await?;

        // Existence is checked here rather than left to the foreign key so the
        // caller gets a NotFound instead of a constraint error.
        if uow.find_user_by_id(command.user_id).await?.is_none() {
            return Err(AppError::UserNotFound(command.user_id));
        }

        let transaction = uow.insert_transaction(&new_transaction).await?;
        uow.commit().await?;

        self.telemetry.transaction_created(transaction.user_id);
        tracing::info!(transaction_id = transaction.id, "Transaction created");

        Ok(transaction)
    }
}
