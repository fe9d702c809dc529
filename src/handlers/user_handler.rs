//! User Registration Handler

use tracing::Instrument;

use crate::domain::{NewUser, OperationContext, PasswordHasher, UserRecord};
use crate::error::AppError;
use crate::store::{Store, StoreError};
use crate::telemetry::SharedTelemetry;

use super::RegisterUserCommand;

/// Handler for user registration
pub struct RegisterUserHandler {
    store: Store,
    hasher: PasswordHasher,
    telemetry: SharedTelemetry,
}

impl RegisterUserHandler {
    pub fn new(store: Store, hasher: PasswordHasher, telemetry: SharedTelemetry) -> Self {
        Self {
            store,
            hasher,
            telemetry,
        }
    }

    /// Execute the register user command
    pub async fn execute(
        &self,
        command: RegisterUserCommand,
        context: &OperationContext,
    ) -> Result<UserRecord, AppError> {
        let span = tracing::info_span!(
            "register_user",
            correlation_id = %context.correlation_id,
            username = %command.username,
        );

        self.register(command).instrument(span).await
    }

    async fn register(&self, command: RegisterUserCommand) -> Result<UserRecord, AppError> {
        let RegisterUserCommand { username, password } = command;

        // Hash off the async workers and before a store connection is held
        let hasher = self.hasher;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("password hashing task failed: {}", e)))??;

        let new_user = NewUser::new(username, password_hash)?;

        let mut uow = self.store.begin().await?;

        if uow.find_user_by_username(new_user.username()).await?.is_some() {
            tracing::debug!("Username already registered");
            return Err(AppError::username_taken());
        }

        // A concurrent registration can slip past the pre-check; the UNIQUE
        // constraint catches it here or at commit.
        let user = uow.insert_user(&new_user).await.map_err(unique_to_conflict)?;
        uow.commit().await.map_err(unique_to_conflict)?;

        self.telemetry.user_registered();
        tracing::info!(user_id = user.id, hasher = %self.hasher, "User registered");

        Ok(user.into())
    }
}

fn unique_to_conflict(err: StoreError) -> AppError {
    if err.is_unique_violation() {
        AppError::username_taken()
    } else {
        AppError::Store(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_to_conflict() {
        let err = unique_to_conflict(StoreError::UniqueViolation {
            constraint: "users.username".to_string(),
        });
        assert!(matches!(err, AppError::Conflict(_)));

        let err = unique_to_conflict(StoreError::Database(sqlx::Error::PoolClosed));
        assert!(matches!(err, AppError::Store(_)));
    }
}
