//! Unit of work
//!
//! Typed reads and writes over a single database transaction.

use sqlx::{Any, Transaction as DbTransaction};

use crate::domain::{NewTransaction, NewUser, Transaction, User};

use super::StoreError;

/// One database transaction scoped to one operation.
///
/// Reads observe writes made earlier in the same unit. The underlying sqlx
/// transaction rolls back when dropped uncommitted, so every early return
/// releases the connection cleanly.
pub struct UnitOfWork {
    tx: DbTransaction<'static, Any>,
}

impl UnitOfWork {
    pub(super) fn new(tx: DbTransaction<'static, Any>) -> Self {
        Self { tx }
    }

    /// Make every write of this unit durable
    pub async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Insert a user and return it with its assigned id
    pub async fn insert_user(&mut self, user: &NewUser) -> Result<User, StoreError> {
        let created: User = sqlx::query_as(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash
            "#,
        )
        .bind(user.username())
        .bind(user.password_hash())
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(created)
    }

    pub async fn find_user_by_id(&mut self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as("SELECT id, username, password_hash FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(user)
    }

    pub async fn find_user_by_username(
        &mut self,
        username: &str,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as(
            "SELECT id, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(user)
    }

    pub async fn count_users(&mut self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *self.tx)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Insert a transaction and return it with its assigned id.
    ///
    /// The referenced user is not checked here; callers look it up first.
    pub async fn insert_transaction(
        &mut self,
        transaction: &NewTransaction,
    ) -> Result<Transaction, StoreError> {
        let created: Transaction = sqlx::query_as(
            r#"
            INSERT INTO transactions (amount, description, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, amount, description, user_id
            "#,
        )
        .bind(transaction.amount())
        .bind(transaction.description())
        .bind(transaction.user_id())
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(created)
    }

    /// Every transaction, in insertion order
    pub async fn list_transactions(&mut self) -> Result<Vec<Transaction>, StoreError> {
        let transactions = sqlx::query_as(
            "SELECT id, amount, description, user_id FROM transactions ORDER BY id",
        )
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(transactions)
    }

    /// One user's transactions, in insertion order
    pub async fn list_transactions_for_user(
        &mut self,
        user_id: i64,
    ) -> Result<Vec<Transaction>, StoreError> {
        let transactions = sqlx::query_as(
            r#"
            SELECT id, amount, description, user_id
            FROM transactions
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(transactions)
    }

    pub async fn count_transactions(&mut self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&mut *self.tx)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::StoreConfig;
    use crate::domain::{NewTransaction, NewUser};
    use crate::store::{Store, StoreError};

    async fn memory_store() -> Store {
        Store::connect(&StoreConfig::new("sqlite::memory:")).await.unwrap()
    }

    #[tokio::test]
    async fn test_reads_see_own_writes() {
        let store = memory_store().await;
        let mut uow = store.begin().await.unwrap();

        let alice = uow
            .insert_user(&NewUser::new("alice", "hash").unwrap())
            .await
            .unwrap();
        let found = uow.find_user_by_username("alice").await.unwrap();
        assert_eq!(found, Some(alice.clone()));

        uow.insert_transaction(&NewTransaction::new(1.25, "tea", alice.id).unwrap())
            .await
            .unwrap();
        assert_eq!(uow.list_transactions_for_user(alice.id).await.unwrap().len(), 1);

        uow.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_drop_rolls_back() {
        let store = memory_store().await;

        {
            let mut uow = store.begin().await.unwrap();
            uow.insert_user(&NewUser::new("ghost", "hash").unwrap())
                .await
                .unwrap();
        }

        let mut uow = store.begin().await.unwrap();
        assert_eq!(uow.count_users().await.unwrap(), 0);
        assert!(uow.find_user_by_username("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unique_username_enforced_by_store() {
        let store = memory_store().await;
        let mut uow = store.begin().await.unwrap();

        uow.insert_user(&NewUser::new("alice", "h1").unwrap())
            .await
            .unwrap();
        let err = uow
            .insert_user(&NewUser::new("alice", "h2").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_ids_are_monotonic_and_ordering_is_insertion() {
        let store = memory_store().await;
        let mut uow = store.begin().await.unwrap();

        let user = uow
            .insert_user(&NewUser::new("bob", "hash").unwrap())
            .await
            .unwrap();
        let mut ids = Vec::new();
        for (amount, label) in [(3.0, "c"), (1.0, "a"), (2.0, "b")] {
            let tx = uow
                .insert_transaction(&NewTransaction::new(amount, label, user.id).unwrap())
                .await
                .unwrap();
            ids.push(tx.id);
        }

        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        let listed: Vec<String> = uow
            .list_transactions()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.description)
            .collect();
        assert_eq!(listed, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_float_round_trip() {
        let store = memory_store().await;
        let mut uow = store.begin().await.unwrap();

        let user = uow
            .insert_user(&NewUser::new("carol", "hash").unwrap())
            .await
            .unwrap();
        let amount = 0.1 + 0.2;
        let tx = uow
            .insert_transaction(&NewTransaction::new(amount, "float", user.id).unwrap())
            .await
            .unwrap();

        assert_eq!(tx.amount, amount);
        let listed = uow.list_transactions().await.unwrap();
        assert_eq!(listed[0].amount, amount);
    }
}
