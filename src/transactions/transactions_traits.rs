use async_trait::async_trait;
use diesel::sqlite::SqliteConnection;

use super::transactions_model::{
    NewTransaction, Transaction, TransactionFilters, TransactionUpdate,
};
use crate::errors::Result;

/// Trait for transaction repository operations.
pub trait TransactionRepositoryTrait: Send + Sync {
    fn get_by_id(&self, transaction_id: &str) -> Result<Transaction>;
    fn get_by_user_id(&self, user_id: &str) -> Result<Vec<Transaction>>;
    fn search(&self, filters: TransactionFilters) -> Result<Vec<Transaction>>;

    fn get_by_id_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        transaction_id: &str,
    ) -> Result<Transaction>;
    fn insert_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        budget_id: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction>;
    fn update_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        update: TransactionUpdate,
    ) -> Result<Transaction>;
    fn delete_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        transaction_id: &str,
    ) -> Result<usize>;
}

/// Trait for transaction ledger service operations.
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    async fn create_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction>;
    async fn update_transaction(&self, update: TransactionUpdate) -> Result<Transaction>;
    async fn delete_transaction(&self, transaction_id: &str, user_id: &str) -> Result<usize>;
    fn get_transactions(&self, user_id: &str) -> Result<Vec<Transaction>>;
    fn search_transactions(&self, filters: TransactionFilters) -> Result<Vec<Transaction>>;
}
