use async_trait::async_trait;
use diesel::sqlite::SqliteConnection;

use super::saving_transactions_model::{
    NewSavingTransaction, SavingTransaction, SavingTransactionFilters, SavingTransactionUpdate,
};
use crate::errors::Result;

/// Trait for saving transaction repository operations.
pub trait SavingTransactionRepositoryTrait: Send + Sync {
    fn get_by_id(&self, transaction_id: &str) -> Result<SavingTransaction>;
    fn get_by_user_id(&self, user_id: &str) -> Result<Vec<SavingTransaction>>;
    fn search(&self, filters: SavingTransactionFilters) -> Result<Vec<SavingTransaction>>;

    fn get_by_id_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        transaction_id: &str,
    ) -> Result<SavingTransaction>;
    fn count_by_goal_id_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        goal_id: &str,
    ) -> Result<i64>;
    fn insert_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        saving_id: &str,
        new_transaction: NewSavingTransaction,
    ) -> Result<SavingTransaction>;
    fn update_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        update: SavingTransactionUpdate,
    ) -> Result<SavingTransaction>;
    fn delete_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        transaction_id: &str,
    ) -> Result<usize>;
}

/// Trait for saving ledger service operations.
#[async_trait]
pub trait SavingTransactionServiceTrait: Send + Sync {
    async fn create_saving_transaction(
        &self,
        new_transaction: NewSavingTransaction,
    ) -> Result<SavingTransaction>;
    async fn update_saving_transaction(
        &self,
        update: SavingTransactionUpdate,
    ) -> Result<SavingTransaction>;
    async fn delete_saving_transaction(&self, transaction_id: &str) -> Result<usize>;
    fn get_saving_transactions(&self, user_id: &str) -> Result<Vec<SavingTransaction>>;
    fn search_saving_transactions(
        &self,
        filters: SavingTransactionFilters,
    ) -> Result<Vec<SavingTransaction>>;
}
