use async_trait::async_trait;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;

use super::savings_model::{NewSavingsAccount, SavingsAccount};
use crate::errors::Result;

/// Trait for savings account repository operations.
pub trait SavingsRepositoryTrait: Send + Sync {
    fn get_by_user_id(&self, user_id: &str) -> Result<SavingsAccount>;

    fn get_by_user_id_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        user_id: &str,
    ) -> Result<SavingsAccount>;
    fn create_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        new_savings: NewSavingsAccount,
    ) -> Result<SavingsAccount>;
    fn set_total_saved_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        savings_id: &str,
        total_saved: Decimal,
    ) -> Result<()>;
}

/// Trait for savings account service operations.
#[async_trait]
pub trait SavingsServiceTrait: Send + Sync {
    async fn create_savings_account(
        &self,
        new_savings: NewSavingsAccount,
    ) -> Result<SavingsAccount>;
    fn get_savings_account(&self, user_id: &str) -> Result<SavingsAccount>;
    fn get_total_saved(&self, user_id: &str) -> Result<Decimal>;
}
