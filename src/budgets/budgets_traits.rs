use async_trait::async_trait;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;

use super::budgets_model::{BudgetAccount, NewBudgetAccount};
use crate::errors::Result;

/// Trait for budget account repository operations.
///
/// The `_in_transaction` variants take the writer connection so ledger
/// services can compose them with other aggregate writes in one commit.
pub trait BudgetRepositoryTrait: Send + Sync {
    fn get_by_user_id(&self, user_id: &str) -> Result<BudgetAccount>;

    fn get_by_user_id_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        user_id: &str,
    ) -> Result<BudgetAccount>;
    fn create_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        new_budget: NewBudgetAccount,
    ) -> Result<BudgetAccount>;
    fn set_balance_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        budget_id: &str,
        balance: Decimal,
    ) -> Result<()>;
}

/// Trait for budget account service operations.
#[async_trait]
pub trait BudgetServiceTrait: Send + Sync {
    async fn create_budget(&self, new_budget: NewBudgetAccount) -> Result<BudgetAccount>;
    fn get_budget(&self, user_id: &str) -> Result<BudgetAccount>;
    fn get_balance(&self, user_id: &str) -> Result<Decimal>;
}
