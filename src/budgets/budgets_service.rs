use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use rust_decimal::Decimal;

use super::budgets_model::{BudgetAccount, NewBudgetAccount};
use super::budgets_traits::{BudgetRepositoryTrait, BudgetServiceTrait};
use crate::db::WriteHandle;
use crate::errors::Result;

/// Service for managing budget accounts.
pub struct BudgetService {
    budget_repository: Arc<dyn BudgetRepositoryTrait>,
    writer: WriteHandle,
}

impl BudgetService {
    pub fn new(budget_repository: Arc<dyn BudgetRepositoryTrait>, writer: WriteHandle) -> Self {
        BudgetService {
            budget_repository,
            writer,
        }
    }
}

#[async_trait]
impl BudgetServiceTrait for BudgetService {
    async fn create_budget(&self, new_budget: NewBudgetAccount) -> Result<BudgetAccount> {
        debug!("Creating budget account for user {}", new_budget.user_id);
        let repo = self.budget_repository.clone();
        self.writer
            .exec(move |conn| repo.create_in_transaction(conn, new_budget))
            .await
    }

    fn get_budget(&self, user_id: &str) -> Result<BudgetAccount> {
        self.budget_repository.get_by_user_id(user_id)
    }

    fn get_balance(&self, user_id: &str) -> Result<Decimal> {
        self.budget_repository.get_by_user_id(user_id)?.balance_decimal()
    }
}
