use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use rust_decimal::Decimal;

use super::savings_model::{NewSavingsAccount, SavingsAccount};
use super::savings_traits::{SavingsRepositoryTrait, SavingsServiceTrait};
use crate::db::WriteHandle;
use crate::errors::Result;

/// Service for managing savings accounts.
pub struct SavingsService {
    savings_repository: Arc<dyn SavingsRepositoryTrait>,
    writer: WriteHandle,
}

impl SavingsService {
    pub fn new(savings_repository: Arc<dyn SavingsRepositoryTrait>, writer: WriteHandle) -> Self {
        SavingsService {
            savings_repository,
            writer,
        }
    }
}

#[async_trait]
impl SavingsServiceTrait for SavingsService {
    async fn create_savings_account(
        &self,
        new_savings: NewSavingsAccount,
    ) -> Result<SavingsAccount> {
        debug!("Creating savings account for user {}", new_savings.user_id);
        let repo = self.savings_repository.clone();
        self.writer
            .exec(move |conn| repo.create_in_transaction(conn, new_savings))
            .await
    }

    fn get_savings_account(&self, user_id: &str) -> Result<SavingsAccount> {
        self.savings_repository.get_by_user_id(user_id)
    }

    fn get_total_saved(&self, user_id: &str) -> Result<Decimal> {
        self.savings_repository
            .get_by_user_id(user_id)?
            .total_saved_decimal()
    }
}
