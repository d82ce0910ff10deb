use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use rust_decimal::Decimal;

use super::transactions_model::{
    NewTransaction, Transaction, TransactionFilters, TransactionType, TransactionUpdate,
};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::budgets::BudgetRepositoryTrait;
use crate::db::WriteHandle;
use crate::errors::{Error, Result};

/// Ledger service for income/expense entries.
///
/// Every mutation reads the budget, validates against the invariants, and
/// commits the balance write together with the entry write as one unit
/// through the writer handle. Updates and deletes reverse the recorded
/// effect before applying anything new, so replaying the live entries always
/// reproduces the committed balance.
pub struct TransactionService {
    budget_repository: Arc<dyn BudgetRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    writer: WriteHandle,
}

impl TransactionService {
    pub fn new(
        budget_repository: Arc<dyn BudgetRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        writer: WriteHandle,
    ) -> Self {
        TransactionService {
            budget_repository,
            transaction_repository,
            writer,
        }
    }
}

/// Applies an entry's effect to a balance, enforcing non-negativity.
fn apply_effect(balance: Decimal, transaction_type: TransactionType, amount: Decimal) -> Result<Decimal> {
    match transaction_type {
        TransactionType::Income => Ok(balance + amount),
        TransactionType::Expense => {
            if balance < amount {
                return Err(Error::InsufficientFunds(format!(
                    "expense of {} exceeds budget balance {}",
                    amount, balance
                )));
            }
            Ok(balance - amount)
        }
    }
}

/// Undoes an entry's effect on a balance. The inverse of `apply_effect`:
/// an income is reversed by subtracting, an expense by adding back.
fn reverse_effect(balance: Decimal, transaction_type: TransactionType, amount: Decimal) -> Result<Decimal> {
    match transaction_type {
        TransactionType::Income => {
            if balance < amount {
                return Err(Error::InsufficientFunds(format!(
                    "reversing income of {} would drive budget balance {} negative",
                    amount, balance
                )));
            }
            Ok(balance - amount)
        }
        TransactionType::Expense => Ok(balance + amount),
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    async fn create_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        new_transaction.validate()?;
        debug!(
            "Creating {} of {} for user {}",
            new_transaction.transaction_type.as_str(),
            new_transaction.amount,
            new_transaction.user_id
        );

        let budget_repo = self.budget_repository.clone();
        let entry_repo = self.transaction_repository.clone();
        self.writer
            .exec(move |conn| {
                let budget =
                    budget_repo.get_by_user_id_in_transaction(conn, &new_transaction.user_id)?;
                let new_balance = apply_effect(
                    budget.balance_decimal()?,
                    new_transaction.transaction_type,
                    new_transaction.amount,
                )?;

                budget_repo.set_balance_in_transaction(conn, &budget.id, new_balance)?;
                entry_repo.insert_in_transaction(conn, &budget.id, new_transaction)
            })
            .await
    }

    async fn update_transaction(&self, update: TransactionUpdate) -> Result<Transaction> {
        update.validate()?;

        let budget_repo = self.budget_repository.clone();
        let entry_repo = self.transaction_repository.clone();
        self.writer
            .exec(move |conn| {
                let entry = entry_repo.get_by_id_in_transaction(conn, &update.id)?;
                if entry.user_id != update.user_id {
                    return Err(Error::Unauthorized(format!(
                        "transaction {} does not belong to user {}",
                        update.id, update.user_id
                    )));
                }

                let budget = budget_repo.get_by_user_id_in_transaction(conn, &entry.user_id)?;

                // Reverse the old effect, then apply the new one against the
                // reversed intermediate balance. An edit that changes nothing
                // monetary nets out to the original balance.
                let reversed =
                    reverse_effect(budget.balance_decimal()?, entry.transaction_type, entry.amount)?;
                let new_balance =
                    apply_effect(reversed, update.transaction_type, update.amount)?;

                budget_repo.set_balance_in_transaction(conn, &budget.id, new_balance)?;
                entry_repo.update_in_transaction(conn, update)
            })
            .await
    }

    async fn delete_transaction(&self, transaction_id: &str, user_id: &str) -> Result<usize> {
        let transaction_id = transaction_id.to_string();
        let user_id = user_id.to_string();

        let budget_repo = self.budget_repository.clone();
        let entry_repo = self.transaction_repository.clone();
        self.writer
            .exec(move |conn| {
                let entry = entry_repo.get_by_id_in_transaction(conn, &transaction_id)?;
                if entry.user_id != user_id {
                    return Err(Error::Unauthorized(format!(
                        "transaction {} does not belong to user {}",
                        transaction_id, user_id
                    )));
                }

                let budget = budget_repo.get_by_user_id_in_transaction(conn, &entry.user_id)?;
                let new_balance =
                    reverse_effect(budget.balance_decimal()?, entry.transaction_type, entry.amount)?;

                budget_repo.set_balance_in_transaction(conn, &budget.id, new_balance)?;
                entry_repo.delete_in_transaction(conn, &transaction_id)
            })
            .await
    }

    fn get_transactions(&self, user_id: &str) -> Result<Vec<Transaction>> {
        self.transaction_repository.get_by_user_id(user_id)
    }

    fn search_transactions(&self, filters: TransactionFilters) -> Result<Vec<Transaction>> {
        self.transaction_repository.search(filters)
    }
}
