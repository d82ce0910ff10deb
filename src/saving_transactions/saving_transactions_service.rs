use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error};
use rust_decimal::Decimal;

use super::saving_transactions_model::{
    NewSavingTransaction, SavingTransaction, SavingTransactionFilters, SavingTransactionType,
    SavingTransactionUpdate,
};
use super::saving_transactions_traits::{
    SavingTransactionRepositoryTrait, SavingTransactionServiceTrait,
};
use crate::budgets::BudgetRepositoryTrait;
use crate::db::WriteHandle;
use crate::errors::{Error, Result};
use crate::goals::{GoalRepositoryTrait, SavingGoal};
use crate::savings::SavingsRepositoryTrait;

/// Ledger service for deposit/withdrawal entries.
///
/// A single entry moves money between the budget balance, one goal's
/// progress, and the savings total. All three aggregate writes plus the entry
/// write are staged in one writer job, so they commit or fail together.
pub struct SavingTransactionService {
    budget_repository: Arc<dyn BudgetRepositoryTrait>,
    savings_repository: Arc<dyn SavingsRepositoryTrait>,
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    saving_transaction_repository: Arc<dyn SavingTransactionRepositoryTrait>,
    writer: WriteHandle,
}

impl SavingTransactionService {
    pub fn new(
        budget_repository: Arc<dyn BudgetRepositoryTrait>,
        savings_repository: Arc<dyn SavingsRepositoryTrait>,
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        saving_transaction_repository: Arc<dyn SavingTransactionRepositoryTrait>,
        writer: WriteHandle,
    ) -> Self {
        SavingTransactionService {
            budget_repository,
            savings_repository,
            goal_repository,
            saving_transaction_repository,
            writer,
        }
    }
}

/// In-memory view of the three aggregates an entry touches, mutated by
/// apply/reverse before anything is persisted.
struct AggregateState {
    balance: Decimal,
    goal_progress: Decimal,
    total_saved: Decimal,
}

/// Applies an entry's effect. Withdrawals may empty savings exactly
/// (inclusive bound); deposits may fill a goal exactly.
fn apply_saving_effect(
    state: &mut AggregateState,
    transaction_type: SavingTransactionType,
    amount: Decimal,
    goal_target: Decimal,
) -> Result<()> {
    match transaction_type {
        SavingTransactionType::Deposit => {
            if state.balance < amount {
                return Err(Error::InsufficientFunds(format!(
                    "deposit of {} exceeds budget balance {}",
                    amount, state.balance
                )));
            }
            if state.goal_progress + amount > goal_target {
                return Err(Error::GoalExceeded(format!(
                    "deposit of {} would push goal progress {} past target {}",
                    amount, state.goal_progress, goal_target
                )));
            }
            state.balance -= amount;
            state.goal_progress += amount;
            state.total_saved += amount;
        }
        SavingTransactionType::Withdrawal => {
            if state.total_saved < amount {
                return Err(Error::InsufficientFunds(format!(
                    "withdrawal of {} exceeds savings total {}",
                    amount, state.total_saved
                )));
            }
            if state.goal_progress < amount {
                return Err(Error::InsufficientFunds(format!(
                    "withdrawal of {} exceeds goal progress {}",
                    amount, state.goal_progress
                )));
            }
            state.balance += amount;
            state.goal_progress -= amount;
            state.total_saved -= amount;
        }
    }
    Ok(())
}

/// Undoes an entry's effect — the exact inverse of `apply_saving_effect`,
/// with the same guards applied to the opposite directions.
fn reverse_saving_effect(
    state: &mut AggregateState,
    transaction_type: SavingTransactionType,
    amount: Decimal,
    goal_target: Decimal,
) -> Result<()> {
    match transaction_type {
        SavingTransactionType::Deposit => {
            if state.goal_progress < amount {
                return Err(Error::InsufficientFunds(format!(
                    "reversing a deposit of {} exceeds goal progress {}",
                    amount, state.goal_progress
                )));
            }
            if state.total_saved < amount {
                return Err(Error::InsufficientFunds(format!(
                    "reversing a deposit of {} exceeds savings total {}",
                    amount, state.total_saved
                )));
            }
            state.balance += amount;
            state.goal_progress -= amount;
            state.total_saved -= amount;
        }
        SavingTransactionType::Withdrawal => {
            if state.balance < amount {
                return Err(Error::InsufficientFunds(format!(
                    "reversing a withdrawal of {} exceeds budget balance {}",
                    amount, state.balance
                )));
            }
            if state.goal_progress + amount > goal_target {
                return Err(Error::GoalExceeded(format!(
                    "reversing a withdrawal of {} would push goal progress {} past target {}",
                    amount, state.goal_progress, goal_target
                )));
            }
            state.balance -= amount;
            state.goal_progress += amount;
            state.total_saved += amount;
        }
    }
    Ok(())
}

/// Double-checks the goal bounds after computation and derives the
/// completion flag. A violation here means the guards above have a hole;
/// the commit is aborted.
fn finalize_goal_progress(progress: Decimal, target: Decimal) -> Result<bool> {
    if progress < Decimal::ZERO || progress > target {
        error!(
            "goal progress {} escaped bounds [0, {}] after ledger computation",
            progress, target
        );
        return Err(Error::Consistency(format!(
            "goal progress {} out of bounds [0, {}]",
            progress, target
        )));
    }
    Ok(progress == target)
}

fn verify_goal_owner(goal: &SavingGoal, user_id: &str) -> Result<()> {
    if goal.user_id != user_id {
        return Err(Error::Unauthorized(format!(
            "saving goal {} does not belong to user {}",
            goal.id, user_id
        )));
    }
    Ok(())
}

#[async_trait]
impl SavingTransactionServiceTrait for SavingTransactionService {
    async fn create_saving_transaction(
        &self,
        new_transaction: NewSavingTransaction,
    ) -> Result<SavingTransaction> {
        new_transaction.validate()?;
        debug!(
            "Creating {} of {} toward goal {} for user {}",
            new_transaction.transaction_type.as_str(),
            new_transaction.amount,
            new_transaction.saving_goal_id,
            new_transaction.user_id
        );

        let budget_repo = self.budget_repository.clone();
        let savings_repo = self.savings_repository.clone();
        let goal_repo = self.goal_repository.clone();
        let entry_repo = self.saving_transaction_repository.clone();
        self.writer
            .exec(move |conn| {
                let savings =
                    savings_repo.get_by_user_id_in_transaction(conn, &new_transaction.user_id)?;
                let goal =
                    goal_repo.get_by_id_in_transaction(conn, &new_transaction.saving_goal_id)?;
                verify_goal_owner(&goal, &new_transaction.user_id)?;
                let budget =
                    budget_repo.get_by_user_id_in_transaction(conn, &new_transaction.user_id)?;

                let goal_target = goal.target_amount_decimal()?;
                let mut state = AggregateState {
                    balance: budget.balance_decimal()?,
                    goal_progress: goal.current_amount_decimal()?,
                    total_saved: savings.total_saved_decimal()?,
                };
                apply_saving_effect(
                    &mut state,
                    new_transaction.transaction_type,
                    new_transaction.amount,
                    goal_target,
                )?;
                let is_completed = finalize_goal_progress(state.goal_progress, goal_target)?;

                budget_repo.set_balance_in_transaction(conn, &budget.id, state.balance)?;
                goal_repo.set_progress_in_transaction(
                    conn,
                    &goal.id,
                    state.goal_progress,
                    is_completed,
                )?;
                savings_repo.set_total_saved_in_transaction(
                    conn,
                    &savings.id,
                    state.total_saved,
                )?;
                entry_repo.insert_in_transaction(conn, &savings.id, new_transaction)
            })
            .await
    }

    async fn update_saving_transaction(
        &self,
        update: SavingTransactionUpdate,
    ) -> Result<SavingTransaction> {
        update.validate()?;

        let budget_repo = self.budget_repository.clone();
        let savings_repo = self.savings_repository.clone();
        let goal_repo = self.goal_repository.clone();
        let entry_repo = self.saving_transaction_repository.clone();
        self.writer
            .exec(move |conn| {
                let entry = entry_repo.get_by_id_in_transaction(conn, &update.id)?;
                let savings = savings_repo.get_by_user_id_in_transaction(conn, &entry.user_id)?;
                let budget = budget_repo.get_by_user_id_in_transaction(conn, &entry.user_id)?;
                let original_goal =
                    goal_repo.get_by_id_in_transaction(conn, &entry.saving_goal_id)?;

                let goal_changed = update.saving_goal_id != entry.saving_goal_id;
                let target_goal = if goal_changed {
                    let goal = goal_repo.get_by_id_in_transaction(conn, &update.saving_goal_id)?;
                    verify_goal_owner(&goal, &entry.user_id)?;
                    goal
                } else {
                    original_goal.clone()
                };

                let original_target = original_goal.target_amount_decimal()?;
                let new_target = target_goal.target_amount_decimal()?;

                // Reverse the original effect against the original goal.
                let mut state = AggregateState {
                    balance: budget.balance_decimal()?,
                    goal_progress: original_goal.current_amount_decimal()?,
                    total_saved: savings.total_saved_decimal()?,
                };
                reverse_saving_effect(
                    &mut state,
                    entry.transaction_type,
                    entry.amount,
                    original_target,
                )?;
                let original_progress_reversed = state.goal_progress;

                // Reapply against the goal the entry now points at.
                if goal_changed {
                    state.goal_progress = target_goal.current_amount_decimal()?;
                }
                apply_saving_effect(
                    &mut state,
                    update.transaction_type,
                    update.amount,
                    new_target,
                )?;
                let target_completed = finalize_goal_progress(state.goal_progress, new_target)?;

                budget_repo.set_balance_in_transaction(conn, &budget.id, state.balance)?;
                savings_repo.set_total_saved_in_transaction(
                    conn,
                    &savings.id,
                    state.total_saved,
                )?;
                if goal_changed {
                    let original_completed =
                        finalize_goal_progress(original_progress_reversed, original_target)?;
                    goal_repo.set_progress_in_transaction(
                        conn,
                        &original_goal.id,
                        original_progress_reversed,
                        original_completed,
                    )?;
                }
                goal_repo.set_progress_in_transaction(
                    conn,
                    &target_goal.id,
                    state.goal_progress,
                    target_completed,
                )?;
                entry_repo.update_in_transaction(conn, update)
            })
            .await
    }

    async fn delete_saving_transaction(&self, transaction_id: &str) -> Result<usize> {
        let transaction_id = transaction_id.to_string();

        let budget_repo = self.budget_repository.clone();
        let savings_repo = self.savings_repository.clone();
        let goal_repo = self.goal_repository.clone();
        let entry_repo = self.saving_transaction_repository.clone();
        self.writer
            .exec(move |conn| {
                let entry = entry_repo.get_by_id_in_transaction(conn, &transaction_id)?;
                let savings = savings_repo.get_by_user_id_in_transaction(conn, &entry.user_id)?;
                let budget = budget_repo.get_by_user_id_in_transaction(conn, &entry.user_id)?;
                let goal = goal_repo.get_by_id_in_transaction(conn, &entry.saving_goal_id)?;

                let goal_target = goal.target_amount_decimal()?;
                let mut state = AggregateState {
                    balance: budget.balance_decimal()?,
                    goal_progress: goal.current_amount_decimal()?,
                    total_saved: savings.total_saved_decimal()?,
                };
                reverse_saving_effect(
                    &mut state,
                    entry.transaction_type,
                    entry.amount,
                    goal_target,
                )?;
                let is_completed = finalize_goal_progress(state.goal_progress, goal_target)?;

                budget_repo.set_balance_in_transaction(conn, &budget.id, state.balance)?;
                goal_repo.set_progress_in_transaction(
                    conn,
                    &goal.id,
                    state.goal_progress,
                    is_completed,
                )?;
                savings_repo.set_total_saved_in_transaction(
                    conn,
                    &savings.id,
                    state.total_saved,
                )?;
                entry_repo.delete_in_transaction(conn, &transaction_id)
            })
            .await
    }

    fn get_saving_transactions(&self, user_id: &str) -> Result<Vec<SavingTransaction>> {
        self.saving_transaction_repository.get_by_user_id(user_id)
    }

    fn search_saving_transactions(
        &self,
        filters: SavingTransactionFilters,
    ) -> Result<Vec<SavingTransaction>> {
        self.saving_transaction_repository.search(filters)
    }
}
