use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::goals_model::{NewSavingGoal, SavingGoal, SavingGoalUpdate};
use super::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
use crate::db::WriteHandle;
use crate::errors::{Error, Result, ValidationError};
use crate::saving_transactions::SavingTransactionRepositoryTrait;

/// Service for managing saving goals.
///
/// Goal progress and completion are owned by the saving ledger; this service
/// only manages the goal's own fields and lifecycle.
pub struct GoalService {
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    saving_transaction_repository: Arc<dyn SavingTransactionRepositoryTrait>,
    writer: WriteHandle,
}

impl GoalService {
    pub fn new(
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        saving_transaction_repository: Arc<dyn SavingTransactionRepositoryTrait>,
        writer: WriteHandle,
    ) -> Self {
        GoalService {
            goal_repository,
            saving_transaction_repository,
            writer,
        }
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    async fn create_goal(&self, new_goal: NewSavingGoal) -> Result<SavingGoal> {
        new_goal.validate()?;
        debug!(
            "Creating saving goal '{}' for user {}",
            new_goal.name, new_goal.user_id
        );
        let repo = self.goal_repository.clone();
        self.writer
            .exec(move |conn| repo.insert_in_transaction(conn, new_goal))
            .await
    }

    async fn update_goal(&self, goal_update: SavingGoalUpdate) -> Result<SavingGoal> {
        goal_update.validate()?;
        let repo = self.goal_repository.clone();
        self.writer
            .exec(move |conn| {
                let goal = repo.get_by_id_in_transaction(conn, &goal_update.id)?;
                if goal.user_id != goal_update.user_id {
                    return Err(Error::Unauthorized(format!(
                        "saving goal {} does not belong to user {}",
                        goal_update.id, goal_update.user_id
                    )));
                }

                // Shrinking the target below accumulated progress would break
                // the progress bound.
                let current = goal.current_amount_decimal()?;
                if goal_update.target_amount < current {
                    return Err(Error::Validation(ValidationError::InvalidInput(format!(
                        "target amount {} is below current progress {}",
                        goal_update.target_amount, current
                    ))));
                }

                let is_completed = current == goal_update.target_amount;
                repo.update_in_transaction(conn, goal_update, is_completed)
            })
            .await
    }

    async fn delete_goal(&self, goal_id: &str, user_id: &str) -> Result<usize> {
        let goal_id = goal_id.to_string();
        let user_id = user_id.to_string();
        let repo = self.goal_repository.clone();
        let entry_repo = self.saving_transaction_repository.clone();
        self.writer
            .exec(move |conn| {
                let goal = repo.get_by_id_in_transaction(conn, &goal_id)?;
                if goal.user_id != user_id {
                    return Err(Error::Unauthorized(format!(
                        "saving goal {} does not belong to user {}",
                        goal_id, user_id
                    )));
                }

                // Deleting a goal with live ledger entries would orphan the
                // history backing the savings total.
                let live_entries = entry_repo.count_by_goal_id_in_transaction(conn, &goal_id)?;
                if live_entries > 0 {
                    return Err(Error::Validation(ValidationError::InvalidInput(format!(
                        "saving goal {} still has {} saving transactions",
                        goal_id, live_entries
                    ))));
                }

                repo.delete_in_transaction(conn, &goal_id)
            })
            .await
    }

    fn get_goal(&self, goal_id: &str, user_id: &str) -> Result<SavingGoal> {
        let goal = self.goal_repository.get_by_id(goal_id)?;
        if goal.user_id != user_id {
            return Err(Error::Unauthorized(format!(
                "saving goal {} does not belong to user {}",
                goal_id, user_id
            )));
        }
        Ok(goal)
    }

    fn get_goals(&self, user_id: &str) -> Result<Vec<SavingGoal>> {
        self.goal_repository.get_by_user_id(user_id)
    }
}
