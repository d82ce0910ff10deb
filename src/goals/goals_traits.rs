use async_trait::async_trait;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;

use super::goals_model::{NewSavingGoal, SavingGoal, SavingGoalUpdate};
use crate::errors::Result;

/// Trait for saving goal repository operations.
pub trait GoalRepositoryTrait: Send + Sync {
    fn get_by_id(&self, goal_id: &str) -> Result<SavingGoal>;
    fn get_by_user_id(&self, user_id: &str) -> Result<Vec<SavingGoal>>;

    fn get_by_id_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        goal_id: &str,
    ) -> Result<SavingGoal>;
    fn insert_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        new_goal: NewSavingGoal,
    ) -> Result<SavingGoal>;
    fn update_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        goal_update: SavingGoalUpdate,
        is_completed: bool,
    ) -> Result<SavingGoal>;
    fn set_progress_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        goal_id: &str,
        current_amount: Decimal,
        is_completed: bool,
    ) -> Result<()>;
    fn delete_in_transaction(&self, conn: &mut SqliteConnection, goal_id: &str) -> Result<usize>;
}

/// Trait for saving goal service operations.
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    async fn create_goal(&self, new_goal: NewSavingGoal) -> Result<SavingGoal>;
    async fn update_goal(&self, goal_update: SavingGoalUpdate) -> Result<SavingGoal>;
    async fn delete_goal(&self, goal_id: &str, user_id: &str) -> Result<usize>;
    fn get_goal(&self, goal_id: &str, user_id: &str) -> Result<SavingGoal>;
    fn get_goals(&self, user_id: &str) -> Result<Vec<SavingGoal>>;
}
