use std::sync::Arc;

use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::goals_model::{NewSavingGoal, SavingGoal, SavingGoalUpdate};
use super::goals_traits::GoalRepositoryTrait;
use crate::db::get_connection;
use crate::errors::{Error, Result};
use crate::schema::saving_goals;

pub struct GoalRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl GoalRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        GoalRepository { pool }
    }
}

impl GoalRepositoryTrait for GoalRepository {
    fn get_by_id(&self, goal_id: &str) -> Result<SavingGoal> {
        let mut conn = get_connection(&self.pool)?;
        saving_goals::table
            .find(goal_id)
            .first::<SavingGoal>(&mut conn)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("saving goal {}", goal_id)))
    }

    fn get_by_user_id(&self, user_id: &str) -> Result<Vec<SavingGoal>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(saving_goals::table
            .filter(saving_goals::user_id.eq(user_id))
            .order(saving_goals::due_date.asc())
            .load::<SavingGoal>(&mut conn)?)
    }

    fn get_by_id_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        goal_id: &str,
    ) -> Result<SavingGoal> {
        saving_goals::table
            .find(goal_id)
            .first::<SavingGoal>(conn)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("saving goal {}", goal_id)))
    }

    fn insert_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        new_goal: NewSavingGoal,
    ) -> Result<SavingGoal> {
        let now = Utc::now().naive_utc();
        let goal_id = Uuid::new_v4().to_string();

        diesel::insert_into(saving_goals::table)
            .values((
                saving_goals::id.eq(&goal_id),
                saving_goals::user_id.eq(&new_goal.user_id),
                saving_goals::name.eq(&new_goal.name),
                saving_goals::target_amount.eq(new_goal.target_amount.to_string()),
                saving_goals::current_amount.eq(Decimal::ZERO.to_string()),
                saving_goals::due_date.eq(new_goal.due_date),
                saving_goals::is_completed.eq(false),
                saving_goals::created_at.eq(now),
                saving_goals::updated_at.eq(now),
            ))
            .execute(conn)?;

        Ok(saving_goals::table.find(goal_id).first::<SavingGoal>(conn)?)
    }

    fn update_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        goal_update: SavingGoalUpdate,
        is_completed: bool,
    ) -> Result<SavingGoal> {
        diesel::update(saving_goals::table.find(&goal_update.id))
            .set((
                saving_goals::name.eq(&goal_update.name),
                saving_goals::target_amount.eq(goal_update.target_amount.to_string()),
                saving_goals::due_date.eq(goal_update.due_date),
                saving_goals::is_completed.eq(is_completed),
                saving_goals::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;

        Ok(saving_goals::table
            .find(&goal_update.id)
            .first::<SavingGoal>(conn)?)
    }

    fn set_progress_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        goal_id: &str,
        current_amount: Decimal,
        is_completed: bool,
    ) -> Result<()> {
        diesel::update(saving_goals::table.find(goal_id))
            .set((
                saving_goals::current_amount.eq(current_amount.to_string()),
                saving_goals::is_completed.eq(is_completed),
                saving_goals::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;
        Ok(())
    }

    fn delete_in_transaction(&self, conn: &mut SqliteConnection, goal_id: &str) -> Result<usize> {
        Ok(diesel::delete(saving_goals::table.find(goal_id)).execute(conn)?)
    }
}
