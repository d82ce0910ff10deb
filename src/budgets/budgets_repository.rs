use std::sync::Arc;

use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::budgets_model::{BudgetAccount, NewBudgetAccount};
use super::budgets_traits::BudgetRepositoryTrait;
use crate::db::get_connection;
use crate::errors::{Error, Result, ValidationError};
use crate::schema::budgets;

pub struct BudgetRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl BudgetRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        BudgetRepository { pool }
    }
}

impl BudgetRepositoryTrait for BudgetRepository {
    fn get_by_user_id(&self, user_id: &str) -> Result<BudgetAccount> {
        let mut conn = get_connection(&self.pool)?;
        budgets::table
            .filter(budgets::user_id.eq(user_id))
            .first::<BudgetAccount>(&mut conn)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("budget for user {}", user_id)))
    }

    fn get_by_user_id_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        user_id: &str,
    ) -> Result<BudgetAccount> {
        budgets::table
            .filter(budgets::user_id.eq(user_id))
            .first::<BudgetAccount>(conn)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("budget for user {}", user_id)))
    }

    fn create_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        new_budget: NewBudgetAccount,
    ) -> Result<BudgetAccount> {
        let existing: Option<BudgetAccount> = budgets::table
            .filter(budgets::user_id.eq(&new_budget.user_id))
            .first::<BudgetAccount>(conn)
            .optional()?;
        if existing.is_some() {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "budget already exists for user {}",
                new_budget.user_id
            ))));
        }

        let now = Utc::now().naive_utc();
        let budget_id = new_budget
            .id
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        diesel::insert_into(budgets::table)
            .values((
                budgets::id.eq(&budget_id),
                budgets::user_id.eq(&new_budget.user_id),
                budgets::balance.eq(Decimal::ZERO.to_string()),
                budgets::created_at.eq(now),
                budgets::updated_at.eq(now),
            ))
            .execute(conn)?;

        Ok(budgets::table.find(budget_id).first::<BudgetAccount>(conn)?)
    }

    fn set_balance_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        budget_id: &str,
        balance: Decimal,
    ) -> Result<()> {
        diesel::update(budgets::table.find(budget_id))
            .set((
                budgets::balance.eq(balance.to_string()),
                budgets::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;
        Ok(())
    }
}
