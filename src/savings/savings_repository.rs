use std::sync::Arc;

use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::savings_model::{NewSavingsAccount, SavingsAccount};
use super::savings_traits::SavingsRepositoryTrait;
use crate::db::get_connection;
use crate::errors::{Error, Result, ValidationError};
use crate::schema::savings;

pub struct SavingsRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl SavingsRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        SavingsRepository { pool }
    }
}

impl SavingsRepositoryTrait for SavingsRepository {
    fn get_by_user_id(&self, user_id: &str) -> Result<SavingsAccount> {
        let mut conn = get_connection(&self.pool)?;
        savings::table
            .filter(savings::user_id.eq(user_id))
            .first::<SavingsAccount>(&mut conn)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("savings account for user {}", user_id)))
    }

    fn get_by_user_id_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        user_id: &str,
    ) -> Result<SavingsAccount> {
        savings::table
            .filter(savings::user_id.eq(user_id))
            .first::<SavingsAccount>(conn)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("savings account for user {}", user_id)))
    }

    fn create_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        new_savings: NewSavingsAccount,
    ) -> Result<SavingsAccount> {
        let existing: Option<SavingsAccount> = savings::table
            .filter(savings::user_id.eq(&new_savings.user_id))
            .first::<SavingsAccount>(conn)
            .optional()?;
        if existing.is_some() {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "savings account already exists for user {}",
                new_savings.user_id
            ))));
        }

        let now = Utc::now().naive_utc();
        let savings_id = new_savings
            .id
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        diesel::insert_into(savings::table)
            .values((
                savings::id.eq(&savings_id),
                savings::user_id.eq(&new_savings.user_id),
                savings::total_saved.eq(Decimal::ZERO.to_string()),
                savings::created_at.eq(now),
                savings::updated_at.eq(now),
            ))
            .execute(conn)?;

        Ok(savings::table.find(savings_id).first::<SavingsAccount>(conn)?)
    }

    fn set_total_saved_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        savings_id: &str,
        total_saved: Decimal,
    ) -> Result<()> {
        diesel::update(savings::table.find(savings_id))
            .set((
                savings::total_saved.eq(total_saved.to_string()),
                savings::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;
        Ok(())
    }
}
