use std::sync::Arc;

use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use uuid::Uuid;

use super::saving_transactions_model::{
    NewSavingTransaction, SavingTransaction, SavingTransactionDB, SavingTransactionFilters,
    SavingTransactionUpdate,
};
use super::saving_transactions_traits::SavingTransactionRepositoryTrait;
use crate::db::get_connection;
use crate::errors::{Error, Result};
use crate::schema::saving_transactions;

/// Repository for saving ledger entries.
pub struct SavingTransactionRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl SavingTransactionRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }
}

impl SavingTransactionRepositoryTrait for SavingTransactionRepository {
    fn get_by_id(&self, transaction_id: &str) -> Result<SavingTransaction> {
        let mut conn = get_connection(&self.pool)?;
        saving_transactions::table
            .find(transaction_id)
            .first::<SavingTransactionDB>(&mut conn)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("saving transaction {}", transaction_id)))?
            .try_into()
    }

    fn get_by_user_id(&self, user_id: &str) -> Result<Vec<SavingTransaction>> {
        let mut conn = get_connection(&self.pool)?;
        saving_transactions::table
            .filter(saving_transactions::user_id.eq(user_id))
            .order(saving_transactions::created_at.desc())
            .load::<SavingTransactionDB>(&mut conn)?
            .into_iter()
            .map(SavingTransaction::try_from)
            .collect()
    }

    fn search(&self, filters: SavingTransactionFilters) -> Result<Vec<SavingTransaction>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = saving_transactions::table
            .filter(saving_transactions::user_id.eq(&filters.user_id))
            .into_boxed();

        if let Some(transaction_type) = filters.transaction_type {
            query = query
                .filter(saving_transactions::transaction_type.eq(transaction_type.as_str()));
        }
        if let Some(ref goal_id) = filters.saving_goal_id {
            query = query.filter(saving_transactions::saving_goal_id.eq(goal_id));
        }
        if let Some(start_date) = filters.start_date {
            query = query.filter(saving_transactions::created_at.ge(start_date));
        }
        if let Some(end_date) = filters.end_date {
            query = query.filter(saving_transactions::created_at.le(end_date));
        }

        // Amounts are stored as text; range filtering and amount sorting are
        // applied after load to compare decimals rather than strings.
        if let Some(ref sort) = filters.sort {
            if sort.id == "createdAt" && sort.desc {
                query = query.order(saving_transactions::created_at.desc());
            } else {
                query = query.order(saving_transactions::created_at.asc());
            }
        } else {
            query = query.order(saving_transactions::created_at.desc());
        }

        let mut entries: Vec<SavingTransaction> = query
            .load::<SavingTransactionDB>(&mut conn)?
            .into_iter()
            .map(SavingTransaction::try_from)
            .collect::<Result<_>>()?;

        if let Some(min_amount) = filters.min_amount {
            entries.retain(|t| t.amount >= min_amount);
        }
        if let Some(max_amount) = filters.max_amount {
            entries.retain(|t| t.amount <= max_amount);
        }
        if let Some(ref sort) = filters.sort {
            if sort.id == "amount" {
                entries.sort_by(|a, b| {
                    if sort.desc {
                        b.amount.cmp(&a.amount)
                    } else {
                        a.amount.cmp(&b.amount)
                    }
                });
            }
        }

        Ok(entries)
    }

    fn get_by_id_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        transaction_id: &str,
    ) -> Result<SavingTransaction> {
        saving_transactions::table
            .find(transaction_id)
            .first::<SavingTransactionDB>(conn)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("saving transaction {}", transaction_id)))?
            .try_into()
    }

    fn count_by_goal_id_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        goal_id: &str,
    ) -> Result<i64> {
        Ok(saving_transactions::table
            .filter(saving_transactions::saving_goal_id.eq(goal_id))
            .count()
            .get_result(conn)?)
    }

    fn insert_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        saving_id: &str,
        new_transaction: NewSavingTransaction,
    ) -> Result<SavingTransaction> {
        let now = Utc::now().naive_utc();
        let entry = SavingTransactionDB {
            id: Uuid::new_v4().to_string(),
            user_id: new_transaction.user_id,
            saving_id: saving_id.to_string(),
            saving_goal_id: new_transaction.saving_goal_id,
            amount: new_transaction.amount.to_string(),
            transaction_type: new_transaction.transaction_type.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };

        diesel::insert_into(saving_transactions::table)
            .values(&entry)
            .execute(conn)?;

        entry.try_into()
    }

    fn update_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        update: SavingTransactionUpdate,
    ) -> Result<SavingTransaction> {
        diesel::update(saving_transactions::table.find(&update.id))
            .set((
                saving_transactions::amount.eq(update.amount.to_string()),
                saving_transactions::transaction_type.eq(update.transaction_type.as_str()),
                saving_transactions::saving_goal_id.eq(&update.saving_goal_id),
                saving_transactions::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;

        saving_transactions::table
            .find(&update.id)
            .first::<SavingTransactionDB>(conn)?
            .try_into()
    }

    fn delete_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        transaction_id: &str,
    ) -> Result<usize> {
        Ok(diesel::delete(saving_transactions::table.find(transaction_id)).execute(conn)?)
    }
}
