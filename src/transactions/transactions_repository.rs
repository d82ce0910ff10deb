use std::sync::Arc;

use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use uuid::Uuid;

use super::transactions_model::{
    NewTransaction, Transaction, TransactionDB, TransactionFilters, TransactionUpdate,
};
use super::transactions_traits::TransactionRepositoryTrait;
use crate::db::get_connection;
use crate::errors::{Error, Result};
use crate::schema::transactions;

/// Repository for budget ledger entries.
pub struct TransactionRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl TransactionRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }
}

impl TransactionRepositoryTrait for TransactionRepository {
    fn get_by_id(&self, transaction_id: &str) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)?;
        transactions::table
            .find(transaction_id)
            .first::<TransactionDB>(&mut conn)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("transaction {}", transaction_id)))?
            .try_into()
    }

    fn get_by_user_id(&self, user_id: &str) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        transactions::table
            .filter(transactions::user_id.eq(user_id))
            .order(transactions::created_at.desc())
            .load::<TransactionDB>(&mut conn)?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    fn search(&self, filters: TransactionFilters) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = transactions::table
            .filter(transactions::user_id.eq(&filters.user_id))
            .into_boxed();

        if let Some(transaction_type) = filters.transaction_type {
            query = query.filter(transactions::transaction_type.eq(transaction_type.as_str()));
        }
        if let Some(ref category_id) = filters.category_id {
            query = query.filter(transactions::category_id.eq(category_id));
        }
        if let Some(start_date) = filters.start_date {
            query = query.filter(transactions::created_at.ge(start_date));
        }
        if let Some(end_date) = filters.end_date {
            query = query.filter(transactions::created_at.le(end_date));
        }
        if let Some(ref keyword) = filters.description {
            query = query.filter(transactions::description.like(format!("%{}%", keyword)));
        }

        // Default order; amount sorting happens below since amounts are
        // stored as text and would sort lexicographically in SQL.
        if let Some(ref sort) = filters.sort {
            if sort.id == "createdAt" && sort.desc {
                query = query.order(transactions::created_at.desc());
            } else {
                query = query.order(transactions::created_at.asc());
            }
        } else {
            query = query.order(transactions::created_at.desc());
        }

        let mut entries: Vec<Transaction> = query
            .load::<TransactionDB>(&mut conn)?
            .into_iter()
            .map(Transaction::try_from)
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
    ) -> Result<Transaction> {
        transactions::table
            .find(transaction_id)
            .first::<TransactionDB>(conn)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("transaction {}", transaction_id)))?
            .try_into()
    }

    fn insert_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        budget_id: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction> {
        let now = Utc::now().naive_utc();
        let entry = TransactionDB {
            id: Uuid::new_v4().to_string(),
            user_id: new_transaction.user_id,
            budget_id: budget_id.to_string(),
            category_id: new_transaction.category_id,
            amount: new_transaction.amount.to_string(),
            transaction_type: new_transaction.transaction_type.as_str().to_string(),
            description: new_transaction.description,
            created_at: now,
            updated_at: now,
        };

        diesel::insert_into(transactions::table)
            .values(&entry)
            .execute(conn)?;

        entry.try_into()
    }

    fn update_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        update: TransactionUpdate,
    ) -> Result<Transaction> {
        diesel::update(transactions::table.find(&update.id))
            .set((
                transactions::amount.eq(update.amount.to_string()),
                transactions::transaction_type.eq(update.transaction_type.as_str()),
                transactions::category_id.eq(&update.category_id),
                transactions::description.eq(&update.description),
                transactions::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;

        transactions::table
            .find(&update.id)
            .first::<TransactionDB>(conn)?
            .try_into()
    }

    fn delete_in_transaction(
        &self,
        conn: &mut SqliteConnection,
        transaction_id: &str,
    ) -> Result<usize> {
        Ok(diesel::delete(transactions::table.find(transaction_id)).execute(conn)?)
    }
}
