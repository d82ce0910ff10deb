use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};

/// Direction of a budget ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(Error::Consistency(format!(
                "unknown transaction type '{}'",
                other
            ))),
        }
    }
}

/// Domain model for a budget ledger entry.
///
/// Entries are immutable records of one income/expense event; "update" and
/// "delete" reverse the recorded effect rather than mutating it in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub budget_id: String,
    pub category_id: Option<String>,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for budget ledger entries.
#[derive(
    Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub user_id: String,
    pub budget_id: String,
    pub category_id: Option<String>,
    pub amount: String,
    pub transaction_type: String,
    pub description: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = Error;

    fn try_from(db: TransactionDB) -> Result<Self> {
        let amount = db.amount.parse().map_err(|_| {
            Error::Consistency(format!(
                "stored transaction amount '{}' is not a valid decimal",
                db.amount
            ))
        })?;
        Ok(Transaction {
            id: db.id,
            user_id: db.user_id,
            budget_id: db.budget_id,
            category_id: db.category_id,
            amount,
            transaction_type: db.transaction_type.parse()?,
            description: db.description,
            created_at: DateTime::from_naive_utc_and_offset(db.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(db.updated_at, Utc),
        })
    }
}

/// Input model for recording a new transaction.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub user_id: String,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub category_id: Option<String>,
    pub description: String,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        validate_entry(self.amount, self.transaction_type, &self.category_id)
    }
}

/// Input model for replacing a transaction (full replace semantics).
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    pub id: String,
    pub user_id: String,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub category_id: Option<String>,
    pub description: String,
}

impl TransactionUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_entry(self.amount, self.transaction_type, &self.category_id)
    }
}

fn validate_entry(
    amount: Decimal,
    transaction_type: TransactionType,
    category_id: &Option<String>,
) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "amount must be positive".to_string(),
        )));
    }
    // Expenses must be categorized; income entries need no category.
    if transaction_type == TransactionType::Expense && category_id.is_none() {
        return Err(Error::Validation(ValidationError::MissingField(
            "categoryId".to_string(),
        )));
    }
    Ok(())
}

/// Sort request for search endpoints.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Sort {
    pub id: String,
    pub desc: bool,
}

/// Filters for searching a user's transactions.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilters {
    pub user_id: String,
    pub transaction_type: Option<TransactionType>,
    pub category_id: Option<String>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub description: Option<String>,
    pub sort: Option<Sort>,
}
