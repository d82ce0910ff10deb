use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::transactions::Sort;

/// Direction of a saving ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SavingTransactionType {
    Deposit,
    Withdrawal,
}

impl SavingTransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SavingTransactionType::Deposit => "deposit",
            SavingTransactionType::Withdrawal => "withdrawal",
        }
    }
}

impl FromStr for SavingTransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "deposit" => Ok(SavingTransactionType::Deposit),
            "withdrawal" => Ok(SavingTransactionType::Withdrawal),
            other => Err(Error::Consistency(format!(
                "unknown saving transaction type '{}'",
                other
            ))),
        }
    }
}

/// Domain model for a saving ledger entry.
///
/// One entry fans out to three aggregates: the budget balance, the referenced
/// goal's progress, and the savings total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingTransaction {
    pub id: String,
    pub user_id: String,
    pub saving_id: String,
    pub saving_goal_id: String,
    pub amount: Decimal,
    pub transaction_type: SavingTransactionType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for saving ledger entries.
#[derive(
    Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::saving_transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SavingTransactionDB {
    pub id: String,
    pub user_id: String,
    pub saving_id: String,
    pub saving_goal_id: String,
    pub amount: String,
    pub transaction_type: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<SavingTransactionDB> for SavingTransaction {
    type Error = Error;

    fn try_from(db: SavingTransactionDB) -> Result<Self> {
        let amount = db.amount.parse().map_err(|_| {
            Error::Consistency(format!(
                "stored saving transaction amount '{}' is not a valid decimal",
                db.amount
            ))
        })?;
        Ok(SavingTransaction {
            id: db.id,
            user_id: db.user_id,
            saving_id: db.saving_id,
            saving_goal_id: db.saving_goal_id,
            amount,
            transaction_type: db.transaction_type.parse()?,
            created_at: DateTime::from_naive_utc_and_offset(db.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(db.updated_at, Utc),
        })
    }
}

/// Input model for recording a new saving transaction.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewSavingTransaction {
    pub user_id: String,
    pub amount: Decimal,
    pub transaction_type: SavingTransactionType,
    pub saving_goal_id: String,
}

impl NewSavingTransaction {
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount)
    }
}

/// Input model for replacing a saving transaction (full replace semantics).
///
/// Changing `saving_goal_id` moves the entry's effect from the original goal
/// to the new one within the same commit.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SavingTransactionUpdate {
    pub id: String,
    pub amount: Decimal,
    pub transaction_type: SavingTransactionType,
    pub saving_goal_id: String,
}

impl SavingTransactionUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount)
    }
}

fn validate_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "amount must be positive".to_string(),
        )));
    }
    Ok(())
}

/// Filters for searching a user's saving transactions.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SavingTransactionFilters {
    pub user_id: String,
    pub transaction_type: Option<SavingTransactionType>,
    pub saving_goal_id: Option<String>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub sort: Option<Sort>,
}
