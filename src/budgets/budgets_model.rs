use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// A user's single spendable balance.
///
/// The balance is stored as a canonical decimal string and surfaced as an
/// exact `Decimal`; it is mutated only by the transaction and saving ledgers
/// and may never be committed negative.
#[derive(
    Queryable, Identifiable, AsChangeset, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::budgets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct BudgetAccount {
    pub id: String,
    pub user_id: String,
    pub balance: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl BudgetAccount {
    pub fn balance_decimal(&self) -> Result<Decimal> {
        self.balance.parse().map_err(|_| {
            Error::Consistency(format!(
                "stored budget balance '{}' is not a valid decimal",
                self.balance
            ))
        })
    }
}

/// Input for creating a budget account (one per user, at signup).
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewBudgetAccount {
    pub id: Option<String>,
    pub user_id: String,
}
