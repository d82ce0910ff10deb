use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// A user's aggregate savings across all goals.
///
/// `total_saved` equals the net of live saving-transaction entries and is
/// mutated only by the saving ledger.
#[derive(
    Queryable, Identifiable, AsChangeset, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::savings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct SavingsAccount {
    pub id: String,
    pub user_id: String,
    pub total_saved: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl SavingsAccount {
    pub fn total_saved_decimal(&self) -> Result<Decimal> {
        self.total_saved.parse().map_err(|_| {
            Error::Consistency(format!(
                "stored savings total '{}' is not a valid decimal",
                self.total_saved
            ))
        })
    }
}

/// Input for creating a savings account (one per user, at signup).
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewSavingsAccount {
    pub id: Option<String>,
    pub user_id: String,
}
