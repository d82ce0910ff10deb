use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};

/// A named saving target.
///
/// `current_amount` is mutated only by the saving ledger and always satisfies
/// `0 <= current_amount <= target_amount`; `is_completed` holds exactly when
/// the two are equal.
#[derive(
    Queryable, Identifiable, AsChangeset, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::saving_goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct SavingGoal {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub target_amount: String,
    pub current_amount: String,
    pub due_date: NaiveDateTime,
    pub is_completed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl SavingGoal {
    pub fn target_amount_decimal(&self) -> Result<Decimal> {
        self.target_amount.parse().map_err(|_| {
            Error::Consistency(format!(
                "stored goal target '{}' is not a valid decimal",
                self.target_amount
            ))
        })
    }

    pub fn current_amount_decimal(&self) -> Result<Decimal> {
        self.current_amount.parse().map_err(|_| {
            Error::Consistency(format!(
                "stored goal progress '{}' is not a valid decimal",
                self.current_amount
            ))
        })
    }
}

/// Input model for creating a new saving goal. Progress always starts at zero.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewSavingGoal {
    pub user_id: String,
    pub name: String,
    pub target_amount: Decimal,
    pub due_date: NaiveDateTime,
}

impl NewSavingGoal {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }
        if self.target_amount <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "target amount must be positive".to_string(),
            )));
        }
        Ok(())
    }
}

/// Input model for updating a saving goal's own fields.
///
/// Progress and completion are owned by the saving ledger and are not part
/// of this request.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SavingGoalUpdate {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub target_amount: Decimal,
    pub due_date: NaiveDateTime,
}

impl SavingGoalUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }
        if self.target_amount <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "target amount must be positive".to_string(),
            )));
        }
        Ok(())
    }
}
