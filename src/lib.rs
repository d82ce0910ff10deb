pub mod db;

pub mod budgets;
pub mod goals;
pub mod saving_transactions;
pub mod savings;
pub mod transactions;

pub mod errors;
pub mod schema;

pub use errors::{Error, Result};
