use std::sync::Arc;

use tempfile::TempDir;

use fintrack_core::budgets::{BudgetRepository, BudgetService, BudgetServiceTrait, NewBudgetAccount};
use fintrack_core::db;
use fintrack_core::goals::{GoalRepository, GoalService};
use fintrack_core::saving_transactions::{SavingTransactionRepository, SavingTransactionService};
use fintrack_core::savings::{NewSavingsAccount, SavingsRepository, SavingsService, SavingsServiceTrait};
use fintrack_core::transactions::{TransactionRepository, TransactionService};

/// All services wired against a throwaway on-disk database.
///
/// The tempdir is held so the database outlives the test body.
pub struct TestApp {
    pub budgets: BudgetService,
    pub savings: SavingsService,
    pub goals: GoalService,
    pub transactions: TransactionService,
    pub saving_transactions: SavingTransactionService,
    _data_dir: TempDir,
}

pub fn setup() -> TestApp {
    let data_dir = tempfile::tempdir().unwrap();
    let db_path = db::init(data_dir.path().to_str().unwrap()).unwrap();
    let pool = db::create_pool(&db_path).unwrap();
    db::run_migrations(&pool).unwrap();
    let writer = db::spawn_writer((*pool).clone());

    let budget_repository = Arc::new(BudgetRepository::new(pool.clone()));
    let savings_repository = Arc::new(SavingsRepository::new(pool.clone()));
    let goal_repository = Arc::new(GoalRepository::new(pool.clone()));
    let transaction_repository = Arc::new(TransactionRepository::new(pool.clone()));
    let saving_transaction_repository = Arc::new(SavingTransactionRepository::new(pool.clone()));

    TestApp {
        budgets: BudgetService::new(budget_repository.clone(), writer.clone()),
        savings: SavingsService::new(savings_repository.clone(), writer.clone()),
        goals: GoalService::new(
            goal_repository.clone(),
            saving_transaction_repository.clone(),
            writer.clone(),
        ),
        transactions: TransactionService::new(
            budget_repository.clone(),
            transaction_repository,
            writer.clone(),
        ),
        saving_transactions: SavingTransactionService::new(
            budget_repository,
            savings_repository,
            goal_repository,
            saving_transaction_repository,
            writer,
        ),
        _data_dir: data_dir,
    }
}

/// Creates the budget and savings accounts a user gets at signup.
pub async fn register_user(app: &TestApp, user_id: &str) {
    app.budgets
        .create_budget(NewBudgetAccount {
            id: None,
            user_id: user_id.to_string(),
        })
        .await
        .unwrap();
    app.savings
        .create_savings_account(NewSavingsAccount {
            id: None,
            user_id: user_id.to_string(),
        })
        .await
        .unwrap();
}
