mod common;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use fintrack_core::budgets::{BudgetServiceTrait, NewBudgetAccount};
use fintrack_core::goals::{GoalServiceTrait, NewSavingGoal, SavingGoal};
use fintrack_core::saving_transactions::{
    NewSavingTransaction, SavingTransactionServiceTrait, SavingTransactionType,
};
use fintrack_core::savings::SavingsServiceTrait;
use fintrack_core::transactions::{
    NewTransaction, TransactionFilters, TransactionServiceTrait, TransactionType,
    TransactionUpdate,
};
use fintrack_core::Error;

use common::{register_user, setup, TestApp};

fn income(user_id: &str, amount: Decimal) -> NewTransaction {
    NewTransaction {
        user_id: user_id.to_string(),
        amount,
        transaction_type: TransactionType::Income,
        category_id: None,
        description: "income".to_string(),
    }
}

fn expense(user_id: &str, amount: Decimal, category_id: &str) -> NewTransaction {
    NewTransaction {
        user_id: user_id.to_string(),
        amount,
        transaction_type: TransactionType::Expense,
        category_id: Some(category_id.to_string()),
        description: "expense".to_string(),
    }
}

fn deposit(user_id: &str, amount: Decimal, goal_id: &str) -> NewSavingTransaction {
    NewSavingTransaction {
        user_id: user_id.to_string(),
        amount,
        transaction_type: SavingTransactionType::Deposit,
        saving_goal_id: goal_id.to_string(),
    }
}

fn withdrawal(user_id: &str, amount: Decimal, goal_id: &str) -> NewSavingTransaction {
    NewSavingTransaction {
        user_id: user_id.to_string(),
        amount,
        transaction_type: SavingTransactionType::Withdrawal,
        saving_goal_id: goal_id.to_string(),
    }
}

async fn create_goal(app: &TestApp, user_id: &str, target: Decimal) -> SavingGoal {
    app.goals
        .create_goal(NewSavingGoal {
            user_id: user_id.to_string(),
            name: "vacation".to_string(),
            target_amount: target,
            due_date: (Utc::now() + Duration::days(90)).naive_utc(),
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn budget_ledger_reverses_and_reapplies_through_edits() {
    let app = setup();
    register_user(&app, "u1").await;

    app.transactions
        .create_transaction(income("u1", dec!(100.00)))
        .await
        .unwrap();
    let groceries = app
        .transactions
        .create_transaction(expense("u1", dec!(30.00), "groceries"))
        .await
        .unwrap();
    let bonus = app
        .transactions
        .create_transaction(income("u1", dec!(20.00)))
        .await
        .unwrap();
    assert_eq!(app.budgets.get_balance("u1").unwrap(), dec!(90.00));

    // Growing the expense subtracts only the difference.
    app.transactions
        .update_transaction(TransactionUpdate {
            id: groceries.id,
            user_id: "u1".to_string(),
            amount: dec!(50.00),
            transaction_type: TransactionType::Expense,
            category_id: Some("groceries".to_string()),
            description: "groceries".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(app.budgets.get_balance("u1").unwrap(), dec!(70.00));

    app.transactions
        .delete_transaction(&bonus.id, "u1")
        .await
        .unwrap();
    assert_eq!(app.budgets.get_balance("u1").unwrap(), dec!(50.00));
}

#[tokio::test]
async fn overspending_rolls_back_and_persists_nothing() {
    let app = setup();
    register_user(&app, "u1").await;

    app.transactions
        .create_transaction(income("u1", dec!(50.00)))
        .await
        .unwrap();

    let result = app
        .transactions
        .create_transaction(expense("u1", dec!(80.00), "rent"))
        .await;
    assert!(matches!(result, Err(Error::InsufficientFunds(_))));

    assert_eq!(app.budgets.get_balance("u1").unwrap(), dec!(50.00));
    assert_eq!(app.transactions.get_transactions("u1").unwrap().len(), 1);
}

#[tokio::test]
async fn saving_ledger_moves_all_three_aggregates_together() {
    let app = setup();
    register_user(&app, "u1").await;
    let goal = create_goal(&app, "u1", dec!(200.00)).await;
    app.transactions
        .create_transaction(income("u1", dec!(100.00)))
        .await
        .unwrap();

    app.saving_transactions
        .create_saving_transaction(deposit("u1", dec!(60.00), &goal.id))
        .await
        .unwrap();
    assert_eq!(app.budgets.get_balance("u1").unwrap(), dec!(40.00));
    assert_eq!(app.savings.get_total_saved("u1").unwrap(), dec!(60.00));
    let goal = app.goals.get_goal(&goal.id, "u1").unwrap();
    assert_eq!(goal.current_amount_decimal().unwrap(), dec!(60.00));

    let result = app
        .saving_transactions
        .create_saving_transaction(deposit("u1", dec!(150.00), &goal.id))
        .await;
    assert!(matches!(result, Err(Error::InsufficientFunds(_))));
    assert_eq!(app.budgets.get_balance("u1").unwrap(), dec!(40.00));
    assert_eq!(app.savings.get_total_saved("u1").unwrap(), dec!(60.00));
    assert_eq!(
        app.saving_transactions
            .get_saving_transactions("u1")
            .unwrap()
            .len(),
        1
    );

    app.saving_transactions
        .create_saving_transaction(withdrawal("u1", dec!(60.00), &goal.id))
        .await
        .unwrap();
    assert_eq!(app.budgets.get_balance("u1").unwrap(), dec!(100.00));
    assert_eq!(app.savings.get_total_saved("u1").unwrap(), dec!(0.00));
    let goal = app.goals.get_goal(&goal.id, "u1").unwrap();
    assert_eq!(goal.current_amount_decimal().unwrap(), dec!(0.00));
    assert!(!goal.is_completed);
}

#[tokio::test]
async fn deposit_past_target_leaves_database_untouched() {
    let app = setup();
    register_user(&app, "u1").await;
    let goal = create_goal(&app, "u1", dec!(100.00)).await;
    app.transactions
        .create_transaction(income("u1", dec!(140.00)))
        .await
        .unwrap();
    app.saving_transactions
        .create_saving_transaction(deposit("u1", dec!(90.00), &goal.id))
        .await
        .unwrap();

    let result = app
        .saving_transactions
        .create_saving_transaction(deposit("u1", dec!(20.00), &goal.id))
        .await;
    assert!(matches!(result, Err(Error::GoalExceeded(_))));

    assert_eq!(app.budgets.get_balance("u1").unwrap(), dec!(50.00));
    assert_eq!(app.savings.get_total_saved("u1").unwrap(), dec!(90.00));
    let goal = app.goals.get_goal(&goal.id, "u1").unwrap();
    assert_eq!(goal.current_amount_decimal().unwrap(), dec!(90.00));
    assert_eq!(
        app.saving_transactions
            .get_saving_transactions("u1")
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn filling_a_goal_marks_it_completed() {
    let app = setup();
    register_user(&app, "u1").await;
    let goal = create_goal(&app, "u1", dec!(100.00)).await;
    app.transactions
        .create_transaction(income("u1", dec!(100.00)))
        .await
        .unwrap();

    app.saving_transactions
        .create_saving_transaction(deposit("u1", dec!(100.00), &goal.id))
        .await
        .unwrap();
    assert!(app.goals.get_goal(&goal.id, "u1").unwrap().is_completed);

    app.saving_transactions
        .create_saving_transaction(withdrawal("u1", dec!(10.00), &goal.id))
        .await
        .unwrap();
    assert!(!app.goals.get_goal(&goal.id, "u1").unwrap().is_completed);
}

#[tokio::test]
async fn goal_with_live_entries_cannot_be_deleted() {
    let app = setup();
    register_user(&app, "u1").await;
    let goal = create_goal(&app, "u1", dec!(100.00)).await;
    app.transactions
        .create_transaction(income("u1", dec!(50.00)))
        .await
        .unwrap();
    let entry = app
        .saving_transactions
        .create_saving_transaction(deposit("u1", dec!(25.00), &goal.id))
        .await
        .unwrap();

    let result = app.goals.delete_goal(&goal.id, "u1").await;
    assert!(matches!(result, Err(Error::Validation(_))));

    // Once the entry is reversed out, deletion goes through.
    app.saving_transactions
        .delete_saving_transaction(&entry.id)
        .await
        .unwrap();
    app.goals.delete_goal(&goal.id, "u1").await.unwrap();
    assert!(matches!(
        app.goals.get_goal(&goal.id, "u1"),
        Err(Error::NotFound(_))
    ));
    assert_eq!(app.budgets.get_balance("u1").unwrap(), dec!(50.00));
}

#[tokio::test]
async fn one_budget_account_per_user() {
    let app = setup();
    register_user(&app, "u1").await;

    let result = app
        .budgets
        .create_budget(NewBudgetAccount {
            id: None,
            user_id: "u1".to_string(),
        })
        .await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn users_cannot_touch_each_others_records() {
    let app = setup();
    register_user(&app, "u1").await;
    register_user(&app, "u2").await;

    app.transactions
        .create_transaction(income("u1", dec!(100.00)))
        .await
        .unwrap();
    let entry = app
        .transactions
        .create_transaction(expense("u1", dec!(10.00), "snacks"))
        .await
        .unwrap();

    let result = app.transactions.delete_transaction(&entry.id, "u2").await;
    assert!(matches!(result, Err(Error::Unauthorized(_))));
    assert_eq!(app.budgets.get_balance("u1").unwrap(), dec!(90.00));

    let goal = create_goal(&app, "u1", dec!(100.00)).await;
    let result = app
        .saving_transactions
        .create_saving_transaction(deposit("u2", dec!(10.00), &goal.id))
        .await;
    assert!(matches!(result, Err(Error::Unauthorized(_))));
}

#[tokio::test]
async fn search_filters_by_type_and_amount_range() {
    let app = setup();
    register_user(&app, "u1").await;

    app.transactions
        .create_transaction(income("u1", dec!(500.00)))
        .await
        .unwrap();
    app.transactions
        .create_transaction(expense("u1", dec!(9.99), "coffee"))
        .await
        .unwrap();
    app.transactions
        .create_transaction(expense("u1", dec!(120.00), "utilities"))
        .await
        .unwrap();

    let expenses = app
        .transactions
        .search_transactions(TransactionFilters {
            user_id: "u1".to_string(),
            transaction_type: Some(TransactionType::Expense),
            min_amount: Some(dec!(10.00)),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].amount, dec!(120.00));
    assert_eq!(expenses[0].category_id.as_deref(), Some("utilities"));
}

#[tokio::test]
async fn replaying_live_entries_reproduces_the_balance() {
    let app = setup();
    register_user(&app, "u1").await;
    let goal = create_goal(&app, "u1", dec!(500.00)).await;

    app.transactions
        .create_transaction(income("u1", dec!(1000.00)))
        .await
        .unwrap();
    let lunch = app
        .transactions
        .create_transaction(expense("u1", dec!(12.34), "lunch"))
        .await
        .unwrap();
    app.saving_transactions
        .create_saving_transaction(deposit("u1", dec!(250.00), &goal.id))
        .await
        .unwrap();
    app.saving_transactions
        .create_saving_transaction(withdrawal("u1", dec!(50.00), &goal.id))
        .await
        .unwrap();
    app.transactions
        .delete_transaction(&lunch.id, "u1")
        .await
        .unwrap();

    let mut replayed = Decimal::ZERO;
    for entry in app.transactions.get_transactions("u1").unwrap() {
        match entry.transaction_type {
            TransactionType::Income => replayed += entry.amount,
            TransactionType::Expense => replayed -= entry.amount,
        }
    }
    for entry in app
        .saving_transactions
        .get_saving_transactions("u1")
        .unwrap()
    {
        match entry.transaction_type {
            SavingTransactionType::Deposit => replayed -= entry.amount,
            SavingTransactionType::Withdrawal => replayed += entry.amount,
        }
    }

    assert_eq!(app.budgets.get_balance("u1").unwrap(), replayed);
    assert_eq!(app.budgets.get_balance("u1").unwrap(), dec!(800.00));
    assert_eq!(app.savings.get_total_saved("u1").unwrap(), dec!(200.00));
}
