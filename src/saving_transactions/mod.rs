pub mod saving_transactions_model;
pub mod saving_transactions_repository;
pub mod saving_transactions_service;
pub mod saving_transactions_traits;

pub use saving_transactions_model::{
    NewSavingTransaction, SavingTransaction, SavingTransactionFilters, SavingTransactionType,
    SavingTransactionUpdate,
};
pub use saving_transactions_repository::SavingTransactionRepository;
pub use saving_transactions_service::SavingTransactionService;
pub use saving_transactions_traits::{
    SavingTransactionRepositoryTrait, SavingTransactionServiceTrait,
};
