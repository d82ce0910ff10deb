pub mod savings_model;
pub mod savings_repository;
pub mod savings_service;
pub mod savings_traits;

pub use savings_model::{NewSavingsAccount, SavingsAccount};
pub use savings_repository::SavingsRepository;
pub use savings_service::SavingsService;
pub use savings_traits::{SavingsRepositoryTrait, SavingsServiceTrait};
