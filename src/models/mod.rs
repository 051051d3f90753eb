//! Core data models
//!
//! This module contains the records the wizard writes (budgets, transactions)
//! and the records it reads or adjusts (accounts, goals, categories).

pub mod account;
pub mod budget;
pub mod category;
pub mod goal;
pub mod ids;
pub mod money;
pub mod period;
pub mod transaction;

pub use account::Account;
pub use budget::{Budget, BudgetStatus, NewBudget};
pub use category::{Category, CategoryKind};
pub use goal::{Goal, GoalStatus};
pub use ids::{AccountId, BudgetId, CategoryId, GoalId, TransactionId, UserId};
pub use money::Money;
pub use period::BudgetCadence;
pub use transaction::{NewTransaction, Transaction, TransactionKind};
