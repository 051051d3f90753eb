//! Category model
//!
//! Categories classify transactions as income or expense. Budgets may only
//! be attached to expense categories.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, UserId};

/// Which side of the ledger a category belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
}

/// A transaction category owned by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Owning user
    pub user_id: UserId,

    /// Category name
    pub name: String,

    /// Income or expense
    pub kind: CategoryKind,
}

impl Category {
    /// Create a new category
    pub fn new(user_id: UserId, name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            id: CategoryId::new(),
            user_id,
            name: name.into(),
            kind,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Default category names seeded for a new user
pub const DEFAULT_INCOME_CATEGORIES: &[&str] = &["Salary", "Freelance", "Other Income"];

/// Default expense category names seeded for a new user
pub const DEFAULT_EXPENSE_CATEGORIES: &[&str] = &[
    "Groceries",
    "Rent",
    "Utilities",
    "Transportation",
    "Dining Out",
    "Entertainment",
];
