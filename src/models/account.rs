//! Account model
//!
//! Accounts hold the balance that transactions move money in and out of.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, UserId};
use super::money::Money;

/// A financial account owned by one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,

    /// Owning user
    pub user_id: UserId,

    /// Account name (e.g., "Checking")
    pub name: String,

    /// Current balance; may go negative for ordinary expenses
    pub balance: Money,

    /// When the balance was last written
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account
    pub fn new(user_id: UserId, name: impl Into<String>, balance: Money) -> Self {
        Self {
            id: AccountId::new(),
            user_id,
            name: name.into(),
            balance,
            updated_at: Utc::now(),
        }
    }

    /// Check if the account belongs to `user_id`
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.user_id == *user_id
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.balance)
    }
}
