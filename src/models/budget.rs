//! Budget model
//!
//! A budget caps spending for one expense category over a run of calendar
//! months and tracks how much of that cap has been used.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, CategoryId, UserId};
use super::money::Money;
use super::period::BudgetCadence;

/// Lifecycle status of a budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    #[default]
    Active,
    Paused,
    Expired,
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Paused => write!(f, "paused"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

/// A budget record ready to be written; the store assigns the id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBudget {
    pub name: String,
    pub category_id: CategoryId,
    pub amount: Money,
    pub spent: Money,
    pub period: BudgetCadence,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub alert_threshold: f64,
    pub status: BudgetStatus,
}

/// A persisted budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    /// Unique identifier
    pub id: BudgetId,

    /// Owning user
    pub user_id: UserId,

    /// Display name
    pub name: String,

    /// Expense category tracked by this budget
    pub category_id: CategoryId,

    /// Spending cap
    pub amount: Money,

    /// Amount already spent against the cap
    #[serde(default)]
    pub spent: Money,

    /// Cadence the budget was created with
    pub period: BudgetCadence,

    /// First day covered (inclusive)
    pub start_date: NaiveDate,

    /// Last day covered (inclusive)
    pub end_date: NaiveDate,

    /// Fraction of the cap at which the user wants to be alerted
    #[serde(default = "default_alert_threshold")]
    pub alert_threshold: f64,

    #[serde(default)]
    pub status: BudgetStatus,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

pub(crate) fn default_alert_threshold() -> f64 {
    0.8
}

impl Budget {
    /// Materialize a new budget record for `user_id`
    pub fn from_new(record: NewBudget, user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new(),
            user_id,
            name: record.name,
            category_id: record.category_id,
            amount: record.amount,
            spent: record.spent,
            period: record.period,
            start_date: record.start_date,
            end_date: record.end_date,
            alert_threshold: record.alert_threshold,
            status: record.status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Amount still available before the cap is reached
    pub fn remaining(&self) -> Money {
        self.amount - self.spent
    }

    /// Whether `date` falls inside the budget's coverage
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} of {}, {} to {})",
            self.name, self.spent, self.amount, self.start_date, self.end_date
        )
    }
}
