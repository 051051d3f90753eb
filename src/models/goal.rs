//! Savings goal model
//!
//! Goals accumulate contributions (and optionally income) until the target
//! amount is reached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{GoalId, UserId};
use super::money::Money;

/// Progress status of a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl GoalStatus {
    /// Status implied by a progress amount against a target
    pub fn for_progress(current: Money, target: Money) -> Self {
        if current >= target {
            Self::Completed
        } else {
            Self::InProgress
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not started"),
            Self::InProgress => write!(f, "in progress"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// A savings goal owned by one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,

    pub user_id: UserId,

    pub name: String,

    /// Amount the user wants to reach
    pub target_amount: Money,

    /// Amount contributed so far
    #[serde(default)]
    pub current_amount: Money,

    #[serde(default)]
    pub status: GoalStatus,

    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// Create a new goal with no progress
    pub fn new(user_id: UserId, name: impl Into<String>, target_amount: Money) -> Self {
        Self {
            id: GoalId::new(),
            user_id,
            name: name.into(),
            target_amount,
            current_amount: Money::zero(),
            status: GoalStatus::NotStarted,
            updated_at: Utc::now(),
        }
    }

    /// Amount still needed to reach the target (never negative)
    pub fn remaining(&self) -> Money {
        let remaining = self.target_amount - self.current_amount;
        if remaining.is_negative() {
            Money::zero()
        } else {
            remaining
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} of {}, {})",
            self.name, self.current_amount, self.target_amount, self.status
        )
    }
}
