//! Transaction model
//!
//! Transactions are income, expenses, or contributions toward a goal. The
//! amount is always stored positive; the type decides which way the account
//! balance moves.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{AccountId, CategoryId, GoalId, TransactionId, UserId};
use super::money::Money;
use crate::error::WizardError;

/// Kind of money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    #[default]
    Expense,
    /// Moves funds from an account toward a goal
    Contribution,
}

impl TransactionKind {
    /// Signed balance change for a positive `amount`
    pub fn balance_delta(&self, amount: Money) -> Money {
        match self {
            Self::Income => amount,
            Self::Expense | Self::Contribution => -amount,
        }
    }

    /// Whether a category is mandatory for this kind
    pub fn requires_category(&self) -> bool {
        !matches!(self, Self::Contribution)
    }

    /// Whether a referenced goal receives progress from this kind
    pub fn advances_goal(&self) -> bool {
        matches!(self, Self::Contribution | Self::Income)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
            Self::Contribution => write!(f, "contribution"),
        }
    }
}

impl FromStr for TransactionKind {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "contribution" => Ok(Self::Contribution),
            other => Err(WizardError::Validation(format!(
                "Unknown transaction type: {}",
                other
            ))),
        }
    }
}

/// A transaction record ready to be written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub user_id: UserId,
    pub account_id: AccountId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Money,
    pub date: NaiveDate,
    pub description: String,
    pub income_category_id: Option<CategoryId>,
    pub expense_category_id: Option<CategoryId>,
    pub goal_id: Option<GoalId>,
}

impl NewTransaction {
    /// Build a record, routing the category to the income or expense field
    #[allow(clippy::too_many_arguments)]
    pub fn routed(
        user_id: UserId,
        account_id: AccountId,
        kind: TransactionKind,
        amount: Money,
        date: NaiveDate,
        description: impl Into<String>,
        category_id: Option<CategoryId>,
        goal_id: Option<GoalId>,
    ) -> Self {
        let (income_category_id, expense_category_id) = match kind {
            TransactionKind::Income => (category_id, None),
            TransactionKind::Expense | TransactionKind::Contribution => (None, category_id),
        };
        Self {
            user_id,
            account_id,
            kind,
            amount,
            date,
            description: description.into(),
            income_category_id,
            expense_category_id,
            goal_id,
        }
    }
}

/// A persisted transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserId,
    pub account_id: AccountId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Money,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    pub income_category_id: Option<CategoryId>,
    pub expense_category_id: Option<CategoryId>,
    pub goal_id: Option<GoalId>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Materialize a new transaction record
    pub fn from_new(record: NewTransaction) -> Self {
        Self {
            id: TransactionId::new(),
            user_id: record.user_id,
            account_id: record.account_id,
            kind: record.kind,
            amount: record.amount,
            date: record.date,
            description: record.description,
            income_category_id: record.income_category_id,
            expense_category_id: record.expense_category_id,
            goal_id: record.goal_id,
            created_at: Utc::now(),
        }
    }

    /// The category regardless of which field it was routed to
    pub fn category_id(&self) -> Option<CategoryId> {
        self.income_category_id.or(self.expense_category_id)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date, self.kind, self.amount)?;
        if !self.description.is_empty() {
            write!(f, " {}", self.description)?;
        }
        Ok(())
    }
}
