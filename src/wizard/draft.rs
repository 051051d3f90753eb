//! In-progress form data held by the wizard
//!
//! Drafts keep what the user typed, including text that may not parse yet,
//! so validation can report field-level errors instead of rejecting input.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::budget::default_alert_threshold;
use crate::models::{AccountId, BudgetCadence, CategoryId, GoalId, Money, TransactionKind};
use crate::services::period::default_start_month;

/// Budget form state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetDraft {
    pub budget_name: String,
    pub category_id: Option<CategoryId>,
    pub category_name: Option<String>,
    pub amount: Money,
    pub period: BudgetCadence,
    /// Start month as typed (`YYYY-MM` or "September 2025")
    pub start_date: String,
    pub alert_threshold: f64,
}

impl BudgetDraft {
    /// Fresh draft starting next month relative to `today`
    pub fn new(today: NaiveDate) -> Self {
        Self {
            budget_name: String::new(),
            category_id: None,
            category_name: None,
            amount: Money::zero(),
            period: BudgetCadence::Month,
            start_date: default_start_month(today),
            alert_threshold: default_alert_threshold(),
        }
    }

    /// Apply the fields present in `patch`
    pub fn apply(&mut self, patch: BudgetDraftPatch) {
        if let Some(name) = patch.budget_name {
            self.budget_name = name;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(category_name) = patch.category_name {
            self.category_name = category_name;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(period) = patch.period {
            self.period = period;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(threshold) = patch.alert_threshold {
            self.alert_threshold = threshold;
        }
    }

    /// Whether the user filled in enough to attempt creating a budget
    pub fn is_populated(&self) -> bool {
        !self.budget_name.trim().is_empty() && self.amount.is_positive()
    }
}

impl Default for BudgetDraft {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}

/// Partial update of a budget draft
///
/// `Option<Option<_>>` fields distinguish "leave alone" (`None`) from
/// "clear" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct BudgetDraftPatch {
    pub budget_name: Option<String>,
    pub category_id: Option<Option<CategoryId>>,
    pub category_name: Option<Option<String>>,
    pub amount: Option<Money>,
    pub period: Option<BudgetCadence>,
    pub start_date: Option<String>,
    pub alert_threshold: Option<f64>,
}

impl BudgetDraftPatch {
    pub fn is_empty(&self) -> bool {
        self.budget_name.is_none()
            && self.category_id.is_none()
            && self.category_name.is_none()
            && self.amount.is_none()
            && self.period.is_none()
            && self.start_date.is_none()
            && self.alert_threshold.is_none()
    }
}

/// Transaction form state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionDraft {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Money,
    pub account_id: Option<AccountId>,
    pub category_id: Option<CategoryId>,
    /// Date as typed (`YYYY-MM-DD`)
    pub date: String,
    pub description: String,
    pub goal_id: Option<GoalId>,
}

impl TransactionDraft {
    /// Fresh expense draft dated `today`
    pub fn new(today: NaiveDate) -> Self {
        Self {
            kind: TransactionKind::Expense,
            amount: Money::zero(),
            account_id: None,
            category_id: None,
            date: today.format("%Y-%m-%d").to_string(),
            description: String::new(),
            goal_id: None,
        }
    }

    /// Apply the fields present in `patch`
    pub fn apply(&mut self, patch: TransactionDraftPatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(account_id) = patch.account_id {
            self.account_id = account_id;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(goal_id) = patch.goal_id {
            self.goal_id = goal_id;
        }
    }
}

impl Default for TransactionDraft {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}

/// Partial update of a transaction draft
#[derive(Debug, Clone, Default)]
pub struct TransactionDraftPatch {
    pub kind: Option<TransactionKind>,
    pub amount: Option<Money>,
    pub account_id: Option<Option<AccountId>>,
    pub category_id: Option<Option<CategoryId>>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub goal_id: Option<Option<GoalId>>,
}

impl TransactionDraftPatch {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.amount.is_none()
            && self.account_id.is_none()
            && self.category_id.is_none()
            && self.date.is_none()
            && self.description.is_none()
            && self.goal_id.is_none()
    }
}
