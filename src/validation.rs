//! Field validation for wizard drafts
//!
//! Pure, stateless checks mapping a draft to field-level messages. An empty
//! result means the draft may be written.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::WizardError;
use crate::models::{Money, TransactionKind};
use crate::services::period::parse_start_month;
use crate::wizard::draft::{BudgetDraft, TransactionDraft};

/// Field name → message; empty means valid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge another set of errors into this one
    pub fn extend(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }

    /// All messages joined into one line
    pub fn summary(&self) -> String {
        self.0.values().cloned().collect::<Vec<_>>().join("; ")
    }

    /// `Ok(())` when empty, otherwise a validation error carrying the summary
    pub fn into_result(self) -> Result<(), WizardError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(WizardError::Validation(self.summary()))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Whether any field failed validation
pub fn has_validation_errors(errors: &ValidationErrors) -> bool {
    !errors.is_empty()
}

/// Validate a budget draft
pub fn validate_budget_data(draft: &BudgetDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if draft.budget_name.trim().is_empty() {
        errors.insert("budget_name", "Budget name is required");
    }

    if draft.category_id.is_none() {
        errors.insert("category_id", "Select a category for this budget");
    }

    if !draft.amount.is_positive() {
        errors.insert("amount", "Budget amount must be greater than zero");
    } else if draft.amount > Money::MAX_BUDGET {
        errors.insert("amount", "Budget amount is too large");
    }

    // Stored on the budget only; impact warnings use the configured threshold
    if !(draft.alert_threshold > 0.0 && draft.alert_threshold <= 1.0) {
        errors.insert("alert_threshold", "Alert threshold must be above 0 and at most 1");
    }

    if parse_start_month(&draft.start_date).is_err() {
        errors.insert("start_date", "Start month must look like YYYY-MM");
    }

    errors
}

/// Parse a transaction date as typed in a draft
pub fn parse_transaction_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Validate a transaction draft
pub fn validate_transaction_data(draft: &TransactionDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if !draft.amount.is_positive() {
        errors.insert("amount", "Amount must be greater than zero");
    } else if draft.amount > Money::MAX_TRANSACTION {
        errors.insert("amount", "Amount is too large");
    }

    if draft.account_id.is_none() {
        errors.insert("account_id", "Select an account");
    }

    if parse_transaction_date(&draft.date).is_none() {
        errors.insert("date", "Date must look like YYYY-MM-DD");
    }

    if draft.kind.requires_category() && draft.category_id.is_none() {
        errors.insert("category_id", "Select a category");
    }

    if draft.kind == TransactionKind::Contribution && draft.goal_id.is_none() {
        errors.insert("goal_id", "Select the goal this contribution goes to");
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, CategoryId, GoalId};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 20).unwrap()
    }

    fn valid_budget() -> BudgetDraft {
        let mut draft = BudgetDraft::new(today());
        draft.budget_name = "Food".into();
        draft.category_id = Some(CategoryId::new());
        draft.amount = Money::from_dollars(1000);
        draft
    }

    fn valid_expense() -> TransactionDraft {
        let mut draft = TransactionDraft::new(today());
        draft.amount = Money::from_dollars(25);
        draft.account_id = Some(AccountId::new());
        draft.category_id = Some(CategoryId::new());
        draft
    }

    #[test]
    fn test_valid_budget_has_no_errors() {
        let errors = validate_budget_data(&valid_budget());
        assert!(!has_validation_errors(&errors));
    }

    #[test]
    fn test_budget_required_fields() {
        let mut zero = valid_budget();
        zero.amount = Money::zero();
        assert!(validate_budget_data(&zero).contains("amount"));

        let mut negative = valid_budget();
        negative.amount = Money::from_cents(-1);
        assert!(validate_budget_data(&negative).contains("amount"));

        let mut no_category = valid_budget();
        no_category.category_id = None;
        assert!(validate_budget_data(&no_category).contains("category_id"));

        let mut blank_name = valid_budget();
        blank_name.budget_name = "   ".into();
        assert!(validate_budget_data(&blank_name).contains("budget_name"));

        let mut bad_start = valid_budget();
        bad_start.start_date = "someday".into();
        assert!(validate_budget_data(&bad_start).contains("start_date"));
    }

    #[test]
    fn test_budget_amount_and_threshold_bounds() {
        let mut huge = valid_budget();
        huge.amount = Money::MAX_BUDGET + Money::from_cents(1);
        assert!(validate_budget_data(&huge).contains("amount"));

        for threshold in [0.0, 1.5, 5.0, f64::NAN] {
            let mut draft = valid_budget();
            draft.alert_threshold = threshold;
            assert!(validate_budget_data(&draft).contains("alert_threshold"));
        }

        let mut full = valid_budget();
        full.alert_threshold = 1.0;
        assert!(validate_budget_data(&full).is_empty());
    }

    #[test]
    fn test_budget_accepts_month_name_start() {
        let mut draft = valid_budget();
        draft.start_date = "October 2025".into();
        assert!(validate_budget_data(&draft).is_empty());
    }

    #[test]
    fn test_summary_and_into_result() {
        let errors = validate_budget_data(&BudgetDraft::new(today()));
        assert_eq!(errors.len(), 3);
        let err = errors.into_result().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("Budget name is required"));
    }

    #[test]
    fn test_valid_expense() {
        assert!(validate_transaction_data(&valid_expense()).is_empty());
    }

    #[test]
    fn test_transaction_required_fields() {
        let errors = validate_transaction_data(&TransactionDraft::new(today()));
        assert!(errors.contains("amount"));
        assert!(errors.contains("account_id"));
        assert!(errors.contains("category_id"));
        assert!(!errors.contains("date"));

        let mut bad_date = valid_expense();
        bad_date.date = "2025-02-30".into();
        assert!(validate_transaction_data(&bad_date).contains("date"));
    }

    #[test]
    fn test_transaction_amount_upper_bound() {
        let mut draft = valid_expense();
        draft.amount = Money::MAX_TRANSACTION;
        assert!(validate_transaction_data(&draft).is_empty());

        draft.amount = Money::parse("92233720368547758.07").unwrap();
        assert!(validate_transaction_data(&draft).contains("amount"));
    }

    #[test]
    fn test_contribution_needs_goal_not_category() {
        let mut draft = valid_expense();
        draft.kind = TransactionKind::Contribution;
        draft.category_id = None;
        let errors = validate_transaction_data(&draft);
        assert!(!errors.contains("category_id"));
        assert!(errors.contains("goal_id"));

        draft.goal_id = Some(GoalId::new());
        assert!(validate_transaction_data(&draft).is_empty());
    }

    #[test]
    fn test_income_needs_category() {
        let mut draft = valid_expense();
        draft.kind = TransactionKind::Income;
        draft.category_id = None;
        assert!(validate_transaction_data(&draft).contains("category_id"));
    }
}
