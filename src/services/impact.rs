//! Budget impact projection
//!
//! Computes the advisory warnings shown while a transaction amount is being
//! entered against a selected budget. Warnings are recomputed from scratch
//! every time and never persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::settings::Settings;
use crate::models::{Budget, Money};

/// Kind of budget warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    Threshold,
    Overrun,
    PeriodExpiry,
}

/// How loudly a warning should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single advisory warning about a budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetWarning {
    #[serde(rename = "type")]
    pub kind: WarningKind,
    pub message: String,
    pub severity: Severity,
}

/// Tunables for the impact projection
#[derive(Debug, Clone)]
pub struct ImpactConfig {
    /// Utilization fraction at which the threshold warning fires
    pub threshold: f64,
    /// Days before the end date at which the expiry notice appears
    pub expiry_window_days: i64,
    /// Symbol used when formatting amounts in messages
    pub currency_symbol: String,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            threshold: 0.8,
            expiry_window_days: 7,
            currency_symbol: "$".to_string(),
        }
    }
}

impl From<&Settings> for ImpactConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            threshold: settings.warning_threshold,
            expiry_window_days: settings.expiry_window_days,
            currency_symbol: settings.currency_symbol.clone(),
        }
    }
}

/// Project the effect of spending `candidate` against `budget`
///
/// At most one of `overrun` and `threshold` is returned; the expiry notice is
/// independent of both.
pub fn calculate_impact(
    budget: &Budget,
    candidate: Money,
    today: NaiveDate,
    config: &ImpactConfig,
) -> Vec<BudgetWarning> {
    let mut warnings = Vec::new();
    let projected = budget.spent.saturating_add(candidate);
    let utilization = projected.ratio_of(budget.amount);

    if projected > budget.amount {
        let overage = projected - budget.amount;
        let message = match utilization {
            Some(ratio) => format!(
                "This transaction will exceed the budget by {} ({:.1}% used)",
                overage.format_with_symbol(&config.currency_symbol),
                ratio * 100.0
            ),
            None => format!(
                "This transaction will exceed the budget by {}",
                overage.format_with_symbol(&config.currency_symbol)
            ),
        };
        warnings.push(BudgetWarning {
            kind: WarningKind::Overrun,
            message,
            severity: Severity::Warning,
        });
    } else if let Some(ratio) = utilization.filter(|r| *r >= config.threshold) {
        warnings.push(BudgetWarning {
            kind: WarningKind::Threshold,
            message: format!(
                "This transaction brings the budget to {:.1}% used ({} left)",
                ratio * 100.0,
                (budget.amount - projected).format_with_symbol(&config.currency_symbol)
            ),
            severity: Severity::Warning,
        });
    }

    let days_left = (budget.end_date - today).num_days();
    if days_left > 0 && days_left <= config.expiry_window_days {
        let unit = if days_left == 1 { "day" } else { "days" };
        warnings.push(BudgetWarning {
            kind: WarningKind::PeriodExpiry,
            message: format!("Budget period ends in {} {}", days_left, unit),
            severity: Severity::Info,
        });
    }

    warnings
}
