//! CLI command handlers
//!
//! Bridges the clap argument parsing with the ledger and the wizard. Every
//! wizard invocation reopens the wizard from the draft store, applies one
//! command, and lets the store carry the state to the next invocation.

pub mod ledger;
pub mod wizard;

pub use ledger::{
    handle_account_command, handle_budget_command, handle_category_command, handle_goal_command,
    AccountCommands, BudgetCommands, CategoryCommands, GoalCommands,
};
pub use wizard::{handle_wizard_command, WizardCommands};

use crate::config::settings::Settings;
use crate::error::{WizardError, WizardResult};
use crate::models::{Account, Budget, Category, CategoryKind, Goal, Money, UserId};
use crate::storage::Ledger;

/// The signed-in user, or an error telling the user to run `init`
pub fn require_user(settings: &Settings) -> WizardResult<UserId> {
    settings.user_id.ok_or(WizardError::AuthenticationRequired)
}

/// Parse an amount typed on the command line, allowing the configured symbol
pub fn parse_amount(input: &str, settings: &Settings) -> WizardResult<Money> {
    Money::parse_with_symbol(input, &settings.currency_symbol).map_err(|e| {
        WizardError::Validation(format!(
            "Invalid amount: '{}'. Use a format like '25.00' or '25'. Error: {}",
            input, e
        ))
    })
}

fn matches_ref(name: &str, id: &str, query: &str) -> bool {
    name.eq_ignore_ascii_case(query.trim()) || id == query.trim()
}

/// Find an account by name (case-insensitive) or short id
pub fn find_account(ledger: &Ledger, user: &UserId, query: &str) -> WizardResult<Account> {
    ledger
        .accounts_for(user)?
        .into_iter()
        .find(|a| matches_ref(&a.name, &a.id.to_string(), query))
        .ok_or_else(|| WizardError::account_not_found(query))
}

/// Find a category of `kind` by name or short id
pub fn find_category(
    ledger: &Ledger,
    user: &UserId,
    kind: CategoryKind,
    query: &str,
) -> WizardResult<Category> {
    ledger
        .categories_for(user, Some(kind))?
        .into_iter()
        .find(|c| matches_ref(&c.name, &c.id.to_string(), query))
        .ok_or_else(|| WizardError::NotFound {
            entity_type: "Category",
            identifier: query.to_string(),
        })
}

pub fn find_goal(ledger: &Ledger, user: &UserId, query: &str) -> WizardResult<Goal> {
    ledger
        .goals_for(user)?
        .into_iter()
        .find(|g| matches_ref(&g.name, &g.id.to_string(), query))
        .ok_or_else(|| WizardError::goal_not_found(query))
}

pub fn find_budget(ledger: &Ledger, user: &UserId, query: &str) -> WizardResult<Budget> {
    ledger
        .budgets_for(user)?
        .into_iter()
        .find(|b| matches_ref(&b.name, &b.id.to_string(), query))
        .ok_or_else(|| WizardError::NotFound {
            entity_type: "Budget",
            identifier: query.to_string(),
        })
}
