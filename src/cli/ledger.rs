//! Ledger CLI commands
//!
//! Accounts, goals and categories are set up here so the wizard has
//! something to reference. Budgets are only listed; they are created through
//! the wizard.

use clap::Subcommand;

use super::{parse_amount, require_user};
use crate::config::settings::Settings;
use crate::error::WizardResult;
use crate::models::CategoryKind;
use crate::storage::Ledger;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Add {
        /// Account name
        name: String,
        /// Starting balance (e.g., "1000.00" or "1000")
        #[arg(short, long, default_value = "0")]
        balance: String,
    },
    /// List accounts with balances
    List,
}

/// Goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a savings goal
    Add {
        /// Goal name
        name: String,
        /// Target amount
        #[arg(short, long)]
        target: String,
    },
    /// List goals with progress
    List,
}

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories
    List {
        /// Only show income categories
        #[arg(long, conflicts_with = "expense")]
        income: bool,
        /// Only show expense categories
        #[arg(long)]
        expense: bool,
    },
    /// Create a category
    Add {
        /// Category name
        name: String,
        /// Create an income category instead of an expense category
        #[arg(long)]
        income: bool,
    },
}

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// List budgets with spending
    List,
}

pub fn handle_account_command(
    ledger: &Ledger,
    settings: &Settings,
    cmd: AccountCommands,
) -> WizardResult<()> {
    let user = require_user(settings)?;

    match cmd {
        AccountCommands::Add { name, balance } => {
            let balance = parse_amount(&balance, settings)?;
            let account = ledger.add_account(user, &name, balance)?;
            println!("Created account: {}", account.name);
            println!("  Balance: {}", account.balance.format_with_symbol(&settings.currency_symbol));
            println!("  ID: {}", account.id);
        }
        AccountCommands::List => {
            let accounts = ledger.accounts_for(&user)?;
            if accounts.is_empty() {
                println!("No accounts yet. Create one with 'envelope-wizard account add'.");
                return Ok(());
            }
            println!("{:<14} {:<24} {:>14}", "ID", "Name", "Balance");
            for account in accounts {
                println!(
                    "{:<14} {:<24} {:>14}",
                    account.id.to_string(),
                    account.name,
                    account.balance.format_with_symbol(&settings.currency_symbol)
                );
            }
        }
    }

    Ok(())
}

pub fn handle_goal_command(
    ledger: &Ledger,
    settings: &Settings,
    cmd: GoalCommands,
) -> WizardResult<()> {
    let user = require_user(settings)?;

    match cmd {
        GoalCommands::Add { name, target } => {
            let target = parse_amount(&target, settings)?;
            let goal = ledger.add_goal(user, &name, target)?;
            println!("Created goal: {}", goal.name);
            println!("  Target: {}", goal.target_amount.format_with_symbol(&settings.currency_symbol));
            println!("  ID: {}", goal.id);
        }
        GoalCommands::List => {
            let goals = ledger.goals_for(&user)?;
            if goals.is_empty() {
                println!("No goals yet.");
            }
            for goal in goals {
                println!("{}  {}", goal.id, goal);
            }
        }
    }

    Ok(())
}

pub fn handle_category_command(
    ledger: &Ledger,
    settings: &Settings,
    cmd: CategoryCommands,
) -> WizardResult<()> {
    let user = require_user(settings)?;

    match cmd {
        CategoryCommands::List { income, expense } => {
            let kind = match (income, expense) {
                (true, _) => Some(CategoryKind::Income),
                (_, true) => Some(CategoryKind::Expense),
                _ => None,
            };
            for category in ledger.categories_for(&user, kind)? {
                let label = match category.kind {
                    CategoryKind::Income => "income",
                    CategoryKind::Expense => "expense",
                };
                println!("{:<14} {:<8} {}", category.id.to_string(), label, category.name);
            }
        }
        CategoryCommands::Add { name, income } => {
            let kind = if income {
                CategoryKind::Income
            } else {
                CategoryKind::Expense
            };
            let category = ledger.add_category(user, &name, kind)?;
            println!("Created category: {} ({})", category.name, category.id);
        }
    }

    Ok(())
}

pub fn handle_budget_command(
    ledger: &Ledger,
    settings: &Settings,
    cmd: BudgetCommands,
) -> WizardResult<()> {
    let user = require_user(settings)?;

    match cmd {
        BudgetCommands::List => {
            let budgets = ledger.budgets_for(&user)?;
            if budgets.is_empty() {
                println!("No budgets yet. Create one with 'envelope-wizard wizard start budget-first'.");
                return Ok(());
            }
            let symbol = &settings.currency_symbol;
            for budget in budgets {
                println!(
                    "{:<14} {:<24} {} to {}  {} of {} spent",
                    budget.id.to_string(),
                    budget.name,
                    budget.start_date,
                    budget.end_date,
                    budget.spent.format_with_symbol(symbol),
                    budget.amount.format_with_symbol(symbol)
                );
            }
        }
    }

    Ok(())
}
