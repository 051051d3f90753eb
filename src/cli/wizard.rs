//! Wizard CLI commands
//!
//! One wizard action per invocation. The budget start month is reset to next
//! month whenever the wizard is reopened, so a different start month is
//! given to `submit` directly.

use chrono::Local;
use clap::Subcommand;

use super::{find_account, find_budget, find_category, find_goal, parse_amount, require_user};
use crate::config::paths::WizardPaths;
use crate::config::settings::Settings;
use crate::error::WizardResult;
use crate::models::{BudgetCadence, CategoryKind, TransactionKind};
use crate::services::executor::WorkflowOutcome;
use crate::services::impact::{ImpactConfig, Severity};
use crate::storage::{DraftStore, JsonDraftStore, Ledger};
use crate::wizard::{
    BudgetDraftPatch, Completion, ExperienceLevel, TransactionDraftPatch, Wizard, WizardStep,
    WorkflowType,
};

/// Wizard subcommands
#[derive(Subcommand)]
pub enum WizardCommands {
    /// Show the current step and drafts
    Status,

    /// Choose the workflow (budget-first or transaction-first)
    Start {
        /// Workflow to follow
        workflow: WorkflowType,
        /// Experience level (beginner, intermediate, advanced)
        #[arg(short, long, default_value = "beginner")]
        level: ExperienceLevel,
        /// Why this workflow was chosen
        #[arg(short, long)]
        reason: Option<String>,
    },

    /// Fill in the budget draft
    Budget {
        /// Budget name
        #[arg(short, long)]
        name: Option<String>,
        /// Expense category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Spending cap (e.g., "1000" or "1000.00")
        #[arg(short, long)]
        amount: Option<String>,
        /// Period (month, quarter, year)
        #[arg(short, long)]
        period: Option<BudgetCadence>,
        /// Alert threshold stored on the budget, a fraction in (0, 1] (e.g., 0.9)
        #[arg(short, long)]
        threshold: Option<f64>,
    },

    /// Fill in the transaction draft
    #[command(alias = "txn")]
    Transaction {
        /// Type (income, expense, contribution)
        #[arg(short = 'k', long = "type")]
        kind: Option<TransactionKind>,
        /// Amount (e.g., "25.50")
        #[arg(short, long)]
        amount: Option<String>,
        /// Account name or ID
        #[arg(long)]
        account: Option<String>,
        /// Category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// Description
        #[arg(long)]
        description: Option<String>,
        /// Goal name or ID
        #[arg(short, long)]
        goal: Option<String>,
        /// Remove the goal reference
        #[arg(long, conflicts_with = "goal")]
        no_goal: bool,
    },

    /// Go to the next step
    Next,

    /// Go to the previous step
    Back,

    /// Jump to a step
    Goto {
        /// Step name (e.g., budget_config, final_confirmation)
        step: WizardStep,
    },

    /// Validate the current step
    Validate,

    /// Show budget warnings for the transaction draft
    Impact {
        /// Budget name or ID; defaults to the budget matching the category
        #[arg(short, long)]
        budget: Option<String>,
    },

    /// Submit the wizard
    Submit {
        /// Budget start month (YYYY-MM or "September 2025")
        #[arg(short, long)]
        start: Option<String>,
    },

    /// Close the wizard, keeping drafts
    Close,

    /// Discard drafts and start over
    Reset,
}

pub async fn handle_wizard_command(
    paths: &WizardPaths,
    settings: &Settings,
    ledger: &Ledger,
    cmd: WizardCommands,
) -> WizardResult<()> {
    let store = JsonDraftStore::open(paths.drafts_file());
    let mut wizard = Wizard::open(store, Completion::execute());

    match cmd {
        WizardCommands::Status => print_status(&wizard, ledger, settings)?,

        WizardCommands::Start {
            workflow,
            level,
            reason,
        } => {
            wizard.choose_workflow(workflow, level, reason)?;
            println!("Workflow: {}", workflow);
            print_step(&wizard);
        }

        WizardCommands::Budget {
            name,
            category,
            amount,
            period,
            threshold,
        } => {
            let mut patch = BudgetDraftPatch {
                budget_name: name,
                period,
                alert_threshold: threshold,
                ..Default::default()
            };
            if let Some(amount) = amount {
                patch.amount = Some(parse_amount(&amount, settings)?);
            }
            if let Some(query) = category {
                let user = require_user(settings)?;
                let category = find_category(ledger, &user, CategoryKind::Expense, &query)?;
                patch.category_id = Some(Some(category.id));
                patch.category_name = Some(Some(category.name));
            }

            wizard.update_budget_draft(patch);
            println!(
                "Budget draft {}",
                if wizard.is_budget_step_valid() {
                    "is complete"
                } else {
                    "is incomplete"
                }
            );
        }

        WizardCommands::Transaction {
            kind,
            amount,
            account,
            category,
            date,
            description,
            goal,
            no_goal,
        } => {
            let mut patch = TransactionDraftPatch {
                kind,
                date,
                description,
                ..Default::default()
            };
            if let Some(amount) = amount {
                patch.amount = Some(parse_amount(&amount, settings)?);
            }
            if no_goal {
                patch.goal_id = Some(None);
            }

            if account.is_some() || category.is_some() || goal.is_some() {
                let user = require_user(settings)?;
                if let Some(query) = account {
                    patch.account_id = Some(Some(find_account(ledger, &user, &query)?.id));
                }
                if let Some(query) = category {
                    let effective = kind.unwrap_or(wizard.state().transaction_draft.kind);
                    let category_kind = match effective {
                        TransactionKind::Income => CategoryKind::Income,
                        TransactionKind::Expense | TransactionKind::Contribution => {
                            CategoryKind::Expense
                        }
                    };
                    patch.category_id =
                        Some(Some(find_category(ledger, &user, category_kind, &query)?.id));
                }
                if let Some(query) = goal {
                    patch.goal_id = Some(Some(find_goal(ledger, &user, &query)?.id));
                }
            }

            wizard.update_transaction_draft(patch);
            println!(
                "Transaction draft {}",
                if wizard.is_transaction_step_valid() {
                    "is complete"
                } else {
                    "is incomplete"
                }
            );
        }

        WizardCommands::Next => {
            wizard.next();
            print_step(&wizard);
        }

        WizardCommands::Back => {
            wizard.back();
            print_step(&wizard);
        }

        WizardCommands::Goto { step } => {
            wizard.navigate(step);
            print_step(&wizard);
        }

        WizardCommands::Validate => {
            let errors = wizard.validate_current_step();
            if errors.is_empty() {
                println!("No problems found.");
            } else {
                for (field, message) in errors.iter() {
                    println!("  {}: {}", field, message);
                }
            }
        }

        WizardCommands::Impact { budget } => {
            let user = require_user(settings)?;
            let budgets = ledger.budgets_for(&user)?;
            let selected = match budget {
                Some(query) => Some(find_budget(ledger, &user, &query)?.id),
                None => None,
            };

            let config = ImpactConfig::from(settings);
            let warnings =
                wizard.impact_warnings(&budgets, selected.as_ref(), wizard.today(), &config);
            if warnings.is_empty() {
                println!("No budget warnings.");
            }
            for warning in warnings {
                let tag = match warning.severity {
                    Severity::Info => "note",
                    Severity::Warning | Severity::Error => "warning",
                };
                println!("{}: {}", tag, warning.message);
            }
        }

        WizardCommands::Submit { start } => {
            if let Some(start) = start {
                wizard.update_budget_draft(BudgetDraftPatch {
                    start_date: Some(start),
                    ..Default::default()
                });
            }

            let today = Local::now().date_naive();
            let ctx = ledger.submission_context(settings.user_id, today)?;
            match wizard.submit(ledger, &ctx).await? {
                Some(outcome) => print_outcome(&outcome, settings),
                None => println!("Wizard finished."),
            }
        }

        WizardCommands::Close => {
            wizard.close()?;
            println!("Wizard closed. Drafts are kept for next time.");
        }

        WizardCommands::Reset => {
            wizard.reset();
            println!("Wizard reset.");
        }
    }

    Ok(())
}

fn print_step<S: DraftStore>(wizard: &Wizard<S>) {
    let state = wizard.state();
    println!(
        "Step: {} ({}%)",
        state.current_step, state.progress_percentage
    );
}

fn print_status<S: DraftStore>(
    wizard: &Wizard<S>,
    ledger: &Ledger,
    settings: &Settings,
) -> WizardResult<()> {
    let state = wizard.state();
    let symbol = &settings.currency_symbol;

    print_step(wizard);
    match &state.workflow_choice {
        Some(choice) => println!("Workflow: {} (locked until reset)", choice.workflow_type),
        None => println!("Workflow: not chosen"),
    }

    let budget = &state.budget_draft;
    println!();
    println!("Budget draft:");
    println!("  Name:      {}", budget.budget_name);
    println!(
        "  Category:  {}",
        budget.category_name.as_deref().unwrap_or("-")
    );
    println!("  Amount:    {}", budget.amount.format_with_symbol(symbol));
    println!("  Period:    {}", budget.period);
    println!("  Starts:    {}", budget.start_date);
    println!("  Complete:  {}", yes_no(wizard.is_budget_step_valid()));

    let txn = &state.transaction_draft;
    let account_name = match (settings.user_id, txn.account_id) {
        (Some(user), Some(id)) => ledger
            .accounts_for(&user)?
            .into_iter()
            .find(|a| a.id == id)
            .map(|a| a.name),
        _ => None,
    };
    println!();
    println!("Transaction draft:");
    println!("  Type:      {}", txn.kind);
    println!("  Amount:    {}", txn.amount.format_with_symbol(symbol));
    println!("  Account:   {}", account_name.as_deref().unwrap_or("-"));
    println!("  Date:      {}", txn.date);
    if !txn.description.is_empty() {
        println!("  Note:      {}", txn.description);
    }
    println!("  Complete:  {}", yes_no(wizard.is_transaction_step_valid()));

    Ok(())
}

fn print_outcome(outcome: &WorkflowOutcome, settings: &Settings) {
    let symbol = &settings.currency_symbol;

    if let Some(budget) = &outcome.budget {
        println!(
            "Created budget: {} ({} to {}, {})",
            budget.name,
            budget.start_date,
            budget.end_date,
            budget.amount.format_with_symbol(symbol)
        );
    }
    if let Some(txn) = &outcome.transaction {
        println!(
            "Created transaction: {} {} on {}",
            txn.kind,
            txn.amount.format_with_symbol(symbol),
            txn.date
        );
    }
    if let Some(balance) = outcome.balance {
        println!("  Account balance: {}", balance.format_with_symbol(symbol));
    }
    if let Some(progress) = &outcome.goal_progress {
        println!(
            "  Goal progress: {} ({})",
            progress.current_amount.format_with_symbol(symbol),
            progress.status
        );
    }
    for warning in &outcome.warnings {
        println!("warning: {}", warning);
    }
    if !outcome.invalidated.is_empty() {
        let scopes: Vec<String> = outcome.invalidated.iter().map(|s| s.to_string()).collect();
        tracing::debug!(scopes = %scopes.join(","), "caches invalidated");
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
