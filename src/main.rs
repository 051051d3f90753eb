use anyhow::Result;
use clap::{Parser, Subcommand};

use envelope_wizard::cli::{
    handle_account_command, handle_budget_command, handle_category_command, handle_goal_command,
    handle_wizard_command, AccountCommands, BudgetCommands, CategoryCommands, GoalCommands,
    WizardCommands,
};
use envelope_wizard::config::{paths::WizardPaths, settings::Settings};
use envelope_wizard::models::UserId;
use envelope_wizard::storage::Ledger;

#[derive(Parser)]
#[command(
    name = "envelope-wizard",
    author = "Kaylee Beyene",
    version,
    about = "Guided budget and transaction creation",
    long_about = "envelope-wizard walks you through creating a budget and a \
                  transaction together, either budget first or transaction \
                  first, and keeps account balances and goal progress in step."
)]
struct Cli {
    /// Log decisions and fallbacks to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the local ledger and default categories
    Init,

    /// Account management commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// Savings goal commands
    #[command(subcommand)]
    Goal(GoalCommands),

    /// Category commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Budget commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Guided budget/transaction creation
    #[command(subcommand)]
    Wizard(WizardCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },

    /// Show current configuration and paths
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    envelope_wizard::logging::init(cli.verbose);

    let paths = WizardPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    let ledger = Ledger::open(&paths, &settings)?;

    match cli.command {
        Some(Commands::Init) => {
            let user = match settings.user_id {
                Some(user) => user,
                None => {
                    let user = UserId::new();
                    settings.user_id = Some(user);
                    user
                }
            };
            settings.save(&paths)?;
            let created = ledger.seed_default_categories(user)?;

            println!("Initialized envelope-wizard at: {}", paths.base_dir().display());
            println!("User: {}", user);
            if created > 0 {
                println!("Created {} default categories.", created);
            }
            println!();
            println!("Next: add an account with 'envelope-wizard account add <name> --balance <amount>'.");
        }
        Some(Commands::Account(cmd)) => handle_account_command(&ledger, &settings, cmd)?,
        Some(Commands::Goal(cmd)) => handle_goal_command(&ledger, &settings, cmd)?,
        Some(Commands::Category(cmd)) => handle_category_command(&ledger, &settings, cmd)?,
        Some(Commands::Budget(cmd)) => handle_budget_command(&ledger, &settings, cmd)?,
        Some(Commands::Wizard(cmd)) => {
            handle_wizard_command(&paths, &settings, &ledger, cmd).await?
        }
        Some(Commands::Audit { count }) => {
            for entry in ledger.audit().read_recent(count)? {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Config) => {
            println!("envelope-wizard Configuration");
            println!("=============================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Data directory:  {}", paths.data_dir().display());
            println!("Draft store:     {}", paths.drafts_file().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            match settings.user_id {
                Some(user) => println!("  User:              {}", user),
                None => println!("  User:              (run 'envelope-wizard init')"),
            }
            println!("  Currency symbol:   {}", settings.currency_symbol);
            println!("  Warning threshold: {:.0}%", settings.warning_threshold * 100.0);
            println!("  Expiry window:     {} days", settings.expiry_window_days);
            println!("  Atomic updates:    {}", settings.atomic_updates);
        }
        None => {
            println!("envelope-wizard - guided budget and transaction creation");
            println!();
            println!("Run 'envelope-wizard --help' for usage information.");
            println!("Run 'envelope-wizard wizard status' to see where you left off.");
        }
    }

    Ok(())
}
