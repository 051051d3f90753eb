//! JSON ledger implementing the collaborator traits
//!
//! Holds accounts, budgets, categories, goals and transactions as JSON files
//! under the data directory, and records every write in the audit log. With
//! `atomic_updates` turned off in settings, the atomic balance and goal
//! adjustments report a remote failure so callers take the read-modify-write
//! path instead.

use chrono::{DateTime, NaiveDate, Utc};

use super::collection::Collection;
use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::WizardPaths;
use crate::config::settings::Settings;
use crate::error::{WizardError, WizardResult};
use crate::models::category::{DEFAULT_EXPENSE_CATEGORIES, DEFAULT_INCOME_CATEGORIES};
use crate::models::{
    Account, AccountId, Budget, BudgetStatus, Category, CategoryKind, Goal, GoalId, GoalStatus,
    Money, NewBudget, NewTransaction, Transaction, TransactionKind, UserId,
};
use crate::services::backend::{
    AccountBackend, BudgetBackend, GoalBackend, GoalProgress, TransactionBackend,
};
use crate::services::executor::SubmissionContext;

/// File-backed store for every entity the wizard writes
pub struct Ledger {
    accounts: Collection<Account>,
    budgets: Collection<Budget>,
    categories: Collection<Category>,
    goals: Collection<Goal>,
    transactions: Collection<Transaction>,
    audit: AuditLogger,
    atomic_updates: bool,
}

impl Ledger {
    /// Open the ledger under `paths` and load every collection
    pub fn open(paths: &WizardPaths, settings: &Settings) -> WizardResult<Self> {
        paths.ensure_directories()?;

        let ledger = Self {
            accounts: Collection::new(paths.accounts_file()),
            budgets: Collection::new(paths.budgets_file()),
            categories: Collection::new(paths.categories_file()),
            goals: Collection::new(paths.goals_file()),
            transactions: Collection::new(paths.transactions_file()),
            audit: AuditLogger::new(paths.audit_log()),
            atomic_updates: settings.atomic_updates,
        };

        ledger.accounts.load()?;
        ledger.budgets.load()?;
        ledger.categories.load()?;
        ledger.goals.load()?;
        ledger.transactions.load()?;

        Ok(ledger)
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Audit failures never undo a write that already happened
    fn record(&self, entry: AuditEntry) {
        if let Err(e) = self.audit.log(&entry) {
            tracing::warn!(entity = %entry.entity_type, id = %entry.entity_id, error = %e, "audit write failed");
        }
    }

    pub fn add_account(&self, user_id: UserId, name: &str, balance: Money) -> WizardResult<Account> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WizardError::Validation("Account name is required".into()));
        }
        if self
            .accounts
            .filter(|a| a.is_owned_by(&user_id) && a.name.eq_ignore_ascii_case(name))?
            .first()
            .is_some()
        {
            return Err(WizardError::Validation(format!(
                "Account '{}' already exists",
                name
            )));
        }

        let account = Account::new(user_id, name, balance);
        self.accounts.insert(account.clone())?;
        self.record(AuditEntry::create(
            EntityType::Account,
            account.id.to_string(),
            Some(account.name.clone()),
            &account,
        ));
        Ok(account)
    }

    pub fn add_goal(&self, user_id: UserId, name: &str, target: Money) -> WizardResult<Goal> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WizardError::Validation("Goal name is required".into()));
        }
        if !target.is_positive() {
            return Err(WizardError::Validation(
                "Goal target must be greater than zero".into(),
            ));
        }

        let goal = Goal::new(user_id, name, target);
        self.goals.insert(goal.clone())?;
        self.record(AuditEntry::create(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.name.clone()),
            &goal,
        ));
        Ok(goal)
    }

    pub fn add_category(&self, user_id: UserId, name: &str, kind: CategoryKind) -> WizardResult<Category> {
        let category = Category::new(user_id, name.trim(), kind);
        self.categories.insert(category.clone())?;
        self.record(AuditEntry::create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        ));
        Ok(category)
    }

    /// Create the default income and expense categories for a user with none
    ///
    /// Returns how many categories were created.
    pub fn seed_default_categories(&self, user_id: UserId) -> WizardResult<usize> {
        if !self.categories_for(&user_id, None)?.is_empty() {
            return Ok(0);
        }

        let mut created = 0;
        for name in DEFAULT_INCOME_CATEGORIES {
            self.add_category(user_id, name, CategoryKind::Income)?;
            created += 1;
        }
        for name in DEFAULT_EXPENSE_CATEGORIES {
            self.add_category(user_id, name, CategoryKind::Expense)?;
            created += 1;
        }
        tracing::info!(user = %user_id, created, "seeded default categories");
        Ok(created)
    }

    pub fn accounts_for(&self, user_id: &UserId) -> WizardResult<Vec<Account>> {
        self.accounts.filter(|a| a.is_owned_by(user_id))
    }

    pub fn goals_for(&self, user_id: &UserId) -> WizardResult<Vec<Goal>> {
        self.goals.filter(|g| g.user_id == *user_id)
    }

    /// Categories of `user_id`, optionally limited to one kind
    pub fn categories_for(&self, user_id: &UserId, kind: Option<CategoryKind>) -> WizardResult<Vec<Category>> {
        self.categories
            .filter(|c| c.user_id == *user_id && kind.map_or(true, |k| c.kind == k))
    }

    pub fn budgets_for(&self, user_id: &UserId) -> WizardResult<Vec<Budget>> {
        self.budgets.filter(|b| b.user_id == *user_id)
    }

    pub fn transactions_for(&self, user_id: &UserId) -> WizardResult<Vec<Transaction>> {
        self.transactions.filter(|t| t.user_id == *user_id)
    }

    /// Listings the executor checks membership against
    pub fn submission_context(&self, user_id: Option<UserId>, today: NaiveDate) -> WizardResult<SubmissionContext> {
        let Some(user) = user_id else {
            return Ok(SubmissionContext {
                user_id: None,
                expense_categories: Vec::new(),
                income_categories: Vec::new(),
                accounts: Vec::new(),
                goals: Vec::new(),
                today,
            });
        };

        Ok(SubmissionContext {
            user_id: Some(user),
            expense_categories: self.categories_for(&user, Some(CategoryKind::Expense))?,
            income_categories: self.categories_for(&user, Some(CategoryKind::Income))?,
            accounts: self.accounts_for(&user)?,
            goals: self.goals_for(&user)?,
            today,
        })
    }

    /// Count an expense against every active budget covering it
    fn charge_budgets(&self, transaction: &Transaction) -> WizardResult<()> {
        let Some(category_id) = transaction.expense_category_id else {
            return Ok(());
        };
        if transaction.kind != TransactionKind::Expense {
            return Ok(());
        }

        let covering = self.budgets.filter(|b| {
            b.user_id == transaction.user_id
                && b.category_id == category_id
                && b.status == BudgetStatus::Active
                && b.covers(transaction.date)
        })?;

        for budget in covering {
            let updated = self.budgets.update(budget.id, |b| {
                b.spent = b.spent.checked_add(transaction.amount).ok_or_else(|| {
                    WizardError::Range(format!("Spending on budget '{}' would overflow", b.name))
                })?;
                b.updated_at = Utc::now();
                Ok(())
            })?;
            if let Some((before, after)) = updated {
                self.record(AuditEntry::update(
                    EntityType::Budget,
                    after.id.to_string(),
                    Some(after.name.clone()),
                    &before,
                    &after,
                ));
            }
        }
        Ok(())
    }

    fn atomic_disabled(what: &str) -> WizardError {
        WizardError::Remote(format!("atomic {} update is disabled", what))
    }
}

impl BudgetBackend for Ledger {
    async fn list_budgets(&self, user_id: &UserId) -> WizardResult<Vec<Budget>> {
        self.budgets_for(user_id)
    }

    async fn create_budget(&self, record: NewBudget, user_id: &UserId) -> WizardResult<Budget> {
        let budget = Budget::from_new(record, *user_id);
        self.budgets.insert(budget.clone())?;
        self.record(AuditEntry::create(
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.name.clone()),
            &budget,
        ));
        Ok(budget)
    }
}

impl TransactionBackend for Ledger {
    async fn create_transaction(&self, record: NewTransaction) -> WizardResult<Transaction> {
        let transaction = Transaction::from_new(record);
        self.transactions.insert(transaction.clone())?;
        self.record(AuditEntry::create(
            EntityType::Transaction,
            transaction.id.to_string(),
            None,
            &transaction,
        ));

        if let Err(e) = self.charge_budgets(&transaction) {
            tracing::warn!(transaction = %transaction.id, error = %e, "could not update budget spending");
        }
        Ok(transaction)
    }
}

impl AccountBackend for Ledger {
    async fn fetch_accounts(&self, user_id: &UserId) -> WizardResult<Vec<Account>> {
        self.accounts_for(user_id)
    }

    async fn validate_ownership(&self, account_id: &AccountId, user_id: &UserId) -> WizardResult<bool> {
        Ok(self
            .accounts
            .get(*account_id)?
            .is_some_and(|a| a.is_owned_by(user_id)))
    }

    async fn adjust_balance_atomic(&self, account_id: &AccountId, delta: Money) -> WizardResult<Money> {
        if !self.atomic_updates {
            return Err(Self::atomic_disabled("balance"));
        }

        let (before, after) = self
            .accounts
            .update(*account_id, |a| {
                a.balance = a.balance.checked_add(delta).ok_or_else(|| {
                    WizardError::Range(format!("Balance of '{}' would overflow", a.name))
                })?;
                a.updated_at = Utc::now();
                Ok(())
            })?
            .ok_or_else(|| WizardError::account_not_found(account_id.to_string()))?;

        self.record(AuditEntry::update(
            EntityType::Account,
            after.id.to_string(),
            Some(after.name.clone()),
            &before,
            &after,
        ));
        Ok(after.balance)
    }

    async fn fetch_account_scoped(
        &self,
        account_id: &AccountId,
        user_id: &UserId,
    ) -> WizardResult<Option<Account>> {
        Ok(self
            .accounts
            .get(*account_id)?
            .filter(|a| a.is_owned_by(user_id)))
    }

    async fn write_balance_scoped(
        &self,
        account_id: &AccountId,
        user_id: &UserId,
        balance: Money,
        updated_at: DateTime<Utc>,
    ) -> WizardResult<Money> {
        let (before, after) = self
            .accounts
            .update(*account_id, |a| {
                if !a.is_owned_by(user_id) {
                    return Err(WizardError::invalid_account(account_id.to_string()));
                }
                a.balance = balance;
                a.updated_at = updated_at;
                Ok(())
            })?
            .ok_or_else(|| WizardError::account_not_found(account_id.to_string()))?;

        self.record(AuditEntry::update(
            EntityType::Account,
            after.id.to_string(),
            Some(after.name.clone()),
            &before,
            &after,
        ));
        Ok(after.balance)
    }
}

impl GoalBackend for Ledger {
    async fn adjust_goal_atomic(&self, goal_id: &GoalId, delta: Money) -> WizardResult<GoalProgress> {
        if !self.atomic_updates {
            return Err(Self::atomic_disabled("goal"));
        }

        let (before, after) = self
            .goals
            .update(*goal_id, |g| {
                g.current_amount = g.current_amount.checked_add(delta).ok_or_else(|| {
                    WizardError::Range(format!("Progress of goal '{}' would overflow", g.name))
                })?;
                g.status = GoalStatus::for_progress(g.current_amount, g.target_amount);
                g.updated_at = Utc::now();
                Ok(())
            })?
            .ok_or_else(|| WizardError::goal_not_found(goal_id.to_string()))?;

        self.record(AuditEntry::update(
            EntityType::Goal,
            after.id.to_string(),
            Some(after.name.clone()),
            &before,
            &after,
        ));
        Ok(GoalProgress {
            goal_id: after.id,
            current_amount: after.current_amount,
            status: after.status,
        })
    }

    async fn fetch_goal_scoped(&self, goal_id: &GoalId, user_id: &UserId) -> WizardResult<Option<Goal>> {
        Ok(self.goals.get(*goal_id)?.filter(|g| g.user_id == *user_id))
    }

    async fn write_goal_scoped(
        &self,
        goal_id: &GoalId,
        user_id: &UserId,
        current_amount: Money,
        status: GoalStatus,
        updated_at: DateTime<Utc>,
    ) -> WizardResult<GoalProgress> {
        let (before, after) = self
            .goals
            .update(*goal_id, |g| {
                if g.user_id != *user_id {
                    return Err(WizardError::invalid_goal(goal_id.to_string()));
                }
                g.current_amount = current_amount;
                g.status = status;
                g.updated_at = updated_at;
                Ok(())
            })?
            .ok_or_else(|| WizardError::goal_not_found(goal_id.to_string()))?;

        self.record(AuditEntry::update(
            EntityType::Goal,
            after.id.to_string(),
            Some(after.name.clone()),
            &before,
            &after,
        ));
        Ok(GoalProgress {
            goal_id: after.id,
            current_amount: after.current_amount,
            status: after.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::BudgetCadence;
    use crate::services::transactions::create_transaction;
    use crate::wizard::draft::TransactionDraft;
    use tempfile::TempDir;

    fn ledger(atomic_updates: bool) -> (TempDir, WizardPaths, Ledger) {
        let temp_dir = TempDir::new().unwrap();
        let paths = WizardPaths::with_base_dir(temp_dir.path().to_path_buf());
        let settings = Settings {
            atomic_updates,
            ..Settings::default()
        };
        let ledger = Ledger::open(&paths, &settings).unwrap();
        (temp_dir, paths, ledger)
    }

    fn expense(account: &Account, category: &Category, amount: Money, date: &str) -> TransactionDraft {
        let mut draft = TransactionDraft::new(NaiveDate::from_ymd_opt(2025, 9, 5).unwrap());
        draft.amount = amount;
        draft.account_id = Some(account.id);
        draft.category_id = Some(category.id);
        draft.date = date.to_string();
        draft
    }

    #[test]
    fn test_seed_default_categories_once() {
        let (_temp_dir, _paths, ledger) = ledger(true);
        let user = UserId::new();

        let created = ledger.seed_default_categories(user).unwrap();
        assert_eq!(
            created,
            DEFAULT_INCOME_CATEGORIES.len() + DEFAULT_EXPENSE_CATEGORIES.len()
        );
        assert_eq!(ledger.seed_default_categories(user).unwrap(), 0);
        assert_eq!(
            ledger
                .categories_for(&user, Some(CategoryKind::Income))
                .unwrap()
                .len(),
            DEFAULT_INCOME_CATEGORIES.len()
        );
    }

    #[test]
    fn test_duplicate_account_name_rejected() {
        let (_temp_dir, _paths, ledger) = ledger(true);
        let user = UserId::new();
        ledger.add_account(user, "Checking", Money::zero()).unwrap();
        assert!(ledger.add_account(user, "checking", Money::zero()).is_err());
        // Another user may reuse the name
        assert!(ledger.add_account(UserId::new(), "Checking", Money::zero()).is_ok());
    }

    #[tokio::test]
    async fn test_scoped_reads_hide_other_users() {
        let (_temp_dir, _paths, ledger) = ledger(true);
        let owner = UserId::new();
        let account = ledger.add_account(owner, "Checking", Money::from_dollars(5)).unwrap();
        let stranger = UserId::new();

        assert!(ledger.validate_ownership(&account.id, &owner).await.unwrap());
        assert!(!ledger.validate_ownership(&account.id, &stranger).await.unwrap());
        assert!(ledger
            .fetch_account_scoped(&account.id, &stranger)
            .await
            .unwrap()
            .is_none());
        assert!(ledger
            .write_balance_scoped(&account.id, &stranger, Money::zero(), Utc::now())
            .await
            .unwrap_err()
            .is_ownership());
    }

    #[tokio::test]
    async fn test_expense_charges_covering_budget() {
        let (_temp_dir, paths, ledger) = ledger(true);
        let user = UserId::new();
        let account = ledger.add_account(user, "Checking", Money::from_dollars(300)).unwrap();
        let groceries = ledger.add_category(user, "Groceries", CategoryKind::Expense).unwrap();

        let record = NewBudget {
            name: "Groceries".into(),
            category_id: groceries.id,
            amount: Money::from_dollars(200),
            spent: Money::zero(),
            period: BudgetCadence::Month,
            start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 9, 30).unwrap(),
            alert_threshold: 0.8,
            status: BudgetStatus::Active,
        };
        ledger.create_budget(record, &user).await.unwrap();

        let inside = expense(&account, &groceries, Money::from_dollars(45), "2025-09-12");
        let outside = expense(&account, &groceries, Money::from_dollars(10), "2025-10-01");
        create_transaction(&ledger, &inside, &user, &[]).await.unwrap();
        create_transaction(&ledger, &outside, &user, &[]).await.unwrap();

        let budget = &ledger.budgets_for(&user).unwrap()[0];
        assert_eq!(budget.spent, Money::from_dollars(45));
        assert_eq!(
            ledger.accounts_for(&user).unwrap()[0].balance,
            Money::from_dollars(245)
        );

        // Everything survives a reopen
        let reopened = Ledger::open(&paths, &Settings::default()).unwrap();
        assert_eq!(reopened.transactions_for(&user).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_disabled_atomic_updates_use_fallback() {
        let (_temp_dir, _paths, ledger) = ledger(false);
        let user = UserId::new();
        let account = ledger.add_account(user, "Savings", Money::from_dollars(100)).unwrap();
        let goal = ledger.add_goal(user, "Bike", Money::from_dollars(60)).unwrap();

        let mut draft = TransactionDraft::new(NaiveDate::from_ymd_opt(2025, 9, 5).unwrap());
        draft.kind = TransactionKind::Contribution;
        draft.amount = Money::from_dollars(60);
        draft.account_id = Some(account.id);
        draft.goal_id = Some(goal.id);

        let receipt = create_transaction(&ledger, &draft, &user, &[goal.clone()])
            .await
            .unwrap();
        assert_eq!(receipt.balance, Money::from_dollars(40));
        assert_eq!(receipt.goal_progress.unwrap().status, GoalStatus::Completed);

        let entries = ledger.audit().read_all().unwrap();
        let updates: Vec<_> = entries
            .iter()
            .filter(|e| e.operation == Operation::Update)
            .map(|e| e.entity_type)
            .collect();
        assert_eq!(updates, vec![EntityType::Account, EntityType::Goal]);
    }

    #[tokio::test]
    async fn test_oversized_amount_is_rejected_before_any_write() {
        let (_temp_dir, _paths, ledger) = ledger(true);
        let user = UserId::new();
        let account = ledger.add_account(user, "Checking", Money::from_dollars(1)).unwrap();
        let salary = ledger.add_category(user, "Salary", CategoryKind::Income).unwrap();

        let mut draft = expense(
            &account,
            &salary,
            Money::parse("92233720368547758.07").unwrap(),
            "2025-09-05",
        );
        draft.kind = TransactionKind::Income;

        let err = create_transaction(&ledger, &draft, &user, &[]).await.unwrap_err();
        assert!(matches!(err, WizardError::Range(_)));
        assert!(ledger.transactions_for(&user).unwrap().is_empty());
        assert_eq!(
            ledger.accounts_for(&user).unwrap()[0].balance,
            Money::from_dollars(1)
        );
    }

    #[tokio::test]
    async fn test_balance_overflow_is_reported_not_wrapped() {
        for atomic_updates in [true, false] {
            let (_temp_dir, _paths, ledger) = ledger(atomic_updates);
            let user = UserId::new();
            let start = Money::from_cents(i64::MAX - 10);
            let account = ledger.add_account(user, "Vault", start).unwrap();
            let salary = ledger.add_category(user, "Salary", CategoryKind::Income).unwrap();

            let mut draft = expense(&account, &salary, Money::from_dollars(1), "2025-09-05");
            draft.kind = TransactionKind::Income;

            let err = create_transaction(&ledger, &draft, &user, &[]).await.unwrap_err();
            assert!(err.is_partially_applied());
            assert!(matches!(err.root_cause(), WizardError::Range(_)));

            // The accounts collection stays usable and unchanged
            assert_eq!(ledger.accounts_for(&user).unwrap()[0].balance, start);
            assert_eq!(ledger.transactions_for(&user).unwrap().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_submission_context_without_user_is_empty() {
        let (_temp_dir, _paths, ledger) = ledger(true);
        let ctx = ledger
            .submission_context(None, NaiveDate::from_ymd_opt(2025, 9, 5).unwrap())
            .unwrap();
        assert!(ctx.user_id.is_none());
        assert!(ctx.accounts.is_empty());
    }
}
