//! In-memory backend with failure injection, shared by service and wizard tests

use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};

use super::backend::{
    AccountBackend, BudgetBackend, GoalBackend, GoalProgress, TransactionBackend,
};
use super::executor::SubmissionContext;
use crate::error::{WizardError, WizardResult};
use crate::models::{
    Account, AccountId, Budget, BudgetCadence, BudgetStatus, Category, CategoryKind, Goal,
    GoalId, GoalStatus, Money, NewBudget, NewTransaction, Transaction, UserId,
};
use crate::wizard::draft::TransactionDraft;

/// One user with an account, two categories and a goal
pub struct Scenario {
    pub user: UserId,
    pub today: NaiveDate,
    pub account: Account,
    pub expense_category: Category,
    pub income_category: Category,
    pub goal: Goal,
}

impl Scenario {
    pub fn new(balance: Money) -> Self {
        let user = UserId::new();
        Self {
            user,
            today: NaiveDate::from_ymd_opt(2025, 8, 20).unwrap(),
            account: Account::new(user, "Checking", balance),
            expense_category: Category::new(user, "Groceries", CategoryKind::Expense),
            income_category: Category::new(user, "Salary", CategoryKind::Income),
            goal: Goal::new(user, "Emergency fund", Money::from_dollars(1500)),
        }
    }

    /// A valid expense against the scenario's account and expense category
    pub fn expense_draft(&self, amount: Money) -> TransactionDraft {
        let mut draft = TransactionDraft::new(self.today);
        draft.amount = amount;
        draft.account_id = Some(self.account.id);
        draft.category_id = Some(self.expense_category.id);
        draft.description = "Weekly shop".into();
        draft
    }

    pub fn context(&self) -> SubmissionContext {
        SubmissionContext {
            user_id: Some(self.user),
            expense_categories: vec![self.expense_category.clone()],
            income_categories: vec![self.income_category.clone()],
            accounts: vec![self.account.clone()],
            goals: vec![self.goal.clone()],
            today: self.today,
        }
    }
}

#[derive(Default)]
struct Inner {
    accounts: Vec<Account>,
    goals: Vec<Goal>,
    budgets: Vec<Budget>,
    transactions: Vec<Transaction>,
    fail_atomic: bool,
    fail_goals: bool,
    fail_transaction_creates: bool,
    fail_budget_creates: bool,
    drain_after_precheck: Option<(AccountId, Money)>,
    atomic_attempts: usize,
    remote_calls: usize,
}

#[derive(Default)]
pub struct MockBackend {
    inner: Mutex<Inner>,
}

impl MockBackend {
    pub fn from_scenario(scenario: &Scenario) -> Self {
        let backend = Self::default();
        {
            let mut inner = backend.inner.lock().unwrap();
            inner.accounts.push(scenario.account.clone());
            inner.goals.push(scenario.goal.clone());
        }
        backend
    }

    pub fn seed_budget(&self, scenario: &Scenario, name: &str) {
        let record = NewBudget {
            name: name.to_string(),
            category_id: scenario.expense_category.id,
            amount: Money::from_dollars(100),
            spent: Money::zero(),
            period: BudgetCadence::Month,
            start_date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
            alert_threshold: 0.8,
            status: BudgetStatus::Active,
        };
        let budget = Budget::from_new(record, scenario.user);
        self.inner.lock().unwrap().budgets.push(budget);
    }

    pub fn fail_atomic_updates(&self) {
        self.inner.lock().unwrap().fail_atomic = true;
    }

    /// Make both goal update paths fail
    pub fn fail_goal_updates(&self) {
        self.inner.lock().unwrap().fail_goals = true;
    }

    pub fn fail_transaction_creates(&self) {
        self.inner.lock().unwrap().fail_transaction_creates = true;
    }

    pub fn fail_budget_creates(&self) {
        self.inner.lock().unwrap().fail_budget_creates = true;
    }

    /// Set the balance to `balance` right after the next account listing
    pub fn drain_balance_after_precheck(&self, account_id: &AccountId, balance: Money) {
        self.inner.lock().unwrap().drain_after_precheck = Some((*account_id, balance));
    }

    pub fn budgets(&self) -> Vec<Budget> {
        self.inner.lock().unwrap().budgets.clone()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.inner.lock().unwrap().transactions.clone()
    }

    pub fn balance(&self, account_id: &AccountId) -> Money {
        let inner = self.inner.lock().unwrap();
        inner
            .accounts
            .iter()
            .find(|a| a.id == *account_id)
            .map(|a| a.balance)
            .unwrap()
    }

    pub fn goal(&self, goal_id: &GoalId) -> Goal {
        let inner = self.inner.lock().unwrap();
        inner.goals.iter().find(|g| g.id == *goal_id).cloned().unwrap()
    }

    pub fn atomic_attempts(&self) -> usize {
        self.inner.lock().unwrap().atomic_attempts
    }

    pub fn remote_calls(&self) -> usize {
        self.inner.lock().unwrap().remote_calls
    }

    fn call(&self) -> std::sync::MutexGuard<'_, Inner> {
        let mut inner = self.inner.lock().unwrap();
        inner.remote_calls += 1;
        inner
    }
}

impl BudgetBackend for MockBackend {
    async fn list_budgets(&self, user_id: &UserId) -> WizardResult<Vec<Budget>> {
        let inner = self.call();
        Ok(inner
            .budgets
            .iter()
            .filter(|b| b.user_id == *user_id)
            .cloned()
            .collect())
    }

    async fn create_budget(&self, record: NewBudget, user_id: &UserId) -> WizardResult<Budget> {
        let mut inner = self.call();
        if inner.fail_budget_creates {
            return Err(WizardError::Remote("budget insert rejected".into()));
        }
        let budget = Budget::from_new(record, *user_id);
        inner.budgets.push(budget.clone());
        Ok(budget)
    }
}

impl TransactionBackend for MockBackend {
    async fn create_transaction(&self, record: NewTransaction) -> WizardResult<Transaction> {
        let mut inner = self.call();
        if inner.fail_transaction_creates {
            return Err(WizardError::Remote("transaction insert rejected".into()));
        }
        let transaction = Transaction::from_new(record);
        inner.transactions.push(transaction.clone());
        Ok(transaction)
    }
}

impl AccountBackend for MockBackend {
    async fn fetch_accounts(&self, user_id: &UserId) -> WizardResult<Vec<Account>> {
        let mut inner = self.call();
        let accounts: Vec<Account> = inner
            .accounts
            .iter()
            .filter(|a| a.user_id == *user_id)
            .cloned()
            .collect();

        if let Some((account_id, balance)) = inner.drain_after_precheck.take() {
            if let Some(account) = inner.accounts.iter_mut().find(|a| a.id == account_id) {
                account.balance = balance;
            }
        }
        Ok(accounts)
    }

    async fn validate_ownership(&self, account_id: &AccountId, user_id: &UserId) -> WizardResult<bool> {
        let inner = self.call();
        Ok(inner
            .accounts
            .iter()
            .any(|a| a.id == *account_id && a.user_id == *user_id))
    }

    async fn adjust_balance_atomic(&self, account_id: &AccountId, delta: Money) -> WizardResult<Money> {
        let mut inner = self.call();
        inner.atomic_attempts += 1;
        if inner.fail_atomic {
            return Err(WizardError::Remote("adjust_balance unavailable".into()));
        }
        let account = inner
            .accounts
            .iter_mut()
            .find(|a| a.id == *account_id)
            .ok_or_else(|| WizardError::account_not_found(account_id.to_string()))?;
        account.balance += delta;
        Ok(account.balance)
    }

    async fn fetch_account_scoped(
        &self,
        account_id: &AccountId,
        user_id: &UserId,
    ) -> WizardResult<Option<Account>> {
        let inner = self.call();
        Ok(inner
            .accounts
            .iter()
            .find(|a| a.id == *account_id && a.user_id == *user_id)
            .cloned())
    }

    async fn write_balance_scoped(
        &self,
        account_id: &AccountId,
        user_id: &UserId,
        balance: Money,
        updated_at: DateTime<Utc>,
    ) -> WizardResult<Money> {
        let mut inner = self.call();
        let account = inner
            .accounts
            .iter_mut()
            .find(|a| a.id == *account_id && a.user_id == *user_id)
            .ok_or_else(|| WizardError::account_not_found(account_id.to_string()))?;
        account.balance = balance;
        account.updated_at = updated_at;
        Ok(balance)
    }
}

impl GoalBackend for MockBackend {
    async fn adjust_goal_atomic(&self, goal_id: &GoalId, delta: Money) -> WizardResult<GoalProgress> {
        let mut inner = self.call();
        inner.atomic_attempts += 1;
        if inner.fail_atomic || inner.fail_goals {
            return Err(WizardError::Remote("adjust_goal unavailable".into()));
        }
        let goal = inner
            .goals
            .iter_mut()
            .find(|g| g.id == *goal_id)
            .ok_or_else(|| WizardError::goal_not_found(goal_id.to_string()))?;
        goal.current_amount += delta;
        goal.status = GoalStatus::for_progress(goal.current_amount, goal.target_amount);
        Ok(GoalProgress {
            goal_id: goal.id,
            current_amount: goal.current_amount,
            status: goal.status,
        })
    }

    async fn fetch_goal_scoped(&self, goal_id: &GoalId, user_id: &UserId) -> WizardResult<Option<Goal>> {
        let inner = self.call();
        if inner.fail_goals {
            return Err(WizardError::Remote("goal lookup unavailable".into()));
        }
        Ok(inner
            .goals
            .iter()
            .find(|g| g.id == *goal_id && g.user_id == *user_id)
            .cloned())
    }

    async fn write_goal_scoped(
        &self,
        goal_id: &GoalId,
        user_id: &UserId,
        current_amount: Money,
        status: GoalStatus,
        updated_at: DateTime<Utc>,
    ) -> WizardResult<GoalProgress> {
        let mut inner = self.call();
        let goal = inner
            .goals
            .iter_mut()
            .find(|g| g.id == *goal_id && g.user_id == *user_id)
            .ok_or_else(|| WizardError::goal_not_found(goal_id.to_string()))?;
        goal.current_amount = current_amount;
        goal.status = status;
        goal.updated_at = updated_at;
        Ok(GoalProgress {
            goal_id: goal.id,
            current_amount,
            status,
        })
    }
}
