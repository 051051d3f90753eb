//! Draft store for in-progress wizard state
//!
//! Each logical piece of wizard state lives under its own key so a damaged
//! entry only loses that piece. Callers use the tolerant `save`/`load`/
//! `clear_all` methods, which log failures and carry on; a broken draft store
//! must never stop the user from finishing the wizard.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::file_io::{read_json, remove_if_exists, write_json_atomic};
use crate::error::{WizardError, WizardResult};

/// Keys used by the wizard, one per logical field
pub mod keys {
    pub const MODAL_STATE: &str = "budget_wizard.modal_state";
    pub const WORKFLOW_CHOICE: &str = "budget_wizard.workflow_choice";
    pub const BUDGET_DRAFT: &str = "budget_wizard.budget_draft";
    pub const TRANSACTION_DRAFT: &str = "budget_wizard.transaction_draft";
    pub const CURRENT_STEP: &str = "budget_wizard.current_step";

    pub const ALL: [&str; 5] = [
        MODAL_STATE,
        WORKFLOW_CHOICE,
        BUDGET_DRAFT,
        TRANSACTION_DRAFT,
        CURRENT_STEP,
    ];
}

/// Key/value persistence of wizard drafts
pub trait DraftStore {
    /// Store a raw value under `key`
    fn write_entry(&mut self, key: &str, value: Value) -> WizardResult<()>;

    /// Fetch the raw value under `key`
    fn read_entry(&self, key: &str) -> WizardResult<Option<Value>>;

    /// Drop every entry
    fn remove_all(&mut self) -> WizardResult<()>;

    /// Serialize and store `value`; failures are logged, never returned
    fn save<T: Serialize>(&mut self, key: &str, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "could not serialize draft entry");
                return;
            }
        };
        if let Err(e) = self.write_entry(key, value) {
            tracing::warn!(key, error = %e, "could not save draft entry");
        }
    }

    /// Load the value under `key`, or `default` when missing or unreadable
    fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.read_entry(key) {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!(key, error = %e, "discarding unreadable draft entry");
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                tracing::warn!(key, error = %e, "could not load draft entry");
                default
            }
        }
    }

    /// Remove all drafts; failures are logged
    fn clear_all(&mut self) {
        if let Err(e) = self.remove_all() {
            tracing::warn!(error = %e, "could not clear draft store");
        }
    }
}

/// Draft store backed by a single JSON file
pub struct JsonDraftStore {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl JsonDraftStore {
    /// Open the store at `path`; an unreadable file starts empty
    pub fn open(path: PathBuf) -> Self {
        let entries = match read_json::<BTreeMap<String, Value>, _>(&path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "starting with empty draft store");
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DraftStore for JsonDraftStore {
    fn write_entry(&mut self, key: &str, value: Value) -> WizardResult<()> {
        self.entries.insert(key.to_string(), value);
        write_json_atomic(&self.path, &self.entries)
    }

    fn read_entry(&self, key: &str) -> WizardResult<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn remove_all(&mut self) -> WizardResult<()> {
        self.entries.clear();
        remove_if_exists(&self.path)
    }
}

/// In-memory draft store
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    entries: HashMap<String, Value>,
    reject_writes: bool,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail, for exercising the tolerant paths
    pub fn rejecting_writes() -> Self {
        Self {
            entries: HashMap::new(),
            reject_writes: true,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl DraftStore for MemoryDraftStore {
    fn write_entry(&mut self, key: &str, value: Value) -> WizardResult<()> {
        if self.reject_writes {
            return Err(WizardError::Storage("draft store is read-only".into()));
        }
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn read_entry(&self, key: &str) -> WizardResult<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn remove_all(&mut self) -> WizardResult<()> {
        self.entries.clear();
        Ok(())
    }
}
