//! Generic JSON-file collection
//!
//! Each ledger collection is one JSON array on disk, loaded whole into memory
//! and written back atomically after every change.

use std::hash::Hash;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{de::DeserializeOwned, Serialize};

use super::file_io::{read_json, write_json_atomic};
use crate::error::{WizardError, WizardResult};
use crate::models::{
    Account, AccountId, Budget, BudgetId, Category, CategoryId, Goal, GoalId, Transaction,
    TransactionId,
};

/// A record stored in a collection
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Eq + Hash + std::fmt::Display;

    fn id(&self) -> Self::Id;
}

macro_rules! impl_record {
    ($ty:ty, $id:ty) => {
        impl Record for $ty {
            type Id = $id;

            fn id(&self) -> $id {
                self.id
            }
        }
    };
}

impl_record!(Account, AccountId);
impl_record!(Budget, BudgetId);
impl_record!(Category, CategoryId);
impl_record!(Goal, GoalId);
impl_record!(Transaction, TransactionId);

/// Records of one type, kept in insertion order
pub struct Collection<T: Record> {
    path: PathBuf,
    data: RwLock<Vec<T>>,
}

impl<T: Record> Collection<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Replace the in-memory records with what is on disk
    pub fn load(&self) -> WizardResult<()> {
        let records: Vec<T> = read_json(&self.path)?;
        let mut data = self.data.write().map_err(|e| {
            WizardError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *data = records;
        Ok(())
    }

    fn save_locked(&self, data: &[T]) -> WizardResult<()> {
        write_json_atomic(&self.path, &data)
    }

    pub fn get(&self, id: T::Id) -> WizardResult<Option<T>> {
        let data = self.data.read().map_err(|e| {
            WizardError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.iter().find(|r| r.id() == id).cloned())
    }

    /// All records matching `pred`
    pub fn filter<F>(&self, pred: F) -> WizardResult<Vec<T>>
    where
        F: Fn(&T) -> bool,
    {
        let data = self.data.read().map_err(|e| {
            WizardError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.iter().filter(|r| pred(r)).cloned().collect())
    }

    pub fn len(&self) -> WizardResult<usize> {
        let data = self.data.read().map_err(|e| {
            WizardError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.len())
    }

    pub fn is_empty(&self) -> WizardResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Append `record` and write the file
    pub fn insert(&self, record: T) -> WizardResult<()> {
        let mut data = self.data.write().map_err(|e| {
            WizardError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        data.push(record);
        if let Err(e) = self.save_locked(&data) {
            data.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Modify the record with `id` in place and write the file
    ///
    /// `f` may refuse the change by returning an error, in which case nothing
    /// is written. Returns the record before and after, or `None` when no
    /// record has that id.
    pub fn update<F>(&self, id: T::Id, f: F) -> WizardResult<Option<(T, T)>>
    where
        F: FnOnce(&mut T) -> WizardResult<()>,
    {
        let mut data = self.data.write().map_err(|e| {
            WizardError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let Some(index) = data.iter().position(|r| r.id() == id) else {
            return Ok(None);
        };

        let before = data[index].clone();
        if let Err(e) = f(&mut data[index]) {
            data[index] = before;
            return Err(e);
        }
        let after = data[index].clone();

        if let Err(e) = self.save_locked(&data) {
            data[index] = before;
            return Err(e);
        }
        Ok(Some((before, after)))
    }
}
