//! The expense collection and the storage it is persisted to.
//!
//! The whole collection is written under a single key after every mutation.
pub mod disk;
pub mod memory;

use crate::core::expense::{Expense, NewExpense, validate_amount};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, warn};

pub use disk::DiskStorage;
pub use memory::MemoryStorage;

/// Key the serialized collection is stored under.
pub const STORAGE_KEY: &str = "spendwise_expenses";

/// A key-value backend holding serialized collections.
pub trait ExpenseStorage: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn write(&self, key: &str, value: &[u8]) -> Result<()>;
}

impl<T: ExpenseStorage + ?Sized> ExpenseStorage for std::sync::Arc<T> {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).write(key, value)
    }
}

/// Owned, ordered collection of expenses, newest first.
pub struct ExpenseStore<S: ExpenseStorage> {
    storage: S,
    expenses: Vec<Expense>,
}

impl<S: ExpenseStorage> ExpenseStore<S> {
    /// Loads the persisted collection. Missing or unreadable data yields an
    /// empty store rather than an error.
    pub fn load(storage: S) -> Self {
        let expenses = match storage.read(STORAGE_KEY) {
            Ok(Some(bytes)) => match serde_json::from_slice::<Vec<Expense>>(&bytes) {
                Ok(expenses) => {
                    let expenses = retain_valid(expenses);
                    debug!("Loaded {} expenses", expenses.len());
                    expenses
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse saved expenses, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!("No saved expenses found");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Failed to read saved expenses, starting empty");
                Vec::new()
            }
        };
        Self { storage, expenses }
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    pub fn add(&mut self, input: NewExpense) -> Result<Expense> {
        self.add_at(input, Utc::now())
    }

    /// Adds a record created at `now` to the front of the collection.
    pub fn add_at(&mut self, input: NewExpense, now: DateTime<Utc>) -> Result<Expense> {
        let expense = Expense::create(input, now);
        debug!(id = %expense.id, amount = expense.amount, "Adding expense");
        let mut expenses = Vec::with_capacity(self.expenses.len() + 1);
        expenses.push(expense.clone());
        expenses.extend(self.expenses.iter().cloned());
        self.commit(expenses)?;
        Ok(expense)
    }

    /// Removes the record with `id`. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let expenses: Vec<Expense> = self
            .expenses
            .iter()
            .filter(|e| e.id != id)
            .cloned()
            .collect();
        let removed = expenses.len() != self.expenses.len();
        self.commit(expenses)?;
        if removed {
            debug!(%id, "Deleted expense");
        } else {
            debug!(%id, "No expense to delete");
        }
        Ok(removed)
    }

    pub fn clear(&mut self) -> Result<()> {
        debug!("Clearing {} expenses", self.expenses.len());
        self.commit(Vec::new())
    }

    /// Writes `expenses` and only then replaces the in-memory collection, so
    /// a failed write leaves the store as it was.
    fn commit(&mut self, expenses: Vec<Expense>) -> Result<()> {
        let bytes = serde_json::to_vec(&expenses).context("Failed to serialize expenses")?;
        self.storage
            .write(STORAGE_KEY, &bytes)
            .context("Failed to save expenses")?;
        self.expenses = expenses;
        Ok(())
    }
}

/// Drops records with an invalid amount and every repeat of an id already
/// seen, keeping the first occurrence.
fn retain_valid(expenses: Vec<Expense>) -> Vec<Expense> {
    let mut seen = HashSet::new();
    expenses
        .into_iter()
        .filter(|e| {
            if let Err(err) = validate_amount(e.amount) {
                warn!(id = %e.id, error = %err, "Dropping saved expense with invalid amount");
                return false;
            }
            if !seen.insert(e.id.clone()) {
                warn!(id = %e.id, "Dropping saved expense with duplicate id");
                return false;
            }
            true
        })
        .collect()
}
