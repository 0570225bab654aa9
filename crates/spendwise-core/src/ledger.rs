//! Ledger snapshot and the shared in-memory store

use std::path::Path;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::import::{load_transactions, FileFormat};
use crate::models::{Budget, Transaction};

/// Expenses, income and budgets for one user
///
/// Amounts are unsigned. Use [`Ledger::from_signed`] for data where the
/// sign carries the direction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub expenses: Vec<Transaction>,
    #[serde(default)]
    pub income: Vec<Transaction>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
}

impl Ledger {
    pub fn new(expenses: Vec<Transaction>, income: Vec<Transaction>, budgets: Vec<Budget>) -> Self {
        Self {
            expenses,
            income,
            budgets,
        }
    }

    /// Split signed transactions: positive amounts are income, negative
    /// amounts are expenses (stored as their absolute value)
    pub fn from_signed(transactions: Vec<Transaction>) -> Result<Self> {
        let mut ledger = Self::default();
        for mut tx in transactions {
            if tx.amount > 0.0 {
                ledger.income.push(tx);
            } else if tx.amount < 0.0 {
                tx.amount = tx.amount.abs();
                ledger.expenses.push(tx);
            } else {
                return Err(Error::InvalidData(format!(
                    "transaction '{}' has a zero amount",
                    tx.name
                )));
            }
        }
        Ok(ledger)
    }

    /// Check every record; the first problem is returned
    pub fn validate(&self) -> Result<()> {
        validate_transactions(&self.expenses)?;
        validate_transactions(&self.income)?;
        for budget in &self.budgets {
            budget.validate()?;
        }
        Ok(())
    }

    /// Load a ledger file
    ///
    /// A JSON object is read as a full ledger. A CSV file or JSON array is a
    /// transaction list: expenses with positive amounts, or a mix of income
    /// and expenses when `signed` is set.
    pub fn load(path: &Path, signed: bool) -> Result<Self> {
        let ledger = if FileFormat::from_path(path)? == FileFormat::Json && is_json_object(path)? {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        } else {
            let transactions = load_transactions(path)?;
            if signed {
                Self::from_signed(transactions)?
            } else {
                Self::new(transactions, vec![], vec![])
            }
        };

        ledger.validate()?;
        debug!(
            path = %path.display(),
            expenses = ledger.expenses.len(),
            income = ledger.income.len(),
            budgets = ledger.budgets.len(),
            "Loaded ledger"
        );
        Ok(ledger)
    }
}

pub fn validate_transactions(transactions: &[Transaction]) -> Result<()> {
    transactions.iter().try_for_each(Transaction::validate)
}

fn is_json_object(path: &Path) -> Result<bool> {
    let content = std::fs::read_to_string(path)?;
    Ok(content.trim_start().starts_with('{'))
}

/// Thread-safe in-memory ledger shared by request handlers
///
/// Cloning the store clones the handle, not the data. Analytics work on a
/// [`LedgerStore::snapshot`] so a request never sees a half-applied write.
#[derive(Debug, Clone, Default)]
pub struct LedgerStore {
    inner: Arc<RwLock<Ledger>>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with an existing ledger
    pub fn with_ledger(mut ledger: Ledger) -> Result<Self> {
        ledger.validate()?;
        for tx in ledger.expenses.iter_mut().chain(ledger.income.iter_mut()) {
            ensure_id(&mut tx.id);
        }
        for budget in ledger.budgets.iter_mut() {
            ensure_id(&mut budget.id);
        }
        info!(
            expenses = ledger.expenses.len(),
            income = ledger.income.len(),
            budgets = ledger.budgets.len(),
            "Ledger store seeded"
        );
        Ok(Self {
            inner: Arc::new(RwLock::new(ledger)),
        })
    }

    /// Copy of the current ledger
    pub fn snapshot(&self) -> Result<Ledger> {
        Ok(self.read()?.clone())
    }

    pub fn expenses(&self) -> Result<Vec<Transaction>> {
        Ok(self.read()?.expenses.clone())
    }

    pub fn income(&self) -> Result<Vec<Transaction>> {
        Ok(self.read()?.income.clone())
    }

    pub fn budgets(&self) -> Result<Vec<Budget>> {
        Ok(self.read()?.budgets.clone())
    }

    /// Validate and store an expense, assigning an id when missing
    pub fn add_expense(&self, mut tx: Transaction) -> Result<Transaction> {
        tx.validate()?;
        ensure_id(&mut tx.id);
        let mut ledger = self.write()?;
        if ledger.expenses.iter().any(|e| e.id == tx.id) {
            return Err(Error::Conflict(format!("expense {} already exists", tx.id)));
        }
        ledger.expenses.push(tx.clone());
        Ok(tx)
    }

    pub fn add_income(&self, mut tx: Transaction) -> Result<Transaction> {
        tx.validate()?;
        ensure_id(&mut tx.id);
        let mut ledger = self.write()?;
        if ledger.income.iter().any(|e| e.id == tx.id) {
            return Err(Error::Conflict(format!("income {} already exists", tx.id)));
        }
        ledger.income.push(tx.clone());
        Ok(tx)
    }

    /// Store a budget. Only one budget per category is allowed.
    pub fn add_budget(&self, mut budget: Budget) -> Result<Budget> {
        budget.validate()?;
        ensure_id(&mut budget.id);
        let mut ledger = self.write()?;
        if ledger
            .budgets
            .iter()
            .any(|b| b.category.eq_ignore_ascii_case(&budget.category))
        {
            return Err(Error::Conflict(format!(
                "a budget for {} already exists",
                budget.category
            )));
        }
        ledger.budgets.push(budget.clone());
        Ok(budget)
    }

    pub fn remove_expense(&self, id: &str) -> Result<Transaction> {
        remove_by(&mut self.write()?.expenses, |t| t.id == id)
            .ok_or_else(|| Error::NotFound(format!("expense {}", id)))
    }

    pub fn remove_income(&self, id: &str) -> Result<Transaction> {
        remove_by(&mut self.write()?.income, |t| t.id == id)
            .ok_or_else(|| Error::NotFound(format!("income {}", id)))
    }

    pub fn remove_budget(&self, id: &str) -> Result<Budget> {
        remove_by(&mut self.write()?.budgets, |b| b.id == id)
            .ok_or_else(|| Error::NotFound(format!("budget {}", id)))
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Ledger>> {
        self.inner
            .read()
            .map_err(|_| Error::InvalidData("Failed to acquire ledger lock".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Ledger>> {
        self.inner
            .write()
            .map_err(|_| Error::InvalidData("Failed to acquire ledger lock".into()))
    }
}

fn ensure_id(id: &mut String) {
    if id.trim().is_empty() {
        *id = Uuid::new_v4().to_string();
    }
}

fn remove_by<T>(items: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> Option<T> {
    let index = items.iter().position(pred)?;
    Some(items.remove(index))
}
