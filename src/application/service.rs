use std::path::PathBuf;

use chrono::NaiveDate;

use crate::domain::{next_id, non_blank, Amount, Expense, ExpenseFilter, ExpenseId};
use crate::storage::{ExpenseStore, LoadFailure, LoadedLedger, Repository, SkippedRow};

use super::{CategorySummary, ExpenseSummary, LedgerError};

/// What happened when the ledger file was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// The file was missing or unusable and has been replaced by an empty table.
    Reinitialized(LoadFailure),
}

/// Field changes for [`LedgerService::update_expense`].
///
/// `None` leaves the field as is. Text fields are trimmed, and a description or
/// category that is blank after trimming counts as not supplied, so an update
/// made only of blank text is rejected with [`LedgerError::NothingToUpdate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseUpdate {
    pub description: Option<String>,
    pub amount: Option<Amount>,
    pub category: Option<String>,
}

/// The ledger store: the ordered expense table held in memory, backed by a
/// store that is rewritten after every change.
pub struct LedgerService<S: ExpenseStore = Repository> {
    store: S,
    expenses: Vec<Expense>,
    skipped: Vec<SkippedRow>,
}

impl LedgerService {
    /// Load the ledger file at `path`. See [`LedgerService::with_store`].
    pub fn open(path: impl Into<PathBuf>) -> Result<(Self, LoadOutcome), LedgerError> {
        Self::with_store(Repository::new(path))
    }
}

impl<S: ExpenseStore> LedgerService<S> {
    /// Load the ledger from `store`.
    ///
    /// A missing, unreadable, empty or wrongly headed table is replaced by a
    /// fresh empty one. Rows that fail to parse are left out and reported by
    /// [`LedgerService::skipped_rows`]; the file itself is not touched until
    /// the next change.
    pub fn with_store(store: S) -> Result<(Self, LoadOutcome), LedgerError> {
        match store.load() {
            Ok(LoadedLedger { expenses, skipped }) => {
                let service = Self {
                    store,
                    expenses,
                    skipped,
                };
                Ok((service, LoadOutcome::Loaded))
            }
            Err(failure) => {
                match &failure {
                    LoadFailure::Missing | LoadFailure::Empty => {
                        tracing::debug!(location = %store.location(), "{}", failure)
                    }
                    _ => tracing::warn!(
                        location = %store.location(),
                        "{}; starting with an empty ledger",
                        failure
                    ),
                }
                store.save(&[])?;
                let service = Self {
                    store,
                    expenses: Vec::new(),
                    skipped: Vec::new(),
                };
                Ok((service, LoadOutcome::Reinitialized(failure)))
            }
        }
    }

    /// Rows left out when the ledger was loaded. They are dropped from the
    /// file by the next change.
    pub fn skipped_rows(&self) -> &[SkippedRow] {
        &self.skipped
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn get_expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    /// Record a new expense dated today.
    pub fn add_expense(
        &mut self,
        description: &str,
        amount: Amount,
        category: Option<&str>,
    ) -> Result<Expense, LedgerError> {
        let expense = Expense::new(self.next_id()?, description, amount).with_category(category);
        self.append(expense)
    }

    /// Record a new expense with an explicit date.
    pub fn add_expense_on(
        &mut self,
        date: NaiveDate,
        description: &str,
        amount: Amount,
        category: Option<&str>,
    ) -> Result<Expense, LedgerError> {
        let expense =
            Expense::dated(self.next_id()?, date, description, amount).with_category(category);
        self.append(expense)
    }

    fn append(&mut self, expense: Expense) -> Result<Expense, LedgerError> {
        self.expenses.push(expense.clone());
        self.save()?;

        tracing::info!(
            id = expense.id,
            description = %expense.description,
            amount = expense.amount,
            "added expense"
        );
        Ok(expense)
    }

    /// Change the given fields of an existing expense.
    ///
    /// Each field is persisted as soon as it is written, so an interrupted
    /// update keeps the fields that were already saved. Blank text counts as
    /// not supplied.
    pub fn update_expense(
        &mut self,
        id: ExpenseId,
        update: ExpenseUpdate,
    ) -> Result<Expense, LedgerError> {
        let index = self.index_of(id)?;

        let description = non_blank(update.description.as_deref());
        let category = non_blank(update.category.as_deref());
        if description.is_none() && update.amount.is_none() && category.is_none() {
            return Err(LedgerError::NothingToUpdate(id));
        }

        if let Some(description) = description {
            self.expenses[index].description = description;
            self.save()?;
        }
        if let Some(amount) = update.amount {
            self.expenses[index].amount = amount;
            self.save()?;
        }
        if let Some(category) = category {
            self.expenses[index].category = category;
            self.save()?;
        }

        tracing::info!(id, "updated expense");
        Ok(self.expenses[index].clone())
    }

    /// Remove an expense. Other IDs are left as they are.
    pub fn delete_expense(&mut self, id: ExpenseId) -> Result<(), LedgerError> {
        let index = self.index_of(id)?;
        self.expenses.remove(index);
        self.save()?;

        tracing::info!(id, "deleted expense");
        Ok(())
    }

    /// Expenses matching the filter, in ledger order.
    pub fn list_expenses(&self, filter: &ExpenseFilter) -> Vec<&Expense> {
        self.expenses.iter().filter(|e| filter.matches(e)).collect()
    }

    /// Total (and per-category breakdown) of the expenses matching the filter.
    pub fn summarize(&self, filter: &ExpenseFilter) -> ExpenseSummary {
        let matching = self.list_expenses(filter);
        let total: Amount = matching.iter().map(|e| e.amount).sum();

        let mut categories: Vec<CategorySummary> = Vec::new();
        for expense in &matching {
            match categories
                .iter_mut()
                .find(|c| expense.in_category(&c.category))
            {
                Some(summary) => {
                    summary.total += expense.amount;
                    summary.count += 1;
                }
                None => categories.push(CategorySummary {
                    category: expense.category.clone(),
                    total: expense.amount,
                    count: 1,
                    percentage: 0.0,
                }),
            }
        }
        for summary in &mut categories {
            summary.percentage = if total != 0.0 {
                summary.total * 100.0 / total
            } else {
                0.0
            };
        }

        ExpenseSummary {
            count: matching.len(),
            total,
            categories,
        }
    }

    fn next_id(&self) -> Result<ExpenseId, LedgerError> {
        next_id(&self.expenses).ok_or(LedgerError::IdsExhausted(ExpenseId::MAX))
    }

    fn index_of(&self, id: ExpenseId) -> Result<usize, LedgerError> {
        self.expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or(LedgerError::ExpenseNotFound(id))
    }

    fn save(&self) -> Result<(), LedgerError> {
        Ok(self.store.save(&self.expenses)?)
    }
}
