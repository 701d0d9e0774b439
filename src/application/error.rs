use thiserror::Error;

use crate::domain::ExpenseId;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("No expense found at ID: {0}")]
    ExpenseNotFound(ExpenseId),

    #[error("Please provide the description and/or the amount and/or the category.")]
    NothingToUpdate(ExpenseId),

    #[error("Cannot add an expense: ID {0} is already the largest possible ID.")]
    IdsExhausted(ExpenseId),

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl LedgerError {
    /// Not-found, empty updates and exhausted IDs leave the ledger untouched
    /// and are shown as warnings; storage failures are fatal.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, LedgerError::Storage(_))
    }
}
