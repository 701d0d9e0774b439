use anyhow::Result;

use crate::domain::Expense;

use super::{LoadFailure, LoadedLedger, Repository};

/// Persistence boundary for the expense table: read it whole, write it whole.
pub trait ExpenseStore {
    fn load(&self) -> std::result::Result<LoadedLedger, LoadFailure>;

    fn save(&self, expenses: &[Expense]) -> Result<()>;

    /// Where the table lives, for log lines.
    fn location(&self) -> String;
}

impl ExpenseStore for Repository {
    fn load(&self) -> std::result::Result<LoadedLedger, LoadFailure> {
        Repository::load(self)
    }

    fn save(&self, expenses: &[Expense]) -> Result<()> {
        Repository::save(self, expenses)
    }

    fn location(&self) -> String {
        self.path().display().to_string()
    }
}
