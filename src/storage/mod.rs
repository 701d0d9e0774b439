mod repository;
mod store;

pub use repository::*;
pub use store::ExpenseStore;

/// Column header of the ledger file, in order.
pub const COLUMNS: [&str; 5] = ["ID", "Date", "Description", "Amount", "Category"];

/// Ledger file used when no path is given, relative to the working directory.
pub const DEFAULT_LEDGER_FILE: &str = "expenses.csv";
