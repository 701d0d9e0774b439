use chrono::{Local, NaiveDate};
use serde::Serialize;

pub type ExpenseId = u64;

/// Category assigned when none is given at creation.
pub const DEFAULT_CATEGORY: &str = "Other";

/// A single expense entry.
///
/// Field order and serialized names match the columns of the ledger file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    #[serde(rename = "ID")]
    pub id: ExpenseId,
    /// Day the expense was recorded. Never changes after creation.
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Description")]
    pub description: String,
    /// Negative amounts are refunds or credits.
    #[serde(rename = "Amount")]
    pub amount: f64,
    #[serde(rename = "Category")]
    pub category: String,
}

impl Expense {
    /// Create an expense dated today (local calendar day).
    pub fn new(id: ExpenseId, description: &str, amount: f64) -> Self {
        Self::dated(id, Local::now().date_naive(), description, amount)
    }

    pub fn dated(id: ExpenseId, date: NaiveDate, description: &str, amount: f64) -> Self {
        Self {
            id,
            date,
            description: description.trim().to_string(),
            amount,
            category: DEFAULT_CATEGORY.to_string(),
        }
    }

    /// Set the category, falling back to [`DEFAULT_CATEGORY`] when blank.
    pub fn with_category(mut self, category: Option<&str>) -> Self {
        self.category = normalize_category(category);
        self
    }

    /// Case-insensitive category comparison.
    pub fn in_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.trim().to_lowercase()
    }
}

/// Trim a category, defaulting to [`DEFAULT_CATEGORY`] for missing or blank input.
pub fn normalize_category(category: Option<&str>) -> String {
    match category.map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => DEFAULT_CATEGORY.to_string(),
    }
}

/// Trim free text, mapping blank input to `None`.
pub fn non_blank(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Next ID to assign: one past the largest existing ID, or 0 for an empty ledger.
/// `None` once the largest ID is `ExpenseId::MAX`.
pub fn next_id<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> Option<ExpenseId> {
    match expenses.into_iter().map(|e| e.id).max() {
        Some(max) => max.checked_add(1),
        None => Some(0),
    }
}
