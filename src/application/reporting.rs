use serde::Serialize;

use crate::domain::Amount;

#[derive(Debug, Clone, Serialize)]
pub struct ExpenseSummary {
    pub count: usize,
    pub total: Amount,
    /// Per-category totals in order of first appearance.
    pub categories: Vec<CategorySummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub total: Amount,
    pub count: usize,
    pub percentage: f64,
}
