use chrono::Datelike;

use super::Expense;

/// Optional predicates narrowing the ledger for listing and summaries.
/// Every field that is set must match (logical AND).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// Case-insensitive exact match on the category.
    pub category: Option<String>,
    /// Calendar month, 1-12.
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl ExpenseFilter {
    pub fn new(category: Option<String>, month: Option<u32>, year: Option<i32>) -> Self {
        Self {
            category,
            month,
            year,
        }
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(category) = &self.category {
            if !expense.in_category(category) {
                return false;
            }
        }
        if let Some(month) = self.month {
            if expense.date.month() != month {
                return false;
            }
        }
        if let Some(year) = self.year {
            if expense.date.year() != year {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn expense(date: &str, category: &str) -> Expense {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        Expense::dated(0, date, "test", 1.0).with_category(Some(category))
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = ExpenseFilter::default();
        assert!(filter.matches(&expense("2024-03-15", "Food")));
    }

    #[test]
    fn test_month_and_year_combine() {
        let filter = ExpenseFilter::new(None, Some(3), Some(2024));

        assert!(filter.matches(&expense("2024-03-01", "Food")));
        assert!(filter.matches(&expense("2024-03-31", "Food")));
        assert!(!filter.matches(&expense("2023-03-15", "Food")));
        assert!(!filter.matches(&expense("2024-04-01", "Food")));
    }

    #[test]
    fn test_month_alone_spans_years() {
        let filter = ExpenseFilter::new(None, Some(12), None);

        assert!(filter.matches(&expense("2022-12-24", "Gifts")));
        assert!(filter.matches(&expense("2024-12-01", "Gifts")));
        assert!(!filter.matches(&expense("2024-11-30", "Gifts")));
    }

    #[test]
    fn test_category_is_case_insensitive_exact() {
        let filter = ExpenseFilter::new(Some("groceries".to_string()), None, None);

        assert!(filter.matches(&expense("2024-01-01", "Groceries")));
        assert!(!filter.matches(&expense("2024-01-01", "Groceries & Home")));
    }

    #[test]
    fn test_all_filters_must_match() {
        let filter = ExpenseFilter::new(Some("Food".to_string()), Some(1), Some(2024));

        assert!(filter.matches(&expense("2024-01-10", "food")));
        assert!(!filter.matches(&expense("2024-01-10", "Travel")));
        assert!(!filter.matches(&expense("2024-02-10", "food")));
    }
}
