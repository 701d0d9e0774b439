// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use expense_tracker::application::LedgerService;
use tempfile::TempDir;

/// Helper to create a test service backed by a ledger file in a temporary directory
pub fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let (service, _) = LedgerService::open(ledger_path(&temp_dir))?;
    Ok((service, temp_dir))
}

/// Path of the ledger file inside a test directory
pub fn ledger_path(dir: &TempDir) -> PathBuf {
    dir.path().join("expenses.csv")
}

/// Helper to parse a date string into a NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Test fixture: a small ledger spread over two years
pub struct SampleExpenses;

impl SampleExpenses {
    /// IDs 0..=5, in this order:
    /// 0 Coffee      4.50  Other     2024-03-02
    /// 1 Rent     1200.00  Housing   2024-03-01
    /// 2 Groceries  82.13  Food      2024-03-15
    /// 3 Dinner     45.00  food      2024-04-02
    /// 4 Refund    -20.00  Food      2023-03-20
    /// 5 Rent     1150.00  Housing   2023-12-01
    pub fn create(service: &mut LedgerService) -> Result<()> {
        service.add_expense_on(parse_date("2024-03-02"), "Coffee", 4.50, None)?;
        service.add_expense_on(parse_date("2024-03-01"), "Rent", 1200.0, Some("Housing"))?;
        service.add_expense_on(parse_date("2024-03-15"), "Groceries", 82.13, Some("Food"))?;
        service.add_expense_on(parse_date("2024-04-02"), "Dinner", 45.0, Some("food"))?;
        service.add_expense_on(parse_date("2023-03-20"), "Refund", -20.0, Some("Food"))?;
        service.add_expense_on(parse_date("2023-12-01"), "Rent", 1150.0, Some("Housing"))?;
        Ok(())
    }
}
