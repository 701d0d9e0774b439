use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::domain::{normalize_category, Expense, ExpenseId};

use super::COLUMNS;

/// Why a ledger file could not be loaded as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadFailure {
    Missing,
    Unreadable(String),
    Empty,
    BadHeader(Vec<String>),
}

impl std::fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadFailure::Missing => write!(f, "ledger file does not exist"),
            LoadFailure::Unreadable(e) => write!(f, "ledger file is unreadable: {}", e),
            LoadFailure::Empty => write!(f, "ledger file is empty"),
            LoadFailure::BadHeader(found) => {
                write!(f, "unexpected columns: [{}]", found.join(", "))
            }
        }
    }
}

/// A data row that could not be parsed and was left out of the loaded ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub line: u64,
    pub error: String,
}

impl std::fmt::Display for SkippedRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.error)
    }
}

/// Result of reading a ledger file with a valid header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedLedger {
    pub expenses: Vec<Expense>,
    pub skipped: Vec<SkippedRow>,
}

/// Row as stored on disk, before the date is interpreted.
#[derive(Debug, Deserialize)]
struct StoredRow {
    #[serde(rename = "ID")]
    id: ExpenseId,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Amount")]
    amount: f64,
    #[serde(rename = "Category")]
    category: String,
}

impl StoredRow {
    fn into_expense(self) -> Result<Expense, String> {
        let date = parse_stored_date(&self.date)?;
        Ok(Expense {
            id: self.id,
            date,
            description: self.description.trim().to_string(),
            amount: self.amount,
            category: normalize_category(Some(&self.category)),
        })
    }
}

/// Flat-file repository holding the whole ledger as one CSV table.
///
/// Every save rewrites the complete file. There is no locking: concurrent
/// writers race and the last one wins.
pub struct Repository {
    path: PathBuf,
}

impl Repository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate the ledger file.
    ///
    /// The header must be exactly [`COLUMNS`]. Rows that fail to parse are
    /// logged and returned in [`LoadedLedger::skipped`]; the rest still load. A
    /// header without any data rows counts as empty.
    pub fn load(&self) -> std::result::Result<LoadedLedger, LoadFailure> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(LoadFailure::Missing),
            Err(e) => return Err(LoadFailure::Unreadable(e.to_string())),
        };

        let mut reader = csv::Reader::from_reader(file);
        let headers = reader
            .headers()
            .map_err(|e| LoadFailure::Unreadable(e.to_string()))?
            .clone();

        if headers.is_empty() {
            return Err(LoadFailure::Empty);
        }
        if !headers.iter().eq(COLUMNS.iter().copied()) {
            return Err(LoadFailure::BadHeader(
                headers.iter().map(str::to_string).collect(),
            ));
        }
        let byte_headers = reader
            .byte_headers()
            .map_err(|e| LoadFailure::Unreadable(e.to_string()))?
            .clone();

        let mut ledger = LoadedLedger::default();
        for result in reader.byte_records() {
            let record = match result {
                Ok(record) => record,
                Err(e) if e.is_io_error() => return Err(LoadFailure::Unreadable(e.to_string())),
                Err(e) => {
                    let line = e.position().map_or(0, |p| p.line());
                    ledger.skip(&self.path, line, e.to_string());
                    continue;
                }
            };
            let line = record.position().map_or(0, |p| p.line());

            let parsed = record
                .deserialize::<StoredRow>(Some(&byte_headers))
                .map_err(|e| e.to_string())
                .and_then(StoredRow::into_expense);
            match parsed {
                Ok(expense) => ledger.expenses.push(expense),
                Err(error) => ledger.skip(&self.path, line, error),
            }
        }

        if ledger.expenses.is_empty() && ledger.skipped.is_empty() {
            return Err(LoadFailure::Empty);
        }

        tracing::debug!(
            path = %self.path.display(),
            count = ledger.expenses.len(),
            skipped = ledger.skipped.len(),
            "loaded ledger"
        );
        Ok(ledger)
    }

    /// Rewrite the whole ledger file, header first.
    pub fn save(&self, expenses: &[Expense]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory {}", parent.display())
                })?;
            }
        }

        let file = File::create(&self.path)
            .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
        write_expenses(file, expenses)?;

        tracing::debug!(
            path = %self.path.display(),
            count = expenses.len(),
            "saved ledger"
        );
        Ok(())
    }
}

impl LoadedLedger {
    fn skip(&mut self, path: &Path, line: u64, error: String) {
        tracing::warn!(path = %path.display(), line, "skipping unreadable row: {}", error);
        self.skipped.push(SkippedRow { line, error });
    }
}

/// Write expenses as a CSV table in ledger file layout, header included even
/// when there are no rows.
pub fn write_expenses<'a, W: Write>(
    writer: W,
    expenses: impl IntoIterator<Item = &'a Expense>,
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    writer
        .write_record(COLUMNS)
        .context("Failed to write ledger header")?;
    for expense in expenses {
        writer
            .write_record(&[
                expense.id.to_string(),
                expense.date.format("%Y-%m-%d").to_string(),
                expense.description.clone(),
                expense.amount.to_string(),
                expense.category.clone(),
            ])
            .with_context(|| format!("Failed to write expense {}", expense.id))?;
    }
    writer.flush().context("Failed to flush ledger table")?;
    Ok(())
}

/// Parse a stored date. `YYYY-MM-DD` is what we write; timestamps written by
/// other tools are accepted and truncated to their calendar day.
fn parse_stored_date(s: &str) -> std::result::Result<NaiveDate, String> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }

    Err(format!("invalid date '{}'", s))
}
