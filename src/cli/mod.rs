use std::io::stdout;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use crate::application::{
    ExpenseSummary, ExpenseUpdate, LedgerError, LedgerService, LoadOutcome, Message, Severity,
};
use crate::domain::{format_amount, parse_amount, Expense, ExpenseFilter, ExpenseId};
use crate::storage::{write_expenses, DEFAULT_LEDGER_FILE};

pub const HELP_MESSAGE: &str = r#"
Commands:
  add --description "Description" --amount <amount>           > Add a new expense
      [--category "Category"]
  update <id> [--description "Description"] [--amount <amount>]
      [--category "Category"]                                 > Update the expense
  delete <id>                                                 > Delete the expense
  list                                                        > List all expenses
  list [--category <name>] [--month <1-12>] [--year <year>]   > Filter by date/category
  summary [--month <1-12>] [--year <year>] [--category <name>]
      [--by-category]                                         > Sum by date/category
  help                                                        > Show this message
"#;

/// Expense Tracker - personal expenses in a local CSV file
#[derive(Parser)]
#[command(name = "expense-tracker")]
#[command(about = "Record, edit, list and summarize personal expenses")]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Ledger file path
    #[arg(short, long, global = true, default_value = DEFAULT_LEDGER_FILE)]
    pub file: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new expense
    Add {
        /// Description of the expense
        #[arg(short, long)]
        description: String,

        /// Amount of the expense (negative for refunds)
        #[arg(short, long, value_parser = parse_amount, allow_negative_numbers = true)]
        amount: f64,

        /// Category of the expense (defaults to "Other")
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Update the description, amount or category of an expense
    Update {
        /// ID of the expense to update
        id: ExpenseId,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New amount
        #[arg(short, long, value_parser = parse_amount, allow_negative_numbers = true)]
        amount: Option<f64>,

        /// New category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// ID of the expense to delete
        id: ExpenseId,
    },

    /// List expenses
    List {
        /// Filter by category (case-insensitive)
        #[arg(short, long)]
        category: Option<String>,

        /// Filter by month (1-12)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Filter by year
        #[arg(short, long)]
        year: Option<i32>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Sum of expenses, optionally filtered
    Summary {
        /// Only expenses in this month (1-12)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Only expenses in this year
        #[arg(short, long)]
        year: Option<i32>,

        /// Only expenses in this category (case-insensitive)
        #[arg(short, long)]
        category: Option<String>,

        /// Break the total down by category
        #[arg(long)]
        by_category: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show the command reference
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl Commands {
    /// Format of the command's own output. Commands without `--format` print tables.
    pub fn output_format(&self) -> OutputFormat {
        match self {
            Commands::List { format, .. } | Commands::Summary { format, .. } => *format,
            _ => OutputFormat::Table,
        }
    }
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let (mut service, outcome) = LedgerService::open(&self.file)?;
        let format = self.command.output_format();

        // A fresh ledger gets the command reference once. The help command
        // prints it anyway.
        if outcome != LoadOutcome::Loaded && !matches!(self.command, Commands::Help) {
            if format == OutputFormat::Table {
                print_help();
            } else {
                eprintln!("{}", HELP_MESSAGE);
            }
        }
        for row in service.skipped_rows() {
            notify(
                &Message::warning(format!("Skipped unreadable row at {}", row)),
                format,
            );
        }

        match self.command {
            Commands::Add {
                description,
                amount,
                category,
            } => {
                let expense = service.add_expense(&description, amount, category.as_deref())?;
                print_message(&Message::info(format!(
                    "Added {} (ID: {})",
                    expense.description, expense.id
                )));
            }

            Commands::Update {
                id,
                description,
                amount,
                category,
            } => {
                let update = ExpenseUpdate {
                    description,
                    amount,
                    category,
                };
                match service.update_expense(id, update) {
                    Ok(expense) => print_message(&Message::info(format!(
                        "Updated the expense at ID: {}",
                        expense.id
                    ))),
                    Err(err) => report_recoverable(err)?,
                }
            }

            Commands::Delete { id } => {
                // Delete does not hand back the record, so grab the description first.
                let description = service.get_expense(id).map(|e| e.description.clone());
                match service.delete_expense(id) {
                    Ok(()) => print_message(&Message::info(format!(
                        "Deleted \"{}\"",
                        description.unwrap_or_default()
                    ))),
                    Err(err) => report_recoverable(err)?,
                }
            }

            Commands::List {
                category,
                month,
                year,
                format,
            } => {
                let filter = ExpenseFilter::new(category, month, year);
                let expenses = service.list_expenses(&filter);
                print_expenses(&expenses, format)?;
            }

            Commands::Summary {
                month,
                year,
                category,
                by_category,
                format,
            } => {
                let filter = ExpenseFilter::new(category, month, year);
                let summary = service.summarize(&filter);
                print_summary(&summary, by_category, format)?;
            }

            Commands::Help => print_help(),
        }

        Ok(())
    }
}

/// Show not-found and empty-update errors as warnings; pass storage errors on.
fn report_recoverable(err: LedgerError) -> Result<()> {
    if err.is_recoverable() {
        print_message(&Message::from(&err));
        Ok(())
    } else {
        Err(err.into())
    }
}

pub fn print_help() {
    println!("{}", HELP_MESSAGE);
}

pub fn print_message(message: &Message) {
    match message.severity {
        Severity::Info => println!("{}", message.text.yellow()),
        Severity::Warning => println!("{}", message.text.red()),
    }
}

/// Like [`print_message`], but keeps stdout clean for json and csv output.
fn notify(message: &Message, format: OutputFormat) {
    match format {
        OutputFormat::Table => print_message(message),
        OutputFormat::Json | OutputFormat::Csv => eprintln!("{}", message.text),
    }
}

fn print_expenses(expenses: &[&Expense], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(expenses)?);
        }
        OutputFormat::Csv => {
            write_expenses(stdout(), expenses.iter().copied())?;
        }
        OutputFormat::Table => {
            if expenses.is_empty() {
                print_message(&Message::no_matching_expenses());
                return Ok(());
            }

            println!(
                "{:<6} {:<12} {:<30} {:>12} {:<15}",
                "ID", "DATE", "DESCRIPTION", "AMOUNT", "CATEGORY"
            );
            println!("{}", "-".repeat(79));
            for expense in expenses {
                println!(
                    "{:<6} {:<12} {:<30} {:>12} {:<15}",
                    expense.id,
                    expense.date.format("%Y-%m-%d"),
                    truncate(&expense.description, 30),
                    format_amount(expense.amount),
                    truncate(&expense.category, 15)
                );
            }
        }
    }
    Ok(())
}

fn print_summary(summary: &ExpenseSummary, by_category: bool, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(summary)?);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(stdout());
            if by_category {
                writer.write_record(["category", "total", "count", "percentage"])?;
                for cat in &summary.categories {
                    writer.write_record([
                        cat.category.clone(),
                        format_amount(cat.total),
                        cat.count.to_string(),
                        format!("{:.2}", cat.percentage),
                    ])?;
                }
            } else {
                writer.write_record(["total", "count"])?;
                writer.write_record([format_amount(summary.total), summary.count.to_string()])?;
            }
            writer.flush()?;
        }
        OutputFormat::Table => {
            if by_category && !summary.categories.is_empty() {
                println!(
                    "{:<20} {:>12} {:>8} {:>8}",
                    "CATEGORY", "TOTAL", "COUNT", "PERCENT"
                );
                println!("{}", "-".repeat(51));
                for cat in &summary.categories {
                    println!(
                        "{:<20} {:>12} {:>8} {:>7.1}%",
                        truncate(&cat.category, 20),
                        format_amount(cat.total),
                        cat.count,
                        cat.percentage
                    );
                }
                println!();
            }
            println!(
                "{}{}",
                "Total expenses: ".yellow(),
                format_amount(summary.total)
            );
        }
    }
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_negative_amount() {
        let cli = Cli::try_parse_from([
            "expense-tracker",
            "add",
            "--description",
            "Refund",
            "--amount",
            "-5.25",
        ])
        .unwrap();

        match cli.command {
            Commands::Add { amount, .. } => assert_eq!(amount, -5.25),
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_month_and_amount() {
        assert!(Cli::try_parse_from(["expense-tracker", "list", "--month", "13"]).is_err());
        assert!(Cli::try_parse_from(["expense-tracker", "list", "--month", "0"]).is_err());
        assert!(
            Cli::try_parse_from([
                "expense-tracker",
                "add",
                "--description",
                "x",
                "--amount",
                "ten"
            ])
            .is_err()
        );
        assert!(Cli::try_parse_from(["expense-tracker", "delete", "abc"]).is_err());
    }

    #[test]
    fn test_add_requires_description_and_amount() {
        assert!(Cli::try_parse_from(["expense-tracker", "add", "--amount", "3"]).is_err());
        assert!(Cli::try_parse_from(["expense-tracker", "add", "--description", "x"]).is_err());
    }

    #[test]
    fn test_help_is_a_command() {
        let cli = Cli::try_parse_from(["expense-tracker", "help"]).unwrap();
        assert!(matches!(cli.command, Commands::Help));
        assert_eq!(cli.file, DEFAULT_LEDGER_FILE);
    }

    #[test]
    fn test_output_format_defaults_to_table() {
        let cli = Cli::try_parse_from(["expense-tracker", "list", "--format", "json"]).unwrap();
        assert_eq!(cli.command.output_format(), OutputFormat::Json);

        let cli = Cli::try_parse_from(["expense-tracker", "summary"]).unwrap();
        assert_eq!(cli.command.output_format(), OutputFormat::Table);

        let cli = Cli::try_parse_from(["expense-tracker", "delete", "3"]).unwrap();
        assert_eq!(cli.command.output_format(), OutputFormat::Table);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer description", 10), "a much ...");
        assert_eq!(truncate("café au lait", 8), "café ...");
    }
}
