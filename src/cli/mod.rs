pub mod edit;
pub mod import;
pub mod init;
pub mod list;
pub mod report;
pub mod snapshot;
pub mod status;

use chrono::{Datelike, Local, Months, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::error::{CentimeError, Result};
use crate::models::TxnType;
use crate::query::{Filter, SortKey};
use crate::settings::snapshot_path;
use crate::store::Ledger;

/// Every command except `init`, `import` and `load` starts from the saved
/// snapshot.
pub(crate) fn load_ledger() -> Result<Ledger> {
    let path = snapshot_path();
    if !path.exists() {
        return Err(CentimeError::Other(
            "no transactions yet; run `centime import` or `centime load` first".to_string(),
        ));
    }
    let mut ledger = Ledger::default();
    ledger.load(&path)?;
    Ok(ledger)
}

#[derive(Parser)]
#[command(name = "centime", about = "Personal expense tracker for Swiss bank and card statements.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up centime: choose a data directory for the transaction snapshot.
    Init {
        /// Path for centime data (default: ~/Documents/centime)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Import bank statement CSV files, replacing the current transactions.
    Import {
        /// CSV files; card exports need "card_transactions" in the name,
        /// account exports "account_transactions"
        files: Vec<String>,
    },
    /// List transactions as a table.
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Exclude hidden transactions
        #[arg(long = "no-hidden")]
        no_hidden: bool,
        /// Sort column
        #[arg(long, value_enum, default_value = "date")]
        sort: SortKey,
        /// Sort descending (default for date, opt-in for the rest)
        #[arg(long)]
        descending: bool,
        /// Sort ascending
        #[arg(long, conflicts_with = "descending")]
        ascending: bool,
        /// Number of rows to show
        #[arg(long, conflicts_with = "all")]
        limit: Option<usize>,
        /// Show every matching row
        #[arg(long)]
        all: bool,
    },
    /// Summary reports over the filtered transactions.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Recategorize or hide transactions.
    Edit {
        #[command(subcommand)]
        command: EditCommands,
    },
    /// Write the transaction snapshot to a JSON file.
    Export {
        /// Output path
        path: String,
    },
    /// Load transactions from a JSON snapshot, replacing the current ones.
    Load {
        /// Path to a snapshot produced by `centime export`
        path: String,
    },
    /// Show data directory, snapshot info and summary statistics.
    Status,
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Total expenses, income and balance.
    Totals {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long = "with-hidden")]
        with_hidden: bool,
    },
    /// Expenses and income per month.
    Monthly {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long = "with-hidden")]
        with_hidden: bool,
    },
    /// Spending per category and subcategory.
    Categories {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long = "with-hidden")]
        with_hidden: bool,
    },
    /// Rolling daily average spend per category.
    Rolling {
        /// Window length in days (default: rolling_window_days from settings)
        #[arg(long)]
        days: Option<u32>,
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long = "with-hidden")]
        with_hidden: bool,
    },
}

#[derive(Subcommand)]
pub enum EditCommands {
    /// Assign a category (and optional subcategory) to a transaction.
    Category {
        /// Transaction ID (shown in `centime list`)
        id: String,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        sub: String,
    },
    /// Hide a transaction from reports.
    Hide {
        id: String,
    },
    /// Unhide a transaction.
    Unhide {
        id: String,
    },
    /// Hide every transaction matching the filter.
    HideAll {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Unhide every transaction matching the filter.
    UnhideAll {
        #[command(flatten)]
        filter: FilterArgs,
    },
}

// ---------------------------------------------------------------------------
// Shared filter flags
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Period {
    CurrentYear,
    LastMonth,
    #[value(name = "last-3-months")]
    Last3Months,
    #[value(name = "last-6-months")]
    Last6Months,
    #[value(name = "last-12-months")]
    Last12Months,
    #[value(name = "last-2-years")]
    Last2Years,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Start date: YYYY-MM-DD
    #[arg(long)]
    pub from: Option<String>,
    /// End date: YYYY-MM-DD
    #[arg(long)]
    pub to: Option<String>,
    /// Named period ending today; overrides --from/--to
    #[arg(long, value_enum)]
    pub period: Option<Period>,
    /// Only expenses
    #[arg(long = "expenses-only", conflicts_with = "income_only")]
    pub expenses_only: bool,
    /// Only income
    #[arg(long = "income-only")]
    pub income_only: bool,
    /// Exact category name
    #[arg(long)]
    pub category: Option<String>,
    /// Exact subcategory name (combine with --category)
    #[arg(long)]
    pub sub: Option<String>,
    /// Case-insensitive description search
    #[arg(long)]
    pub search: Option<String>,
    /// Minimum absolute amount
    #[arg(long)]
    pub min: Option<f64>,
    /// Maximum absolute amount
    #[arg(long)]
    pub max: Option<f64>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> Filter {
        let (start_date, end_date) = match self.period {
            Some(period) => {
                let (start, end) = period_range(period, Local::now().date_naive());
                (Some(start), Some(end))
            }
            None => match (&self.from, &self.to) {
                (None, None) => (None, None),
                // One-sided ranges get the missing bound filled in.
                (from, to) => (
                    Some(from.clone().unwrap_or_else(|| "1970-01-01".to_string())),
                    Some(to.clone().unwrap_or_else(|| {
                        Local::now().date_naive().format("%Y-%m-%d").to_string()
                    })),
                ),
            },
        };

        let types = if self.expenses_only {
            vec![TxnType::Expense]
        } else if self.income_only {
            vec![TxnType::Income]
        } else {
            vec![TxnType::Expense, TxnType::Income]
        };

        Filter {
            start_date,
            end_date,
            types,
            category: self.category.clone(),
            subcategory: self.sub.clone(),
            search: self.search.clone(),
            min_amount: self.min,
            max_amount: self.max,
            include_hidden: true,
        }
    }
}

fn period_range(period: Period, today: NaiveDate) -> (String, String) {
    let start = match period {
        Period::CurrentYear => {
            NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today)
        }
        Period::LastMonth => today.checked_sub_months(Months::new(1)).unwrap_or(today),
        Period::Last3Months => today.checked_sub_months(Months::new(3)).unwrap_or(today),
        Period::Last6Months => today.checked_sub_months(Months::new(6)).unwrap_or(today),
        Period::Last12Months => today.checked_sub_months(Months::new(12)).unwrap_or(today),
        Period::Last2Years => today.checked_sub_months(Months::new(24)).unwrap_or(today),
    };
    (
        start.format("%Y-%m-%d").to_string(),
        today.format("%Y-%m-%d").to_string(),
    )
}
