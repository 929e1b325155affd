use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{load_ledger, FilterArgs};
use crate::error::Result;
use crate::fmt::money;
use crate::models::{Transaction, TxnType};
use crate::query::{self, Filter, Sort, SortDir, SortKey};

#[allow(clippy::too_many_arguments)]
pub fn run(
    filter_args: &FilterArgs,
    no_hidden: bool,
    sort_key: SortKey,
    descending: bool,
    ascending: bool,
    limit: Option<usize>,
    all: bool,
) -> Result<()> {
    let ledger = load_ledger()?;
    let f = Filter {
        include_hidden: !no_hidden,
        ..filter_args.to_filter()
    };

    let mut view = query::filter(ledger.transactions(), &f);
    let total = view.len();

    let direction = if ascending {
        SortDir::Ascending
    } else if descending || sort_key == SortKey::Date {
        // Date defaults to newest-first, like the imported ordering.
        SortDir::Descending
    } else {
        SortDir::Ascending
    };
    query::sort(&mut view, Sort { key: sort_key, direction });

    // Default page is one "show more" step from zero.
    let count = if all {
        total
    } else {
        limit.unwrap_or_else(|| query::grow_page(0, total))
    };
    let page = query::paginate(&view, count);

    println!("{}", format_table(page));
    if page.len() < total {
        println!("Showing {} of {total} transactions (use --all or --limit)", page.len());
    } else {
        println!("{total} transactions");
    }
    Ok(())
}

pub fn format_table(view: &[&Transaction]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Date", "Description", "Category", "Amount", "Src", "ID"]);

    for txn in view {
        let amount = match txn.kind {
            TxnType::Expense => money(-txn.amount).red().to_string(),
            TxnType::Income => money(txn.amount).green().to_string(),
        };
        let mut description = truncate(&txn.description, 48);
        if txn.hidden {
            description = format!("{description} {}", "(hidden)".dimmed());
        }
        let category = if txn.category.sub.is_empty() {
            txn.category_name().to_string()
        } else {
            format!("{} / {}", txn.category_name(), txn.category.sub)
        };
        table.add_row(vec![
            Cell::new(&txn.date),
            Cell::new(description),
            Cell::new(category),
            Cell::new(amount),
            Cell::new(txn.source.as_str()),
            Cell::new(&txn.id),
        ]);
    }
    table.to_string()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max - 1).collect();
        format!("{cut}…")
    }
}
