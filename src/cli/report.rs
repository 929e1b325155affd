use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::aggregate::{
    self, category_breakdown, monthly_series, rolling_mean, totals, CategoryTotal, MonthBucket,
    RollingMeanPoint, Totals,
};
use crate::cli::{load_ledger, FilterArgs};
use crate::error::Result;
use crate::fmt::money;
use crate::settings::load_settings;

// ---------------------------------------------------------------------------
// Data-fetching + printing wrappers (used by dispatch)
// ---------------------------------------------------------------------------

pub fn show_totals(filter_args: &FilterArgs, with_hidden: bool) -> Result<()> {
    let ledger = load_ledger()?;
    let view = aggregate::chart_view(ledger.transactions(), &filter_args.to_filter(), with_hidden);
    println!("{}", format_totals(&totals(&view)));
    Ok(())
}

pub fn show_monthly(filter_args: &FilterArgs, with_hidden: bool) -> Result<()> {
    let ledger = load_ledger()?;
    let view = aggregate::chart_view(ledger.transactions(), &filter_args.to_filter(), with_hidden);
    println!("{}", format_monthly(&monthly_series(&view)));
    Ok(())
}

pub fn show_categories(filter_args: &FilterArgs, with_hidden: bool) -> Result<()> {
    let ledger = load_ledger()?;
    let view = aggregate::chart_view(ledger.transactions(), &filter_args.to_filter(), with_hidden);
    println!("{}", format_categories(&category_breakdown(&view)));
    Ok(())
}

pub fn show_rolling(days: Option<u32>, filter_args: &FilterArgs, with_hidden: bool) -> Result<()> {
    let days = days.unwrap_or_else(|| load_settings().rolling_window_days);
    let ledger = load_ledger()?;
    let view = aggregate::chart_view(ledger.transactions(), &filter_args.to_filter(), with_hidden);
    println!("{}", format_rolling(&rolling_mean(&view, days), days));
    Ok(())
}

// ---------------------------------------------------------------------------
// Pure formatting functions (report data → String)
// ---------------------------------------------------------------------------

pub fn format_totals(t: &Totals) -> String {
    let mut table = Table::new();
    table.set_header(vec!["", "Amount"]);
    table.add_row(vec![
        Cell::new("Expenses".red().bold()),
        Cell::new(money(t.expenses)),
    ]);
    table.add_row(vec![
        Cell::new("Income".green().bold()),
        Cell::new(money(t.income)),
    ]);
    let balance_label = if t.balance >= 0.0 {
        "Balance".green().bold()
    } else {
        "Balance".red().bold()
    };
    table.add_row(vec![Cell::new(balance_label), Cell::new(money(t.balance))]);
    format!("Totals\n{table}")
}

pub fn format_monthly(months: &[MonthBucket]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Month", "Expenses", "Income", "Net"]);
    for m in months {
        table.add_row(vec![
            Cell::new(&m.label),
            Cell::new(money(m.expenses)),
            Cell::new(money(m.income)),
            Cell::new(money(m.income - m.expenses)),
        ]);
    }
    format!("Monthly\n{table}")
}

pub fn format_categories(cats: &[CategoryTotal]) -> String {
    let total: f64 = cats.iter().map(|c| c.value).sum();
    let mut table = Table::new();
    table.set_header(vec!["Category", "Amount", "%"]);
    for cat in cats {
        let pct = if total > 0.0 { cat.value / total * 100.0 } else { 0.0 };
        table.add_row(vec![
            Cell::new(cat.name.bold()),
            Cell::new(money(cat.value)),
            Cell::new(format!("{pct:.1}%")),
        ]);
        for sub in &cat.subcategories {
            table.add_row(vec![
                Cell::new(format!("  {}", sub.name)),
                Cell::new(money(sub.value)),
                Cell::new(""),
            ]);
        }
    }
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(money(total)),
        Cell::new(""),
    ]);
    format!("Categories\n{table}")
}

pub fn format_rolling(series: &[RollingMeanPoint], days: u32) -> String {
    if series.is_empty() {
        return format!("Rolling {days}-day average\n(no dated transactions)");
    }

    // Column per category, row per distinct date.
    let categories: Vec<&String> = series[0].values.keys().collect();
    let mut header: Vec<Cell> = vec![Cell::new("Date")];
    header.extend(categories.iter().map(|c| Cell::new(c)));

    let mut table = Table::new();
    table.set_header(header);
    for point in series {
        let mut row: Vec<Cell> = vec![Cell::new(&point.full_label)];
        for cat in &categories {
            let v = point.values.get(*cat).copied().unwrap_or(0.0);
            row.push(Cell::new(if v == 0.0 { "-".to_string() } else { money(v) }));
        }
        table.add_row(row);
    }
    format!("Rolling {days}-day average (per day)\n{table}")
}
