use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, NaiveDate};

use crate::fmt::{axis_date_label, full_date_label, month_label};
use crate::models::{Transaction, TxnType};
use crate::query::{filter, Filter};

fn round2(val: f64) -> f64 {
    (val * 100.0).round() / 100.0
}

/// View fed to the chart-level aggregations. The hidden toggle here is
/// independent of the Filter's own `include_hidden` criterion: the table view
/// and the chart views serve different call sites and must not share it.
pub fn chart_view<'a>(
    txns: &'a [Transaction],
    f: &Filter,
    include_hidden: bool,
) -> Vec<&'a Transaction> {
    let f = Filter {
        include_hidden,
        ..f.clone()
    };
    filter(txns, &f)
}

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Totals {
    pub expenses: f64,
    pub income: f64,
    pub balance: f64,
}

pub fn totals(view: &[&Transaction]) -> Totals {
    let mut expenses = 0.0;
    let mut income = 0.0;
    for txn in view {
        match txn.kind {
            TxnType::Expense => expenses += txn.value.abs(),
            TxnType::Income => income += txn.value,
        }
    }
    Totals {
        expenses: round2(expenses),
        income: round2(income),
        balance: round2(income - expenses),
    }
}

// ---------------------------------------------------------------------------
// Monthly series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MonthBucket {
    /// YYYY-MM key.
    pub month: String,
    /// Human label, e.g. "Mar 2025".
    pub label: String,
    pub expenses: f64,
    pub income: f64,
}

/// Group by YYYY-MM and sum expenses/income per bucket, output in
/// chronological order (numeric year/month, not string order).
pub fn monthly_series(view: &[&Transaction]) -> Vec<MonthBucket> {
    let mut buckets: HashMap<String, (f64, f64)> = HashMap::new();
    for txn in view {
        if txn.date.len() < 7 {
            continue;
        }
        let key = txn.date[..7].to_string();
        let entry = buckets.entry(key).or_insert((0.0, 0.0));
        match txn.kind {
            TxnType::Expense => entry.0 += txn.value.abs(),
            TxnType::Income => entry.1 += txn.value,
        }
    }

    let mut months: Vec<MonthBucket> = buckets
        .into_iter()
        .map(|(month, (expenses, income))| MonthBucket {
            label: month_label(&month),
            month,
            expenses: round2(expenses),
            income: round2(income),
        })
        .collect();
    months.sort_by_key(|b| {
        let parts: Vec<&str> = b.month.split('-').collect();
        let year: i32 = parts.first().and_then(|p| p.parse().ok()).unwrap_or(0);
        let month: u32 = parts.get(1).and_then(|p| p.parse().ok()).unwrap_or(0);
        (year, month)
    });
    months
}

// ---------------------------------------------------------------------------
// Category breakdown
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SubcategoryTotal {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub name: String,
    pub value: f64,
    pub subcategories: Vec<SubcategoryTotal>,
}

/// Sum of |value| per category, with a nested per-subcategory breakdown;
/// both levels sorted descending by value.
pub fn category_breakdown(view: &[&Transaction]) -> Vec<CategoryTotal> {
    let mut cats: BTreeMap<String, (f64, BTreeMap<String, f64>)> = BTreeMap::new();
    for txn in view {
        let name = txn.category_name().to_string();
        let sub = txn.subcategory_name().to_string();
        let magnitude = txn.value.abs();
        let entry = cats.entry(name).or_default();
        entry.0 += magnitude;
        *entry.1.entry(sub).or_default() += magnitude;
    }

    let mut result: Vec<CategoryTotal> = cats
        .into_iter()
        .map(|(name, (value, subs))| {
            let mut subcategories: Vec<SubcategoryTotal> = subs
                .into_iter()
                .map(|(name, value)| SubcategoryTotal {
                    name,
                    value: round2(value),
                })
                .collect();
            subcategories.sort_by(|a, b| b.value.total_cmp(&a.value));
            CategoryTotal {
                name,
                value: round2(value),
                subcategories,
            }
        })
        .collect();
    result.sort_by(|a, b| b.value.total_cmp(&a.value));
    result
}

// ---------------------------------------------------------------------------
// Rolling mean series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RollingMeanPoint {
    pub date: String,
    /// Compact label for chart axes ("15 Mar").
    pub label: String,
    /// Full label for tooltips ("15 Mar 2025").
    pub full_label: String,
    /// Daily-average spend per category; every category in the view appears,
    /// 0 when nothing falls inside the window.
    pub values: BTreeMap<String, f64>,
}

/// Rolling per-category daily average over a `window_days` window ending at
/// each distinct date in the view. The divisor is the window length itself,
/// not the number of active days, so sparse data still reads as a
/// time-averaged daily rate. Quadratic in the view size; only computed on
/// explicit request.
pub fn rolling_mean(view: &[&Transaction], window_days: u32) -> Vec<RollingMeanPoint> {
    if window_days == 0 {
        return Vec::new();
    }

    let mut dated: Vec<(&Transaction, NaiveDate)> = view
        .iter()
        .filter_map(|t| {
            NaiveDate::parse_from_str(&t.date, "%Y-%m-%d")
                .ok()
                .map(|d| (*t, d))
        })
        .collect();
    dated.sort_by_key(|(_, d)| *d);
    if dated.is_empty() {
        return Vec::new();
    }

    let mut unique_dates: Vec<NaiveDate> = dated.iter().map(|(_, d)| *d).collect();
    unique_dates.dedup();

    let mut categories: Vec<String> = dated
        .iter()
        .map(|(t, _)| t.category_name().to_string())
        .collect();
    categories.sort();
    categories.dedup();

    let mut result = Vec::with_capacity(unique_dates.len());
    for current in unique_dates {
        let window_start = current - Duration::days(i64::from(window_days) - 1);
        let date = current.format("%Y-%m-%d").to_string();

        let mut values = BTreeMap::new();
        for category in &categories {
            let total: f64 = dated
                .iter()
                .filter(|(t, d)| {
                    *d >= window_start && *d <= current && t.category_name() == category
                })
                .map(|(t, _)| t.value.abs())
                .sum();
            let mean = if total > 0.0 {
                round2(total / f64::from(window_days))
            } else {
                0.0
            };
            values.insert(category.clone(), mean);
        }

        result.push(RollingMeanPoint {
            label: axis_date_label(&date),
            full_label: full_date_label(&date),
            date,
            values,
        });
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Source};

    fn txn(date: &str, value: f64, cat: (&str, &str), hidden: bool) -> Transaction {
        Transaction {
            id: format!("t-{date}-{value}"),
            date: date.to_string(),
            description: String::new(),
            amount: value.abs(),
            value,
            kind: if value < 0.0 { TxnType::Expense } else { TxnType::Income },
            category: Category::new(cat.0, cat.1),
            source: Source::Account,
            hidden,
            original_amount: None,
            original_currency: None,
            recipient: None,
            sender: None,
        }
    }

    fn view(txns: &[Transaction]) -> Vec<&Transaction> {
        txns.iter().collect()
    }

    #[test]
    fn test_totals() {
        let txns = vec![
            txn("2025-01-01", -30.0, ("Home", "Groceries"), false),
            txn("2025-01-02", -20.5, ("Food", "Restaurant"), false),
            txn("2025-01-03", 100.0, ("Income", "Salary"), false),
        ];
        let t = totals(&view(&txns));
        assert_eq!(t.expenses, 50.5);
        assert_eq!(t.income, 100.0);
        assert_eq!(t.balance, 49.5);
    }

    #[test]
    fn test_totals_empty_view() {
        let t = totals(&[]);
        assert_eq!(t, Totals { expenses: 0.0, income: 0.0, balance: 0.0 });
    }

    #[test]
    fn test_chart_view_hidden_toggle_is_independent() {
        let txns = vec![
            txn("2025-01-01", -30.0, ("Home", "Groceries"), true),
            txn("2025-01-02", -20.0, ("Home", "Groceries"), false),
        ];
        let f = Filter::default();
        assert_eq!(chart_view(&txns, &f, false).len(), 1);
        assert_eq!(chart_view(&txns, &f, true).len(), 2);
        // The passed filter's own include_hidden is irrelevant here.
        let f_excluding = Filter { include_hidden: false, ..Filter::default() };
        assert_eq!(chart_view(&txns, &f_excluding, true).len(), 2);
    }

    #[test]
    fn test_monthly_series_chronological() {
        let txns = vec![
            txn("2025-02-10", -10.0, ("A", ""), false),
            txn("2024-12-01", -5.0, ("A", ""), false),
            txn("2025-01-15", 20.0, ("Income", "Salary"), false),
            txn("2025-01-20", -7.5, ("A", ""), false),
        ];
        let months = monthly_series(&view(&txns));
        let keys: Vec<&str> = months.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(keys, vec!["2024-12", "2025-01", "2025-02"]);
        assert_eq!(months[1].expenses, 7.5);
        assert_eq!(months[1].income, 20.0);
        assert_eq!(months[1].label, "Jan 2025");
    }

    #[test]
    fn test_category_breakdown_sorted_descending() {
        let txns = vec![
            txn("2025-01-01", -10.0, ("Food", "Restaurant"), false),
            txn("2025-01-02", -40.0, ("Home", "Groceries"), false),
            txn("2025-01-03", -5.0, ("Home", "Furniture"), false),
            txn("2025-01-04", -15.0, ("Food", "Takeaway"), false),
        ];
        let cats = category_breakdown(&view(&txns));
        assert_eq!(cats[0].name, "Home");
        assert_eq!(cats[0].value, 45.0);
        assert_eq!(cats[1].name, "Food");
        assert_eq!(cats[1].value, 25.0);
        assert_eq!(cats[0].subcategories[0].name, "Groceries");
        assert_eq!(cats[1].subcategories[0].name, "Takeaway");
    }

    #[test]
    fn test_category_breakdown_defaults_for_missing_names() {
        let txns = vec![txn("2025-01-01", -10.0, ("", ""), false)];
        let cats = category_breakdown(&view(&txns));
        assert_eq!(cats[0].name, "Miscellaneous");
        assert_eq!(cats[0].subcategories[0].name, "Other");
    }

    #[test]
    fn test_rolling_mean_fixed_window_divisor() {
        // One -70 transaction, window of 7: mean on that day is 70/7 = 10.00.
        let txns = vec![
            txn("2025-03-01", -70.0, ("Food", "Restaurant"), false),
            txn("2025-03-11", -1.0, ("Home", "Groceries"), false),
        ];
        let series = rolling_mean(&view(&txns), 7);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, "2025-03-01");
        assert_eq!(series[0].values["Food"], 10.0);
        // Ten days later the -70 is outside the 7-day window.
        assert_eq!(series[1].date, "2025-03-11");
        assert_eq!(series[1].values["Food"], 0.0);
        // Every category appears at every point.
        assert_eq!(series[0].values["Home"], 0.0);
        assert!((series[1].values["Home"] - round2(1.0 / 7.0)).abs() < 1e-9);
    }

    #[test]
    fn test_rolling_mean_window_includes_boundary() {
        let txns = vec![
            txn("2025-03-01", -70.0, ("Food", ""), false),
            txn("2025-03-07", -0.0001, ("Food", ""), false),
            txn("2025-03-08", -0.0001, ("Food", ""), false),
        ];
        let series = rolling_mean(&view(&txns), 7);
        // 2025-03-07 is day 7 of the window starting 2025-03-01: still in.
        assert_eq!(series[1].values["Food"], 10.0);
        // 2025-03-08's window starts 2025-03-02: the -70 fell out.
        assert_eq!(series[2].values["Food"], 0.0);
    }

    #[test]
    fn test_rolling_mean_labels_and_empty_input() {
        let txns = vec![txn("2025-03-15", -7.0, ("Food", ""), false)];
        let series = rolling_mean(&view(&txns), 7);
        assert_eq!(series[0].label, "15 Mar");
        assert_eq!(series[0].full_label, "15 Mar 2025");
        assert!(rolling_mean(&[], 7).is_empty());
        assert!(rolling_mean(&view(&txns), 0).is_empty());
    }
}
