use std::cmp::Ordering;

use crate::models::{Transaction, TxnType};

/// Increment used by "show more" pagination.
pub const PAGE_INCREMENT: usize = 20;

/// Date used in place of a missing/invalid one when ordering by date.
const EPOCH_DATE: &str = "1970-01-01";

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// All criteria combine with logical AND; unset criteria match everything.
#[derive(Debug, Clone)]
pub struct Filter {
    /// Inclusive date range over the YYYY-MM-DD strings.
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub types: Vec<TxnType>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    /// Case-insensitive substring over the description.
    pub search: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub include_hidden: bool,
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            types: vec![TxnType::Expense, TxnType::Income],
            category: None,
            subcategory: None,
            search: None,
            min_amount: None,
            max_amount: None,
            include_hidden: true,
        }
    }
}

impl Filter {
    pub fn matches(&self, txn: &Transaction) -> bool {
        // Normalization guarantees a date, but a snapshot may not.
        if txn.date.is_empty() {
            return false;
        }
        if !self.include_hidden && txn.hidden {
            return false;
        }
        if let (Some(start), Some(end)) = (&self.start_date, &self.end_date) {
            if txn.date.as_str() < start.as_str() || txn.date.as_str() > end.as_str() {
                return false;
            }
        }
        if !self.types.contains(&txn.kind) {
            return false;
        }
        if let Some(cat) = &self.category {
            if &txn.category.name != cat {
                return false;
            }
        }
        if let Some(sub) = &self.subcategory {
            if &txn.category.sub != sub {
                return false;
            }
        }
        if let Some(term) = &self.search {
            if !txn.description.to_lowercase().contains(&term.to_lowercase()) {
                return false;
            }
        }
        if let Some(min) = self.min_amount {
            if txn.amount < min {
                return false;
            }
        }
        if let Some(max) = self.max_amount {
            if txn.amount > max {
                return false;
            }
        }
        true
    }
}

/// Borrowing view over the collection; original order preserved.
pub fn filter<'a>(txns: &'a [Transaction], f: &Filter) -> Vec<&'a Transaction> {
    txns.iter().filter(|t| f.matches(t)).collect()
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortKey {
    Date,
    Amount,
    Value,
    Category,
    Subcategory,
    Description,
    Type,
    Source,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy)]
pub struct Sort {
    pub key: SortKey,
    pub direction: SortDir,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            key: SortKey::Date,
            direction: SortDir::Descending,
        }
    }
}

fn compare(key: SortKey, a: &Transaction, b: &Transaction) -> Ordering {
    match key {
        SortKey::Date => {
            let ad = if a.date.is_empty() { EPOCH_DATE } else { &a.date };
            let bd = if b.date.is_empty() { EPOCH_DATE } else { &b.date };
            ad.cmp(bd)
        }
        SortKey::Amount => a.amount.partial_cmp(&b.amount).unwrap_or(Ordering::Equal),
        SortKey::Value => a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal),
        SortKey::Category => a.category.name.cmp(&b.category.name),
        SortKey::Subcategory => a.category.sub.cmp(&b.category.sub),
        SortKey::Description => a.description.cmp(&b.description),
        SortKey::Type => a.kind.as_str().cmp(b.kind.as_str()),
        SortKey::Source => a.source.as_str().cmp(b.source.as_str()),
    }
}

/// Stable sort: equal keys keep their original relative order in both
/// directions, so pagination stays deterministic across invocations.
pub fn sort(view: &mut [&Transaction], sort: Sort) {
    view.sort_by(|a, b| {
        let ord = compare(sort.key, a, b);
        match sort.direction {
            SortDir::Ascending => ord,
            SortDir::Descending => ord.reverse(),
        }
    });
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// First `count` entries of the view.
pub fn paginate<'a, 'b>(view: &'b [&'a Transaction], count: usize) -> &'b [&'a Transaction] {
    &view[..count.min(view.len())]
}

/// "Show more": grow the display count by one page, capped at the view size.
pub fn grow_page(count: usize, total: usize) -> usize {
    (count + PAGE_INCREMENT).min(total)
}
