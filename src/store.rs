use std::fs;
use std::path::Path;

use crate::error::{CentimeError, Result};
use crate::models::Transaction;
use crate::query::Filter;

/// Owned transaction collection plus the JSON snapshot that carries it
/// between invocations. All mutations replace values wholesale, nothing is
/// patched in place.
#[derive(Debug, Default)]
pub struct Ledger {
    txns: Vec<Transaction>,
}

impl Ledger {
    pub fn new(txns: Vec<Transaction>) -> Self {
        Self { txns }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.txns
    }

    pub fn len(&self) -> usize {
        self.txns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.txns.is_empty()
    }

    /// Replace the whole collection, e.g. after a fresh import.
    pub fn replace(&mut self, txns: Vec<Transaction>) {
        self.txns = txns;
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    pub fn set_category(&mut self, id: &str, name: &str, sub: &str) -> Result<()> {
        let txn = self
            .txns
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| CentimeError::UnknownTransaction(id.to_string()))?;
        txn.category.name = name.to_string();
        txn.category.sub = sub.to_string();
        Ok(())
    }

    pub fn set_hidden(&mut self, id: &str, hidden: bool) -> Result<()> {
        let txn = self
            .txns
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| CentimeError::UnknownTransaction(id.to_string()))?;
        txn.hidden = hidden;
        Ok(())
    }

    /// Bulk hide/unhide over everything the filter matches. Returns how many
    /// transactions were touched.
    pub fn set_hidden_where(&mut self, f: &Filter, hidden: bool) -> usize {
        let mut touched = 0;
        for txn in self.txns.iter_mut() {
            if f.matches(txn) {
                txn.hidden = hidden;
                touched += 1;
            }
        }
        touched
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    pub fn category_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .txns
            .iter()
            .map(|t| t.category_name().to_string())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    pub fn subcategories_of(&self, category: &str) -> Vec<String> {
        let mut subs: Vec<String> = self
            .txns
            .iter()
            .filter(|t| t.category_name() == category)
            .map(|t| t.subcategory_name().to_string())
            .collect();
        subs.sort();
        subs.dedup();
        subs
    }

    /// Earliest and latest dates present, skipping dateless rows.
    pub fn date_range(&self) -> Option<(String, String)> {
        let mut dates: Vec<&str> = self
            .txns
            .iter()
            .filter(|t| !t.date.is_empty())
            .map(|t| t.date.as_str())
            .collect();
        if dates.is_empty() {
            return None;
        }
        dates.sort_unstable();
        Some((dates[0].to_string(), dates[dates.len() - 1].to_string()))
    }

    // -----------------------------------------------------------------------
    // Snapshot
    // -----------------------------------------------------------------------

    /// Serialize the collection to a pretty-printed JSON array.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.txns)
            .map_err(|e| CentimeError::Other(format!("could not serialize snapshot: {e}")))?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a snapshot, replacing the collection only if the file holds a
    /// JSON array of objects. On any failure the existing collection is left
    /// untouched.
    pub fn load(&mut self, path: &Path) -> Result<usize> {
        let text = fs::read_to_string(path)?;
        let txns = parse_snapshot(&text)?;
        let count = txns.len();
        self.txns = txns;
        Ok(count)
    }
}

/// Snapshot validation is deliberately loose: the payload must be an array of
/// objects, but unknown fields are ignored and missing fields default.
fn parse_snapshot(text: &str) -> Result<Vec<Transaction>> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| CentimeError::Validation(format!("snapshot is not valid JSON: {e}")))?;
    let serde_json::Value::Array(items) = value else {
        return Err(CentimeError::Validation(
            "snapshot must be a JSON array of transactions".to_string(),
        ));
    };
    if !items.iter().all(|v| v.is_object()) {
        return Err(CentimeError::Validation(
            "snapshot array may only contain transaction objects".to_string(),
        ));
    }
    items
        .into_iter()
        .map(|v| {
            serde_json::from_value(v)
                .map_err(|e| CentimeError::Validation(format!("bad transaction in snapshot: {e}")))
        })
        .collect()
}
