use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxnType {
    #[default]
    Expense,
    Income,
}

impl TxnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Card,
    #[default]
    Account,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Account => "account",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sub: String,
}

impl Category {
    pub fn new(name: impl Into<String>, sub: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sub: sub.into(),
        }
    }

    /// Hard default when no rule matches anything.
    pub fn fallback() -> Self {
        Self::new("Miscellaneous", "Other")
    }
}

/// Canonical transaction record. Field names in the snapshot JSON follow the
/// historical export format, so every field survives an export/import
/// round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub id: String,
    /// YYYY-MM-DD; rows without a valid date never enter the collection.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
    /// Non-negative magnitude in the settlement currency (CHF).
    #[serde(default)]
    pub amount: f64,
    /// Signed: negative for expenses, positive for income.
    #[serde(default)]
    pub value: f64,
    #[serde(rename = "type", default)]
    pub kind: TxnType,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub hidden: bool,
    #[serde(rename = "originalAmount", default, skip_serializing_if = "Option::is_none")]
    pub original_amount: Option<f64>,
    #[serde(rename = "originalCurrency", default, skip_serializing_if = "Option::is_none")]
    pub original_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

impl Transaction {
    pub fn category_name(&self) -> &str {
        if self.category.name.is_empty() {
            "Miscellaneous"
        } else {
            &self.category.name
        }
    }

    pub fn subcategory_name(&self) -> &str {
        if self.category.sub.is_empty() {
            "Other"
        } else {
            &self.category.sub
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_field_names_match_snapshot_format() {
        let txn = Transaction {
            id: "card-abc123def".to_string(),
            date: "2025-01-15".to_string(),
            description: "MIGROS GENEVE".to_string(),
            amount: 42.5,
            value: -42.5,
            kind: TxnType::Expense,
            category: Category::new("Home", "Groceries"),
            source: Source::Card,
            hidden: false,
            original_amount: Some(42.5),
            original_currency: Some("CHF".to_string()),
            recipient: None,
            sender: None,
        };
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["source"], "card");
        assert_eq!(json["originalAmount"], 42.5);
        assert_eq!(json["originalCurrency"], "CHF");
        assert_eq!(json["category"]["name"], "Home");
        assert_eq!(json["category"]["sub"], "Groceries");
        assert!(json.get("recipient").is_none());
    }

    #[test]
    fn test_loose_deserialization_fills_defaults() {
        let txn: Transaction = serde_json::from_str("{}").unwrap();
        assert_eq!(txn.kind, TxnType::Expense);
        assert_eq!(txn.source, Source::Account);
        assert_eq!(txn.amount, 0.0);
        assert!(txn.category.name.is_empty());
        assert_eq!(txn.category_name(), "Miscellaneous");
        assert_eq!(txn.subcategory_name(), "Other");
    }
}
