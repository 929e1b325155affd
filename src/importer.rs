use std::path::Path;

use chrono::NaiveDate;
use rand::distributions::Alphanumeric;
use rand::Rng;
use regex::Regex;

use crate::classifier::classify;
use crate::error::{CentimeError, Result};
use crate::models::{Source, Transaction, TxnType};

/// Exact description of an account-to-account movement; such rows are double
/// counted across the two statements and start out hidden.
const INTERNAL_TRANSFER_MARKER: &str = "TRANSFERT D'UN COMPTE";
/// Card statements tag the monthly settlement of the card itself with this.
const CARD_PAYMENT_MARKER: &str = "Paiement à une carte";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_id(source: Source) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(char::from)
        .collect::<String>()
        .to_lowercase();
    format!("{}-{}", source.as_str(), suffix)
}

/// Parse a European statement amount: comma decimal separator, optional
/// space/apostrophe digit grouping. Returns None for empty or unparseable
/// input. `f64::from_str` accepts "nan"/"inf" spellings, which are never
/// valid money, so non-finite results are rejected too.
pub fn parse_amount_eu(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\'' && *c != '\u{2019}' && *c != '"')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok().filter(|v: &f64| v.is_finite())
}

/// DD.MM.YYYY -> YYYY-MM-DD, None when the pieces do not form a real date.
pub fn convert_card_date(raw: &str) -> Option<String> {
    let parts: Vec<&str> = raw.trim().split('.').collect();
    if parts.len() != 3 {
        return None;
    }
    let d: u32 = parts[0].parse().ok()?;
    let m: u32 = parts[1].parse().ok()?;
    let y: i32 = parts[2].parse().ok()?;
    NaiveDate::from_ymd_opt(y, m, d).map(|dt| dt.format("%Y-%m-%d").to_string())
}

fn is_iso_date(raw: &str) -> bool {
    raw.len() == 10 && NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok()
}

/// Best-effort counterparty name from an account description field: the
/// leading letters-only segment before a comma or digit run (address
/// boundary), else the first 30 characters.
pub fn extract_name(description: &str) -> Option<String> {
    let clean = description.trim().trim_matches('"').trim();
    if clean.is_empty() {
        return None;
    }
    let boundary = Regex::new(r"^([^,\d]+)(?:[,\s]+\d+.*)?$").ok();
    if let Some(re) = boundary {
        if let Some(caps) = re.captures(clean) {
            return Some(caps[1].trim().to_string());
        }
    }
    Some(clean.chars().take(30).collect())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

// ---------------------------------------------------------------------------
// Card format
// ---------------------------------------------------------------------------

pub fn parse_card_file(path: &Path) -> Result<Vec<Transaction>> {
    let bytes = std::fs::read(path)?;
    // Card statements ship in the bank's legacy 8-bit code page.
    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
    parse_card(&text, &file_label(path))
}

/// Parse card rows: a `sep=;` marker line, then the semicolon header, then
/// data. Settlement amounts live in the Debit/Credit columns; Montant/Cours
/// carry the pre-conversion amount and exchange rate.
pub fn parse_card(text: &str, file: &str) -> Result<Vec<Transaction>> {
    let body = text
        .split_once('\n')
        .map(|(_, rest)| rest)
        .ok_or_else(|| CentimeError::format(file, "file has no header line"))?;

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(body.as_bytes());
    let headers = rdr.headers()?.clone();
    let col = |name: &str| headers.iter().position(|h| h.trim() == name);

    let idx_date = col("Date d'achat")
        .ok_or_else(|| CentimeError::format(file, "missing column: Date d'achat"))?;
    let idx_desc = col("Texte comptable")
        .ok_or_else(|| CentimeError::format(file, "missing column: Texte comptable"))?;
    let idx_debit = col("Debit");
    let idx_credit = col("Credit");
    let idx_montant = col("Montant");
    let idx_cours = col("Cours");
    let idx_currency = col("Monnaie originale");
    let idx_sector = col("Secteur");
    if idx_debit.is_none() && idx_credit.is_none() && idx_montant.is_none() {
        return Err(CentimeError::format(file, "missing amount columns (Debit/Credit/Montant)"));
    }

    let mut txns = Vec::new();
    for result in rdr.records() {
        let Ok(record) = result else { continue };
        let get = |i: Option<usize>| i.and_then(|i| record.get(i)).unwrap_or("").trim();

        let Some(date) = convert_card_date(record.get(idx_date).unwrap_or("")) else {
            continue;
        };
        let description = record.get(idx_desc).unwrap_or("").trim().to_string();
        let sector = get(idx_sector).to_string();

        let original_amount = parse_amount_eu(get(idx_montant)).unwrap_or(0.0);
        let exchange_rate = parse_amount_eu(get(idx_cours)).unwrap_or(0.0);
        let original_currency = {
            let c = get(idx_currency);
            if c.is_empty() { "CHF" } else { c }.to_string()
        };

        // Debit wins, then Credit, then the converted original amount.
        let (kind, amount, value) = if let Some(debit) = parse_amount_eu(get(idx_debit)) {
            (TxnType::Expense, debit, -debit)
        } else if let Some(credit) = parse_amount_eu(get(idx_credit)) {
            (TxnType::Income, credit, credit)
        } else {
            let chf = original_amount * exchange_rate;
            (TxnType::Expense, chf, -chf)
        };

        let hidden = description.trim() == INTERNAL_TRANSFER_MARKER
            || description.contains(CARD_PAYMENT_MARKER);

        txns.push(Transaction {
            id: new_id(Source::Card),
            date,
            category: classify(&description, &sector),
            description,
            amount,
            value,
            kind,
            source: Source::Card,
            hidden,
            original_amount: Some(original_amount),
            original_currency: Some(original_currency),
            recipient: None,
            sender: None,
        });
    }
    Ok(txns)
}

// ---------------------------------------------------------------------------
// Account format
// ---------------------------------------------------------------------------

pub fn parse_account_file(path: &Path) -> Result<Vec<Transaction>> {
    let text = std::fs::read_to_string(path)?;
    parse_account(&text, &file_label(path))
}

/// Parse account rows: semicolon CSV with the header first and quoted
/// fields. Rows without a valid ISO date or with a zero/unparseable amount
/// are skipped, not errors; statement exports routinely contain balance and
/// notice rows.
pub fn parse_account(text: &str, file: &str) -> Result<Vec<Transaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = rdr.headers()?.clone();
    let col = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().trim_matches('"') == name)
    };

    let idx_date = col("Date de transaction")
        .ok_or_else(|| CentimeError::format(file, "missing column: Date de transaction"))?;
    let idx_debit = col("Debit");
    let idx_credit = col("Credit");
    let idx_d1 = col("Description1");
    let idx_d2 = col("Description2");
    let idx_d3 = col("Description3");

    let mut txns = Vec::new();
    for result in rdr.records() {
        let Ok(record) = result else { continue };
        let get = |i: Option<usize>| i.and_then(|i| record.get(i)).unwrap_or("").trim();

        let date = get(Some(idx_date));
        if !is_iso_date(date) {
            continue;
        }

        let (kind, value) = if let Some(debit) = parse_amount_eu(get(idx_debit)) {
            (TxnType::Expense, -debit)
        } else if let Some(credit) = parse_amount_eu(get(idx_credit)) {
            (TxnType::Income, credit)
        } else {
            continue;
        };
        if value == 0.0 || value.is_nan() {
            continue;
        }
        let amount = value.abs();

        let d1 = get(idx_d1);
        let d2 = get(idx_d2);
        let d3 = get(idx_d3);
        let description = [d1, d2, d3]
            .iter()
            .filter(|d| !d.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" - ");

        let (recipient, sender) = match kind {
            TxnType::Expense => (extract_name(d1), None),
            TxnType::Income => (None, extract_name(d1)),
        };

        let hidden = description.trim() == INTERNAL_TRANSFER_MARKER;

        txns.push(Transaction {
            id: new_id(Source::Account),
            date: date.to_string(),
            category: classify(&description, ""),
            description,
            amount,
            value,
            kind,
            source: Source::Account,
            hidden,
            original_amount: None,
            original_currency: None,
            recipient,
            sender,
        });
    }
    Ok(txns)
}

// ---------------------------------------------------------------------------
// Import driver
// ---------------------------------------------------------------------------

/// Parse every supplied statement file, routed by filename, and merge the
/// results into one collection sorted by date descending. Any file failing
/// to parse aborts the whole import; there is no partial commit.
pub fn import_files(paths: &[std::path::PathBuf]) -> Result<Vec<Transaction>> {
    let mut all = Vec::new();
    for path in paths {
        let name = file_label(path);
        if name.contains("card_transactions") {
            all.extend(parse_card_file(path)?);
        } else if name.contains("account_transactions") {
            all.extend(parse_account_file(path)?);
        } else {
            return Err(CentimeError::format(
                name,
                "unrecognized statement (expected 'card_transactions' or 'account_transactions' in the file name)",
            ));
        }
    }
    all.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    const CARD_HEADER: &str =
        "Compte;Date d'achat;Texte comptable;Secteur;Montant;Monnaie originale;Cours;Debit;Credit";

    fn card_csv(rows: &[&str]) -> String {
        let mut s = format!("sep=;\n{CARD_HEADER}\n");
        for row in rows {
            s.push_str(row);
            s.push('\n');
        }
        s
    }

    const ACCOUNT_HEADER: &str =
        "\"Date de transaction\";\"Heure\";\"Debit\";\"Credit\";\"Description1\";\"Description2\";\"Description3\"";

    fn account_csv(rows: &[&str]) -> String {
        let mut s = format!("{ACCOUNT_HEADER}\n");
        for row in rows {
            s.push_str(row);
            s.push('\n');
        }
        s
    }

    #[test]
    fn test_parse_amount_eu() {
        assert_eq!(parse_amount_eu("12,50"), Some(12.5));
        assert_eq!(parse_amount_eu("2'500.00"), Some(2500.0));
        assert_eq!(parse_amount_eu("1 234,56"), Some(1234.56));
        assert_eq!(parse_amount_eu("0"), Some(0.0));
        assert_eq!(parse_amount_eu(""), None);
        assert_eq!(parse_amount_eu("   "), None);
        assert_eq!(parse_amount_eu("n/a"), None);
        // f64::from_str would happily produce these.
        assert_eq!(parse_amount_eu("nan"), None);
        assert_eq!(parse_amount_eu("NaN"), None);
        assert_eq!(parse_amount_eu("inf"), None);
        assert_eq!(parse_amount_eu("-infinity"), None);
    }

    #[test]
    fn test_card_non_finite_cells_never_reach_amounts() {
        let text = card_csv(&["123;15.01.2025;GARAGE X;;nan;CHF;inf;nan;"]);
        let txns = parse_card(&text, "card_transactions.csv").unwrap();
        assert_eq!(txns.len(), 1);
        assert!(txns[0].amount.is_finite());
        assert!(txns[0].value.is_finite());
        assert_eq!(txns[0].original_amount, Some(0.0));
    }

    #[test]
    fn test_convert_card_date() {
        assert_eq!(convert_card_date("15.01.2025"), Some("2025-01-15".to_string()));
        assert_eq!(convert_card_date("31.12.2024"), Some("2024-12-31".to_string()));
        assert_eq!(convert_card_date("30.02.2025"), None);
        assert_eq!(convert_card_date("2025-01-15"), None);
        assert_eq!(convert_card_date(""), None);
    }

    #[test]
    fn test_extract_name() {
        assert_eq!(
            extract_name("\"Jean Dupont, 12 Rue du Stand\""),
            Some("Jean Dupont".to_string())
        );
        assert_eq!(extract_name("Regie Immobiliere SA"), Some("Regie Immobiliere SA".to_string()));
        assert_eq!(extract_name(""), None);
        assert_eq!(extract_name("\"\""), None);
        // No clean boundary: first 30 chars.
        let long = "a1b2 very long mixed string with digits 123 everywhere in it";
        assert_eq!(extract_name(long).unwrap().chars().count(), 30);
    }

    #[test]
    fn test_card_debit_row_is_hidden_expense() {
        // End-to-end scenario from the statement fixtures: a card payment
        // settlement row must come out hidden with value -12.50.
        let text = card_csv(&["123;15.01.2025;Paiement à une carte;;12,50;CHF;1,00;12,50;"]);
        let txns = parse_card(&text, "card_transactions.csv").unwrap();
        assert_eq!(txns.len(), 1);
        let t = &txns[0];
        assert_eq!(t.kind, TxnType::Expense);
        assert_eq!(t.value, -12.5);
        assert_eq!(t.amount, 12.5);
        assert!(t.hidden);
        assert_eq!(t.date, "2025-01-15");
        assert_eq!(t.source, Source::Card);
        assert!(t.id.starts_with("card-"));
    }

    #[test]
    fn test_card_credit_and_conversion_fallback() {
        let text = card_csv(&[
            "123;10.01.2025;Remboursement;;50,00;CHF;1,00;;50,00",
            "123;11.01.2025;FOREIGN SHOP;;100,00;EUR;0,95;;",
        ]);
        let txns = parse_card(&text, "card_transactions.csv").unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].kind, TxnType::Income);
        assert_eq!(txns[0].value, 50.0);
        // No Debit/Credit: originalAmount x exchange rate, as an expense.
        assert_eq!(txns[1].kind, TxnType::Expense);
        assert!((txns[1].amount - 95.0).abs() < 1e-9);
        assert_eq!(txns[1].value, -txns[1].amount);
        assert_eq!(txns[1].original_amount, Some(100.0));
        assert_eq!(txns[1].original_currency, Some("EUR".to_string()));
    }

    #[test]
    fn test_card_rows_without_valid_date_are_dropped() {
        let text = card_csv(&[
            ";;Solde reporté;;;;;;",
            "123;15.01.2025;MIGROS GENEVE;Alimentation;20,00;CHF;1,00;20,00;",
        ]);
        let txns = parse_card(&text, "card_transactions.csv").unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].category, Category::new("Home", "Groceries"));
    }

    #[test]
    fn test_card_missing_column_is_format_error() {
        let text = "sep=;\nCompte;Quand;Quoi\n1;2;3\n";
        let err = parse_card(text, "card_transactions.csv").unwrap_err();
        assert!(err.to_string().contains("card_transactions.csv"));
        assert!(err.to_string().contains("Date d'achat"));
    }

    #[test]
    fn test_card_internal_transfer_marker_hides() {
        let text = card_csv(&["123;15.01.2025;TRANSFERT D'UN COMPTE;;10,00;CHF;1,00;10,00;"]);
        let txns = parse_card(&text, "card_transactions.csv").unwrap();
        assert!(txns[0].hidden);
    }

    #[test]
    fn test_card_file_decodes_windows_1252() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card_transactions.csv");
        // "Paiement à une carte" with 0xE0 for à, as the bank writes it.
        let mut bytes = format!("sep=;\n{CARD_HEADER}\n").into_bytes();
        bytes.extend_from_slice(b"123;15.01.2025;Paiement \xe0 une carte;;12,50;CHF;1,00;12,50;\n");
        std::fs::write(&path, &bytes).unwrap();
        let txns = parse_card_file(&path).unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].description, "Paiement à une carte");
        assert!(txns[0].hidden);
    }

    #[test]
    fn test_account_credit_with_grouping_marks() {
        // End-to-end scenario: grouped credit cleaned to 2500.00, salary
        // classification from the employer name.
        let text = account_csv(&[
            "2025-01-25;08:00;;\"2'500.00\";\"Hopitaux Universitaires de Geneve\";\"Salaire\";",
        ]);
        let txns = parse_account(&text, "account_transactions.csv").unwrap();
        assert_eq!(txns.len(), 1);
        let t = &txns[0];
        assert_eq!(t.kind, TxnType::Income);
        assert_eq!(t.value, 2500.0);
        assert_eq!(t.amount, 2500.0);
        assert_eq!(t.category, Category::new("Income", "Salary"));
        assert_eq!(t.sender, Some("Hopitaux Universitaires de Geneve".to_string()));
        assert_eq!(t.recipient, None);
    }

    #[test]
    fn test_account_debit_sets_recipient_only() {
        let text = account_csv(&[
            "2025-01-10;12:00;\"45,90\";;\"Jean Dupont, 12 Rue du Stand\";\"facture\";",
        ]);
        let txns = parse_account(&text, "account_transactions.csv").unwrap();
        let t = &txns[0];
        assert_eq!(t.kind, TxnType::Expense);
        assert_eq!(t.value, -45.9);
        assert_eq!(t.recipient, Some("Jean Dupont".to_string()));
        assert_eq!(t.sender, None);
        assert_eq!(t.description, "Jean Dupont, 12 Rue du Stand - facture");
    }

    #[test]
    fn test_account_drops_bad_dates_and_zero_amounts() {
        let text = account_csv(&[
            ";;\"10,00\";;\"no date\";;",
            "25-01-2025;;\"10,00\";;\"wrong date format\";;",
            "2025-01-05;;\"0,00\";;\"zero\";;",
            "2025-01-06;;;;\"no amount at all\";;",
            "2025-01-07;;\"15,00\";;\"keep me\";;",
        ]);
        let txns = parse_account(&text, "account_transactions.csv").unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].date, "2025-01-07");
    }

    #[test]
    fn test_account_missing_date_column_is_format_error() {
        let text = "\"Datum\";\"Debit\";\"Credit\"\n2025-01-01;\"5,00\";\n";
        let err = parse_account(text, "account_transactions.csv").unwrap_err();
        assert!(err.to_string().contains("Date de transaction"));
    }

    #[test]
    fn test_import_files_merges_and_sorts_descending() {
        let dir = tempfile::tempdir().unwrap();
        let card = dir.path().join("card_transactions.csv");
        let account = dir.path().join("account_transactions.csv");
        std::fs::write(&card, card_csv(&["1;15.01.2025;MIGROS;;5,00;CHF;1,00;5,00;"])).unwrap();
        std::fs::write(
            &account,
            account_csv(&[
                "2025-02-01;;\"10,00\";;\"later\";;",
                "2025-01-01;;\"10,00\";;\"earlier\";;",
            ]),
        )
        .unwrap();
        let txns = import_files(&[account.clone(), card.clone()]).unwrap();
        assert_eq!(txns.len(), 3);
        assert_eq!(txns[0].date, "2025-02-01");
        assert_eq!(txns[1].date, "2025-01-15");
        assert_eq!(txns[2].date, "2025-01-01");
    }

    #[test]
    fn test_import_files_rejects_unknown_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statement.csv");
        std::fs::write(&path, "a;b;c\n").unwrap();
        let err = import_files(&[path]).unwrap_err();
        assert!(err.to_string().contains("statement.csv"));
    }

    #[test]
    fn test_unique_ids_and_amount_value_invariant() {
        let text = card_csv(&[
            "1;15.01.2025;A;;5,00;CHF;1,00;5,00;",
            "1;16.01.2025;B;;6,00;CHF;1,00;;6,00",
            "1;17.01.2025;C;;7,00;CHF;1,00;7,00;",
        ]);
        let txns = parse_card(&text, "card_transactions.csv").unwrap();
        let ids: std::collections::HashSet<_> = txns.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids.len(), txns.len());
        for t in &txns {
            assert!(t.amount >= 0.0);
            assert_eq!(t.amount, t.value.abs());
            match t.kind {
                TxnType::Expense => assert!(t.value <= 0.0),
                TxnType::Income => assert!(t.value >= 0.0),
            }
        }
    }
}
