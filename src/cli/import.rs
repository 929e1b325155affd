use std::path::PathBuf;

use crate::error::{CentimeError, Result};
use crate::importer::import_files;
use crate::models::Source;
use crate::settings::snapshot_path;
use crate::store::Ledger;

pub fn run(files: &[String]) -> Result<()> {
    if files.is_empty() {
        return Err(CentimeError::Other(
            "no files given; pass one or more CSV exports".to_string(),
        ));
    }

    let paths: Vec<PathBuf> = files.iter().map(PathBuf::from).collect();
    let txns = import_files(&paths)?;

    let card = txns.iter().filter(|t| t.source == Source::Card).count();
    let account = txns.len() - card;

    let mut ledger = Ledger::default();
    ledger.replace(txns);
    ledger.save(&snapshot_path())?;

    println!(
        "Imported {} transactions ({card} card, {account} account)",
        ledger.len()
    );
    Ok(())
}
