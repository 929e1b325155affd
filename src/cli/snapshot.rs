use std::path::PathBuf;

use crate::cli::load_ledger;
use crate::error::Result;
use crate::settings::snapshot_path;
use crate::store::Ledger;

pub fn export(path: &str) -> Result<()> {
    let ledger = load_ledger()?;
    let out = PathBuf::from(path);
    ledger.save(&out)?;
    println!("Wrote {} transactions to {}", ledger.len(), out.display());
    Ok(())
}

/// Replace the current transactions with a snapshot from `path`. The file is
/// validated before anything is overwritten, so a bad file leaves the
/// current data alone.
pub fn load(path: &str) -> Result<()> {
    let mut ledger = Ledger::default();
    let count = ledger.load(&PathBuf::from(path))?;
    ledger.save(&snapshot_path())?;
    println!("Loaded {count} transactions from {path}");
    Ok(())
}
