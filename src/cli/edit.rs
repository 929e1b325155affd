use crate::cli::{load_ledger, FilterArgs};
use crate::error::Result;
use crate::settings::snapshot_path;

pub fn category(id: &str, name: &str, sub: &str) -> Result<()> {
    let mut ledger = load_ledger()?;
    ledger.set_category(id, name, sub)?;
    ledger.save(&snapshot_path())?;
    if sub.is_empty() {
        println!("Set {id} to {name}");
    } else {
        println!("Set {id} to {name} / {sub}");
    }
    Ok(())
}

pub fn set_hidden(id: &str, hidden: bool) -> Result<()> {
    let mut ledger = load_ledger()?;
    ledger.set_hidden(id, hidden)?;
    ledger.save(&snapshot_path())?;
    println!("{} {id}", if hidden { "Hid" } else { "Unhid" });
    Ok(())
}

pub fn set_hidden_all(filter_args: &FilterArgs, hidden: bool) -> Result<()> {
    let mut ledger = load_ledger()?;
    let touched = ledger.set_hidden_where(&filter_args.to_filter(), hidden);
    ledger.save(&snapshot_path())?;
    println!(
        "{} {touched} transactions",
        if hidden { "Hid" } else { "Unhid" }
    );
    Ok(())
}
