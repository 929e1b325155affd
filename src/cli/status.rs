use crate::error::Result;
use crate::settings::{load_settings, snapshot_path};
use crate::store::Ledger;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let path = snapshot_path();

    println!("Data dir:   {}", settings.data_dir);
    println!("Snapshot:   {}", path.display());
    println!("Currency:   {}", settings.currency);

    if path.exists() {
        let mut ledger = Ledger::default();
        ledger.load(&path)?;

        println!();
        println!("Transactions:  {}", ledger.len());
        let categories = ledger.category_names();
        let subcategories: usize = categories
            .iter()
            .map(|c| ledger.subcategories_of(c).len())
            .sum();
        println!("Categories:    {} ({subcategories} subcategories)", categories.len());
        let hidden = ledger.transactions().iter().filter(|t| t.hidden).count();
        println!("Hidden:        {hidden}");
        if let Some((first, last)) = ledger.date_range() {
            println!("Range:         {first} to {last}");
        }
    } else {
        println!();
        println!("No snapshot yet. Run `centime import` to get started.");
    }

    Ok(())
}
