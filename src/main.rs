mod aggregate;
mod classifier;
mod cli;
mod error;
mod fmt;
mod importer;
mod models;
mod query;
mod settings;
mod store;

use clap::Parser;

use cli::{Cli, Commands, EditCommands, ReportCommands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Import { files } => cli::import::run(&files),
        Commands::List {
            filter,
            no_hidden,
            sort,
            descending,
            ascending,
            limit,
            all,
        } => cli::list::run(&filter, no_hidden, sort, descending, ascending, limit, all),
        Commands::Report { command } => match command {
            ReportCommands::Totals {
                filter,
                with_hidden,
            } => cli::report::show_totals(&filter, with_hidden),
            ReportCommands::Monthly {
                filter,
                with_hidden,
            } => cli::report::show_monthly(&filter, with_hidden),
            ReportCommands::Categories {
                filter,
                with_hidden,
            } => cli::report::show_categories(&filter, with_hidden),
            ReportCommands::Rolling {
                days,
                filter,
                with_hidden,
            } => cli::report::show_rolling(days, &filter, with_hidden),
        },
        Commands::Edit { command } => match command {
            EditCommands::Category { id, category, sub } => {
                cli::edit::category(&id, &category, &sub)
            }
            EditCommands::Hide { id } => cli::edit::set_hidden(&id, true),
            EditCommands::Unhide { id } => cli::edit::set_hidden(&id, false),
            EditCommands::HideAll { filter } => cli::edit::set_hidden_all(&filter, true),
            EditCommands::UnhideAll { filter } => cli::edit::set_hidden_all(&filter, false),
        },
        Commands::Export { path } => cli::snapshot::export(&path),
        Commands::Load { path } => cli::snapshot::load(&path),
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
