mod catalog;
mod cli;
mod enricher;
mod error;
mod fmt;
mod logging;
mod models;
mod parser;
mod reader;
mod reports;
mod settings;
mod storage;
mod validator;

use clap::Parser;

use cli::{Cli, Commands, RunArgs};

fn main() {
    logging::init_logging();
    let cli = Cli::parse();

    let result = match cli.command.unwrap_or_else(|| Commands::Run(RunArgs::default())) {
        Commands::Run(args) => cli::run::run(args.into()).map(|_| ()),
        Commands::Report { enriched, output } => {
            cli::report::run(enriched, output).map_err(Into::into)
        }
        Commands::Catalog { file, url } => cli::catalog::run(file, url).map_err(Into::into),
        Commands::Config {
            data_dir,
            catalog_url,
            timeout_secs,
        } => cli::config::run(data_dir, catalog_url, timeout_secs).map_err(Into::into),
    };

    if let Err(e) = result {
        eprintln!("ERROR: {e:#}");
        std::process::exit(1);
    }
}
