pub mod catalog;
pub mod config;
pub mod prompt;
pub mod report;
pub mod run;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sales-analytics",
    about = "Validate sales transactions, enrich them from the product catalog and write a report."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline (default when no command is given).
    Run(RunArgs),
    /// Rebuild the report from a saved enriched file.
    Report {
        /// Enriched file (default: <data_dir>/data/enriched_sales_data.txt)
        #[arg(long)]
        enriched: Option<PathBuf>,
        /// Report destination (default: <data_dir>/output/sales_report.txt)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Fetch the product catalog and list it.
    Catalog {
        /// Read the catalog from a JSON file instead of the service
        #[arg(long)]
        file: Option<PathBuf>,
        /// Override the catalog URL
        #[arg(long)]
        url: Option<String>,
    },
    /// Show or update settings.
    Config {
        /// Base directory for relative input/output paths
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Catalog service URL
        #[arg(long = "catalog-url")]
        catalog_url: Option<String>,
        /// Catalog request timeout in seconds
        #[arg(long = "timeout")]
        timeout_secs: Option<u64>,
    },
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Sales file (default: <data_dir>/data/sales_data.txt)
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Keep only this region (exact, case-sensitive); skips the prompt
    #[arg(long)]
    pub region: Option<String>,
    /// Drop transactions whose amount is below this
    #[arg(long = "min-amount")]
    pub min_amount: Option<f64>,
    /// Drop transactions whose amount is above this
    #[arg(long = "max-amount")]
    pub max_amount: Option<f64>,
    /// Never ask for a region filter
    #[arg(long = "no-prompt")]
    pub no_prompt: bool,
    /// Skip the catalog service; nothing will be enriched
    #[arg(long, conflicts_with = "catalog_file")]
    pub offline: bool,
    /// Read the catalog from a JSON file instead of the service
    #[arg(long = "catalog-file")]
    pub catalog_file: Option<PathBuf>,
    /// Where to write the enriched dataset
    #[arg(long = "enriched-out")]
    pub enriched_out: Option<PathBuf>,
    /// Where to write the report
    #[arg(long = "report-out")]
    pub report_out: Option<PathBuf>,
}

impl From<RunArgs> for run::RunOptions {
    fn from(a: RunArgs) -> Self {
        run::RunOptions {
            input: a.input,
            region: a.region,
            min_amount: a.min_amount,
            max_amount: a.max_amount,
            no_prompt: a.no_prompt,
            offline: a.offline,
            catalog_file: a.catalog_file,
            enriched_out: a.enriched_out,
            report_out: a.report_out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_flags() {
        let cli = Cli::try_parse_from([
            "sales-analytics",
            "run",
            "--region",
            "North",
            "--min-amount",
            "100",
            "--offline",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.region.as_deref(), Some("North"));
                assert_eq!(args.min_amount, Some(100.0));
                assert!(args.offline);
                assert!(args.max_amount.is_none());
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["sales-analytics"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_offline_conflicts_with_catalog_file() {
        let res = Cli::try_parse_from([
            "sales-analytics",
            "run",
            "--offline",
            "--catalog-file",
            "c.json",
        ]);
        assert!(res.is_err());
    }
}
