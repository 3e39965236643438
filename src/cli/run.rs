use std::path::PathBuf;

use anyhow::Context;
use colored::Colorize;
use comfy_table::Table;
use tracing::{debug, warn};

use crate::catalog::{
    create_product_mapping, fetch_all_products, CatalogSource, FileCatalog, HttpCatalog,
    OfflineCatalog,
};
use crate::cli::prompt::{ConsolePrompt, FilterPrompt, FixedRegion};
use crate::cli::report::{format_region_table, generate_sales_report};
use crate::enricher::{enrich_sales_data, save_enriched_data};
use crate::fmt::money;
use crate::parser::parse_transactions;
use crate::reader::read_sales_data_or_empty;
use crate::settings::{load_settings, Settings};
use crate::validator::{validate_and_filter, FilterOptions, ValidationSummary};

const STEPS: usize = 10;

#[derive(Debug, Default, Clone)]
pub struct RunOptions {
    pub input: Option<PathBuf>,
    pub region: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub no_prompt: bool,
    pub offline: bool,
    pub catalog_file: Option<PathBuf>,
    pub enriched_out: Option<PathBuf>,
    pub report_out: Option<PathBuf>,
}

/// Counts from one pipeline run, for the caller and for tests.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub lines_read: usize,
    pub parsed: usize,
    pub rejected_lines: usize,
    pub validation: ValidationSummary,
    pub enriched_saved: usize,
    pub matched: usize,
    pub report_path: Option<PathBuf>,
}

fn step(n: usize, msg: &str) {
    println!("{}", format!("[{n}/{STEPS}] {msg}").bold());
}

fn catalog_source(opts: &RunOptions, settings: &Settings) -> Box<dyn CatalogSource> {
    if opts.offline {
        Box::new(OfflineCatalog)
    } else if let Some(path) = &opts.catalog_file {
        Box::new(FileCatalog { path: path.clone() })
    } else {
        Box::new(HttpCatalog::new(
            settings.catalog_url.clone(),
            settings.catalog_timeout_secs,
        ))
    }
}

fn print_validation(summary: &ValidationSummary) {
    let mut table = Table::new();
    table.set_header(vec!["Total Input", "Invalid", "Retained"]);
    table.add_row(vec![
        summary.total_input.to_string(),
        summary.invalid.to_string(),
        summary.final_count.to_string(),
    ]);
    println!("{table}");
}

pub fn run(opts: RunOptions) -> anyhow::Result<RunSummary> {
    let settings = load_settings().context("loading settings")?;
    let prompt: Box<dyn FilterPrompt> = if opts.no_prompt || opts.region.is_some() {
        Box::new(FixedRegion(opts.region.clone()))
    } else {
        Box::new(ConsolePrompt)
    };
    run_with(&opts, &settings, prompt.as_ref())
}

pub fn run_with(
    opts: &RunOptions,
    settings: &Settings,
    prompt: &dyn FilterPrompt,
) -> anyhow::Result<RunSummary> {
    let input = opts
        .input
        .clone()
        .unwrap_or_else(|| settings.resolve(&settings.input_file));
    let enriched_path = opts
        .enriched_out
        .clone()
        .unwrap_or_else(|| settings.resolve(&settings.enriched_file));
    let report_path = opts
        .report_out
        .clone()
        .unwrap_or_else(|| settings.resolve(&settings.report_file));

    println!("{}", "=".repeat(40));
    println!("{}", "SALES ANALYTICS SYSTEM".bold());
    println!("{}", "=".repeat(40));

    step(1, "Reading sales data...");
    let lines = read_sales_data_or_empty(&input);
    println!("{} Read {} transactions from {}", "✓".green(), lines.len(), input.display());

    step(2, "Parsing and cleaning data...");
    let parsed = parse_transactions(&lines);
    println!("{} Parsed {} records", "✓".green(), parsed.transactions.len());
    if !parsed.rejected.is_empty() {
        println!(
            "{}",
            format!("  {} malformed lines dropped", parsed.rejected.len()).yellow()
        );
        for r in &parsed.rejected {
            debug!(line = r.line, reason = %r.reason, "rejected");
        }
    }

    step(3, "Filter options...");
    let filter = FilterOptions {
        region: prompt.ask_filter_region(),
        min_amount: opts.min_amount,
        max_amount: opts.max_amount,
    };

    step(4, "Validating transactions...");
    let outcome = validate_and_filter(&parsed.transactions, &filter);
    if outcome.profile.regions.is_empty() {
        println!("  Regions: no data");
    } else {
        let regions: Vec<&str> = outcome.profile.regions.iter().map(String::as_str).collect();
        println!("  Regions: {}", regions.join(", "));
    }
    match outcome.profile.amount_range {
        Some((lo, hi)) => println!("  Amount Range: {} - {}", money(lo), money(hi)),
        None => println!("  Amount Range: no data"),
    }
    print_validation(&outcome.summary);
    println!(
        "{} Valid: {} | Invalid: {}",
        "✓".green(),
        outcome.valid.len(),
        outcome.invalid_count
    );

    step(5, "Fetching product data from API...");
    let source = catalog_source(opts, settings);
    let products = fetch_all_products(source.as_ref());
    if products.is_empty() {
        println!("{}", "⚠ Catalog unavailable, enrichment will match nothing".yellow());
    } else {
        println!("{} Fetched {} products", "✓".green(), products.len());
    }

    step(6, "Creating product mapping...");
    let mapping = create_product_mapping(&products);

    step(7, "Enriching sales data...");
    let enriched = enrich_sales_data(&outcome.valid, &mapping);
    let matched = enriched.iter().filter(|e| e.api_match).count();
    println!("{} Enriched {}/{} transactions", "✓".green(), matched, enriched.len());

    step(8, "Saving enriched data...");
    let enriched_saved = match save_enriched_data(&enriched, &enriched_path) {
        Ok(0) => {
            println!("{}", "⚠ No enriched transactions to save.".yellow());
            0
        }
        Ok(n) => {
            println!("{} Enriched data saved to: {}", "✓".green(), enriched_path.display());
            n
        }
        Err(e) => {
            warn!("{e}");
            println!("{}", format!("⚠ File save error: {e}").yellow());
            0
        }
    };

    step(9, "Generating report...");
    let written_report = match generate_sales_report(&outcome.valid, &enriched, &report_path) {
        Ok(report) => {
            println!("{}", format_region_table(&report));
            println!("{} Report saved to: {}", "✓".green(), report_path.display());
            Some(report_path)
        }
        Err(e) => {
            warn!("{e}");
            println!("{}", format!("⚠ Report save error: {e}").yellow());
            None
        }
    };

    step(10, "Process Complete!");
    println!("{}", "=".repeat(40));

    Ok(RunSummary {
        lines_read: lines.len(),
        parsed: parsed.transactions.len(),
        rejected_lines: parsed.rejected.len(),
        validation: outcome.summary,
        enriched_saved,
        matched,
        report_path: written_report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enricher::load_enriched_data;

    const SALES: &str = "\
TransactionID|Date|ProductID|ProductName|Quantity|UnitPrice|CustomerID|Region
T001|2024-12-01|P101|Laptop|2|45,000.00|C001|North
T002|2024-12-01|P102|Mouse,Wireless|10|500|C002|South
T003|2024-12-02|P101|Laptop|1|45000|C003|North
T004|2024-12-02|P999|Webcam|0|1200|C004|East
X005|2024-12-03|P102|Mouse Wireless|1|500|C001|South
T006|2024-12-03|P103|broken line
";

    const CATALOG: &str = r#"{"products":[{"id":101,"title":"Laptop","category":"laptops","brand":"Apple","rating":4.5},{"id":102,"title":"Mouse","category":"accessories"}]}"#;

    fn fixture(dir: &std::path::Path) -> (Settings, RunOptions) {
        std::fs::create_dir_all(dir.join("data")).unwrap();
        std::fs::write(dir.join("data/sales_data.txt"), SALES).unwrap();
        std::fs::write(dir.join("catalog.json"), CATALOG).unwrap();
        let settings = Settings {
            data_dir: dir.to_string_lossy().to_string(),
            ..Settings::default()
        };
        let opts = RunOptions {
            no_prompt: true,
            catalog_file: Some(dir.join("catalog.json")),
            ..RunOptions::default()
        };
        (settings, opts)
    }

    #[test]
    fn test_full_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let (settings, opts) = fixture(dir.path());
        let summary = run_with(&opts, &settings, &FixedRegion(None)).unwrap();
        assert_eq!(summary.lines_read, 6);
        assert_eq!(summary.parsed, 5);
        assert_eq!(summary.rejected_lines, 1);
        assert_eq!(
            summary.validation,
            ValidationSummary { total_input: 5, invalid: 2, final_count: 3 }
        );
        assert_eq!(summary.enriched_saved, 3);
        assert_eq!(summary.matched, 3);

        let enriched = load_enriched_data(&dir.path().join("data/enriched_sales_data.txt")).unwrap();
        assert_eq!(enriched.len(), 3);
        assert_eq!(enriched[1].product_name, "Mouse Wireless");
        assert_eq!(enriched[0].api_brand.as_deref(), Some("Apple"));

        let report = std::fs::read_to_string(dir.path().join("output/sales_report.txt")).unwrap();
        assert!(report.contains("Total Revenue: ₹140,000.00"));
        assert!(report.contains("Success Rate: 100.00%"));
    }

    #[test]
    fn test_region_filter_from_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let (settings, opts) = fixture(dir.path());
        let summary = run_with(&opts, &settings, &FixedRegion(Some("North".into()))).unwrap();
        assert_eq!(summary.validation.final_count, 2);
        assert_eq!(summary.validation.invalid, 2);
    }

    #[test]
    fn test_offline_run_keeps_sales_figures() {
        let dir = tempfile::tempdir().unwrap();
        let (settings, mut opts) = fixture(dir.path());
        opts.offline = true;
        let summary = run_with(&opts, &settings, &FixedRegion(None)).unwrap();
        assert_eq!(summary.matched, 0);
        assert_eq!(summary.validation.final_count, 3);
        let report = std::fs::read_to_string(dir.path().join("output/sales_report.txt")).unwrap();
        assert!(report.contains("Total Revenue: ₹140,000.00"));
        assert!(report.contains("Success Rate: 0.00%"));
        assert!(report.contains("Products Not Enriched:\n- Laptop\n- Mouse Wireless\n"));
    }

    #[test]
    fn test_missing_input_degrades_to_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            data_dir: dir.path().to_string_lossy().to_string(),
            ..Settings::default()
        };
        let opts = RunOptions {
            no_prompt: true,
            offline: true,
            ..RunOptions::default()
        };
        let summary = run_with(&opts, &settings, &FixedRegion(None)).unwrap();
        assert_eq!(summary.lines_read, 0);
        assert_eq!(summary.enriched_saved, 0);
        assert!(!dir.path().join("data/enriched_sales_data.txt").exists());
        let report = std::fs::read_to_string(dir.path().join("output/sales_report.txt")).unwrap();
        assert!(report.contains("Date Range: N/A"));
        assert!(report.contains("Records Processed: 0"));
    }
}
