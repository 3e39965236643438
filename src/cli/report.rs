use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use comfy_table::{Cell, Table};

use colored::Colorize;

use crate::enricher::load_enriched_data;
use crate::error::Result;
use crate::fmt::{grouped, money, percent, CURRENCY};
use crate::models::{EnrichedTransaction, Transaction};
use crate::reports::{self, SalesReport};
use crate::settings::load_settings;
use crate::storage::write_atomic;

const WIDTH: usize = 45;

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "-".repeat(WIDTH));
}

/// Build the report from the valid and enriched sets, write it to `path`
/// and hand back the numbers for console display.
pub fn generate_sales_report(
    valid: &[Transaction],
    enriched: &[EnrichedTransaction],
    path: &Path,
) -> Result<SalesReport> {
    let report = reports::build_report(valid, enriched);
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let text = format_sales_report(&report, &generated_at);
    write_atomic(path, text.as_bytes())?;
    Ok(report)
}

/// Rebuild the report from a previously saved enriched file, no catalog call.
pub fn run(enriched: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let settings = load_settings()?;
    let enriched_path = enriched.unwrap_or_else(|| settings.resolve(&settings.enriched_file));
    let report_path = output.unwrap_or_else(|| settings.resolve(&settings.report_file));

    let rows = load_enriched_data(&enriched_path)?;
    let valid: Vec<Transaction> = rows.iter().map(EnrichedTransaction::transaction).collect();
    let report = generate_sales_report(&valid, &rows, &report_path)?;

    println!("{}", format_region_table(&report));
    println!("{} Report saved to: {}", "✓".green(), report_path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Pure formatting (report data -> String)
// ---------------------------------------------------------------------------

pub fn format_sales_report(report: &SalesReport, generated_at: &str) -> String {
    let mut out = String::new();
    let overall = &report.overall;

    let _ = writeln!(out, "{}", "=".repeat(WIDTH));
    let _ = writeln!(out, "SALES ANALYTICS REPORT");
    let _ = writeln!(out, "Generated: {generated_at}");
    let _ = writeln!(out, "Records Processed: {}", overall.transaction_count);
    let _ = writeln!(out, "{}\n", "=".repeat(WIDTH));

    section(&mut out, "OVERALL SUMMARY");
    let _ = writeln!(out, "Total Revenue: {}", money(overall.total_revenue));
    let _ = writeln!(out, "Total Transactions: {}", overall.transaction_count);
    let _ = writeln!(out, "Average Order Value: {}", money(overall.avg_order_value));
    match &overall.date_range {
        Some((first, last)) => {
            let _ = writeln!(out, "Date Range: {first} to {last}\n");
        }
        None => {
            let _ = writeln!(out, "Date Range: N/A\n");
        }
    }

    section(&mut out, "REGION-WISE PERFORMANCE");
    for r in &report.regions {
        let _ = writeln!(
            out,
            "{:<10} {CURRENCY}{:>12}  {:>7}  {} txns",
            r.region,
            grouped(r.revenue),
            percent(r.pct),
            r.count
        );
    }

    let _ = writeln!(out);
    section(&mut out, "TOP 5 PRODUCTS");
    for (i, p) in report.top_products.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {:<20} Qty: {}  Rev: {}",
            i + 1,
            p.name,
            p.quantity,
            money(p.revenue)
        );
    }

    let _ = writeln!(out);
    section(&mut out, "TOP 5 CUSTOMERS");
    for (i, c) in report.top_customers.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {}  {} ({} orders)",
            i + 1,
            c.customer_id,
            money(c.spent),
            c.orders
        );
    }

    let _ = writeln!(out);
    section(&mut out, "DAILY SALES TREND");
    for d in &report.daily {
        let _ = writeln!(
            out,
            "{}  {}  {} txns  {} customers",
            d.date,
            money(d.revenue),
            d.count,
            d.customers
        );
    }

    let _ = writeln!(out);
    section(&mut out, "PRODUCT PERFORMANCE");
    match &report.peak_day {
        Some(peak) => {
            let _ = writeln!(out, "Peak Sales Day: {} ({})", peak.date, money(peak.revenue));
        }
        None => {
            let _ = writeln!(out, "Peak Sales Day: N/A");
        }
    }

    let _ = writeln!(out);
    section(&mut out, "API ENRICHMENT SUMMARY");
    let e = &report.enrichment;
    let _ = writeln!(out, "Enriched Records: {}/{}", e.matched, e.total);
    let _ = writeln!(out, "Success Rate: {}", percent(e.success_rate));
    if !e.unmatched_products.is_empty() {
        let _ = writeln!(out, "Products Not Enriched:");
        for name in &e.unmatched_products {
            let _ = writeln!(out, "- {name}");
        }
    }

    out
}

/// Compact console view of the region split.
pub fn format_region_table(report: &SalesReport) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Region", "Revenue", "%", "Txns"]);
    for r in &report.regions {
        table.add_row(vec![
            Cell::new(&r.region),
            Cell::new(money(r.revenue)),
            Cell::new(percent(r.pct)),
            Cell::new(r.count),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total"),
        Cell::new(money(report.overall.total_revenue)),
        Cell::new(""),
        Cell::new(report.overall.transaction_count),
    ]);
    format!("Region-wise Performance\n{table}")
}
