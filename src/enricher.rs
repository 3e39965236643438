use std::collections::HashMap;
use std::path::Path;

use tracing::warn;

use crate::catalog::extract_numeric_product_id;
use crate::error::{Result, SalesError};
use crate::models::{EnrichedTransaction, ProductInfo, Transaction, ENRICHED_HEADER};
use crate::storage::write_atomic;

/// Left outer join of transactions onto the catalog by numeric product id.
/// Output has exactly one record per input transaction, in input order.
pub fn enrich_sales_data(
    transactions: &[Transaction],
    mapping: &HashMap<i64, ProductInfo>,
) -> Vec<EnrichedTransaction> {
    transactions
        .iter()
        .map(|tx| {
            match extract_numeric_product_id(&tx.product_id).and_then(|id| mapping.get(&id)) {
                Some(product) => EnrichedTransaction::matched(tx, product),
                None => EnrichedTransaction::unmatched(tx),
            }
        })
        .collect()
}

fn pipe_writer() -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(b'|')
        .quote_style(csv::QuoteStyle::Never)
        .has_headers(false);
    builder
}

pub fn render_enriched(enriched: &[EnrichedTransaction]) -> Result<Vec<u8>> {
    let mut wtr = pipe_writer().from_writer(Vec::new());
    wtr.write_record(ENRICHED_HEADER)?;
    for row in enriched {
        wtr.serialize(row)?;
    }
    wtr.into_inner()
        .map_err(|e| SalesError::Other(format!("Failed to flush enriched data: {e}")))
}

/// Returns the number of rows written. An empty input writes nothing.
pub fn save_enriched_data(enriched: &[EnrichedTransaction], path: &Path) -> Result<usize> {
    if enriched.is_empty() {
        warn!("No enriched transactions to save.");
        return Ok(0);
    }
    let bytes = render_enriched(enriched)?;
    write_atomic(path, &bytes)?;
    Ok(enriched.len())
}

pub fn load_enriched_data(path: &Path) -> Result<Vec<EnrichedTransaction>> {
    let file = std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SalesError::NotFound(path.to_path_buf()),
        _ => SalesError::Io(e),
    })?;
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'|')
        .quoting(false)
        .from_reader(std::io::BufReader::new(file));
    let rows = rdr
        .deserialize::<EnrichedTransaction>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}
