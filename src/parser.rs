use std::fmt;

use tracing::debug;

use crate::models::Transaction;

pub const FIELD_COUNT: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    FieldCount(usize),
    Quantity(String),
    UnitPrice(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldCount(n) => write!(f, "expected {FIELD_COUNT} fields, found {n}"),
            Self::Quantity(raw) => write!(f, "unparsable quantity {raw:?}"),
            Self::UnitPrice(raw) => write!(f, "unparsable unit price {raw:?}"),
        }
    }
}

/// A dropped input line. `line` is 1-based within the data lines handed to
/// the parser (the header is already gone).
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub line: usize,
    pub reason: RejectReason,
}

#[derive(Debug, Default)]
pub struct ParseOutcome {
    pub transactions: Vec<Transaction>,
    pub rejected: Vec<Rejection>,
}

fn strip_thousands(raw: &str) -> String {
    raw.replace(',', "")
}

fn parse_quantity(raw: &str) -> Option<i64> {
    strip_thousands(raw).trim().parse().ok()
}

fn parse_unit_price(raw: &str) -> Option<f64> {
    strip_thousands(raw).trim().parse().ok()
}

fn parse_record(record: &csv::StringRecord) -> Result<Transaction, RejectReason> {
    if record.len() != FIELD_COUNT {
        return Err(RejectReason::FieldCount(record.len()));
    }
    let quantity =
        parse_quantity(&record[4]).ok_or_else(|| RejectReason::Quantity(record[4].to_string()))?;
    let unit_price =
        parse_unit_price(&record[5]).ok_or_else(|| RejectReason::UnitPrice(record[5].to_string()))?;

    Ok(Transaction {
        transaction_id: record[0].to_string(),
        date: record[1].to_string(),
        product_id: record[2].to_string(),
        product_name: record[3].replace(',', " ").trim().to_string(),
        quantity,
        unit_price,
        customer_id: record[6].to_string(),
        region: record[7].to_string(),
    })
}

pub fn parse_transactions(lines: &[String]) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    for (idx, line) in lines.iter().enumerate() {
        // Quoting is off: a '|' always separates fields, quotes are data.
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'|')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(line.as_bytes());
        let mut record = csv::StringRecord::new();
        let parsed = match rdr.read_record(&mut record) {
            Ok(true) => parse_record(&record),
            _ => Err(RejectReason::FieldCount(0)),
        };
        match parsed {
            Ok(tx) => outcome.transactions.push(tx),
            Err(reason) => {
                debug!(line = idx + 1, %reason, "dropping malformed sales line");
                outcome.rejected.push(Rejection {
                    line: idx + 1,
                    reason,
                });
            }
        }
    }

    outcome
}
