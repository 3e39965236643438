use std::collections::BTreeSet;

use crate::models::Transaction;

pub const TRANSACTION_PREFIX: char = 'T';
pub const PRODUCT_PREFIX: char = 'P';
pub const CUSTOMER_PREFIX: char = 'C';

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub region: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

impl FilterOptions {
    fn region(&self) -> Option<&str> {
        self.region.as_deref().filter(|r| !r.is_empty())
    }

    fn keeps(&self, tx: &Transaction) -> bool {
        if let Some(region) = self.region() {
            if tx.region != region {
                return false;
            }
        }
        let amount = tx.amount();
        if self.min_amount.is_some_and(|min| amount < min) {
            return false;
        }
        if self.max_amount.is_some_and(|max| amount > max) {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationSummary {
    pub total_input: usize,
    pub invalid: usize,
    pub final_count: usize,
}

/// Informational view of the whole input, before validity checks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetProfile {
    pub regions: BTreeSet<String>,
    /// `None` when there were no transactions at all.
    pub amount_range: Option<(f64, f64)>,
}

#[derive(Debug, Default)]
pub struct ValidationOutcome {
    pub valid: Vec<Transaction>,
    pub invalid_count: usize,
    pub summary: ValidationSummary,
    pub profile: DatasetProfile,
}

pub fn is_valid(tx: &Transaction) -> bool {
    tx.quantity > 0
        && tx.unit_price > 0.0
        && tx.transaction_id.starts_with(TRANSACTION_PREFIX)
        && tx.product_id.starts_with(PRODUCT_PREFIX)
        && tx.customer_id.starts_with(CUSTOMER_PREFIX)
}

pub fn profile(transactions: &[Transaction]) -> DatasetProfile {
    let regions = transactions.iter().map(|t| t.region.clone()).collect();
    let amount_range = transactions.iter().map(Transaction::amount).fold(None, |acc, amt| {
        Some(match acc {
            None => (amt, amt),
            Some((lo, hi)) => (f64::min(lo, amt), f64::max(hi, amt)),
        })
    });
    DatasetProfile {
        regions,
        amount_range,
    }
}

pub fn validate_and_filter(transactions: &[Transaction], filter: &FilterOptions) -> ValidationOutcome {
    let mut valid = Vec::new();
    let mut invalid_count = 0usize;

    for tx in transactions {
        if !is_valid(tx) {
            invalid_count += 1;
            continue;
        }
        if filter.keeps(tx) {
            valid.push(tx.clone());
        }
    }

    let summary = ValidationSummary {
        total_input: transactions.len(),
        invalid: invalid_count,
        final_count: valid.len(),
    };

    ValidationOutcome {
        valid,
        invalid_count,
        summary,
        profile: profile(transactions),
    }
}
