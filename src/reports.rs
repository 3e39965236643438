use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::models::{EnrichedTransaction, Transaction};

pub const TOP_N: usize = 5;

// ---------------------------------------------------------------------------
// Grouping helper
// ---------------------------------------------------------------------------

/// Key -> accumulator map that remembers first-seen key order. Stable sorts
/// over `into_vec()` therefore break ties by first appearance.
struct Grouped<A> {
    index: HashMap<String, usize>,
    entries: Vec<(String, A)>,
}

impl<A: Default> Grouped<A> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn entry(&mut self, key: &str) -> &mut A {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                self.entries.push((key.to_string(), A::default()));
                self.index.insert(key.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    fn into_vec(self) -> Vec<(String, A)> {
        self.entries
    }
}

// ---------------------------------------------------------------------------
// Report sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct OverallSummary {
    pub total_revenue: f64,
    pub transaction_count: usize,
    pub avg_order_value: f64,
    /// (first, last) date by string order; `None` with no transactions.
    pub date_range: Option<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionStat {
    pub region: String,
    pub revenue: f64,
    pub count: usize,
    pub pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductStat {
    pub name: String,
    pub quantity: i64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerStat {
    pub customer_id: String,
    pub spent: f64,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyStat {
    pub date: String,
    pub revenue: f64,
    pub count: usize,
    pub customers: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentSummary {
    pub matched: usize,
    pub total: usize,
    pub success_rate: f64,
    pub unmatched_products: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SalesReport {
    pub overall: OverallSummary,
    pub regions: Vec<RegionStat>,
    pub top_products: Vec<ProductStat>,
    pub top_customers: Vec<CustomerStat>,
    pub daily: Vec<DailyStat>,
    pub peak_day: Option<DailyStat>,
    pub enrichment: EnrichmentSummary,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

pub fn overall_summary(transactions: &[Transaction]) -> OverallSummary {
    let total_revenue: f64 = transactions.iter().map(Transaction::amount).sum();
    let transaction_count = transactions.len();
    let avg_order_value = if transaction_count > 0 {
        total_revenue / transaction_count as f64
    } else {
        0.0
    };
    let first = transactions.iter().map(|t| t.date.as_str()).min();
    let last = transactions.iter().map(|t| t.date.as_str()).max();
    let date_range = first.zip(last).map(|(a, b)| (a.to_string(), b.to_string()));

    OverallSummary {
        total_revenue,
        transaction_count,
        avg_order_value,
        date_range,
    }
}

pub fn region_stats(transactions: &[Transaction], total_revenue: f64) -> Vec<RegionStat> {
    let mut groups: Grouped<(f64, usize)> = Grouped::new();
    for t in transactions {
        let acc = groups.entry(&t.region);
        acc.0 += t.amount();
        acc.1 += 1;
    }

    let mut regions: Vec<RegionStat> = groups
        .into_vec()
        .into_iter()
        .map(|(region, (revenue, count))| RegionStat {
            region,
            revenue,
            count,
            pct: if total_revenue != 0.0 {
                revenue / total_revenue * 100.0
            } else {
                0.0
            },
        })
        .collect();
    regions.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    regions
}

/// Ranked by units sold, not revenue.
pub fn top_products(transactions: &[Transaction], n: usize) -> Vec<ProductStat> {
    let mut groups: Grouped<(i64, f64)> = Grouped::new();
    for t in transactions {
        let acc = groups.entry(&t.product_name);
        acc.0 = acc.0.saturating_add(t.quantity);
        acc.1 += t.amount();
    }

    let mut products: Vec<ProductStat> = groups
        .into_vec()
        .into_iter()
        .map(|(name, (quantity, revenue))| ProductStat {
            name,
            quantity,
            revenue,
        })
        .collect();
    products.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    products.truncate(n);
    products
}

/// Ranked by total spend.
pub fn top_customers(transactions: &[Transaction], n: usize) -> Vec<CustomerStat> {
    let mut groups: Grouped<(f64, usize)> = Grouped::new();
    for t in transactions {
        let acc = groups.entry(&t.customer_id);
        acc.0 += t.amount();
        acc.1 += 1;
    }

    let mut customers: Vec<CustomerStat> = groups
        .into_vec()
        .into_iter()
        .map(|(customer_id, (spent, orders))| CustomerStat {
            customer_id,
            spent,
            orders,
        })
        .collect();
    customers.sort_by(|a, b| b.spent.total_cmp(&a.spent));
    customers.truncate(n);
    customers
}

pub fn daily_trend(transactions: &[Transaction]) -> Vec<DailyStat> {
    #[derive(Default)]
    struct Day<'a> {
        revenue: f64,
        count: usize,
        customers: BTreeSet<&'a str>,
    }

    let mut days: BTreeMap<&str, Day> = BTreeMap::new();
    for t in transactions {
        let day = days.entry(t.date.as_str()).or_default();
        day.revenue += t.amount();
        day.count += 1;
        day.customers.insert(t.customer_id.as_str());
    }

    days.into_iter()
        .map(|(date, day)| DailyStat {
            date: date.to_string(),
            revenue: day.revenue,
            count: day.count,
            customers: day.customers.len(),
        })
        .collect()
}

/// Highest-revenue day; on a tie the earliest date wins. Expects the
/// ascending output of [`daily_trend`].
pub fn peak_day(daily: &[DailyStat]) -> Option<DailyStat> {
    let mut best: Option<&DailyStat> = None;
    for day in daily {
        if best.map_or(true, |b| day.revenue > b.revenue) {
            best = Some(day);
        }
    }
    best.cloned()
}

pub fn enrichment_summary(enriched: &[EnrichedTransaction]) -> EnrichmentSummary {
    let total = enriched.len();
    let matched = enriched.iter().filter(|e| e.api_match).count();
    let success_rate = if total > 0 {
        matched as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    let unmatched_products: BTreeSet<&str> = enriched
        .iter()
        .filter(|e| !e.api_match)
        .map(|e| e.product_name.as_str())
        .collect();

    EnrichmentSummary {
        matched,
        total,
        success_rate,
        unmatched_products: unmatched_products.into_iter().map(str::to_string).collect(),
    }
}

/// Every sales figure comes from `valid`; only the enrichment section reads
/// `enriched`.
pub fn build_report(valid: &[Transaction], enriched: &[EnrichedTransaction]) -> SalesReport {
    let overall = overall_summary(valid);
    let regions = region_stats(valid, overall.total_revenue);
    let daily = daily_trend(valid);
    let peak_day = peak_day(&daily);

    SalesReport {
        regions,
        top_products: top_products(valid, TOP_N),
        top_customers: top_customers(valid, TOP_N),
        daily,
        peak_day,
        enrichment: enrichment_summary(enriched),
        overall,
    }
}
