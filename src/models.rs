use serde::{Deserialize, Serialize};

/// One sales line after parsing. Validity is decided later by the validator.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub transaction_id: String,
    pub date: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub customer_id: String,
    pub region: String,
}

impl Transaction {
    pub fn amount(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

/// Product record as returned by the catalog service. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ProductInfo {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

/// Catalog response envelope: `{ "products": [...], "total": .., ... }`.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub products: Vec<ProductInfo>,
}

/// A transaction joined against the catalog. Column names match the
/// persisted enriched file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EnrichedTransaction {
    #[serde(rename = "TransactionID")]
    pub transaction_id: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "ProductID")]
    pub product_id: String,
    #[serde(rename = "ProductName")]
    pub product_name: String,
    #[serde(rename = "Quantity")]
    pub quantity: i64,
    #[serde(rename = "UnitPrice")]
    pub unit_price: f64,
    #[serde(rename = "CustomerID")]
    pub customer_id: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "API_Category")]
    pub api_category: Option<String>,
    #[serde(rename = "API_Brand")]
    pub api_brand: Option<String>,
    #[serde(rename = "API_Rating")]
    pub api_rating: Option<f64>,
    #[serde(rename = "API_Match")]
    pub api_match: bool,
}

impl EnrichedTransaction {
    pub fn unmatched(tx: &Transaction) -> Self {
        Self::from_parts(tx, None)
    }

    pub fn matched(tx: &Transaction, product: &ProductInfo) -> Self {
        Self::from_parts(tx, Some(product))
    }

    fn from_parts(tx: &Transaction, product: Option<&ProductInfo>) -> Self {
        Self {
            transaction_id: tx.transaction_id.clone(),
            date: tx.date.clone(),
            product_id: tx.product_id.clone(),
            product_name: tx.product_name.clone(),
            quantity: tx.quantity,
            unit_price: tx.unit_price,
            customer_id: tx.customer_id.clone(),
            region: tx.region.clone(),
            api_category: product.and_then(|p| p.category.clone()),
            api_brand: product.and_then(|p| p.brand.clone()),
            api_rating: product.and_then(|p| p.rating),
            api_match: product.is_some(),
        }
    }

    pub fn transaction(&self) -> Transaction {
        Transaction {
            transaction_id: self.transaction_id.clone(),
            date: self.date.clone(),
            product_id: self.product_id.clone(),
            product_name: self.product_name.clone(),
            quantity: self.quantity,
            unit_price: self.unit_price,
            customer_id: self.customer_id.clone(),
            region: self.region.clone(),
        }
    }
}

/// Fixed column order of the enriched file.
pub const ENRICHED_HEADER: [&str; 12] = [
    "TransactionID",
    "Date",
    "ProductID",
    "ProductName",
    "Quantity",
    "UnitPrice",
    "CustomerID",
    "Region",
    "API_Category",
    "API_Brand",
    "API_Rating",
    "API_Match",
];
