use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use tracing::{info, warn};

use crate::error::{Result, SalesError};
use crate::models::{CatalogPage, ProductInfo};

pub const DEFAULT_CATALOG_URL: &str = "https://dummyjson.com/products?limit=100";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Anything that can hand over the product catalog in one shot.
pub trait CatalogSource {
    fn describe(&self) -> String;
    fn fetch_products(&self) -> Result<Vec<ProductInfo>>;
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Single blocking GET against the catalog endpoint. No retries, no paging.
pub struct HttpCatalog {
    pub url: String,
    pub timeout: Duration,
}

impl HttpCatalog {
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl CatalogSource for HttpCatalog {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch_products(&self) -> Result<Vec<ProductInfo>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        let page: CatalogPage = client
            .get(&self.url)
            .send()?
            .error_for_status()?
            .json()?;
        Ok(page.products)
    }
}

/// Catalog snapshot saved as JSON on disk, same shape as the service response.
pub struct FileCatalog {
    pub path: PathBuf,
}

impl CatalogSource for FileCatalog {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch_products(&self) -> Result<Vec<ProductInfo>> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| SalesError::ExternalService(format!("{}: {e}", self.path.display())))?;
        let page: CatalogPage = serde_json::from_str(&content)
            .map_err(|e| SalesError::ExternalService(format!("{}: {e}", self.path.display())))?;
        Ok(page.products)
    }
}

/// Used with `--offline`: every transaction ends up unmatched.
pub struct OfflineCatalog;

impl CatalogSource for OfflineCatalog {
    fn describe(&self) -> String {
        "offline".to_string()
    }

    fn fetch_products(&self) -> Result<Vec<ProductInfo>> {
        Ok(Vec::new())
    }
}

// ---------------------------------------------------------------------------
// Fetch + mapping
// ---------------------------------------------------------------------------

/// Never fails: any catalog error is logged and treated as an empty catalog.
pub fn fetch_all_products(source: &dyn CatalogSource) -> Vec<ProductInfo> {
    match source.fetch_products() {
        Ok(products) => {
            info!(source = %source.describe(), count = products.len(), "fetched catalog");
            products
        }
        Err(e) => {
            warn!(source = %source.describe(), "{e}");
            Vec::new()
        }
    }
}

pub fn create_product_mapping(products: &[ProductInfo]) -> HashMap<i64, ProductInfo> {
    products
        .iter()
        .filter_map(|p| p.id.map(|id| (id, p.clone())))
        .collect()
}

fn digits_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("static regex"))
}

/// First run of digits anywhere in the id: `P101` -> 101, `XYZ` -> None.
pub fn extract_numeric_product_id(product_id: &str) -> Option<i64> {
    digits_re()
        .find(product_id)
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingCatalog;

    impl CatalogSource for FailingCatalog {
        fn describe(&self) -> String {
            "failing".to_string()
        }

        fn fetch_products(&self) -> Result<Vec<ProductInfo>> {
            Err(SalesError::ExternalService("connection refused".into()))
        }
    }

    fn product(id: Option<i64>, category: &str) -> ProductInfo {
        ProductInfo {
            id,
            title: Some(format!("Item {category}")),
            category: Some(category.to_string()),
            brand: None,
            rating: Some(4.0),
        }
    }

    #[test]
    fn test_extract_numeric_product_id() {
        assert_eq!(extract_numeric_product_id("P101"), Some(101));
        assert_eq!(extract_numeric_product_id("P007"), Some(7));
        assert_eq!(extract_numeric_product_id("AB12-34"), Some(12));
        assert_eq!(extract_numeric_product_id("XYZ"), None);
        assert_eq!(extract_numeric_product_id(""), None);
    }

    #[test]
    fn test_extract_overflowing_digits_is_none() {
        assert_eq!(extract_numeric_product_id("P99999999999999999999999"), None);
    }

    #[test]
    fn test_mapping_skips_products_without_id() {
        let products = vec![product(Some(1), "a"), product(None, "b"), product(Some(2), "c")];
        let mapping = create_product_mapping(&products);
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping[&1].category.as_deref(), Some("a"));
        assert_eq!(mapping[&2].category.as_deref(), Some("c"));
    }

    #[test]
    fn test_mapping_last_duplicate_wins() {
        let products = vec![product(Some(1), "first"), product(Some(1), "second")];
        let mapping = create_product_mapping(&products);
        assert_eq!(mapping[&1].category.as_deref(), Some("second"));
    }

    #[test]
    fn test_failed_fetch_degrades_to_empty() {
        assert!(fetch_all_products(&FailingCatalog).is_empty());
        assert!(fetch_all_products(&OfflineCatalog).is_empty());
    }

    #[test]
    fn test_file_catalog_reads_service_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{"products":[{"id":101,"title":"Essence Mascara","category":"beauty","brand":"Essence","rating":4.94}],"total":1,"skip":0,"limit":100}"#,
        )
        .unwrap();
        let products = fetch_all_products(&FileCatalog { path });
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].brand.as_deref(), Some("Essence"));
        assert_eq!(products[0].rating, Some(4.94));
    }

    #[test]
    fn test_file_catalog_bad_json_is_external_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "<html>502</html>").unwrap();
        let err = FileCatalog { path }.fetch_products().unwrap_err();
        assert!(matches!(err, SalesError::ExternalService(_)));
    }

    #[test]
    fn test_http_catalog_unreachable_degrades() {
        // Nothing listens on the local discard port.
        let source = HttpCatalog::new("http://127.0.0.1:9/products", 1);
        assert!(fetch_all_products(&source).is_empty());
    }
}
