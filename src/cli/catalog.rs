use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::catalog::{fetch_all_products, CatalogSource, FileCatalog, HttpCatalog};
use crate::error::Result;
use crate::models::ProductInfo;
use crate::settings::load_settings;

fn opt(val: &Option<String>) -> String {
    val.clone().unwrap_or_default()
}

pub fn format_catalog(products: &[ProductInfo]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Category", "Brand", "Rating"]);
    for p in products {
        table.add_row(vec![
            Cell::new(p.id.map(|id| id.to_string()).unwrap_or_default()),
            Cell::new(opt(&p.title)),
            Cell::new(opt(&p.category)),
            Cell::new(opt(&p.brand)),
            Cell::new(p.rating.map(|r| format!("{r:.2}")).unwrap_or_default()),
        ]);
    }
    format!("Product Catalog\n{table}")
}

/// Fetch the catalog once and list what a run would be able to join against.
pub fn run(file: Option<PathBuf>, url: Option<String>) -> Result<()> {
    let settings = load_settings()?;
    let source: Box<dyn CatalogSource> = match file {
        Some(path) => Box::new(FileCatalog { path }),
        None => Box::new(HttpCatalog::new(
            url.unwrap_or(settings.catalog_url),
            settings.catalog_timeout_secs,
        )),
    };

    let products = fetch_all_products(source.as_ref());
    if products.is_empty() {
        println!("{}", format!("No products from {}", source.describe()).yellow());
        return Ok(());
    }
    let without_id = products.iter().filter(|p| p.id.is_none()).count();
    println!("{}", format_catalog(&products));
    println!(
        "{} products, {} joinable, {} without id",
        products.len(),
        products.len() - without_id,
        without_id
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_catalog_blank_for_missing_fields() {
        let products = vec![
            ProductInfo {
                id: Some(1),
                title: Some("Essence Mascara Lash Princess".into()),
                category: Some("beauty".into()),
                brand: Some("Essence".into()),
                rating: Some(4.94),
            },
            ProductInfo {
                title: Some("Apple".into()),
                ..ProductInfo::default()
            },
        ];
        let out = format_catalog(&products);
        assert!(out.starts_with("Product Catalog\n"));
        assert!(out.contains("Essence Mascara Lash Princess"));
        assert!(out.contains("4.94"));
        assert!(out.contains("Apple"));
    }
}
