use comfy_table::Table;

use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_path, shellexpand_path, Settings};

pub fn format_settings(settings: &Settings) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec!["data_dir", settings.data_dir.as_str()]);
    table.add_row(vec!["input_file", settings.input_file.as_str()]);
    table.add_row(vec!["enriched_file", settings.enriched_file.as_str()]);
    table.add_row(vec!["report_file", settings.report_file.as_str()]);
    table.add_row(vec!["catalog_url", settings.catalog_url.as_str()]);
    table.add_row(vec![
        "catalog_timeout_secs".to_string(),
        settings.catalog_timeout_secs.to_string(),
    ]);
    table.to_string()
}

pub fn run(
    data_dir: Option<String>,
    catalog_url: Option<String>,
    timeout_secs: Option<u64>,
) -> Result<()> {
    let mut settings = load_settings()?;
    let changed = data_dir.is_some() || catalog_url.is_some() || timeout_secs.is_some();

    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }
    if let Some(url) = catalog_url {
        settings.catalog_url = url;
    }
    if let Some(secs) = timeout_secs {
        settings.catalog_timeout_secs = secs;
    }

    if changed {
        save_settings(&settings)?;
        println!("Saved {}", settings_path().display());
    }
    println!("{}", format_settings(&settings));
    Ok(())
}
