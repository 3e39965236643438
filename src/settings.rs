use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::{DEFAULT_CATALOG_URL, DEFAULT_TIMEOUT_SECS};
use crate::error::{Result, SalesError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_input_file")]
    pub input_file: String,
    #[serde(default = "default_enriched_file")]
    pub enriched_file: String,
    #[serde(default = "default_report_file")]
    pub report_file: String,
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,
    #[serde(default = "default_catalog_timeout_secs")]
    pub catalog_timeout_secs: u64,
}

fn default_data_dir() -> String {
    ".".to_string()
}

fn default_input_file() -> String {
    "data/sales_data.txt".to_string()
}

fn default_enriched_file() -> String {
    "data/enriched_sales_data.txt".to_string()
}

fn default_report_file() -> String {
    "output/sales_report.txt".to_string()
}

fn default_catalog_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

fn default_catalog_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            input_file: default_input_file(),
            enriched_file: default_enriched_file(),
            report_file: default_report_file(),
            catalog_url: default_catalog_url(),
            catalog_timeout_secs: default_catalog_timeout_secs(),
        }
    }
}

impl Settings {
    /// Relative paths hang off `data_dir`; absolute paths are kept as-is.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            Path::new(&self.data_dir).join(p)
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("sales-analytics")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Missing file means defaults. A file that exists but does not parse is an error.
pub fn load_settings_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| SalesError::Settings(format!("{}: {e}", path.display())))
}

pub fn load_settings() -> Result<Settings> {
    load_settings_from(&settings_path())
}

pub fn save_settings_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(settings, &settings_path())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            data_dir: "/tmp/sales".to_string(),
            catalog_timeout_secs: 3,
            ..Settings::default()
        };
        save_settings_to(&settings, &path).unwrap();
        let loaded = load_settings_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_returns_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_settings_from(&dir.path().join("settings.json")).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.report_file, "output/sales_report.txt");
        assert_eq!(s.catalog_timeout_secs, 10);
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"data_dir": "/srv/sales", "catalog_url": "http://localhost:8080/products"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.data_dir, "/srv/sales");
        assert_eq!(s.catalog_url, "http://localhost:8080/products");
        assert_eq!(s.input_file, "data/sales_data.txt");
        assert_eq!(s.enriched_file, "data/enriched_sales_data.txt");
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_settings_from(&path), Err(SalesError::Settings(_))));
    }

    #[test]
    fn test_save_creates_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("nested").join("settings.json");
        save_settings_to(&Settings::default(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let s = Settings {
            data_dir: "/srv/sales".to_string(),
            ..Settings::default()
        };
        assert_eq!(s.resolve("data/x.txt"), PathBuf::from("/srv/sales/data/x.txt"));
        assert_eq!(s.resolve("/tmp/y.txt"), PathBuf::from("/tmp/y.txt"));
    }
}
