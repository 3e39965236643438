use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SalesError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unable to decode {} with any supported encoding", .0.display())]
    Encoding(PathBuf),

    #[error("Catalog service error: {0}")]
    ExternalService(String),

    #[error("Could not write {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for SalesError {
    fn from(e: reqwest::Error) -> Self {
        SalesError::ExternalService(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SalesError>;
