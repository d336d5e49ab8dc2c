use std::path::PathBuf;
use thiserror::Error;

/// Why a single source page produced no links
#[derive(Error, Debug)]
pub enum PageError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(reqwest::StatusCode),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Reading or writing one of the CSV tables
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("Malformed row in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
}

pub type Result<T> = std::result::Result<T, PageError>;
