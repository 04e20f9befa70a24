//! Kashimori: an incremental lyrics corpus ingester
//!
//! This crate maintains a local corpus of song lyrics for one artist by
//! scraping a fixed external catalogue site. Each run discovers song ids
//! from the artist listing pages, fetches and extracts every song page,
//! dedups against stored titles, and commits each new record immediately
//! so an interrupted run never loses prior progress.

pub mod config;
pub mod extract;
pub mod fetch;
pub mod ingest;
pub mod store;

use thiserror::Error;

/// Main error type for Kashimori operations
#[derive(Debug, Error)]
pub enum KashimoriError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] fetch::FetchError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("Ingestion error: {0}")]
    Ingest(#[from] ingest::IngestError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Kashimori operations
pub type Result<T> = std::result::Result<T, KashimoriError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use ingest::{IngestRunner, RunHandle, RunSummary};
pub use store::{DuplicatePolicy, LyricRecord};
