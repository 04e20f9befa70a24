//! Configuration module for Kashimori
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use kashimori::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("kashimori.toml")).unwrap();
//! println!("Listing pages: {}", config.source.listing_paths.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetcherConfig, IngestConfig, SourceConfig, StorageConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
