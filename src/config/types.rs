use crate::store::DuplicatePolicy;
use serde::Deserialize;

/// Main configuration structure for Kashimori
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    pub storage: StorageConfig,
}

/// External catalogue source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the catalogue site
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Artist listing page paths, fetched in order; all must succeed
    #[serde(rename = "listing-paths")]
    pub listing_paths: Vec<String>,

    /// Per-song page path, with `{id}` substituted by the song id
    #[serde(rename = "song-path-template", default = "default_song_path_template")]
    pub song_path_template: String,
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Fixed delay after every song fetch attempt (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Browser-like user agent; the catalogue gates non-browser clients
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Accept-Language header, region-matched to the catalogue
    #[serde(rename = "accept-language", default = "default_accept_language")]
    pub accept_language: String,
}

/// Ingestion behavior configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestConfig {
    /// What to do when a scraped title already exists in the corpus
    #[serde(rename = "duplicate-policy", default)]
    pub duplicate_policy: DuplicatePolicy,

    /// Only ingest the first N discovered songs; 0 means no limit
    #[serde(default)]
    pub limit: u32,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: default_request_delay_ms(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
        }
    }
}

fn default_song_path_template() -> String {
    "/song/{id}/".to_string()
}

fn default_request_delay_ms() -> u64 {
    1500
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; rv:91.0) Gecko/20100101 Firefox/91.0".to_string()
}

fn default_accept_language() -> String {
    "ja,en-US;q=0.7,en;q=0.3".to_string()
}
