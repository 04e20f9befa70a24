//! Kashimori main entry point
//!
//! Command-line interface for the lyrics corpus ingester.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use kashimori::config::load_config_with_hash;
use kashimori::ingest::{IngestRunner, LogSink};
use kashimori::store::{LyricStore, SqliteStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Kashimori: an incremental lyrics corpus ingester
///
/// Kashimori scrapes a fixed catalogue site for one artist's lyrics,
/// dedups against the local corpus by title, and commits each new record
/// immediately so interrupted runs keep their progress.
#[derive(Parser, Debug)]
#[command(name = "kashimori")]
#[command(version = "1.0.0")]
#[command(about = "An incremental lyrics corpus ingester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Only ingest the first N discovered songs
    #[arg(long, value_name = "N")]
    limit: Option<u32>,

    /// Validate config and show what would be ingested without fetching
    #[arg(long, conflicts_with_all = ["stats", "search", "show", "delete"])]
    dry_run: bool,

    /// Show corpus statistics and exit
    #[arg(long, conflicts_with_all = ["dry_run", "search", "show", "delete"])]
    stats: bool,

    /// Search stored titles and lyrics for a keyword and exit
    #[arg(long, value_name = "KEYWORD", conflicts_with_all = ["dry_run", "stats", "show", "delete"])]
    search: Option<String>,

    /// Print one stored record (marks it as opened) and exit
    #[arg(long, value_name = "ID", conflicts_with_all = ["dry_run", "stats", "search", "delete"])]
    show: Option<i64>,

    /// Delete one stored record and exit
    #[arg(long, value_name = "ID", conflicts_with_all = ["dry_run", "stats", "search", "show"])]
    delete: Option<i64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded (hash: {})", config_hash);

    if let Some(limit) = cli.limit {
        config.ingest.limit = limit;
    }

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if let Some(keyword) = cli.search.as_deref() {
        handle_search(&config, keyword)?;
    } else if let Some(id) = cli.show {
        handle_show(&config, id)?;
    } else if let Some(id) = cli.delete {
        handle_delete(&config, id)?;
    } else {
        handle_ingest(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kashimori=info,warn"),
            1 => EnvFilter::new("kashimori=debug,info"),
            2 => EnvFilter::new("kashimori=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the run plan
fn handle_dry_run(config: &kashimori::Config) {
    println!("=== Kashimori Dry Run ===\n");

    println!("Source:");
    println!("  Base URL: {}", config.source.base_url);
    println!("  Song path template: {}", config.source.song_path_template);
    println!("  Listing pages ({}):", config.source.listing_paths.len());
    for path in &config.source.listing_paths {
        println!("    - {}", path);
    }

    println!("\nFetcher:");
    println!("  Request delay: {}ms", config.fetcher.request_delay_ms);
    println!("  Timeout: {}s", config.fetcher.timeout_secs);
    println!("  User agent: {}", config.fetcher.user_agent);

    println!("\nIngest:");
    println!(
        "  Duplicate policy: {}",
        config.ingest.duplicate_policy.as_str()
    );
    if config.ingest.limit > 0 {
        println!("  Limit: first {} song(s)", config.ingest.limit);
    } else {
        println!("  Limit: none");
    }

    println!("\nStorage:");
    println!("  Database: {}", config.storage.database_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows corpus statistics
fn handle_stats(config: &kashimori::Config) -> anyhow::Result<()> {
    let store = SqliteStore::new(Path::new(&config.storage.database_path))?;

    println!("Database: {}\n", config.storage.database_path);
    println!("Stored lyrics: {}", store.count_records()?);

    let recent = store.list_recent(10)?;
    if !recent.is_empty() {
        println!("\nMost recent:");
        for record in recent {
            println!(
                "  [{}] {} ({} views)",
                record.id, record.title, record.view_count
            );
        }
    }

    Ok(())
}

/// Handles the --search mode: keyword search over titles and lyrics
fn handle_search(config: &kashimori::Config, keyword: &str) -> anyhow::Result<()> {
    let store = SqliteStore::new(Path::new(&config.storage.database_path))?;

    let matches = store.search(keyword)?;
    println!("{} match(es) for '{}'", matches.len(), keyword);
    for record in matches {
        println!("  [{}] {}", record.id, record.title);
    }

    Ok(())
}

/// Handles the --show mode: prints one record and marks it opened
fn handle_show(config: &kashimori::Config, id: i64) -> anyhow::Result<()> {
    let mut store = SqliteStore::new(Path::new(&config.storage.database_path))?;

    let now = Utc::now().to_rfc3339();
    store.touch(id, &now)?;
    let record = store.get(id)?;

    println!("=== {} ===", record.title);
    println!(
        "created: {}  updated: {}  views: {}\n",
        record.created_at, record.updated_at, record.view_count
    );
    println!("{}", record.content);

    Ok(())
}

/// Handles the --delete mode
fn handle_delete(config: &kashimori::Config, id: i64) -> anyhow::Result<()> {
    let mut store = SqliteStore::new(Path::new(&config.storage.database_path))?;

    let record = store.get(id)?;
    store.delete(id)?;
    println!("Deleted [{}] {}", id, record.title);

    Ok(())
}

/// Handles the default mode: one ingestion run to completion
async fn handle_ingest(config: kashimori::Config) -> anyhow::Result<()> {
    let store = SqliteStore::new(Path::new(&config.storage.database_path))?;
    let runner = IngestRunner::new(config, store, Arc::new(LogSink))?;

    let handle = runner.trigger()?;
    match handle.wait().await {
        Ok(summary) => {
            println!(
                "Done. Found: {}, inserted: {}, updated: {}, skipped: {}, errors: {}.",
                summary.total_found,
                summary.inserted,
                summary.updated,
                summary.skipped,
                summary.errors.len()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Ingestion failed: {}", e);
            Err(e.into())
        }
    }
}
