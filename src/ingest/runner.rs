//! Ingestion run orchestration
//!
//! The runner is a two-state machine (idle/running) around one background
//! worker. A trigger is an atomic check-and-set on the run flag: the caller
//! gets an immediate accept or `AlreadyRunning`, and the run itself executes
//! on a detached tokio task. The listing phase is all-or-nothing; the item
//! phase recovers every per-item failure locally and commits each write
//! before fetching the next song, so an interrupted run keeps everything it
//! already ingested.

use crate::config::{Config, SourceConfig};
use crate::extract::{extract_song, extract_song_ids, ExtractedSong};
use crate::fetch::{build_http_client, fetch_page, RateLimiter};
use crate::ingest::report::{ReportSink, RunSummary};
use crate::store::{DuplicatePolicy, LyricStore, SqliteStore, StoreResult};
use chrono::Utc;
use reqwest::Client;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::task::JoinHandle;
use url::Url;

/// Records below this many characters of content are never persisted
pub const MIN_CONTENT_CHARS: usize = 10;

/// Errors that reject or abort an ingestion run
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("an ingestion run is already in progress")]
    AlreadyRunning,

    #[error("failed to fetch listing page {url}: {message}")]
    ListingFetch { url: String, message: String },

    #[error("no song ids found on any listing page")]
    EmptyListing,

    #[error("ingestion worker failed: {0}")]
    Worker(String),
}

/// Handle to a running ingestion, retained so callers and tests can await
/// completion deterministically instead of relying on timing
pub struct RunHandle {
    join: JoinHandle<Result<RunSummary, IngestError>>,
}

impl RunHandle {
    /// Waits for the background run and returns its outcome
    pub async fn wait(self) -> Result<RunSummary, IngestError> {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(e) => Err(IngestError::Worker(e.to_string())),
        }
    }
}

/// Clears the run flag on every exit path, panic included
struct RunFlagGuard(Arc<AtomicBool>);

impl Drop for RunFlagGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Orchestrates ingestion runs with a process-wide single-flight guard
pub struct IngestRunner {
    config: Arc<Config>,
    base: Url,
    store: Arc<Mutex<SqliteStore>>,
    client: Client,
    limiter: RateLimiter,
    running: Arc<AtomicBool>,
    sink: Arc<dyn ReportSink>,
}

impl IngestRunner {
    /// Creates a runner over an opened store
    pub fn new(
        config: Config,
        store: SqliteStore,
        sink: Arc<dyn ReportSink>,
    ) -> crate::Result<Self> {
        let base = Url::parse(&config.source.base_url)?;
        let client = build_http_client(&config.fetcher)?;
        let limiter = RateLimiter::from_millis(config.fetcher.request_delay_ms);

        Ok(Self {
            config: Arc::new(config),
            base,
            store: Arc::new(Mutex::new(store)),
            client,
            limiter,
            running: Arc::new(AtomicBool::new(false)),
            sink,
        })
    }

    /// Whether a run is currently in flight
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Starts an ingestion run in the background
    ///
    /// At most one run executes at a time, process-wide. A rejected trigger
    /// has no side effects; an accepted one returns immediately with a
    /// handle while the run proceeds on its own task. There is no mid-run
    /// cancellation: only process termination stops an accepted run, and
    /// the in-memory flag clears with the process.
    pub fn trigger(&self) -> Result<RunHandle, IngestError> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(IngestError::AlreadyRunning);
        }

        let worker = Worker {
            config: Arc::clone(&self.config),
            base: self.base.clone(),
            store: Arc::clone(&self.store),
            client: self.client.clone(),
            limiter: self.limiter.clone(),
        };
        let sink = Arc::clone(&self.sink);
        let guard = RunFlagGuard(Arc::clone(&self.running));

        let join = tokio::spawn(async move {
            let _guard = guard;
            let outcome = worker.execute().await;
            match &outcome {
                Ok(summary) => sink.completed(summary),
                Err(error) => sink.aborted(error),
            }
            outcome
        });

        Ok(RunHandle { join })
    }
}

/// One run's worth of shared state, moved onto the background task
struct Worker {
    config: Arc<Config>,
    base: Url,
    store: Arc<Mutex<SqliteStore>>,
    client: Client,
    limiter: RateLimiter,
}

impl Worker {
    async fn execute(&self) -> Result<RunSummary, IngestError> {
        let song_ids = self.discover_song_ids().await?;
        self.ingest_songs(song_ids).await
    }

    /// Listing phase: fetch and parse every listing page, union the ids
    ///
    /// All-or-nothing: a partial id set would make the run's accounting
    /// meaningless, so any listing failure or an empty union aborts the
    /// whole run before a single corpus write.
    async fn discover_song_ids(&self) -> Result<Vec<String>, IngestError> {
        let mut seen = HashSet::new();
        let mut song_ids = Vec::new();

        for path in &self.config.source.listing_paths {
            let url = self
                .base
                .join(path)
                .map_err(|e| IngestError::ListingFetch {
                    url: path.clone(),
                    message: e.to_string(),
                })?;
            tracing::info!("fetching listing page {}", url);

            let html = match fetch_page(&self.client, url.as_str()).await {
                Ok(html) => html,
                Err(e) => {
                    return Err(IngestError::ListingFetch {
                        url: url.to_string(),
                        message: e.to_string(),
                    });
                }
            };
            self.limiter.wait().await;

            let ids = extract_song_ids(&html);
            tracing::debug!("{} song links on {}", ids.len(), url);
            for id in ids {
                if seen.insert(id.clone()) {
                    song_ids.push(id);
                }
            }
        }

        if song_ids.is_empty() {
            return Err(IngestError::EmptyListing);
        }

        let limit = self.config.ingest.limit as usize;
        if limit > 0 && song_ids.len() > limit {
            song_ids.truncate(limit);
            tracing::info!("limited to first {} song(s)", limit);
        }

        Ok(song_ids)
    }

    /// Item phase: fetch, extract, dedup, and commit each song in
    /// listing-discovery order
    ///
    /// Every failure is recovered locally: the item is recorded or counted
    /// and the run moves on. Each write is one autocommitted statement, so
    /// a crash mid-run preserves every prior item. The rate-limit wait runs
    /// after every fetch attempt regardless of outcome.
    async fn ingest_songs(&self, song_ids: Vec<String>) -> Result<RunSummary, IngestError> {
        let total_found = song_ids.len();
        tracing::info!("checking {} song(s)", total_found);

        let now = Utc::now().to_rfc3339();
        let policy = self.config.ingest.duplicate_policy;
        let mut summary = RunSummary {
            total_found,
            ..RunSummary::default()
        };

        for (index, song_id) in song_ids.iter().enumerate() {
            let url = match song_url(&self.base, &self.config.source, song_id) {
                Ok(url) => url,
                Err(message) => {
                    summary.record_error(format!("song {}", song_id), message);
                    continue;
                }
            };

            let html = match fetch_page(&self.client, url.as_str()).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!("[{}] fetch failed: {}", song_id, e);
                    summary.record_error(format!("song {}", song_id), e.to_string());
                    self.limiter.wait().await;
                    continue;
                }
            };

            let song = extract_song(&html);
            if song.content.chars().count() < MIN_CONTENT_CHARS {
                tracing::debug!("[{}] skipped, no usable lyrics: {}", song_id, song.title);
                summary.skipped += 1;
                self.limiter.wait().await;
                continue;
            }

            let written = {
                let mut store = self.store.lock().unwrap();
                apply_duplicate_policy(&mut *store, policy, &song, &now)
            };
            match written {
                Ok(Written::Inserted) => {
                    summary.inserted += 1;
                    tracing::info!("[{}/{}] inserted: {}", index + 1, total_found, song.title);
                }
                Ok(Written::Updated) => {
                    summary.updated += 1;
                    tracing::info!("[{}/{}] updated: {}", index + 1, total_found, song.title);
                }
                Ok(Written::Duplicate) => {
                    summary.skipped += 1;
                    tracing::debug!("[{}/{}] duplicate: {}", index + 1, total_found, song.title);
                }
                Err(e) => {
                    tracing::warn!("store error for {}: {}", song.title, e);
                    summary.record_error(format!("store {}", song.title), e.to_string());
                }
            }

            self.limiter.wait().await;
        }

        Ok(summary)
    }
}

fn song_url(base: &Url, source: &SourceConfig, song_id: &str) -> Result<Url, String> {
    let path = source.song_path_template.replace("{id}", song_id);
    base.join(&path).map_err(|e| e.to_string())
}

/// What a dedup-checked write did
enum Written {
    Inserted,
    Updated,
    Duplicate,
}

/// Looks up the scraped title and applies the configured duplicate policy
fn apply_duplicate_policy<S: LyricStore>(
    store: &mut S,
    policy: DuplicatePolicy,
    song: &ExtractedSong,
    now: &str,
) -> StoreResult<Written> {
    match store.lookup_by_title(&song.title)? {
        Some(existing) => match policy {
            DuplicatePolicy::Skip => Ok(Written::Duplicate),
            DuplicatePolicy::Update => {
                store.update_content(existing.id, &song.content, now)?;
                Ok(Written::Updated)
            }
        },
        None => {
            store.insert(&song.title, &song.content, now)?;
            Ok(Written::Inserted)
        }
    }
}
