//! Run summaries and their delivery
//!
//! The trigger path never sees a run's outcome; it surfaces here. A
//! `ReportSink` receives either the completed `RunSummary` or the typed
//! abort error, and the default `LogSink` writes both to the log stream.

use crate::ingest::IngestError;

/// How many per-item errors the log sink prints before switching to an
/// overflow count
pub const MAX_REPORTED_ERRORS: usize = 10;

/// One recovered per-item failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunError {
    /// What was being processed, e.g. `song 12345`
    pub context: String,
    pub message: String,
}

/// Outcome of one completed ingestion run, immutable after completion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Unique song ids discovered across all listing pages
    pub total_found: usize,
    /// New records committed
    pub inserted: usize,
    /// Existing records overwritten under the update policy
    pub updated: usize,
    /// Too-short extractions plus duplicates left untouched
    pub skipped: usize,
    /// Recovered per-item failures, in processing order
    pub errors: Vec<RunError>,
}

impl RunSummary {
    pub fn record_error(&mut self, context: impl Into<String>, message: impl Into<String>) {
        self.errors.push(RunError {
            context: context.into(),
            message: message.into(),
        });
    }
}

/// Receives run outcomes from the background worker
pub trait ReportSink: Send + Sync {
    /// Called once when a run finishes its item phase
    fn completed(&self, summary: &RunSummary);

    /// Called once when a run aborts during the listing phase (or dies)
    fn aborted(&self, error: &IngestError);
}

/// Default sink: writes outcomes to the tracing log stream
pub struct LogSink;

impl ReportSink for LogSink {
    fn completed(&self, summary: &RunSummary) {
        tracing::info!(
            "ingestion finished: {} found, {} inserted, {} updated, {} skipped, {} errors",
            summary.total_found,
            summary.inserted,
            summary.updated,
            summary.skipped,
            summary.errors.len()
        );
        for error in summary.errors.iter().take(MAX_REPORTED_ERRORS) {
            tracing::warn!("[{}] {}", error.context, error.message);
        }
        let overflow = summary.errors.len().saturating_sub(MAX_REPORTED_ERRORS);
        if overflow > 0 {
            tracing::warn!("... and {} more errors", overflow);
        }
    }

    fn aborted(&self, error: &IngestError) {
        tracing::error!("ingestion aborted: {}", error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_error_preserves_order() {
        let mut summary = RunSummary::default();
        summary.record_error("song 1", "HTTP 500");
        summary.record_error("song 2", "timeout");

        assert_eq!(summary.errors.len(), 2);
        assert_eq!(summary.errors[0].context, "song 1");
        assert_eq!(summary.errors[1].message, "timeout");
    }

    #[test]
    fn test_default_summary_is_empty() {
        let summary = RunSummary::default();
        assert_eq!(summary.total_found, 0);
        assert_eq!(summary.inserted, 0);
        assert_eq!(summary.updated, 0);
        assert_eq!(summary.skipped, 0);
        assert!(summary.errors.is_empty());
    }
}
