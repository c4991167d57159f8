//! Stats collector loop: scan → aggregate → flatten → write → sleep
//!
//! The last-processed marker only moves after a complete write, so a pass
//! that fails partway is retried on the next tick.

use std::sync::Arc;
use std::time::Duration;

use super::aggregator::StatsAggregator;
use super::artifacts::flatten;
use super::scanner::MatchLogScanner;
use super::writer_backend::{ArtifactWriterBackend, WriterError};
use crate::config::StatsConfig;
use crate::scheduler::Scheduler;

#[derive(Debug)]
pub enum StatsError {
    Io(std::io::Error),
    Writer(WriterError),
}

impl From<std::io::Error> for StatsError {
    fn from(err: std::io::Error) -> Self {
        StatsError::Io(err)
    }
}

impl From<WriterError> for StatsError {
    fn from(err: WriterError) -> Self {
        StatsError::Writer(err)
    }
}

impl std::fmt::Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsError::Io(e) => write!(f, "IO error: {}", e),
            StatsError::Writer(e) => write!(f, "Writer error: {}", e),
        }
    }
}

impl std::error::Error for StatsError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No log with periods enabled
    NoCandidate,
    /// Newest candidate was already written
    Unchanged,
    Written { file: String, artifacts: usize },
}

pub struct StatsCollector {
    scanner: MatchLogScanner,
    writer: Box<dyn ArtifactWriterBackend>,
    scheduler: Arc<dyn Scheduler>,
    poll_interval: Duration,
    last_processed: Option<String>,
}

impl StatsCollector {
    pub fn new(
        config: &StatsConfig,
        writer: Box<dyn ArtifactWriterBackend>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            scanner: MatchLogScanner::new(config.logs_path.clone()),
            writer,
            scheduler,
            poll_interval: config.poll_interval,
            last_processed: None,
        }
    }

    pub fn last_processed(&self) -> Option<&str> {
        self.last_processed.as_deref()
    }

    /// One scan-and-write pass, without the poll sleep
    pub async fn tick(&mut self) -> Result<TickOutcome, StatsError> {
        let Some((file, record)) = self.scanner.find_candidate().await? else {
            return Ok(TickOutcome::NoCandidate);
        };

        if self.last_processed.as_deref() == Some(file.as_str()) {
            return Ok(TickOutcome::Unchanged);
        }

        let summary = StatsAggregator::aggregate(&record);
        let artifacts = flatten(&summary);
        self.writer.write_all(&artifacts).await?;

        let outcome = TickOutcome::Written {
            file: file.clone(),
            artifacts: artifacts.len(),
        };
        self.last_processed = Some(file);
        Ok(outcome)
    }

    /// Poll forever; tick failures are logged and retried next interval
    pub async fn run(mut self) {
        log::info!(
            "📊 Stats collector running (logs: {}, poll: {}ms, backend: {})",
            self.scanner.logs_dir().display(),
            self.poll_interval.as_millis(),
            self.writer.backend_type()
        );

        loop {
            match self.tick().await {
                Ok(TickOutcome::Written { file, artifacts }) => {
                    log::info!("✅ Updated overlay stats from {} ({} values)", file, artifacts);
                }
                Ok(TickOutcome::Unchanged) => {}
                Ok(TickOutcome::NoCandidate) => {
                    log::debug!("No match log with periods enabled yet");
                }
                Err(e) => {
                    log::warn!("⚠️  Stats pass failed, will retry: {}", e);
                }
            }

            self.scheduler.sleep(self.poll_interval).await;
        }
    }
}
