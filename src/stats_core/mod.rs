//! Stats Core - match-log aggregation for the overlay
//!
//! # Architecture
//!
//! ```text
//! match logs (*.json) → MatchLogScanner (newest with periods enabled)
//!     ↓
//! MatchRecord → StatsAggregator (per player, per team, derived stats)
//!     ↓
//! flatten → Vec<Artifact> → ArtifactWriterBackend (TextFileWriter)
//! ```
//!
//! `StatsCollector` drives the pipeline on its own poll interval and skips
//! a candidate it has already written.

pub mod aggregator;
pub mod artifacts;
pub mod collector;
pub mod record;
pub mod scanner;
pub mod schema;
pub mod text_writer;
pub mod writer_backend;

pub use aggregator::{GameState, MatchSummary, PlayerLine, StatsAggregator};
pub use artifacts::{flatten, Artifact};
pub use collector::{StatsCollector, StatsError, TickOutcome};
pub use record::{MatchRecord, PlayerId, RawPlayer, RecordError, Team};
pub use scanner::MatchLogScanner;
pub use schema::{StatValue, Stats, DERIVED_STATS, RAW_STATS};
pub use text_writer::TextFileWriter;
pub use writer_backend::{ArtifactWriterBackend, WriterError};
