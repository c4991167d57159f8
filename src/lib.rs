//! rinkflow - broadcast telemetry watcher for period-based hockey matches
//!
//! Two independent polling loops:
//! - `signal_core` watches the game's broadcast token file and turns the
//!   noisy clock readings into REPLAY / LIVE / INTERMISSION scene switches
//! - `stats_core` watches the match-log directory and flattens the newest
//!   period-based match into one text artifact per overlay value

pub mod config;
pub mod scene;
pub mod scheduler;
pub mod signal_core;
pub mod stats_core;

pub use config::{Config, ConfigError, RunMode};
pub use scheduler::{Scheduler, SimulatedScheduler, TokioScheduler};
