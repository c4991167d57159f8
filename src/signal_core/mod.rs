//! Signal Core - broadcast token watcher
//!
//! # Architecture
//!
//! ```text
//! broadcastinfo.txt → BroadcastFileReader (TokenSource)
//!     ↓
//! token::normalize / classify (TIME, FACEOFF, DASH, OTHER)
//!     ↓
//! EventDetector (repeat counter + cooldowns, WatcherState)
//!     ↓
//! SignalWatcher (settle delay, poll cadence) → EventDispatcher
//! ```

pub mod detector;
pub mod reader;
pub mod token;
pub mod watcher;

pub use detector::{BroadcastEvent, DetectorConfig, EventDetector, WatcherState};
pub use reader::{BroadcastFileReader, TokenSource};
pub use token::{is_dash, is_faceoff, is_time_format, normalize, to_seconds, TokenKind};
pub use watcher::SignalWatcher;
