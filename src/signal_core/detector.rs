//! Debounced broadcast event detection
//!
//! Four triggers are evaluated on every tick against the same token, in
//! this order:
//!
//! 1. **REPLAY**: the clock reads the same `TIME` value `repeat_threshold`
//!    ticks in a row (the game froze the clock under a replay overlay) and
//!    the replay cooldown has elapsed. The repeat counter is not reset on
//!    firing: the trigger is level-sensitive and only the cooldown gates it,
//!    so a clock that stays frozen fires again every time the cooldown
//!    expires.
//! 2. **LIVE**: the token is `FACEOFF` and the faceoff cooldown has elapsed.
//! 3. **INTERMISSION**: the previous token was `TIME` and this one is `-`.
//!    The watcher waits the settle delay before acting on it.
//! 4. The raw token becomes the previous token.
//!
//! The trigger classes are disjoint, so a tick yields at most one event.

use std::fmt;
use std::time::{Duration, Instant};

use super::token::{is_dash, is_faceoff, is_time_format, normalize};
use crate::config::WatcherConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BroadcastEvent {
    /// Game clock resumed after a faceoff
    Live,
    /// Period ended
    Intermission,
    /// Clock frozen under an instant replay
    Replay,
}

impl BroadcastEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            BroadcastEvent::Live => "LIVE",
            BroadcastEvent::Intermission => "INTERMISSION",
            BroadcastEvent::Replay => "REPLAY",
        }
    }
}

impl fmt::Display for BroadcastEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thresholds and windows for the detector
#[derive(Debug, Clone, Copy)]
pub struct DetectorConfig {
    pub repeat_threshold: u32,
    pub replay_cooldown: Duration,
    pub faceoff_cooldown: Duration,
}

impl DetectorConfig {
    pub fn with_defaults() -> Self {
        Self {
            repeat_threshold: 13,
            replay_cooldown: Duration::from_secs(6),
            faceoff_cooldown: Duration::from_secs(4),
        }
    }
}

impl From<&WatcherConfig> for DetectorConfig {
    fn from(config: &WatcherConfig) -> Self {
        Self {
            repeat_threshold: config.replay_repeat_threshold,
            replay_cooldown: config.replay_cooldown,
            faceoff_cooldown: config.faceoff_cooldown,
        }
    }
}

/// State carried between ticks for the lifetime of the watcher
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatcherState {
    pub previous_raw_token: Option<String>,
    /// Consecutive identical `TIME` readings; 0 while the token is not `TIME`
    pub repeat_count: u32,
    pub last_replay_emitted_at: Option<Instant>,
    pub last_faceoff_emitted_at: Option<Instant>,
}

pub struct EventDetector {
    config: DetectorConfig,
    state: WatcherState,
}

impl EventDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            state: WatcherState::default(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DetectorConfig::with_defaults())
    }

    pub fn state(&self) -> &WatcherState {
        &self.state
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Run all triggers for one successfully read raw token
    pub fn observe(&mut self, raw: &str, now: Instant) -> Option<BroadcastEvent> {
        let current = normalize(raw);
        let previous = self.state.previous_raw_token.as_deref().map(normalize);
        let mut event = None;

        // Replay: frozen clock
        if is_time_format(&current) {
            if previous.as_deref() == Some(current.as_str()) {
                self.state.repeat_count = self.state.repeat_count.saturating_add(1);
            } else {
                self.state.repeat_count = 1;
            }
        } else {
            self.state.repeat_count = 0;
        }

        if self.state.repeat_count >= self.config.repeat_threshold
            && cooldown_elapsed(self.state.last_replay_emitted_at, now, self.config.replay_cooldown)
        {
            self.state.last_replay_emitted_at = Some(now);
            event = Some(BroadcastEvent::Replay);
        }

        // Live: faceoff
        if is_faceoff(&current)
            && cooldown_elapsed(self.state.last_faceoff_emitted_at, now, self.config.faceoff_cooldown)
        {
            self.state.last_faceoff_emitted_at = Some(now);
            event = Some(BroadcastEvent::Live);
        }

        // Intermission: clock -> dash
        if previous.as_deref().is_some_and(is_time_format) && is_dash(&current) {
            event = Some(BroadcastEvent::Intermission);
        }

        self.state.previous_raw_token = Some(raw.to_string());
        event
    }
}

fn cooldown_elapsed(last: Option<Instant>, now: Instant, cooldown: Duration) -> bool {
    last.map_or(true, |at| now.saturating_duration_since(at) >= cooldown)
}
