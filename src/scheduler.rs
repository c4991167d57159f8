//! Loop cadence for the watcher and the collector
//!
//! Both loops only ever need "what time is it" and "wait this long", so they
//! take a `Scheduler` instead of calling tokio directly. Production uses
//! `TokioScheduler`; tests drive the loops with `SimulatedScheduler`, whose
//! sleeps complete immediately and advance a virtual clock.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[async_trait]
pub trait Scheduler: Send + Sync {
    /// Current instant as seen by the loop
    fn now(&self) -> Instant;

    /// Suspend the calling loop for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Wall-clock scheduler backed by `tokio::time`
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioScheduler;

#[async_trait]
impl Scheduler for TokioScheduler {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Virtual clock: `sleep` returns at once and moves `now()` forward
#[derive(Debug)]
pub struct SimulatedScheduler {
    origin: Instant,
    inner: Mutex<SimulatedClock>,
}

#[derive(Debug, Default)]
struct SimulatedClock {
    elapsed: Duration,
    sleeps: Vec<Duration>,
}

impl SimulatedScheduler {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            inner: Mutex::new(SimulatedClock::default()),
        }
    }

    /// Move the clock forward without recording a sleep
    pub fn advance(&self, duration: Duration) {
        let mut clock = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        clock.elapsed += duration;
    }

    /// Total virtual time elapsed since creation
    pub fn elapsed(&self) -> Duration {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).elapsed
    }

    /// Every duration passed to `sleep`, oldest first
    pub fn sleeps(&self) -> Vec<Duration> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .sleeps
            .clone()
    }
}

impl Default for SimulatedScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Scheduler for SimulatedScheduler {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        let mut clock = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        clock.elapsed += duration;
        clock.sleeps.push(duration);
    }
}
