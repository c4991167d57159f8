//! Signal watcher loop: read → detect → (settle) → dispatch → sleep

use std::sync::Arc;
use std::time::Duration;

use super::detector::{BroadcastEvent, DetectorConfig, EventDetector, WatcherState};
use super::reader::TokenSource;
use crate::config::WatcherConfig;
use crate::scene::EventDispatcher;
use crate::scheduler::Scheduler;

pub struct SignalWatcher {
    source: Box<dyn TokenSource>,
    detector: EventDetector,
    dispatcher: Arc<EventDispatcher>,
    scheduler: Arc<dyn Scheduler>,
    poll_interval: Duration,
    intermission_delay: Duration,
}

impl SignalWatcher {
    pub fn new(
        config: &WatcherConfig,
        source: Box<dyn TokenSource>,
        dispatcher: Arc<EventDispatcher>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            source,
            detector: EventDetector::new(DetectorConfig::from(config)),
            dispatcher,
            scheduler,
            poll_interval: config.poll_interval,
            intermission_delay: config.intermission_delay,
        }
    }

    pub fn state(&self) -> &WatcherState {
        self.detector.state()
    }

    /// One poll iteration, including the trailing poll sleep
    ///
    /// A tick without a reading skips detection entirely and leaves the
    /// previous token untouched. The intermission settle delay blocks this
    /// loop only.
    pub async fn tick(&mut self) -> Option<BroadcastEvent> {
        let event = match self.source.read_token().await {
            Some(raw) => {
                let now = self.scheduler.now();
                self.detector.observe(&raw, now)
            }
            None => None,
        };

        if let Some(event) = event {
            if event == BroadcastEvent::Intermission {
                log::info!(
                    "⏸️  Intermission detected... delaying transition {:.1}s",
                    self.intermission_delay.as_secs_f64()
                );
                self.scheduler.sleep(self.intermission_delay).await;
            }
            self.dispatcher.dispatch(event).await;
        }

        self.scheduler.sleep(self.poll_interval).await;
        event
    }

    /// Poll forever; only process shutdown stops this loop
    pub async fn run(mut self) {
        log::info!(
            "👀 Period watcher running (poll: {}ms, replay after {} frozen reads)",
            self.poll_interval.as_millis(),
            self.detector_threshold()
        );

        loop {
            self.tick().await;
        }
    }

    fn detector_threshold(&self) -> u32 {
        self.detector.config().repeat_threshold
    }
}
