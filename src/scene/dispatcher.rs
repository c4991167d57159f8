use std::sync::Arc;

use super::switcher::{SceneNames, SceneSwitcher};
use crate::signal_core::BroadcastEvent;

/// Turns detected events into scene switches
///
/// Dispatch never fails: a missing transport or a rejected switch is
/// logged and the watcher carries on.
pub struct EventDispatcher {
    switcher: Option<Arc<dyn SceneSwitcher>>,
    scenes: SceneNames,
}

impl EventDispatcher {
    pub fn new(switcher: Option<Arc<dyn SceneSwitcher>>, scenes: SceneNames) -> Self {
        Self { switcher, scenes }
    }

    /// Dispatcher with no transport; every event is logged and skipped
    pub fn disconnected(scenes: SceneNames) -> Self {
        Self::new(None, scenes)
    }

    pub fn scene_for(&self, event: BroadcastEvent) -> &str {
        match event {
            BroadcastEvent::Live => &self.scenes.live,
            BroadcastEvent::Intermission => &self.scenes.intermission,
            BroadcastEvent::Replay => &self.scenes.replay,
        }
    }

    /// Returns true when the switch was acknowledged
    pub async fn dispatch(&self, event: BroadcastEvent) -> bool {
        let scene = self.scene_for(event);
        log::info!("🎬 [EVENT] {} detected, switching to scene '{}'", event, scene);

        let Some(switcher) = &self.switcher else {
            log::warn!("⚠️  No scene transport connected, skipping switch to '{}'", scene);
            return false;
        };

        match switcher.switch_scene(scene).await {
            Ok(()) => {
                log::info!("✅ [{}] Switched to scene: {}", switcher.backend_type(), scene);
                true
            }
            Err(e) => {
                log::warn!("❌ [{}] Failed to switch to '{}': {}", switcher.backend_type(), scene, e);
                false
            }
        }
    }
}
