//! Scene switching - turns detected broadcast events into OBS program scenes
//!
//! ```text
//! BroadcastEvent → EventDispatcher (event → scene name)
//!     ↓
//! SceneSwitcher (capability) → ObsClient (WebSocket v5) | test recorder
//! ```

pub mod backoff;
pub mod dispatcher;
pub mod obs_client;
pub mod switcher;

pub use backoff::{ExponentialBackoff, MaxRetriesExceeded};
pub use dispatcher::EventDispatcher;
pub use obs_client::ObsClient;
pub use switcher::{SceneError, SceneNames, SceneSwitcher};
