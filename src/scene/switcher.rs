//! Scene-switch capability
//!
//! The watcher only ever asks "switch the program scene to X". Production
//! wiring supplies the OBS WebSocket client; tests substitute a recorder.

use async_trait::async_trait;

#[derive(Debug)]
pub enum SceneError {
    Connect(String),
    Handshake(String),
    Protocol(String),
    Rejected { code: i64, comment: Option<String> },
    Disconnected,
    Timeout,
}

impl From<tokio_tungstenite::tungstenite::Error> for SceneError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        SceneError::Connect(err.to_string())
    }
}

impl From<serde_json::Error> for SceneError {
    fn from(err: serde_json::Error) -> Self {
        SceneError::Protocol(err.to_string())
    }
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::Connect(e) => write!(f, "Connection error: {}", e),
            SceneError::Handshake(e) => write!(f, "Handshake failed: {}", e),
            SceneError::Protocol(e) => write!(f, "Protocol error: {}", e),
            SceneError::Rejected { code, comment } => match comment {
                Some(comment) => write!(f, "Request rejected ({}): {}", code, comment),
                None => write!(f, "Request rejected ({})", code),
            },
            SceneError::Disconnected => write!(f, "Connection closed"),
            SceneError::Timeout => write!(f, "Timed out waiting for response"),
        }
    }
}

impl std::error::Error for SceneError {}

#[async_trait]
pub trait SceneSwitcher: Send + Sync {
    /// Make `scene` the current program scene
    async fn switch_scene(&self, scene: &str) -> Result<(), SceneError>;

    /// Transport name for logging
    fn backend_type(&self) -> &'static str;
}

/// Scene name for each broadcast event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneNames {
    pub live: String,
    pub intermission: String,
    pub replay: String,
}

impl Default for SceneNames {
    fn default() -> Self {
        Self {
            live: "LIVE".to_string(),
            intermission: "INTERMISSION".to_string(),
            replay: "REPLAY".to_string(),
        }
    }
}
