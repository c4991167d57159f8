//! Broadcast token source
//!
//! The game overwrites the whole file on every clock change, so a reader
//! can land on a missing, empty or half-written file. None of that is an
//! error for the watcher: the tick simply has no reading.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Raw token for this tick, `None` when nothing could be read
    async fn read_token(&self) -> Option<String>;
}

pub struct BroadcastFileReader {
    path: PathBuf,
}

impl BroadcastFileReader {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl TokenSource for BroadcastFileReader {
    async fn read_token(&self) -> Option<String> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("Broadcast file not present: {}", self.path.display());
                return None;
            }
            Err(e) => {
                log::warn!("Error reading broadcast file {}: {}", self.path.display(), e);
                return None;
            }
        };

        match String::from_utf8(bytes) {
            Ok(text) => Some(text.trim_start_matches('\u{feff}').trim().to_string()),
            Err(e) => {
                log::warn!("Broadcast file is not valid UTF-8 (mid-write?): {}", e);
                None
            }
        }
    }
}
