//! Writer backend trait for overlay artifacts
//!
//! Defines the interface for publishing one aggregation pass.

use async_trait::async_trait;
use super::artifacts::Artifact;

#[derive(Debug)]
pub enum WriterError {
    Io(std::io::Error),
}

impl From<std::io::Error> for WriterError {
    fn from(err: std::io::Error) -> Self {
        WriterError::Io(err)
    }
}

impl std::fmt::Display for WriterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriterError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for WriterError {}

/// Backend trait for writing artifacts
#[async_trait]
pub trait ArtifactWriterBackend: Send {
    /// Publish a complete pass, replacing whatever the previous pass wrote
    async fn write_all(&mut self, artifacts: &[Artifact]) -> Result<(), WriterError>;

    /// Get backend type for logging
    fn backend_type(&self) -> &'static str;
}
