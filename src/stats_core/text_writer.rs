//! One-value-per-file writer read by the overlay's text sources

use super::artifacts::{is_artifact_file, Artifact};
use super::writer_backend::{ArtifactWriterBackend, WriterError};
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::PathBuf;

pub struct TextFileWriter {
    output_dir: PathBuf,
    /// File names written by the last successful pass; seeded with the
    /// artifact files already on disk so a restart cleans up after an
    /// earlier run
    written: HashSet<String>,
}

impl TextFileWriter {
    /// Creates the output directory; failure here is a startup error
    pub fn new(output_dir: PathBuf) -> Result<Self, WriterError> {
        std::fs::create_dir_all(&output_dir)?;

        let mut written = HashSet::new();
        for entry in std::fs::read_dir(&output_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if is_artifact_file(name) {
                    written.insert(name.to_string());
                }
            }
        }

        log::info!(
            "📝 Writing overlay stats to: {} ({} existing files)",
            output_dir.display(),
            written.len()
        );

        Ok(Self { output_dir, written })
    }

    /// Write via a temp file and rename so the overlay never reads a torn value
    async fn write_file(&self, file_name: &str, value: &str) -> Result<(), WriterError> {
        let path = self.output_dir.join(file_name);
        let tmp_path = self.output_dir.join(format!("{}.tmp", file_name));

        tokio::fs::write(&tmp_path, value.as_bytes()).await?;
        tokio::fs::rename(&tmp_path, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl ArtifactWriterBackend for TextFileWriter {
    async fn write_all(&mut self, artifacts: &[Artifact]) -> Result<(), WriterError> {
        let mut current = HashSet::with_capacity(artifacts.len());

        for artifact in artifacts {
            let file_name = artifact.file_name();
            self.write_file(&file_name, &artifact.value).await?;
            current.insert(file_name);
        }

        // Values from the previous pass that this pass no longer has
        // (e.g. a player slot that no longer exists)
        for stale in self.written.difference(&current) {
            match tokio::fs::remove_file(self.output_dir.join(stale)).await {
                Ok(()) => log::debug!("Removed stale stat file: {}", stale),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        self.written = current;
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "TEXT"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_writes_one_file_per_artifact() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut writer = TextFileWriter::new(temp_dir.path().join("stats")).unwrap();

        writer
            .write_all(&[
                Artifact::new("home_goals", "3"),
                Artifact::new("game_state", "Final"),
            ])
            .await
            .unwrap();

        let dir = temp_dir.path().join("stats");
        assert_eq!(std::fs::read_to_string(dir.join("home_goals.txt")).unwrap(), "3");
        assert_eq!(std::fs::read_to_string(dir.join("game_state.txt")).unwrap(), "Final");
        assert!(!dir.join("home_goals.txt.tmp").exists());
    }

    #[tokio::test]
    async fn test_stale_files_removed_on_next_pass() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut writer = TextFileWriter::new(temp_dir.path().to_path_buf()).unwrap();

        writer
            .write_all(&[
                Artifact::new("home_player_0_username", "A"),
                Artifact::new("home_player_1_username", "B"),
            ])
            .await
            .unwrap();
        writer
            .write_all(&[Artifact::new("home_player_0_username", "C")])
            .await
            .unwrap();

        let dir = temp_dir.path();
        assert_eq!(std::fs::read_to_string(dir.join("home_player_0_username.txt")).unwrap(), "C");
        assert!(!dir.join("home_player_1_username.txt").exists());
    }

    #[tokio::test]
    async fn test_unrelated_files_are_left_alone() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("logo.png"), b"png").unwrap();
        let mut writer = TextFileWriter::new(temp_dir.path().to_path_buf()).unwrap();

        writer.write_all(&[Artifact::new("game_state", "Final")]).await.unwrap();
        writer.write_all(&[]).await.unwrap();

        assert!(temp_dir.path().join("logo.png").exists());
        assert!(!temp_dir.path().join("game_state.txt").exists());
    }

    #[tokio::test]
    async fn test_leftovers_from_earlier_run_removed() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path();
        std::fs::write(dir.join("home_player_5_goals.txt"), "2").unwrap();
        std::fs::write(dir.join("home_player_5_username.txt"), "Gone").unwrap();
        std::fs::write(dir.join("scoreboard.txt"), "keep").unwrap();

        let mut writer = TextFileWriter::new(dir.to_path_buf()).unwrap();
        writer.write_all(&[Artifact::new("game_state", "Final")]).await.unwrap();

        assert!(!dir.join("home_player_5_goals.txt").exists());
        assert!(!dir.join("home_player_5_username.txt").exists());
        assert!(dir.join("scoreboard.txt").exists());
        assert_eq!(std::fs::read_to_string(dir.join("game_state.txt")).unwrap(), "Final");
    }

    #[test]
    fn test_uncreatable_output_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"file").unwrap();

        assert!(TextFileWriter::new(blocker.join("stats")).is_err());
    }
}
