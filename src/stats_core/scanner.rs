//! Match-log directory scan
//!
//! The game names its logs so that lexical order is chronological; the
//! newest file is therefore the greatest name. Files are tried newest
//! first until one has periods enabled.

use super::record::MatchRecord;
use std::path::{Path, PathBuf};

pub struct MatchLogScanner {
    logs_dir: PathBuf,
}

impl MatchLogScanner {
    pub fn new(logs_dir: PathBuf) -> Self {
        Self { logs_dir }
    }

    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    /// `.json` file names in the logs directory, newest first
    pub async fn list_logs(&self) -> Result<Vec<String>, std::io::Error> {
        let mut entries = tokio::fs::read_dir(&self.logs_dir).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match entry.file_type().await {
                Ok(file_type) if file_type.is_file() => {}
                _ => continue,
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }

        names.sort_unstable_by(|a, b| b.cmp(a));
        Ok(names)
    }

    /// Newest log with periods enabled, parsed
    ///
    /// A file that cannot be read or parsed does not qualify; the scan
    /// moves on to the next one. Only a failure to list the directory is
    /// returned as an error.
    pub async fn find_candidate(&self) -> Result<Option<(String, MatchRecord)>, std::io::Error> {
        for name in self.list_logs().await? {
            let path = self.logs_dir.join(&name);
            match MatchRecord::load(&path).await {
                Ok(record) if record.periods_enabled => return Ok(Some((name, record))),
                Ok(_) => log::debug!("Skipping {}: periods not enabled", name),
                Err(e) => log::warn!("⚠️  Skipping unreadable match log {}: {}", name, e),
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIODS_ON: &str = r#"{"periods_enabled": "True", "current_period": "1", "players": []}"#;
    const PERIODS_OFF: &str = r#"{"periods_enabled": "False", "players": []}"#;

    fn write(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    #[tokio::test]
    async fn test_newest_qualifying_file_wins() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "2026-01-01_20-00.json", PERIODS_ON);
        write(temp_dir.path(), "2026-01-01_21-00.json", PERIODS_ON);
        write(temp_dir.path(), "2026-01-01_22-00.json", PERIODS_OFF);

        let scanner = MatchLogScanner::new(temp_dir.path().to_path_buf());
        let (name, record) = scanner.find_candidate().await.unwrap().unwrap();

        assert_eq!(name, "2026-01-01_21-00.json");
        assert_eq!(record.current_period, Some(1));
    }

    #[tokio::test]
    async fn test_malformed_file_does_not_abort_scan() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "a.json", PERIODS_ON);
        write(temp_dir.path(), "b.json", "{ not json");

        let scanner = MatchLogScanner::new(temp_dir.path().to_path_buf());
        let (name, _) = scanner.find_candidate().await.unwrap().unwrap();
        assert_eq!(name, "a.json");
    }

    #[tokio::test]
    async fn test_only_json_files_considered() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "z.txt", PERIODS_ON);
        write(temp_dir.path(), "m.json", PERIODS_ON);
        std::fs::create_dir(temp_dir.path().join("zz.json")).unwrap();

        let scanner = MatchLogScanner::new(temp_dir.path().to_path_buf());
        assert_eq!(scanner.list_logs().await.unwrap(), vec!["m.json".to_string()]);
    }

    #[tokio::test]
    async fn test_no_candidate() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "a.json", PERIODS_OFF);

        let scanner = MatchLogScanner::new(temp_dir.path().to_path_buf());
        assert!(scanner.find_candidate().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_directory_is_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let scanner = MatchLogScanner::new(temp_dir.path().join("missing"));
        assert!(scanner.find_candidate().await.is_err());
    }
}
