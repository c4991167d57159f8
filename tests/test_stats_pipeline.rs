//! Integration tests for the overlay stats pipeline
//!
//! Match logs on disk → StatsCollector → TextFileWriter → one text file per
//! overlay value. Verifies candidate selection, the written values, the
//! idempotent skip and the replacement of a previous pass.

#[cfg(test)]
mod stats_pipeline_tests {
    use rinkflow::config::StatsConfig;
    use rinkflow::stats_core::{StatsCollector, TextFileWriter, TickOutcome};
    use rinkflow::SimulatedScheduler;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    const SECOND_INTERMISSION: &str = r#"{
        "periods_enabled": "True",
        "current_period": "2",
        "players": [
            {"game_user_id": "76561198000000003", "username": "Wall", "team": "away",
             "stats": {"saves": 14, "conceded_goals": 2, "possession_time_sec": 12}},
            {"game_user_id": "76561198000000001", "username": "Sniper", "team": "home",
             "stats": {"goals": 2, "assists": 1, "shots": 6, "faceoffs_won": 2, "faceoffs_lost": 1,
                       "possession_time_sec": 291}},
            {"game_user_id": "76561198000000002", "username": "Grinder", "team": "home",
             "stats": {"goals": 0, "assists": 2, "takeaways": 3, "faceoffs_won": 1, "faceoffs_lost": 2}},
            {"game_user_id": "76561198000000009", "username": "Caster", "team": "spectator", "stats": {}}
        ]
    }"#;

    fn collector(logs: &Path, output: &Path) -> StatsCollector {
        let config = StatsConfig {
            logs_path: logs.to_path_buf(),
            output_path: output.to_path_buf(),
            poll_interval: Duration::from_millis(2000),
        };
        let writer = TextFileWriter::new(config.output_path.clone()).unwrap();
        StatsCollector::new(&config, Box::new(writer), Arc::new(SimulatedScheduler::new()))
    }

    fn read(output: &Path, name: &str) -> String {
        std::fs::read_to_string(output.join(format!("{}.txt", name))).unwrap()
    }

    #[tokio::test]
    async fn test_full_pass_writes_overlay_files() {
        let logs = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(logs.path().join("2026-10-18_20-15-02.json"), SECOND_INTERMISSION).unwrap();
        std::fs::write(
            logs.path().join("2026-10-18_21-40-11.json"),
            r#"{"periods_enabled": "False", "players": []}"#,
        )
        .unwrap();

        let mut collector = collector(logs.path(), output.path());
        let outcome = collector.tick().await.unwrap();
        assert!(matches!(outcome, TickOutcome::Written { ref file, .. } if file == "2026-10-18_20-15-02.json"));

        let out = output.path();
        assert_eq!(read(out, "game_state"), "Second Intermission");
        assert_eq!(read(out, "home_goals"), "2");
        assert_eq!(read(out, "home_assists"), "3");
        assert_eq!(read(out, "home_points"), "5");
        assert_eq!(read(out, "home_faceoffs_total"), "6");
        assert_eq!(read(out, "home_faceoff_win_percent"), "50%");
        assert_eq!(read(out, "away_saves"), "14");
        assert_eq!(read(out, "away_faceoff_win_percent"), "-");
        assert_eq!(read(out, "away_possession_time_friendly"), "00:12");

        assert_eq!(read(out, "home_player_0_username"), "Sniper");
        assert_eq!(read(out, "home_player_0_faceoff_win_percent"), "67%");
        assert_eq!(read(out, "home_player_0_possession_time_friendly"), "04:51");
        assert_eq!(read(out, "home_player_1_username"), "Grinder");
        assert_eq!(read(out, "home_player_1_faceoff_win_percent"), "33%");
        assert_eq!(read(out, "away_player_0_username"), "Wall");
        assert!(!out.join("away_player_1_username.txt").exists());
    }

    #[tokio::test]
    async fn test_unchanged_log_is_not_rewritten() {
        let logs = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(logs.path().join("game.json"), SECOND_INTERMISSION).unwrap();

        let mut collector = collector(logs.path(), output.path());
        collector.tick().await.unwrap();

        // An edit to the output between ticks survives an unchanged candidate
        std::fs::write(output.path().join("home_goals.txt"), "edited").unwrap();
        assert_eq!(collector.tick().await.unwrap(), TickOutcome::Unchanged);
        assert_eq!(read(output.path(), "home_goals"), "edited");
    }

    #[tokio::test]
    async fn test_newer_log_replaces_previous_pass() {
        let logs = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(logs.path().join("a_game.json"), SECOND_INTERMISSION).unwrap();

        let mut collector = collector(logs.path(), output.path());
        collector.tick().await.unwrap();
        assert!(output.path().join("home_player_1_username.txt").exists());

        std::fs::write(
            logs.path().join("b_game.json"),
            r#"{"periods_enabled": true, "current_period": 3, "players": [
                {"game_user_id": 7, "username": "Solo", "team": "home", "stats": {"goals": 1}}
            ]}"#,
        )
        .unwrap();
        collector.tick().await.unwrap();

        let out = output.path();
        assert_eq!(read(out, "game_state"), "Final");
        assert_eq!(read(out, "home_player_0_username"), "Solo");
        assert_eq!(read(out, "away_goals"), "0");
        assert!(!out.join("home_player_1_username.txt").exists());
        assert!(!out.join("away_player_0_username.txt").exists());
    }

    #[tokio::test]
    async fn test_corrupt_newest_log_falls_back() {
        let logs = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(logs.path().join("1.json"), SECOND_INTERMISSION).unwrap();
        std::fs::write(logs.path().join("2.json"), r#"{"periods_enabled": "True", "players": [{"#).unwrap();

        let mut collector = collector(logs.path(), output.path());
        let outcome = collector.tick().await.unwrap();

        assert!(matches!(outcome, TickOutcome::Written { ref file, .. } if file == "1.json"));
        assert_eq!(collector.last_processed(), Some("1.json"));
    }

    #[tokio::test]
    async fn test_numeric_ids_fill_slots_in_numeric_order() {
        let logs = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(
            logs.path().join("game.json"),
            r#"{"periods_enabled": true, "players": [
                {"game_user_id": 10, "username": "Ten", "team": "home", "stats": {"goals": 1, "possession_time_sec": 75}},
                {"game_user_id": 9, "username": "Nine", "team": "home", "stats": {}}
            ]}"#,
        )
        .unwrap();

        let mut collector = collector(logs.path(), output.path());
        collector.tick().await.unwrap();

        let out = output.path();
        assert_eq!(read(out, "home_player_0_username"), "Nine");
        assert_eq!(read(out, "home_player_1_username"), "Ten");
        assert_eq!(read(out, "home_player_1_impact_rating"), "1.62");
    }

    #[tokio::test]
    async fn test_empty_logs_directory() {
        let logs = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();

        let mut collector = collector(logs.path(), output.path());
        assert_eq!(collector.tick().await.unwrap(), TickOutcome::NoCandidate);
        assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 0);
    }
}
