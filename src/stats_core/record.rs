//! Match-log records as written by the game
//!
//! The game is loose with types: `periods_enabled` shows up as `"True"` or
//! `true`, `current_period` as `"2"` or `2`, player ids as strings or
//! numbers. Everything is folded into one shape here.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug)]
pub enum RecordError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl From<std::io::Error> for RecordError {
    fn from(err: std::io::Error) -> Self {
        RecordError::Io(err)
    }
}

impl From<serde_json::Error> for RecordError {
    fn from(err: serde_json::Error) -> Self {
        RecordError::Json(err)
    }
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordError::Io(e) => write!(f, "IO error: {}", e),
            RecordError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for RecordError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Home,
    Away,
    /// Spectators and anything else the game might add
    #[serde(other)]
    Other,
}

/// Player identifier as the game wrote it
///
/// Ordering compares numeric ids as numbers and text ids as text; numeric
/// ids sort before text ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlayerId {
    Numeric(u64),
    Text(String),
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerId::Numeric(n) => write!(f, "{}", n),
            PlayerId::Text(s) => f.write_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for PlayerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(PlayerId::Text(s)),
            Value::Number(n) => Ok(match n.as_u64() {
                Some(id) => PlayerId::Numeric(id),
                None => PlayerId::Text(n.to_string()),
            }),
            other => Err(serde::de::Error::custom(format!(
                "expected string or number id, got {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPlayer {
    pub game_user_id: PlayerId,
    pub username: String,
    pub team: Team,
    #[serde(default)]
    pub stats: HashMap<String, Value>,
}

impl RawPlayer {
    /// Raw stat value; missing or non-numeric stats count as 0
    pub fn raw_stat(&self, name: &str) -> f64 {
        self.stats.get(name).and_then(Value::as_f64).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchRecord {
    #[serde(default, deserialize_with = "truthy")]
    pub periods_enabled: bool,
    #[serde(default, deserialize_with = "period")]
    pub current_period: Option<u32>,
    #[serde(default)]
    pub players: Vec<RawPlayer>,
}

impl MatchRecord {
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(json)?)
    }

    pub async fn load(path: &Path) -> Result<Self, RecordError> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json(&json)
    }
}

fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

fn period<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_match_log() {
        let json = r#"{
            "periods_enabled": "True",
            "current_period": "2",
            "players": [
                {"game_user_id": "76561198000000002", "username": "Puckmaster", "team": "home",
                 "stats": {"goals": 2.0, "shots": 5, "possession_time_sec": 61.4}},
                {"game_user_id": 1234, "username": "Goalie", "team": "away", "stats": {}}
            ]
        }"#;

        let record = MatchRecord::from_json(json).unwrap();
        assert!(record.periods_enabled);
        assert_eq!(record.current_period, Some(2));
        assert_eq!(record.players.len(), 2);

        let skater = &record.players[0];
        assert_eq!(skater.team, Team::Home);
        assert_eq!(skater.raw_stat("goals"), 2.0);
        assert_eq!(skater.raw_stat("possession_time_sec"), 61.4);
        assert_eq!(skater.raw_stat("saves"), 0.0);

        assert_eq!(record.players[0].game_user_id, PlayerId::Text("76561198000000002".to_string()));
        assert_eq!(record.players[1].game_user_id, PlayerId::Numeric(1234));
        assert_eq!(record.players[1].team, Team::Away);
    }

    #[test]
    fn test_periods_flag_variants() {
        let enabled = |raw: &str| {
            MatchRecord::from_json(&format!(r#"{{"periods_enabled": {}, "players": []}}"#, raw))
                .unwrap()
                .periods_enabled
        };
        assert!(enabled("true"));
        assert!(enabled(r#""True""#));
        assert!(enabled(r#""true""#));
        assert!(!enabled("false"));
        assert!(!enabled(r#""False""#));
        assert!(!enabled("null"));
        assert!(!MatchRecord::from_json("{}").unwrap().periods_enabled);
    }

    #[test]
    fn test_current_period_variants() {
        let period = |raw: &str| {
            MatchRecord::from_json(&format!(r#"{{"current_period": {}}}"#, raw))
                .unwrap()
                .current_period
        };
        assert_eq!(period("1"), Some(1));
        assert_eq!(period(r#""1""#), Some(1));
        assert_eq!(period(r#""OT""#), None);
        assert_eq!(period("null"), None);
    }

    #[test]
    fn test_unknown_team_and_non_numeric_stat() {
        let json = r#"{"players": [{"game_user_id": "9", "username": "ref", "team": "spectator",
                        "stats": {"goals": "many"}}]}"#;
        let record = MatchRecord::from_json(json).unwrap();
        assert_eq!(record.players[0].team, Team::Other);
        assert_eq!(record.players[0].raw_stat("goals"), 0.0);
    }

    #[test]
    fn test_numeric_ids_order_numerically() {
        let mut ids = vec![
            PlayerId::Numeric(100),
            PlayerId::Numeric(9),
            PlayerId::Text("abc".to_string()),
            PlayerId::Numeric(10),
        ];
        ids.sort();
        assert_eq!(
            ids,
            vec![
                PlayerId::Numeric(9),
                PlayerId::Numeric(10),
                PlayerId::Numeric(100),
                PlayerId::Text("abc".to_string()),
            ]
        );
        assert_eq!(PlayerId::Numeric(10).to_string(), "10");
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            MatchRecord::from_json(r#"{"periods_enabled": "True", "players": ["#),
            Err(RecordError::Json(_))
        ));
    }
}
