//! Flattening a match summary into named overlay values
//!
//! Naming scheme (the writer appends `.txt`):
//! - `{home|away}_{stat}` for team totals
//! - `{home|away}_player_{index}_username` and `{home|away}_player_{index}_{stat}`
//! - generic info such as `game_state`
//!
//! `index` is the position within the team after sorting by player id.

use super::aggregator::MatchSummary;
use super::record::Team;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub value: String,
}

impl Artifact {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.txt", self.name)
    }
}

/// True for names this module produces (`{name}.txt` with a team prefix, or
/// `game_state.txt`)
pub fn is_artifact_file(file_name: &str) -> bool {
    let Some(name) = file_name.strip_suffix(".txt") else {
        return false;
    };
    name == "game_state" || name.starts_with("home_") || name.starts_with("away_")
}

fn team_prefix(team: Team) -> Option<&'static str> {
    match team {
        Team::Home => Some("home"),
        Team::Away => Some("away"),
        Team::Other => None,
    }
}

/// Every artifact for one pass, in write order
pub fn flatten(summary: &MatchSummary) -> Vec<Artifact> {
    let mut artifacts = Vec::new();

    for ((name, home), (_, away)) in summary.home.iter().zip(summary.away.iter()) {
        artifacts.push(Artifact::new(format!("home_{}", name), home.to_string()));
        artifacts.push(Artifact::new(format!("away_{}", name), away.to_string()));
    }

    for team in [Team::Home, Team::Away] {
        let Some(prefix) = team_prefix(team) else { continue };
        for (idx, player) in summary.team_players(team).enumerate() {
            let scope = format!("{}_player_{}", prefix, idx);
            artifacts.push(Artifact::new(format!("{}_username", scope), player.username.clone()));
            for (name, value) in player.stats.iter() {
                artifacts.push(Artifact::new(format!("{}_{}", scope, name), value.to_string()));
            }
        }
    }

    artifacts.push(Artifact::new("game_state", summary.game_state.label()));
    artifacts
}
