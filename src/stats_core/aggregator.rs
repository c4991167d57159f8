//! Per-player and per-team aggregation of one match record

use super::record::{MatchRecord, PlayerId, Team};
use super::schema::{round_count, StatValue, Stats, RAW_STATS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    FirstIntermission,
    SecondIntermission,
    Final,
}

impl GameState {
    /// Period 1 or 2 means the log was written at that intermission;
    /// anything else is the end of the game
    pub fn from_period(current_period: Option<u32>) -> Self {
        match current_period {
            Some(1) => GameState::FirstIntermission,
            Some(2) => GameState::SecondIntermission,
            _ => GameState::Final,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GameState::FirstIntermission => "First Intermission",
            GameState::SecondIntermission => "Second Intermission",
            GameState::Final => "Final",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlayerLine {
    pub game_user_id: PlayerId,
    pub username: String,
    pub team: Team,
    pub stats: Stats,
}

/// Everything the overlay needs from one match record
#[derive(Debug, Clone)]
pub struct MatchSummary {
    pub home: Stats,
    pub away: Stats,
    /// Sorted by `game_user_id` (numeric ids numerically)
    pub players: Vec<PlayerLine>,
    pub game_state: GameState,
}

impl MatchSummary {
    pub fn team_players(&self, team: Team) -> impl Iterator<Item = &PlayerLine> {
        self.players.iter().filter(move |p| p.team == team)
    }
}

pub struct StatsAggregator;

impl StatsAggregator {
    /// Build fresh stats for every player and both teams
    ///
    /// Teams are always aggregated, so a team without players holds zeros
    /// rather than placeholders.
    pub fn aggregate(record: &MatchRecord) -> MatchSummary {
        let mut players: Vec<PlayerLine> = record
            .players
            .iter()
            .map(|raw| {
                let mut stats = Stats::new();
                for name in RAW_STATS {
                    stats.set(name, StatValue::Count(round_count(raw.raw_stat(name))));
                }
                PlayerLine {
                    game_user_id: raw.game_user_id.clone(),
                    username: raw.username.clone(),
                    team: raw.team,
                    stats,
                }
            })
            .collect();
        players.sort_by(|a, b| a.game_user_id.cmp(&b.game_user_id));

        let mut home = team_totals(&players, Team::Home);
        let mut away = team_totals(&players, Team::Away);

        for player in players.iter_mut() {
            player.stats.compute_derived();
        }
        home.compute_derived();
        away.compute_derived();

        MatchSummary {
            home,
            away,
            players,
            game_state: GameState::from_period(record.current_period),
        }
    }
}

fn team_totals(players: &[PlayerLine], team: Team) -> Stats {
    let mut totals = Stats::new();
    for name in RAW_STATS {
        let sum: i64 = players
            .iter()
            .filter(|p| p.team == team)
            .map(|p| p.stats.count(name))
            .sum();
        totals.set(name, StatValue::Count(sum));
    }
    totals
}
