//! Overlay stat schema: raw counters copied from the match log plus the
//! derived values computed from them
//!
//! Every field of a fresh `Stats` is the placeholder `-`, which the overlay
//! shows for scopes that were never aggregated. Once a scope is aggregated
//! all raw fields hold numbers (missing ones become 0) and the derived
//! fields are evaluated in `DERIVED_STATS` order, so a derived field may
//! read any raw field or any derived field listed before it.

use chrono::NaiveTime;
use std::fmt;

/// Raw counters in output order
pub const RAW_STATS: [&str; 21] = [
    "score",
    "goals",
    "assists",
    "shots",
    "passes",
    "turnovers",
    "post_hits",
    "blocks",
    "saves",
    "faceoffs_won",
    "faceoffs_lost",
    "takeaways",
    "possession_time_sec",
    "games_played",
    "conceded_goals",
    "contributed_goals",
    "primary_assists",
    "secondary_assists",
    "wins",
    "losses",
    "game_winning_goals",
];

pub type DerivedFn = fn(&Stats) -> StatValue;

/// Derived stats in evaluation order
pub const DERIVED_STATS: [(&str, DerivedFn); 5] = [
    ("faceoffs_total", faceoffs_total),
    ("faceoff_win_percent", faceoff_win_percent),
    ("possession_time_friendly", possession_time_friendly),
    ("points", points),
    ("impact_rating", impact_rating),
];

/// Raw then derived names, the order artifacts are written in
pub fn all_stat_names() -> impl Iterator<Item = &'static str> {
    RAW_STATS
        .iter()
        .copied()
        .chain(DERIVED_STATS.iter().map(|(name, _)| *name))
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatValue {
    /// Not computed / not applicable, rendered as `-`
    Placeholder,
    Count(i64),
    Percent(i64),
    Text(String),
    Rating(f64),
}

impl StatValue {
    /// Numeric view used by derived formulas; the placeholder reads as 0
    pub fn as_f64(&self) -> f64 {
        match self {
            StatValue::Count(n) | StatValue::Percent(n) => *n as f64,
            StatValue::Rating(r) => *r,
            StatValue::Placeholder | StatValue::Text(_) => 0.0,
        }
    }

    pub fn as_i64(&self) -> i64 {
        match self {
            StatValue::Count(n) | StatValue::Percent(n) => *n,
            StatValue::Rating(r) => *r as i64,
            StatValue::Placeholder | StatValue::Text(_) => 0,
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Placeholder => f.write_str("-"),
            StatValue::Count(n) => write!(f, "{}", n),
            StatValue::Percent(n) => write!(f, "{}%", n),
            StatValue::Text(s) => f.write_str(s),
            // Whole ratings keep one decimal so the overlay never flips between "3" and "3.25"
            StatValue::Rating(r) if r.fract() == 0.0 => write!(f, "{:.1}", r),
            StatValue::Rating(r) => write!(f, "{}", r),
        }
    }
}

/// One scope's values (a team or a player), keyed by stat name
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    values: Vec<(&'static str, StatValue)>,
}

impl Stats {
    /// Every field set to the placeholder
    pub fn new() -> Self {
        Self {
            values: all_stat_names().map(|name| (name, StatValue::Placeholder)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> &StatValue {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
            .unwrap_or(&StatValue::Placeholder)
    }

    /// Sets a schema field; names outside the schema are ignored
    pub fn set(&mut self, name: &str, value: StatValue) {
        if let Some(slot) = self.values.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            log::debug!("Ignoring value for unknown stat '{}'", name);
        }
    }

    pub fn count(&self, name: &str) -> i64 {
        self.get(name).as_i64()
    }

    /// Evaluate every derived field, in order, from the values already set
    pub fn compute_derived(&mut self) {
        for (name, derive) in DERIVED_STATS.iter() {
            let value = derive(self);
            self.set(name, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &StatValue)> {
        self.values.iter().map(|(name, value)| (*name, value))
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

/// Round half to even, as the game's own tooling does
pub fn round_count(value: f64) -> i64 {
    value.round_ties_even() as i64
}

fn faceoffs_total(s: &Stats) -> StatValue {
    StatValue::Count(s.count("faceoffs_won") + s.count("faceoffs_lost"))
}

fn faceoff_win_percent(s: &Stats) -> StatValue {
    let total = s.count("faceoffs_total");
    if total > 0 {
        let pct = 100.0 * s.count("faceoffs_won") as f64 / total as f64;
        StatValue::Percent(round_count(pct))
    } else {
        StatValue::Placeholder
    }
}

/// `%M:%S` of the seconds value taken as a time of day; minutes wrap at 60
fn possession_time_friendly(s: &Stats) -> StatValue {
    let secs = s.count("possession_time_sec").rem_euclid(86_400) as u32;
    let text = NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)
        .map(|t| t.format("%M:%S").to_string())
        .unwrap_or_else(|| "00:00".to_string());
    StatValue::Text(text)
}

fn points(s: &Stats) -> StatValue {
    StatValue::Count(s.count("goals") + s.count("assists"))
}

/// Weighted contribution score; the trailing 0.25 is a flat per-scope
/// constant, not tied to game-winning goals. Two decimals, ties to even.
fn impact_rating(s: &Stats) -> StatValue {
    let v = |name: &str| s.get(name).as_f64();
    let rating = v("goals")
        + v("primary_assists") * 0.75
        + v("shots") * 0.1
        + v("saves") * 0.25
        + v("secondary_assists") * 0.25
        + v("faceoffs_won") * 0.05
        - v("faceoffs_lost") * 0.05
        - v("turnovers") * 0.1
        + v("takeaways") * 0.1
        + v("possession_time_sec") * 0.005
        + (v("game_winning_goals") + 0.25);
    StatValue::Rating((rating * 100.0).round_ties_even() / 100.0)
}
