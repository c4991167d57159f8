//! Broadcast token normalization and classification
//!
//! The game rewrites its broadcast file with whatever the scoreboard clock
//! shows: `4:51`, `+0:12` in overtime, `FACEOFF`, a dash between periods,
//! or garbage while the file is half-written. Everything downstream works on
//! the normalized form produced here.

/// Classification of a normalized token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `[+]MM:SS`, digits only
    Time,
    Faceoff,
    /// The literal `-`
    Dash,
    Other,
}

impl TokenKind {
    pub fn classify(token: &str) -> Self {
        if is_time_format(token) {
            TokenKind::Time
        } else if is_faceoff(token) {
            TokenKind::Faceoff
        } else if is_dash(token) {
            TokenKind::Dash
        } else {
            TokenKind::Other
        }
    }
}

/// Trim, upper-case and fold en/em dashes to `-`
///
/// Idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(raw: &str) -> String {
    raw.trim()
        .to_uppercase()
        .replace(['\u{2013}', '\u{2014}'], "-")
}

pub fn is_dash(token: &str) -> bool {
    token == "-"
}

pub fn is_faceoff(token: &str) -> bool {
    token == "FACEOFF"
}

/// `MM:SS` with one optional leading `+` (overtime)
///
/// Minutes are unbounded and seconds are not range-checked.
pub fn is_time_format(token: &str) -> bool {
    split_clock(token).is_some()
}

/// Game clock in seconds, `None` for anything that is not a time token
pub fn to_seconds(token: &str) -> Option<u64> {
    let (minutes, seconds) = split_clock(token)?;
    let minutes: u64 = minutes.parse().ok()?;
    let seconds: u64 = seconds.parse().ok()?;
    minutes.checked_mul(60)?.checked_add(seconds)
}

fn split_clock(token: &str) -> Option<(&str, &str)> {
    let clock = token.strip_prefix('+').unwrap_or(token);
    let (minutes, seconds) = clock.split_once(':')?;

    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if all_digits(minutes) && all_digits(seconds) {
        Some((minutes, seconds))
    } else {
        None
    }
}
