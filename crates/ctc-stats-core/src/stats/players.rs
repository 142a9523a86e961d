//! Player stat lines and player API responses

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::model::TrackStat;
use super::parser::normalize;

/// Points threshold below which a player line is hidden
pub const DEFAULT_MIN_POINTS: f64 = 2.0;

fn points_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([0-9]+(?:\.[0-9]+)?)\s*pts").expect("points pattern is valid"))
}

/// Extract the first `<number> pts` value from a line such as
/// `"Player - 9.8 pts (14 races)"`
pub fn extract_points(line: &str) -> Option<f64> {
    let caps = points_pattern().captures(line)?;
    caps.get(1)?.as_str().parse().ok()
}

/// Keep lines scoring at least `min_points`. Lines without a score count as 0.
pub fn filter_min_points<'a, S>(lines: &'a [S], min_points: f64) -> Vec<&'a str>
where
    S: AsRef<str>,
{
    lines
        .iter()
        .map(S::as_ref)
        .filter(|line| extract_points(line).unwrap_or(0.0) >= min_points)
        .collect()
}

/// Sort player names alphabetically, ignoring case
pub fn sort_names(names: &mut [String]) {
    names.sort_by_cached_key(|name| name.to_lowercase());
}

/// Overall average for one player (`/api/player-avg`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAverage {
    pub avg: f64,
    pub player_name: String,
    pub team_name: String,
    pub races: u32,
}

/// A player's best tracks (`/api/player`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerTracks {
    #[serde(default)]
    pub player: String,
    #[serde(default)]
    pub results: Value,
}

impl PlayerTracks {
    /// Parsed track stats; malformed result entries are dropped
    pub fn tracks(&self) -> Vec<TrackStat> {
        normalize(&self.results)
    }
}
