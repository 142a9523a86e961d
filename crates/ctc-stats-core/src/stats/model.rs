//! Data models for track statistics and matchups

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One team's or player's aggregate performance on one track
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackStat {
    track: String,
    avg: f64,
    races: u32,
    /// The stat line this entry was parsed from, if any
    #[serde(rename = "text", skip_serializing_if = "Option::is_none")]
    original_text: Option<String>,
}

impl TrackStat {
    /// Build a stat, trimming the track name.
    ///
    /// Returns `None` if the trimmed track is empty or the average is negative
    /// or not finite.
    pub fn new(track: &str, avg: f64, races: u32) -> Option<Self> {
        let track = track.trim();
        if track.is_empty() || !avg.is_finite() || avg < 0.0 {
            return None;
        }
        Some(Self {
            track: track.to_string(),
            // -0.0 becomes 0.0
            avg: avg.abs(),
            races,
            original_text: None,
        })
    }

    /// Attach the source text this stat came from
    pub fn with_original_text(mut self, text: impl Into<String>) -> Self {
        self.original_text = Some(text.into());
        self
    }

    pub fn track(&self) -> &str {
        &self.track
    }

    /// Mean points per race
    pub fn avg(&self) -> f64 {
        self.avg
    }

    /// Number of races behind the average
    pub fn races(&self) -> u32 {
        self.races
    }

    pub fn original_text(&self) -> Option<&str> {
        self.original_text.as_deref()
    }

    /// Lower-cased track name used for joining across teams
    pub(crate) fn track_key(&self) -> String {
        self.track.to_lowercase()
    }
}

/// A raw stat entry as delivered by the API.
///
/// The API has returned both plain stat lines and structured objects over
/// time, so each element is classified before parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum StatEntry {
    /// `"<track> - <avg> pts (<races> races)"`
    Text(String),
    /// `{ "track": ..., "avg": ..., "races": ..., "text": ... }`
    Record(Map<String, Value>),
    /// Numbers, booleans, null and nested arrays
    Unrecognized,
}

impl StatEntry {
    /// Classify a JSON value
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => StatEntry::Text(s.clone()),
            Value::Object(map) => StatEntry::Record(map.clone()),
            _ => StatEntry::Unrecognized,
        }
    }
}

impl From<&str> for StatEntry {
    fn from(s: &str) -> Self {
        StatEntry::Text(s.to_string())
    }
}

impl From<String> for StatEntry {
    fn from(s: String) -> Self {
        StatEntry::Text(s)
    }
}

impl From<&TrackStat> for StatEntry {
    fn from(stat: &TrackStat) -> Self {
        match serde_json::to_value(stat) {
            Ok(Value::Object(map)) => StatEntry::Record(map),
            _ => StatEntry::Unrecognized,
        }
    }
}

/// One row of a team-vs-team comparison on a single track.
///
/// `team_average` and `races` describe the driving team (team B);
/// `opponent_average` is team A's average on the same track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupRow {
    pub track: String,
    pub team_average: f64,
    pub opponent_average: Option<f64>,
    pub races: u32,
    /// `opponent_average - team_average`; positive means team A is favored
    pub difference: Option<f64>,
}

impl MatchupRow {
    /// Returns true if team A scores at least as well as team B on this track
    pub fn favors_opponent(&self) -> bool {
        self.difference.is_some_and(|d| d >= 0.0)
    }
}
