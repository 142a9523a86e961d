//! Stat-line parsing
//!
//! Turns API entries, either `"Luigi Circuit - 12.3 pts (5 races)"` lines or
//! `{track, avg, races}` objects, into [`TrackStat`]s. Entries that don't
//! parse are dropped rather than reported.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::model::{StatEntry, TrackStat};

/// `<track> - <avg> pts (<races> race(s))`, shortest track prefix wins
fn stat_line_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(.*?)\s*-\s*([0-9.]+)\s*pts\s*\(([0-9]+)\s*races?\)")
            .expect("stat line pattern is valid")
    })
}

/// Parse a single entry
pub fn parse_one(entry: &StatEntry) -> Option<TrackStat> {
    match entry {
        StatEntry::Text(line) => parse_track_line(line),
        StatEntry::Record(map) => parse_record(map),
        StatEntry::Unrecognized => None,
    }
}

/// Parse a raw JSON value
pub fn parse_value(value: &Value) -> Option<TrackStat> {
    parse_one(&StatEntry::from_value(value))
}

/// Parse a `"<track> - <avg> pts (<races> races)"` line
pub fn parse_track_line(line: &str) -> Option<TrackStat> {
    let caps = stat_line_pattern().captures(line)?;
    let avg = parse_float_prefix(caps.get(2)?.as_str())?;
    let races: u32 = caps.get(3)?.as_str().parse().ok()?;

    TrackStat::new(caps.get(1)?.as_str(), avg, races).map(|s| s.with_original_text(line))
}

fn parse_record(map: &Map<String, Value>) -> Option<TrackStat> {
    let track = map.get("track")?.as_str()?;
    let avg = map.get("avg").filter(|v| v.is_number())?.as_f64()?;
    let races = coerce_race_count(map.get("races"));

    let stat = TrackStat::new(track, avg, races)?;
    match map.get("text").and_then(Value::as_str) {
        Some(text) => Some(stat.with_original_text(text)),
        None => Some(stat),
    }
}

/// Loose numeric coercion for race counts: anything that doesn't yield a
/// finite number counts as 0 races.
fn coerce_race_count(value: Option<&Value>) -> u32 {
    let n = match value {
        None | Some(Value::Null) => 0.0,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse().unwrap_or(f64::NAN)
            }
        }
        Some(_) => f64::NAN,
    };

    if !n.is_finite() || n <= 0.0 {
        return 0;
    }
    // Float-to-int `as` saturates at u32::MAX
    n.trunc() as u32
}

/// Parse the longest leading decimal literal (`"1.2.3"` -> 1.2)
fn parse_float_prefix(s: &str) -> Option<f64> {
    let mut seen_dot = false;
    let end = s
        .char_indices()
        .find(|&(_, c)| {
            if c == '.' && !seen_dot {
                seen_dot = true;
                false
            } else {
                !c.is_ascii_digit()
            }
        })
        .map_or(s.len(), |(i, _)| i);

    let value: f64 = s[..end].parse().ok()?;
    value.is_finite().then_some(value)
}

/// Normalize a raw API payload into track stats.
///
/// Non-array input yields an empty list; elements that fail to parse are
/// dropped. Order is preserved.
pub fn normalize(raw: &Value) -> Vec<TrackStat> {
    let Some(items) = raw.as_array() else {
        tracing::debug!("Stat payload is not an array, treating as empty");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let parsed = parse_value(item);
            if parsed.is_none() {
                tracing::debug!("Dropping unparseable stat entry: {}", item);
            }
            parsed
        })
        .collect()
}

/// Normalize already-classified entries
pub fn normalize_entries<I>(entries: I) -> Vec<TrackStat>
where
    I: IntoIterator<Item = StatEntry>,
{
    entries.into_iter().filter_map(|e| parse_one(&e)).collect()
}
