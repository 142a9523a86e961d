//! Track statistics: aggregation, parsing, matchup comparison and export
//!
//! Parsing and comparison work on the pre-aggregated data the league API
//! returns and never fail on bad input; malformed entries simply don't show
//! up in results. Aggregation builds those stats from raw race rows.

mod aggregate;
mod export;
mod matchup;
mod model;
mod parser;
mod players;
mod ranking;

pub use aggregate::{ScoreRow, ScoreSheet, MAX_RACE_SCORE, PLAYERS_PER_TEAM};
pub use export::{export_csv, export_json, write_csv, write_json, ExportFormat};
pub use matchup::compare_teams;
pub use model::{MatchupRow, StatEntry, TrackStat};
pub use parser::{normalize, normalize_entries, parse_one, parse_track_line, parse_value};
pub use players::{
    extract_points, filter_min_points, sort_names, PlayerAverage, PlayerTracks,
    DEFAULT_MIN_POINTS,
};
pub use ranking::{
    format_difference, format_one_decimal, format_points, rank_tracks, DEFAULT_LIMIT,
    DEFAULT_MIN_RACES,
};
