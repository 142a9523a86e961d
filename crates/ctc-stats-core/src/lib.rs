//! # ctc-stats-core
//!
//! Core library for working with CTC league statistics.
//!
//! The league API serves pre-aggregated per-track averages, either as stat
//! lines like `"Luigi Circuit - 12.3 pts (5 races)"` or as structured
//! objects. This crate provides:
//! - Tolerant parsing of both shapes into [`TrackStat`]s
//! - Team-vs-team matchup comparison ranked by score differential
//! - Best-track ranking and player-line filtering
//! - JSON and CSV export of matchups
//!
//! ## Modules
//!
//! - [`config`] - Persisted user defaults
//! - [`division`] - League division tokens
//! - [`error`] - Error types and Result alias
//! - [`stats`] - Aggregation, parsing, comparison, ranking and export
//!
//! ## Example
//!
//! ```
//! use ctc_stats_core::{compare_teams, normalize};
//! use serde_json::json;
//!
//! let team_a = normalize(&json!(["Luigi Circuit - 10.0 pts (5 races)"]));
//! let team_b = normalize(&json!([
//!     "Luigi Circuit - 8.0 pts (5 races)",
//!     {"track": "Koopa Cape", "avg": 3.0, "races": 2},
//! ]));
//!
//! let rows = compare_teams(&team_a, &team_b);
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].difference, Some(2.0));
//! ```

pub mod config;
pub mod division;
pub mod error;
pub mod stats;

// Error types
pub use error::{Error, Result};

// Configuration
pub use config::Config;
pub use division::Division;

// Statistics
pub use stats::{
    compare_teams, export_csv, export_json, extract_points, filter_min_points, format_difference,
    format_one_decimal, format_points, normalize, normalize_entries, parse_one, parse_track_line,
    parse_value, rank_tracks, sort_names, write_csv, write_json, ExportFormat, MatchupRow,
    PlayerAverage, PlayerTracks, ScoreRow, ScoreSheet, StatEntry, TrackStat,
};
