//! Aggregation of raw race results into per-track averages
//!
//! The league keeps one CSV per division with a row per player per race:
//! `team,player,track,score`. Everything the API serves as stat lines is
//! derived from these rows.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::model::TrackStat;
use super::players::PlayerAverage;
use super::ranking::rank_tracks;
use crate::error::{Error, Result};

/// Highest score a single race can award; larger values are data errors
pub const MAX_RACE_SCORE: f64 = 15.0;

/// Score rows recorded per team per race
pub const PLAYERS_PER_TEAM: usize = 5;

/// One player's result in one race
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoreRow {
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub player: Option<String>,
    #[serde(default)]
    pub track: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub score: Option<f64>,
}

impl ScoreRow {
    /// Score if it counts towards averages
    fn counted_score(&self) -> Option<f64> {
        self.score.filter(|s| (0.0..=MAX_RACE_SCORE).contains(s))
    }
}

fn same_name(field: Option<&str>, name: &str) -> bool {
    field.is_some_and(|f| f.trim().to_lowercase() == name.trim().to_lowercase())
}

fn require(kind: &'static str, name: &str, known: &[String]) -> Result<()> {
    if known.iter().any(|k| same_name(Some(k.as_str()), name)) {
        Ok(())
    } else {
        Err(Error::UnknownName {
            kind,
            name: name.to_string(),
        })
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// All race rows for one division
#[derive(Debug, Clone, Default)]
pub struct ScoreSheet {
    rows: Vec<ScoreRow>,
}

impl ScoreSheet {
    pub fn from_rows(rows: Vec<ScoreRow>) -> Self {
        Self { rows }
    }

    /// Read rows from CSV with a `team,player,track,score` header
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let rows = reader
            .deserialize()
            .collect::<std::result::Result<Vec<ScoreRow>, _>>()?;

        tracing::debug!("Loaded {} score rows", rows.len());
        Ok(Self { rows })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn rows(&self) -> &[ScoreRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct names in one column, sorted case-insensitively.
    /// The first spelling seen is kept.
    fn distinct(&self, column: impl Fn(&ScoreRow) -> Option<&str>) -> Vec<String> {
        let mut seen: BTreeMap<String, String> = BTreeMap::new();
        for name in self.rows.iter().filter_map(&column) {
            let name = name.trim();
            if !name.is_empty() {
                seen.entry(name.to_lowercase()).or_insert_with(|| name.to_string());
            }
        }
        seen.into_values().collect()
    }

    pub fn teams(&self) -> Vec<String> {
        self.distinct(|r| r.team.as_deref())
    }

    pub fn players(&self) -> Vec<String> {
        self.distinct(|r| r.player.as_deref())
    }

    pub fn tracks(&self) -> Vec<String> {
        self.distinct(|r| r.track.as_deref())
    }

    /// Scores matching `filter`, plus the track spelling of the last match
    fn collect_scores(&self, filter: impl Fn(&ScoreRow) -> bool) -> (Vec<f64>, Option<&str>) {
        let mut scores = Vec::new();
        let mut track = None;
        for row in &self.rows {
            if !filter(row) {
                continue;
            }
            if let Some(score) = row.counted_score() {
                scores.push(score);
                track = row.track.as_deref().map(str::trim).or(track);
            }
        }
        (scores, track)
    }

    /// A team's points per race on one track.
    ///
    /// Every race contributes [`PLAYERS_PER_TEAM`] rows, so the average is
    /// the summed score divided by the number of races, and the race count is
    /// the row count over [`PLAYERS_PER_TEAM`], rounded.
    pub fn team_track_average(&self, team: &str, track: &str) -> Result<TrackStat> {
        require("team", team, &self.teams())?;
        require("track", track, &self.tracks())?;

        let (scores, spelling) = self.collect_scores(|r| {
            same_name(r.team.as_deref(), team) && same_name(r.track.as_deref(), track)
        });
        let races = scores.len() as f64 / PLAYERS_PER_TEAM as f64;
        let avg = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / races
        };

        track_stat(spelling.unwrap_or(track), round_one_decimal(avg), races.round() as u32)
    }

    /// A player's mean score per race on one track
    pub fn player_track_average(&self, player: &str, track: &str) -> Result<TrackStat> {
        require("player", player, &self.players())?;
        require("track", track, &self.tracks())?;

        let (scores, spelling) = self.collect_scores(|r| {
            same_name(r.player.as_deref(), player) && same_name(r.track.as_deref(), track)
        });

        track_stat(
            spelling.unwrap_or(track),
            round_one_decimal(mean(&scores)),
            scores.len() as u32,
        )
    }

    /// A player's mean score per race over every track
    pub fn player_average(&self, player: &str) -> Result<PlayerAverage> {
        require("player", player, &self.players())?;

        let (scores, _) = self.collect_scores(|r| same_name(r.player.as_deref(), player));
        let team_name = self
            .rows
            .iter()
            .filter(|r| same_name(r.player.as_deref(), player))
            .filter_map(|r| r.team.as_deref())
            .last()
            .unwrap_or_default()
            .trim()
            .to_string();

        Ok(PlayerAverage {
            avg: round_one_decimal(mean(&scores)),
            player_name: player.to_string(),
            team_name,
            races: scores.len() as u32,
        })
    }

    /// A team's best tracks, ranked with [`rank_tracks`]
    pub fn top_team_tracks(
        &self,
        team: &str,
        min_races: u32,
        limit: usize,
    ) -> Result<Vec<TrackStat>> {
        require("team", team, &self.teams())?;

        let stats = self
            .tracks()
            .iter()
            .map(|track| self.team_track_average(team, track))
            .collect::<Result<Vec<_>>>()?;
        Ok(rank_tracks(&stats, min_races, limit))
    }

    /// A player's best tracks, ranked with [`rank_tracks`]
    pub fn top_player_tracks(
        &self,
        player: &str,
        min_races: u32,
        limit: usize,
    ) -> Result<Vec<TrackStat>> {
        require("player", player, &self.players())?;

        let stats = self
            .tracks()
            .iter()
            .map(|track| self.player_track_average(player, track))
            .collect::<Result<Vec<_>>>()?;
        Ok(rank_tracks(&stats, min_races, limit))
    }
}

fn mean(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

fn track_stat(track: &str, avg: f64, races: u32) -> Result<TrackStat> {
    TrackStat::new(track, avg, races)
        .ok_or_else(|| Error::Other(format!("Invalid aggregate for track {:?}", track)))
}
