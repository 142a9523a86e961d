//! Team-vs-team matchup comparison

use std::collections::HashMap;

use super::model::{MatchupRow, TrackStat};

/// Compare two teams track by track.
///
/// Team B drives the comparison: every team B track that team A also has
/// data for becomes one row, with `difference = team A avg - team B avg`.
/// Tracks are matched case-insensitively; if team A lists a track twice the
/// later entry wins. Rows are sorted by difference, largest first, and ties
/// keep team B's order. Every returned row has a finite difference.
pub fn compare_teams(team_a: &[TrackStat], team_b: &[TrackStat]) -> Vec<MatchupRow> {
    let team_a_by_track: HashMap<String, &TrackStat> =
        team_a.iter().map(|s| (s.track_key(), s)).collect();

    let mut rows: Vec<MatchupRow> = team_b
        .iter()
        .filter_map(|stat| {
            let opponent = team_a_by_track.get(&stat.track_key())?;
            let difference = opponent.avg() - stat.avg();
            if !difference.is_finite() {
                tracing::debug!("Skipping {}: difference out of range", stat.track());
                return None;
            }
            Some(MatchupRow {
                track: stat.track().to_string(),
                team_average: stat.avg(),
                opponent_average: Some(opponent.avg()),
                races: stat.races(),
                difference: Some(difference),
            })
        })
        .collect();

    // `sort_by` is stable, so equal differences stay in team B order
    rows.sort_by(|a, b| {
        let a = a.difference.unwrap_or(f64::NEG_INFINITY);
        let b = b.difference.unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });

    tracing::debug!(
        "Compared {} vs {} tracks: {} overlapping",
        team_a.len(),
        team_b.len(),
        rows.len()
    );

    rows
}
