//! Best-track ranking and stat-line formatting

use std::fmt;

use super::model::TrackStat;

/// Minimum races for a track to count towards a ranking
pub const DEFAULT_MIN_RACES: u32 = 2;

/// Number of tracks in a best-tracks list
pub const DEFAULT_LIMIT: usize = 10;

impl fmt::Display for TrackStat {
    /// Formats as a stat line, e.g. `Luigi Circuit - 12.3 pts (5 races)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} pts ({} races)",
            self.track(),
            format_one_decimal(self.avg()),
            self.races()
        )
    }
}

/// Pick the best tracks from a list.
///
/// Tracks with fewer than `min_races` races are skipped. The rest are ordered
/// by average, then race count, both descending, and cut to `limit`.
pub fn rank_tracks(stats: &[TrackStat], min_races: u32, limit: usize) -> Vec<TrackStat> {
    let mut ranked: Vec<TrackStat> = stats
        .iter()
        .filter(|s| s.races() >= min_races)
        .cloned()
        .collect();

    ranked.sort_by(|a, b| {
        b.avg()
            .total_cmp(&a.avg())
            .then_with(|| b.races().cmp(&a.races()))
    });
    ranked.truncate(limit);
    ranked
}

/// Format a value with one decimal place, rounding exact halves away from
/// zero (`0.25` -> `0.3`, `-0.25` -> `-0.3`).
///
/// `{:.1}` alone rounds exact halves to even, which disagrees with the web
/// front end on values like `0.25`.
pub fn format_one_decimal(value: f64) -> String {
    // A value sits exactly halfway between two tenths only when 4x is an odd
    // integer; anything else already rounds correctly through `{:.1}`.
    let quarters = value * 4.0;
    let is_tie = quarters.fract() == 0.0 && (quarters % 2.0).abs() == 1.0;
    if is_tie {
        format!("{:.1}", (value * 10.0).round() / 10.0)
    } else {
        format!("{:.1}", value)
    }
}

/// Format an average for display, e.g. `12.3 pts`
pub fn format_points(avg: f64) -> String {
    format!("{} pts", format_one_decimal(avg))
}

/// Format a signed difference with one decimal place
pub fn format_difference(difference: f64) -> String {
    format_one_decimal(difference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::parser::parse_track_line;

    fn stat(track: &str, avg: f64, races: u32) -> TrackStat {
        TrackStat::new(track, avg, races).unwrap()
    }

    #[test]
    fn test_display_stat_line() {
        assert_eq!(
            stat("Luigi Circuit", 12.3, 5).to_string(),
            "Luigi Circuit - 12.3 pts (5 races)"
        );
        assert_eq!(stat("DK Summit", 9.0, 1).to_string(), "DK Summit - 9.0 pts (1 races)");
    }

    #[test]
    fn test_display_parses_back() {
        let original = stat("Grumble Volcano", 7.4, 3);
        let parsed = parse_track_line(&original.to_string()).unwrap();
        assert_eq!(parsed.track(), original.track());
        assert_eq!(parsed.avg(), original.avg());
        assert_eq!(parsed.races(), original.races());
    }

    #[test]
    fn test_rank_tracks() {
        let stats = vec![
            stat("A", 8.0, 4),
            stat("B", 11.0, 1),
            stat("C", 9.5, 2),
            stat("D", 8.0, 6),
        ];

        let ranked = rank_tracks(&stats, DEFAULT_MIN_RACES, DEFAULT_LIMIT);
        let tracks: Vec<_> = ranked.iter().map(|s| s.track()).collect();
        assert_eq!(tracks, vec!["C", "D", "A"]);
    }

    #[test]
    fn test_rank_tracks_limit() {
        let stats: Vec<_> = (0..15).map(|i| stat(&format!("T{i}"), i as f64, 3)).collect();
        let ranked = rank_tracks(&stats, 2, 10);
        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].track(), "T14");
        assert_eq!(ranked[9].track(), "T5");
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_points(12.34), "12.3 pts");
        assert_eq!(format_points(8.0), "8.0 pts");
        assert_eq!(format_difference(2.0), "2.0");
        assert_eq!(format_difference(-1.56), "-1.6");
    }

    #[test]
    fn test_format_rounds_halves_away_from_zero() {
        assert_eq!(format_difference(0.25), "0.3");
        assert_eq!(format_difference(1.25), "1.3");
        assert_eq!(format_difference(0.75), "0.8");
        assert_eq!(format_difference(-0.25), "-0.3");
        assert_eq!(format_difference(-2.75), "-2.8");
        assert_eq!(format_points(2.25), "2.3 pts");
        assert_eq!(stat("Koopa Cape", 10.25, 4).to_string(), "Koopa Cape - 10.3 pts (4 races)");

        // Not exact halves in binary; these follow the stored value
        assert_eq!(format_difference(1.05), "1.1");
        assert_eq!(format_difference(0.35), "0.3");
        assert_eq!(format_difference(12.34), "12.3");
    }

    #[test]
    fn test_display_parses_back_for_rounded_values() {
        for avg in [0.0, 0.25, 3.96, 9.05, 14.99, 61.0] {
            let original = stat("Maple Treeway", avg, 7);
            let parsed = parse_track_line(&original.to_string()).unwrap();
            assert_eq!(parsed.track(), "Maple Treeway");
            assert_eq!(parsed.races(), 7);
            assert!((parsed.avg() - avg).abs() <= 0.05 + 1e-9);
        }
    }
}
