//! Integration tests for the parse -> compare -> export workflow.
//!
//! Fixtures mirror what the league API returns for `/api/top-team-tracks`:
//! mostly stat lines, sometimes structured objects, occasionally junk.

use ctc_stats_core::{
    compare_teams, normalize, Config, Division, Error, ExportFormat, MatchupRow, ScoreSheet,
    TrackStat,
};
use serde_json::{json, Value};
use tempfile::TempDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn team_a_payload() -> Value {
    json!([
        "Luigi Circuit - 10.0 pts (5 races)",
        "Moo Moo Meadows - 9.1 pts (3 races)",
        {"track": "Coconut Mall", "avg": 7.3, "races": 4},
        "Daisy Circuit - 6.0 pts (1 race)",
        null,
        "bag of sand",
    ])
}

fn team_b_payload() -> Value {
    json!([
        "Coconut Mall - 8.0 pts (2 races)",
        "luigi circuit - 8.0 pts (5 races)",
        "Toad's Factory - 5.0 pts (2 races)",
        {"track": "Daisy Circuit", "avg": 6.0, "races": "3"},
        "MOO MOO MEADOWS - 8.1 PTS (4 RACES)",
    ])
}

#[test]
fn test_full_comparison() {
    init_tracing();

    let team_a = normalize(&team_a_payload());
    let team_b = normalize(&team_b_payload());
    assert_eq!(team_a.len(), 4);
    assert_eq!(team_b.len(), 5);

    let rows = compare_teams(&team_a, &team_b);
    let tracks: Vec<_> = rows.iter().map(|r| r.track.as_str()).collect();

    // Luigi +2.0, Moo Moo +1.0, Daisy 0.0, Coconut -0.7; Toad's has no counterpart
    assert_eq!(
        tracks,
        vec!["luigi circuit", "MOO MOO MEADOWS", "Daisy Circuit", "Coconut Mall"]
    );
    assert!(rows.iter().all(|r| r.difference.is_some()));
    assert!(rows
        .windows(2)
        .all(|w| w[0].difference >= w[1].difference));

    let daisy = &rows[2];
    assert_eq!(daisy.races, 3);
    assert_eq!(daisy.difference, Some(0.0));
    assert!(daisy.favors_opponent());
    assert!(!rows[3].favors_opponent());
}

#[test]
fn test_single_shared_track() {
    let team_a = vec![TrackStat::new("A", 10.0, 5).unwrap()];
    let team_b = vec![
        TrackStat::new("A", 8.0, 5).unwrap(),
        TrackStat::new("B", 3.0, 2).unwrap(),
    ];

    let rows = compare_teams(&team_a, &team_b);
    assert_eq!(
        rows,
        vec![MatchupRow {
            track: "A".to_string(),
            team_average: 8.0,
            opponent_average: Some(10.0),
            races: 5,
            difference: Some(2.0),
        }]
    );
}

#[test]
fn test_rows_serialize_for_renderer() {
    let team_a = normalize(&json!(["A - 10 pts (5 races)"]));
    let team_b = normalize(&json!(["A - 8 pts (5 races)"]));
    let rows = compare_teams(&team_a, &team_b);

    let value = serde_json::to_value(&rows).unwrap();
    assert_eq!(
        value,
        json!([{
            "track": "A",
            "teamAverage": 8.0,
            "opponentAverage": 10.0,
            "races": 5,
            "difference": 2.0
        }])
    );
}

#[test]
fn test_export_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let rows = compare_teams(&normalize(&team_a_payload()), &normalize(&team_b_payload()));

    let json_path = temp_dir.path().join("matchup.json");
    ExportFormat::Json.export(&rows, &json_path).unwrap();
    let exported: Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(exported.as_array().unwrap().len(), rows.len());
    assert_eq!(exported[0]["rank"], 1);
    assert_eq!(exported[0]["track"], "luigi circuit");

    let csv_path = temp_dir.path().join("matchup.csv");
    ExportFormat::Csv.export(&rows, &csv_path).unwrap();
    let csv_text = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<_> = csv_text.lines().collect();
    assert_eq!(lines.len(), rows.len() + 1);
    assert_eq!(lines[1], "1,luigi circuit,10.0,8.0,2.0,5");
    assert_eq!(lines[4], "4,Coconut Mall,7.3,8.0,-0.7,2");
}

#[test]
fn test_export_to_missing_directory_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("nope").join("matchup.json");
    assert!(ExportFormat::Json.export(&[], &path).is_err());
}

#[test]
fn test_config_save_and_load() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("ctc-stats").join("config.json");

    let config = Config {
        division: "4".parse::<Division>().unwrap(),
        min_races: 3,
        limit: 5,
        min_points: 1.5,
        export_format: ExportFormat::Csv,
    };
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_config_invalid_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.json");

    std::fs::write(&path, "{ not json").unwrap();
    assert!(Config::load_from(&path).is_err());

    std::fs::write(&path, r#"{"division": ""}"#).unwrap();
    assert!(Config::load_from(&path).is_err());
}

fn score_sheet_csv() -> String {
    let mut csv = String::from("team,player,track,score\n");
    for (team, base) in [("Shells", 10), ("Bananas", 8)] {
        for track in ["Luigi Circuit", "Koopa Cape"] {
            for race in 0..2 {
                for player in 0..5 {
                    let score = base - player + race;
                    csv.push_str(&format!("{team},{team}{player},{track},{score}\n"));
                }
            }
        }
    }
    csv
}

#[test]
fn test_aggregate_then_compare() {
    init_tracing();

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("ctc_d1_2.csv");
    std::fs::write(&path, score_sheet_csv()).unwrap();

    let sheet = ScoreSheet::from_path(&path).unwrap();
    assert_eq!(sheet.len(), 40);
    assert_eq!(sheet.teams(), vec!["Bananas", "Shells"]);

    // Shells: (10+9+8+7+6) + (11+10+9+8+7) = 85 points over 2 races
    let shells = sheet.top_team_tracks("shells", 2, 10).unwrap();
    assert_eq!(shells.len(), 2);
    assert_eq!(shells[0].avg(), 42.5);
    assert_eq!(shells[0].races(), 2);

    // Lines served by the API feed straight back into the comparison
    let lines: Vec<String> = shells.iter().map(ToString::to_string).collect();
    let team_a = normalize(&serde_json::to_value(&lines).unwrap());
    let team_b = sheet.top_team_tracks("Bananas", 2, 10).unwrap();

    let rows = compare_teams(&team_a, &team_b);
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.difference == Some(10.0)));
}

#[test]
fn test_aggregate_unknown_team() {
    let sheet = ScoreSheet::from_reader(score_sheet_csv().as_bytes()).unwrap();
    let err = sheet.top_team_tracks("Mushrooms", 2, 10).unwrap_err();
    assert!(matches!(err, Error::UnknownName { kind: "team", .. }));
    assert_eq!(err.to_string(), "Unknown team: \"Mushrooms\"");
}
