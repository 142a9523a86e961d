//! Headless commands over saved API responses
//!
//! Usage:
//!   ctc-stats compare <team-a.json> <team-b.json>   Rank tracks by A-vs-B differential
//!   ctc-stats parse <file.json>                     Normalize a stat payload
//!   ctc-stats rank <file.json>                      Best tracks from a stat payload
//!   ctc-stats players <file.json>                   Player lines, tracks or overall average
//!   ctc-stats roster <file.json>                    Sort a list of player names
//!   ctc-stats aggregate <scores.csv>                Build stats from raw race results
//!   ctc-stats divisions                             List league divisions
//!
//! Options:
//!   --division <token>   Division shown in headings
//!   --min-races <n>      Minimum races for `rank`
//!   --limit <n>          Number of tracks for `rank`
//!   --min-points <x>     Threshold for `players`
//!   --team <name>        Team for `aggregate`
//!   --player <name>      Player for `aggregate`
//!   --track <name>       Single track for `aggregate`
//!   --export <path>      Write `compare` rows to a file
//!   --format <fmt>       Export format: json or csv
//!   --json               Output in JSON format
//!
//! A file name of `-` reads from stdin.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde_json::Value;

use ctc_stats_core::{
    compare_teams, filter_min_points, format_difference, format_points, normalize, rank_tracks,
    sort_names, Config, Division, ExportFormat, MatchupRow, PlayerAverage, PlayerTracks,
    ScoreSheet, TrackStat,
};

/// CLI command to execute
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    Compare { team_a: String, team_b: String },
    Parse { input: String },
    Rank { input: String },
    Players { input: String },
    Roster { input: String },
    Aggregate { input: String },
    Divisions,
}

/// CLI options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOptions {
    pub json: bool,
    pub division: Option<Division>,
    pub min_races: Option<u32>,
    pub limit: Option<usize>,
    pub min_points: Option<f64>,
    pub export: Option<PathBuf>,
    pub format: Option<ExportFormat>,
    pub team: Option<String>,
    pub player: Option<String>,
    pub track: Option<String>,
}

/// Parse CLI arguments and return command + options
pub fn parse_args(args: &[String]) -> Result<(CliCommand, CliOptions), String> {
    let mut options = CliOptions::default();
    let mut positional: Vec<&str> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "--json" => options.json = true,
            "--division" | "-d" => {
                let value = next_value(args, &mut i, arg)?;
                options.division = Some(value.parse::<Division>().map_err(|e| e.to_string())?);
            }
            "--min-races" => {
                let value = next_value(args, &mut i, arg)?;
                options.min_races = Some(parse_number(arg, value)?);
            }
            "--limit" => {
                let value = next_value(args, &mut i, arg)?;
                options.limit = Some(parse_number(arg, value)?);
            }
            "--min-points" => {
                let value = next_value(args, &mut i, arg)?;
                options.min_points = Some(parse_number(arg, value)?);
            }
            "--export" | "-o" => {
                let value = next_value(args, &mut i, arg)?;
                options.export = Some(PathBuf::from(value));
            }
            "--format" => {
                let value = next_value(args, &mut i, arg)?;
                options.format = Some(value.parse::<ExportFormat>().map_err(|e| e.to_string())?);
            }
            "--team" => options.team = Some(next_value(args, &mut i, arg)?.to_string()),
            "--player" => options.player = Some(next_value(args, &mut i, arg)?.to_string()),
            "--track" => options.track = Some(next_value(args, &mut i, arg)?.to_string()),
            "-" => positional.push(arg.as_str()),
            _ if arg.starts_with('-') => return Err(format!("Unknown option: {}", arg)),
            _ => positional.push(arg.as_str()),
        }
        i += 1;
    }

    let command = match positional.as_slice() {
        ["compare", team_a, team_b] => CliCommand::Compare {
            team_a: team_a.to_string(),
            team_b: team_b.to_string(),
        },
        ["compare", ..] => return Err("compare requires two input files".to_string()),
        ["parse", input] => CliCommand::Parse {
            input: input.to_string(),
        },
        ["rank", input] => CliCommand::Rank {
            input: input.to_string(),
        },
        ["players", input] => CliCommand::Players {
            input: input.to_string(),
        },
        ["roster", input] => CliCommand::Roster {
            input: input.to_string(),
        },
        ["aggregate", input] => CliCommand::Aggregate {
            input: input.to_string(),
        },
        ["parse" | "rank" | "players" | "roster" | "aggregate", ..] => {
            return Err(format!("{} requires one input file", positional[0]))
        }
        ["divisions"] => CliCommand::Divisions,
        [] => {
            return Err(
                "No command specified. Use: compare, parse, rank, players, roster, aggregate, or divisions"
                    .to_string(),
            )
        }
        [other, ..] => return Err(format!("Unknown command: {}", other)),
    };

    if options.export.is_some() && !matches!(command, CliCommand::Compare { .. }) {
        return Err("--export is only supported by compare".to_string());
    }

    if let CliCommand::Aggregate { .. } = command {
        if options.team.is_some() && options.player.is_some() {
            return Err("--team and --player cannot be combined".to_string());
        }
        if options.track.is_some() && options.team.is_none() && options.player.is_none() {
            return Err("--track requires --team or --player".to_string());
        }
    } else if options.team.is_some() || options.player.is_some() || options.track.is_some() {
        return Err("--team, --player and --track are only supported by aggregate".to_string());
    }

    Ok((command, options))
}

fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{} requires a value", flag))
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("Invalid value for {}: {}", flag, value))
}

pub fn print_help() {
    println!("ctc-stats v{}", env!("CARGO_PKG_VERSION"));
    println!("Parse and compare CTC league track statistics");
    println!();
    println!("USAGE:");
    println!("    ctc-stats compare <team-a.json> <team-b.json> [--export <path>] [--format json|csv]");
    println!("    ctc-stats parse <file.json>");
    println!("    ctc-stats rank <file.json> [--min-races <n>] [--limit <n>]");
    println!("    ctc-stats players <file.json> [--min-points <x>]");
    println!("    ctc-stats roster <file.json>");
    println!("    ctc-stats aggregate <scores.csv> [--team <name> | --player <name>] [--track <name>]");
    println!("    ctc-stats divisions");
    println!();
    println!("OPTIONS:");
    println!("    -d, --division <token>  Division shown in headings (1_2, 3, 4)");
    println!("    --json                  Output in JSON format");
    println!("    -h, --help              Show this help message");
    println!();
    println!("Input files hold saved API responses, except for aggregate, which reads");
    println!("the division's team,player,track,score CSV. Use '-' to read from stdin.");
    println!("Set RUST_LOG=debug to see dropped entries.");
}

/// Run CLI command
pub fn run(command: CliCommand, options: CliOptions) -> anyhow::Result<()> {
    let config = Config::load();
    let division = options.division.clone().unwrap_or_else(|| config.division.clone());

    match command {
        CliCommand::Compare { team_a, team_b } => {
            run_compare(&team_a, &team_b, &division, &config, &options)
        }
        CliCommand::Parse { input } => run_parse(&input, &options),
        CliCommand::Rank { input } => run_rank(&input, &division, &config, &options),
        CliCommand::Players { input } => run_players(&input, &division, &config, &options),
        CliCommand::Roster { input } => run_roster(&input, &options),
        CliCommand::Aggregate { input } => run_aggregate(&input, &division, &config, &options),
        CliCommand::Divisions => run_divisions(&options),
    }
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))
    }
}

fn read_json(input: &str) -> anyhow::Result<Value> {
    let content = read_input(input)?;
    serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", input))
}

fn read_stats(input: &str) -> anyhow::Result<Vec<TrackStat>> {
    let raw = read_json(input)?;
    let stats = normalize(&raw);
    let total = raw.as_array().map_or(0, Vec::len);
    if stats.len() < total {
        tracing::info!(
            "{}: dropped {} of {} entries that could not be parsed",
            input,
            total - stats.len(),
            total
        );
    }
    Ok(stats)
}

/// Display name for an input: the file stem, or "stdin"
fn team_label(input: &str) -> String {
    if input == "-" {
        return "stdin".to_string();
    }
    Path::new(input)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.to_string())
}

fn run_compare(
    team_a: &str,
    team_b: &str,
    division: &Division,
    config: &Config,
    options: &CliOptions,
) -> anyhow::Result<()> {
    if team_a == "-" && team_b == "-" {
        bail!("Only one input can be read from stdin");
    }

    let stats_a = read_stats(team_a)?;
    let stats_b = read_stats(team_b)?;
    let rows = compare_teams(&stats_a, &stats_b);

    if let Some(ref path) = options.export {
        let format = options.format.unwrap_or(config.export_format);
        format
            .export(&rows, path)
            .with_context(|| format!("Failed to export to {}", path.display()))?;
        eprintln!("Exported {} rows as {} to {}", rows.len(), format, path.display());
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let name_a = team_label(team_a);
    let name_b = team_label(team_b);
    println!("Best tracks for {} vs {} ({})", name_a, name_b, division.label());
    println!();
    if rows.is_empty() {
        println!("No overlapping track data for these teams.");
        return Ok(());
    }
    print!("{}", render_matchup_table(&rows, &name_a, &name_b));
    Ok(())
}

/// Render matchup rows as an aligned text table
pub fn render_matchup_table(rows: &[MatchupRow], name_a: &str, name_b: &str) -> String {
    let diff_header = format!("Diff ({} - {})", name_a, name_b);
    let track_width = rows
        .iter()
        .map(|r| r.track.chars().count())
        .chain(std::iter::once("Track".len()))
        .max()
        .unwrap_or(0);
    let a_width = name_a.chars().count().max(10);
    let b_width = name_b.chars().count().max(10);

    let mut out = format!(
        "{:>3}  {:<tw$}  {:>aw$}  {:>bw$}  {}\n",
        "#",
        "Track",
        name_a,
        name_b,
        diff_header,
        tw = track_width,
        aw = a_width,
        bw = b_width,
    );
    for (i, row) in rows.iter().enumerate() {
        let opponent = row
            .opponent_average
            .map(format_points)
            .unwrap_or_else(|| "-".to_string());
        let difference = row
            .difference
            .map(format_difference)
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:>3}  {:<tw$}  {:>aw$}  {:>bw$}  {}\n",
            i + 1,
            row.track,
            opponent,
            format_points(row.team_average),
            difference,
            tw = track_width,
            aw = a_width,
            bw = b_width,
        ));
    }
    out
}

fn run_parse(input: &str, options: &CliOptions) -> anyhow::Result<()> {
    let stats = read_stats(input)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        for stat in &stats {
            println!("{}", stat);
        }
    }
    Ok(())
}

fn run_rank(
    input: &str,
    division: &Division,
    config: &Config,
    options: &CliOptions,
) -> anyhow::Result<()> {
    let stats = read_stats(input)?;
    let min_races = options.min_races.unwrap_or(config.min_races);
    let limit = options.limit.unwrap_or(config.limit);
    let ranked = rank_tracks(&stats, min_races, limit);

    let heading = format!(
        "Top tracks for {} ({}, min {} races)",
        team_label(input),
        division.label(),
        min_races
    );
    print_tracks(&heading, &ranked, options)
}

/// The three shapes the player endpoints return
#[derive(Debug, Clone, PartialEq)]
enum PlayerResponse {
    /// `/api/top-players`: stat lines, one per player
    Lines(Vec<String>),
    /// `/api/player`: a player's best tracks
    Tracks(PlayerTracks),
    /// `/api/player-avg`: one overall average
    Average(PlayerAverage),
}

impl PlayerResponse {
    fn from_value(raw: Value) -> anyhow::Result<Self> {
        match raw {
            Value::Array(items) => Ok(PlayerResponse::Lines(
                items
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            )),
            Value::Object(map) => {
                if let Some(message) = map.get("error").and_then(Value::as_str) {
                    bail!("API returned an error: {}", message);
                }
                let has_average = map.contains_key("avg");
                let raw = Value::Object(map);
                if has_average {
                    let average = serde_json::from_value(raw)
                        .context("Player average response is missing fields")?;
                    Ok(PlayerResponse::Average(average))
                } else {
                    Ok(PlayerResponse::Tracks(serde_json::from_value(raw)?))
                }
            }
            _ => bail!("Unrecognized player response"),
        }
    }
}

fn run_players(
    input: &str,
    division: &Division,
    config: &Config,
    options: &CliOptions,
) -> anyhow::Result<()> {
    match PlayerResponse::from_value(read_json(input)?)? {
        PlayerResponse::Lines(lines) => {
            let min_points = options.min_points.unwrap_or(config.min_points);
            let kept = filter_min_points(&lines, min_points);

            if options.json {
                println!("{}", serde_json::to_string_pretty(&kept)?);
                return Ok(());
            }

            println!(
                "Top players ({}, at least {})",
                division.label(),
                format_points(min_points)
            );
            println!();
            for (i, line) in kept.iter().enumerate() {
                println!("#{} {}", i + 1, line);
            }
        }
        PlayerResponse::Tracks(response) => {
            let tracks = response.tracks();
            print_tracks(&format!("Best tracks for {}", response.player), &tracks, options)?;
        }
        PlayerResponse::Average(average) => print_player_average(&average, options)?,
    }
    Ok(())
}

fn print_player_average(average: &PlayerAverage, options: &CliOptions) -> anyhow::Result<()> {
    if options.json {
        println!("{}", serde_json::to_string_pretty(average)?);
    } else if average.team_name.is_empty() {
        println!(
            "{} - {} ({} races)",
            average.player_name,
            format_points(average.avg),
            average.races
        );
    } else {
        println!(
            "{} ({}) - {} ({} races)",
            average.player_name,
            average.team_name,
            format_points(average.avg),
            average.races
        );
    }
    Ok(())
}

/// Print ranked stats as numbered stat lines, or as a JSON array of lines
fn print_tracks(heading: &str, tracks: &[TrackStat], options: &CliOptions) -> anyhow::Result<()> {
    if options.json {
        let lines: Vec<String> = tracks.iter().map(ToString::to_string).collect();
        println!("{}", serde_json::to_string_pretty(&lines)?);
        return Ok(());
    }

    println!("{}", heading);
    println!();
    if tracks.is_empty() {
        println!("No tracks with enough races.");
    }
    for (i, stat) in tracks.iter().enumerate() {
        println!("{:>3}. {}", i + 1, stat);
    }
    Ok(())
}

fn run_roster(input: &str, options: &CliOptions) -> anyhow::Result<()> {
    let mut names: Vec<String> = match read_json(input)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| v.as_str().map(|s| s.trim().to_string()))
            .filter(|s| !s.is_empty())
            .collect(),
        _ => bail!("{} does not hold a list of names", input),
    };
    sort_names(&mut names);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&names)?);
    } else {
        for name in &names {
            println!("{}", name);
        }
    }
    Ok(())
}

fn read_score_sheet(input: &str) -> anyhow::Result<ScoreSheet> {
    let sheet = if input == "-" {
        ScoreSheet::from_reader(read_input(input)?.as_bytes())
    } else {
        ScoreSheet::from_path(Path::new(input))
    };
    sheet.with_context(|| format!("Failed to load score sheet {}", input))
}

fn run_aggregate(
    input: &str,
    division: &Division,
    config: &Config,
    options: &CliOptions,
) -> anyhow::Result<()> {
    let sheet = read_score_sheet(input)?;
    let min_races = options.min_races.unwrap_or(config.min_races);
    let limit = options.limit.unwrap_or(config.limit);

    match (&options.team, &options.player, &options.track) {
        (Some(team), None, Some(track)) => {
            let stat = sheet.team_track_average(team, track)?;
            print_tracks(&format!("{} ({})", team, division.label()), &[stat], options)
        }
        (Some(team), None, None) => {
            let tracks = sheet.top_team_tracks(team, min_races, limit)?;
            let heading = format!(
                "Top tracks for {} ({}, min {} races)",
                team,
                division.label(),
                min_races
            );
            print_tracks(&heading, &tracks, options)
        }
        (None, Some(player), Some(track)) => {
            let stat = sheet.player_track_average(player, track)?;
            print_tracks(&format!("{} ({})", player, division.label()), &[stat], options)
        }
        (None, Some(player), None) => {
            let average = sheet.player_average(player)?;
            let tracks = sheet.top_player_tracks(player, min_races, limit)?;
            if options.json {
                let lines: Vec<String> = tracks.iter().map(ToString::to_string).collect();
                let value = serde_json::json!({ "average": average, "tracks": lines });
                println!("{}", serde_json::to_string_pretty(&value)?);
                return Ok(());
            }
            print_player_average(&average, options)?;
            println!();
            let heading = format!("Top tracks ({}, min {} races)", division.label(), min_races);
            print_tracks(&heading, &tracks, options)
        }
        _ => {
            let players = sheet.players();
            let summary = serde_json::json!({
                "teams": sheet.teams(),
                "players": players,
                "tracks": sheet.tracks(),
            });
            if options.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{} rows in {} ({})", sheet.len(), team_label(input), division.label());
                println!("Teams:   {}", sheet.teams().join(", "));
                println!("Players: {}", players.join(", "));
                println!("Tracks:  {}", sheet.tracks().join(", "));
            }
            Ok(())
        }
    }
}

fn run_divisions(options: &CliOptions) -> anyhow::Result<()> {
    let divisions = Division::known();

    if options.json {
        println!("{}", serde_json::to_string(&divisions)?);
    } else {
        for division in &divisions {
            println!("{:<5} {}", division.as_str(), division.label());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_compare() {
        let (command, options) =
            parse_args(&args(&["compare", "a.json", "b.json", "--division", "3", "--json"]))
                .unwrap();
        assert_eq!(
            command,
            CliCommand::Compare {
                team_a: "a.json".to_string(),
                team_b: "b.json".to_string(),
            }
        );
        assert!(options.json);
        assert_eq!(options.division.unwrap().as_str(), "3");
    }

    #[test]
    fn test_parse_compare_export() {
        let (_, options) = parse_args(&args(&[
            "compare", "-", "b.json", "--export", "out.csv", "--format", "csv",
        ]))
        .unwrap();
        assert_eq!(options.export, Some(PathBuf::from("out.csv")));
        assert_eq!(options.format, Some(ExportFormat::Csv));
    }

    #[test]
    fn test_parse_rank_options() {
        let (command, options) =
            parse_args(&args(&["rank", "t.json", "--min-races", "3", "--limit", "5"])).unwrap();
        assert_eq!(
            command,
            CliCommand::Rank {
                input: "t.json".to_string()
            }
        );
        assert_eq!(options.min_races, Some(3));
        assert_eq!(options.limit, Some(5));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["compare", "a.json"])).is_err());
        assert!(parse_args(&args(&["parse"])).is_err());
        assert!(parse_args(&args(&["explode"])).is_err());
        assert!(parse_args(&args(&["divisions", "--bogus"])).is_err());
        assert!(parse_args(&args(&["rank", "t.json", "--limit", "ten"])).is_err());
        assert!(parse_args(&args(&["rank", "t.json", "--limit"])).is_err());
        assert!(parse_args(&args(&["parse", "t.json", "--export", "x.json"])).is_err());
        assert!(parse_args(&args(&["divisions", "--division", ""])).is_err());
    }

    #[test]
    fn test_team_label() {
        assert_eq!(team_label("data/Team Alpha.json"), "Team Alpha");
        assert_eq!(team_label("-"), "stdin");
    }

    #[test]
    fn test_render_matchup_table() {
        let rows = vec![MatchupRow {
            track: "Luigi Circuit".to_string(),
            team_average: 8.0,
            opponent_average: Some(10.0),
            races: 5,
            difference: Some(2.0),
        }];
        let table = render_matchup_table(&rows, "Alpha", "Beta");
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Diff (Alpha - Beta)"));
        assert!(lines[1].contains("Luigi Circuit"));
        assert!(lines[1].contains("10.0 pts"));
        assert!(lines[1].contains("8.0 pts"));
        assert!(lines[1].trim_end().ends_with("2.0"));
    }

    #[test]
    fn test_parse_aggregate() {
        let (command, options) = parse_args(&args(&[
            "aggregate", "ctc_d3.csv", "--team", "Shells", "--track", "Koopa Cape",
        ]))
        .unwrap();
        assert_eq!(
            command,
            CliCommand::Aggregate {
                input: "ctc_d3.csv".to_string()
            }
        );
        assert_eq!(options.team.as_deref(), Some("Shells"));
        assert_eq!(options.track.as_deref(), Some("Koopa Cape"));

        assert!(parse_args(&args(&["aggregate", "s.csv", "--team", "A", "--player", "B"])).is_err());
        assert!(parse_args(&args(&["aggregate", "s.csv", "--track", "Koopa Cape"])).is_err());
        assert!(parse_args(&args(&["rank", "t.json", "--team", "A"])).is_err());
        assert!(parse_args(&args(&["aggregate"])).is_err());
    }

    #[test]
    fn test_parse_roster() {
        let (command, _) = parse_args(&args(&["roster", "-"])).unwrap();
        assert_eq!(
            command,
            CliCommand::Roster {
                input: "-".to_string()
            }
        );
    }

    #[test]
    fn test_player_response_shapes() {
        let lines = PlayerResponse::from_value(json!(["Alice - 9.8 pts (14 races)", 3])).unwrap();
        assert_eq!(
            lines,
            PlayerResponse::Lines(vec!["Alice - 9.8 pts (14 races)".to_string()])
        );

        let tracks = PlayerResponse::from_value(json!({
            "player": "Alice",
            "results": ["Luigi Circuit - 12.3 pts (5 races)"]
        }))
        .unwrap();
        match tracks {
            PlayerResponse::Tracks(response) => {
                assert_eq!(response.player, "Alice");
                assert_eq!(response.tracks().len(), 1);
            }
            other => panic!("expected tracks, got {:?}", other),
        }

        let average = PlayerResponse::from_value(json!({
            "avg": 8.4,
            "player_name": "Alice",
            "team_name": "",
            "races": 36
        }))
        .unwrap();
        match average {
            PlayerResponse::Average(average) => assert_eq!(average.races, 36),
            other => panic!("expected average, got {:?}", other),
        }
    }

    #[test]
    fn test_player_response_errors() {
        let err = PlayerResponse::from_value(json!({"error": "Invalid Player Name"})).unwrap_err();
        assert!(err.to_string().contains("Invalid Player Name"));
        assert!(PlayerResponse::from_value(json!({"avg": 8.4})).is_err());
        assert!(PlayerResponse::from_value(json!("Alice")).is_err());
    }
}
