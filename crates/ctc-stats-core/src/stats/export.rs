//! Export functionality for matchup data

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::model::MatchupRow;
use super::ranking::{format_difference, format_one_decimal};
use crate::error::{Error, Result};

/// Serializable view of a matchup row with its rank
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportRow<'a> {
    rank: usize,
    #[serde(flatten)]
    row: &'a MatchupRow,
}

/// Write matchup rows as pretty JSON
pub fn write_json<W: Write>(rows: &[MatchupRow], mut writer: W) -> Result<()> {
    let export: Vec<ExportRow<'_>> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| ExportRow { rank: i + 1, row })
        .collect();

    serde_json::to_writer_pretty(&mut writer, &export)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Write matchup rows as CSV with one-decimal values
pub fn write_csv<W: Write>(rows: &[MatchupRow], writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    writer.write_record(["Rank", "Track", "Team A Avg", "Team B Avg", "Difference", "Races"])?;

    for (i, row) in rows.iter().enumerate() {
        writer.write_record([
            (i + 1).to_string(),
            row.track.clone(),
            row.opponent_average.map(format_one_decimal).unwrap_or_default(),
            format_one_decimal(row.team_average),
            row.difference.map(format_difference).unwrap_or_default(),
            row.races.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Export matchup rows to a JSON file
pub fn export_json(rows: &[MatchupRow], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_json(rows, BufWriter::new(file))
}

/// Export matchup rows to a CSV file
pub fn export_csv(rows: &[MatchupRow], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_csv(rows, BufWriter::new(file))
}

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "JSON"),
            ExportFormat::Csv => write!(f, "CSV"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(Error::Other(format!(
                "Invalid export format '{}'. Use: json or csv",
                s
            ))),
        }
    }
}

impl ExportFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    /// Export rows using this format
    pub fn export(&self, rows: &[MatchupRow], path: &Path) -> Result<()> {
        tracing::debug!("Exporting {} matchup rows as {} to {}", rows.len(), self, path.display());
        match self {
            ExportFormat::Json => export_json(rows, path),
            ExportFormat::Csv => export_csv(rows, path),
        }
    }
}
