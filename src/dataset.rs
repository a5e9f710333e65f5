use std::io::{Read, Write};
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Category, EnrichedSignal, RiskLevel, Signal};

pub const REQUIRED_COLUMNS: [&str; 4] = ["timestamp", "category", "severity_score", "description"];

const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("missing required columns: {}", .missing.join(", "))]
    Validation { missing: Vec<String> },
    #[error("could not read signals table: {0}")]
    Parse(#[from] csv::Error),
    #[error("line {line}: unrecognised timestamp {value:?}")]
    Timestamp { line: u64, value: String },
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    category: String,
    severity_score: f64,
    description: String,
}

#[derive(Debug, Serialize)]
struct EnrichedCsvRow<'a> {
    timestamp: NaiveDateTime,
    category: &'a str,
    severity_score: f64,
    description: &'a str,
    risk_level: RiskLevel,
    anomaly_flag: bool,
    confidence_score: f64,
}

/// Required columns absent from `headers`, sorted by name.
pub fn missing_columns<'a>(headers: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let present: Vec<&str> = headers.into_iter().collect();
    let mut missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !present.contains(column))
        .map(|column| column.to_string())
        .collect();
    missing.sort();
    missing
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_utc());
    }
    for format in TIMESTAMP_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Reads a signals table. The header is validated before any row is parsed
/// and a single bad row rejects the whole table.
pub fn read_signals<R: Read>(input: R) -> Result<Vec<Signal>, IngestError> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader.headers()?.clone();

    let missing = missing_columns(headers.iter());
    if !missing.is_empty() {
        tracing::warn!(?missing, "rejecting table with missing columns");
        return Err(IngestError::Validation { missing });
    }

    let mut signals = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row: CsvRow = record.deserialize(Some(&headers))?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let timestamp = parse_timestamp(&row.timestamp).ok_or_else(|| IngestError::Timestamp {
            line,
            value: row.timestamp.clone(),
        })?;

        signals.push(Signal {
            timestamp,
            category: Category::parse(&row.category),
            severity_score: row.severity_score,
            description: row.description,
        });
    }

    tracing::debug!(rows = signals.len(), "parsed signals table");
    Ok(signals)
}

pub fn load_csv(path: &Path) -> Result<Vec<Signal>, IngestError> {
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    let signals = read_signals(file)?;
    tracing::info!(path = %path.display(), rows = signals.len(), "loaded signals");
    Ok(signals)
}

pub fn write_signals<W: Write>(output: W, signals: &[Signal]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(output);
    for signal in signals {
        writer.serialize(signal)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_enriched<W: Write>(output: W, rows: &[EnrichedSignal]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(output);
    for row in rows {
        writer.serialize(EnrichedCsvRow {
            timestamp: row.signal.timestamp,
            category: row.signal.category.as_str(),
            severity_score: row.signal.severity_score,
            description: &row.signal.description,
            risk_level: row.risk_level,
            anomaly_flag: row.anomaly_flag,
            confidence_score: row.confidence_score,
        })?;
    }
    writer.flush()?;
    Ok(())
}
