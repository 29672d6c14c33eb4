//! CSV and JSON loaders.
//!
//! Station CSVs are header-driven and validated against a fixed column set.
//! Incentive CSVs are positional with no header row. Grouped and cumulative
//! JSON files are read back into their typed shapes.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::SchemaError;
use crate::records::{IncentiveRecord, IncentiveRow, StationRecord, StationRow};
use crate::report::{BatchReport, IssueKind, RecordRef};
use crate::states::StateTable;
use crate::transform::types::{CumulativeTable, StateGrouped};

/// Every column a station CSV may carry.
pub const STATION_COLUMNS: [&str; 14] = [
    "Fuel Type Code",
    "Station Name",
    "Street Address",
    "City",
    "State",
    "ZIP",
    "EV Level1 EVSE Num",
    "EV Level2 EVSE Num",
    "EV DC Fast Count",
    "EV Network",
    "Latitude",
    "Longitude",
    "Open Date",
    "ID",
];

/// Columns a station CSV must carry.
pub const REQUIRED_STATION_COLUMNS: [&str; 3] = ["State", "Open Date", "ID"];

/// Reads and normalizes station rows.
///
/// # Errors
///
/// Fails on an unknown, duplicate or missing required column, and on I/O
/// errors. Per-row problems, including rows the CSV reader cannot decode,
/// go to `report` instead.
pub fn read_stations<R: Read>(
    reader: R,
    table: &StateTable,
    report: &mut BatchReport,
) -> Result<Vec<StationRecord>> {
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    validate_station_headers(&headers)?;

    let mut stations = Vec::new();
    for (i, result) in rdr.deserialize::<StationRow>().enumerate() {
        let row_number = i + 1;
        let Some(row) = decoded_row(result, row_number, report)? else {
            continue;
        };
        if let Some(station) = StationRecord::from_row(row, row_number, table, report) {
            stations.push(station);
        }
    }

    debug!(stations = stations.len(), skipped = report.dropped(), "Station rows read");
    Ok(stations)
}

fn validate_station_headers(headers: &StringRecord) -> Result<(), SchemaError> {
    let mut seen: Vec<&str> = Vec::with_capacity(headers.len());

    for header in headers.iter() {
        if !STATION_COLUMNS.contains(&header) {
            return Err(SchemaError::UnexpectedColumn(header.to_string()));
        }
        if seen.contains(&header) {
            return Err(SchemaError::DuplicateColumn(header.to_string()));
        }
        seen.push(header);
    }

    match REQUIRED_STATION_COLUMNS
        .iter()
        .find(|required| !seen.contains(*required))
    {
        Some(missing) => Err(SchemaError::MissingColumn(*missing)),
        None => Ok(()),
    }
}

/// Reads positional incentive rows into `(state name, record)` pairs.
///
/// Rows may have fewer fields than the five columns; the missing trailing
/// fields are null.
pub fn read_incentives<R: Read>(
    reader: R,
    table: &StateTable,
    report: &mut BatchReport,
) -> Result<Vec<(String, IncentiveRecord)>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut incentives = Vec::new();
    for (i, result) in rdr.deserialize::<IncentiveRow>().enumerate() {
        let row_number = i + 1;
        let Some(row) = decoded_row(result, row_number, report)? else {
            continue;
        };
        if let Some(pair) = IncentiveRecord::from_row(row, row_number, table, report) {
            incentives.push(pair);
        }
    }

    debug!(incentives = incentives.len(), "Incentive rows read");
    Ok(incentives)
}

/// Unwraps one decoded row. A row that cannot be decoded is reported and
/// skipped; I/O failures end the read.
fn decoded_row<T>(
    result: csv::Result<T>,
    row_number: usize,
    report: &mut BatchReport,
) -> Result<Option<T>> {
    match result {
        Ok(row) => Ok(Some(row)),
        Err(err) if err.is_io_error() => {
            Err(err).with_context(|| format!("failed to read row {row_number}"))
        }
        Err(err) => {
            report.push(
                RecordRef::Row(row_number),
                None,
                IssueKind::MalformedRow(err.to_string()),
            );
            Ok(None)
        }
    }
}

pub fn load_station_csv(
    path: &Path,
    table: &StateTable,
    report: &mut BatchReport,
) -> Result<Vec<StationRecord>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    read_stations(file, table, report).with_context(|| format!("failed to load {}", path.display()))
}

pub fn load_incentive_csv(
    path: &Path,
    table: &StateTable,
    report: &mut BatchReport,
) -> Result<Vec<(String, IncentiveRecord)>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    read_incentives(file, table, report)
        .with_context(|| format!("failed to load {}", path.display()))
}

/// Loads a state → records JSON file, keeping the file's state order.
pub fn load_grouped<T: DeserializeOwned>(path: &Path) -> Result<StateGrouped<T>> {
    load_json(path)
}

pub fn load_cumulative(path: &Path) -> Result<CumulativeTable> {
    load_json(path)
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}
