//! Typed station and incentive records.
//!
//! `*Row` types mirror the raw CSV cells. `*Record` types are the normalized
//! shapes written to (and read back from) the grouped JSON files.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::parse_open_date;
use crate::report::{BatchReport, IssueKind, RecordRef};
use crate::states::StateTable;

/// A numeric cell: whole values are integers, anything else stays a float.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Integer(i64),
    Float(f64),
}

impl Numeric {
    /// Largest magnitude at which every whole `f64` is exact.
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    pub fn from_f64(value: f64) -> Self {
        if value.fract() == 0.0 && value.abs() <= Self::MAX_EXACT {
            Numeric::Integer(value as i64)
        } else {
            Numeric::Float(value)
        }
    }

    /// Parses `"2"`, `"2.0"` (→ integer 2) or `"2.5"` (→ float).
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(i) = raw.parse::<i64>() {
            return Some(Numeric::Integer(i));
        }
        let value: f64 = raw.parse().ok()?;
        value.is_finite().then(|| Self::from_f64(value))
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Integer(i) => write!(f, "{i}"),
            Numeric::Float(v) => write!(f, "{v}"),
        }
    }
}

/// One station row exactly as read from the CSV. Empty cells are `None`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StationRow {
    #[serde(rename = "Fuel Type Code")]
    pub fuel_type_code: Option<String>,
    #[serde(rename = "Station Name")]
    pub station_name: Option<String>,
    #[serde(rename = "Street Address")]
    pub street_address: Option<String>,
    #[serde(rename = "City")]
    pub city: Option<String>,
    #[serde(rename = "State")]
    pub state: Option<String>,
    #[serde(rename = "ZIP")]
    pub zip: Option<String>,
    #[serde(rename = "EV Level1 EVSE Num")]
    pub ev_level1_evse_num: Option<String>,
    #[serde(rename = "EV Level2 EVSE Num")]
    pub ev_level2_evse_num: Option<String>,
    #[serde(rename = "EV DC Fast Count")]
    pub ev_dc_fast_count: Option<String>,
    #[serde(rename = "EV Network")]
    pub ev_network: Option<String>,
    #[serde(rename = "Latitude")]
    pub latitude: Option<String>,
    #[serde(rename = "Longitude")]
    pub longitude: Option<String>,
    #[serde(rename = "Open Date")]
    pub open_date: Option<String>,
    #[serde(rename = "ID")]
    pub id: Option<String>,
}

/// A charging station with its state expanded to a full name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StationRecord {
    #[serde(rename = "Fuel Type Code")]
    pub fuel_type_code: Option<String>,
    #[serde(rename = "Station Name")]
    pub station_name: Option<String>,
    #[serde(rename = "Street Address")]
    pub street_address: Option<String>,
    #[serde(rename = "City")]
    pub city: Option<String>,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "ZIP")]
    pub zip: Option<String>,
    #[serde(rename = "EV Level1 EVSE Num")]
    pub ev_level1_evse_num: Option<Numeric>,
    #[serde(rename = "EV Level2 EVSE Num")]
    pub ev_level2_evse_num: Option<Numeric>,
    #[serde(rename = "EV DC Fast Count")]
    pub ev_dc_fast_count: Option<Numeric>,
    #[serde(rename = "EV Network")]
    pub ev_network: Option<String>,
    #[serde(rename = "Latitude")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude")]
    pub longitude: Option<f64>,
    #[serde(rename = "Open Date")]
    pub open_date: Option<String>,
    #[serde(rename = "ID")]
    pub id: Option<Numeric>,
}

impl StationRecord {
    /// Normalizes a raw row: expands the state code and coerces numeric cells.
    ///
    /// Returns `None` (with an issue in `report`) when the state code is
    /// missing or not in `table`. Bad numeric cells become null and are
    /// reported without dropping the row.
    pub fn from_row(
        row: StationRow,
        row_number: usize,
        table: &StateTable,
        report: &mut BatchReport,
    ) -> Option<Self> {
        let mut cells = CellCoercer {
            record: RecordRef::Row(row_number),
            report,
        };

        let id = cells.numeric("ID", row.id);
        if let Some(id) = &id {
            cells.record = RecordRef::Station(id.clone());
        }

        let state = match row.state.as_deref().map(str::trim) {
            None | Some("") => {
                cells.report.push(cells.record, None, IssueKind::MissingState);
                return None;
            }
            Some(code) => match table.lookup(code) {
                Some(name) => name.to_string(),
                None => {
                    cells
                        .report
                        .push(cells.record, None, IssueKind::UnknownState(code.into()));
                    return None;
                }
            },
        };

        Some(StationRecord {
            ev_level1_evse_num: cells.numeric("EV Level1 EVSE Num", row.ev_level1_evse_num),
            ev_level2_evse_num: cells.numeric("EV Level2 EVSE Num", row.ev_level2_evse_num),
            ev_dc_fast_count: cells.numeric("EV DC Fast Count", row.ev_dc_fast_count),
            latitude: cells.float("Latitude", row.latitude),
            longitude: cells.float("Longitude", row.longitude),
            fuel_type_code: row.fuel_type_code,
            station_name: row.station_name,
            street_address: row.street_address,
            city: row.city,
            state,
            zip: row.zip,
            ev_network: row.ev_network,
            open_date: row.open_date,
            id,
        })
    }

    /// Parses `Open Date`, reporting why it could not be used.
    pub fn parsed_open_date(&self) -> Result<NaiveDate, IssueKind> {
        match self.open_date.as_deref().map(str::trim) {
            None | Some("") => Err(IssueKind::MissingDate),
            Some(text) => parse_open_date(text).ok_or_else(|| IssueKind::InvalidDate(text.into())),
        }
    }

    pub fn record_ref(&self) -> RecordRef {
        RecordRef::station(self.id.as_ref())
    }
}

/// Coerces raw cells of one row, reporting values that are not numbers.
struct CellCoercer<'a> {
    record: RecordRef,
    report: &'a mut BatchReport,
}

impl CellCoercer<'_> {
    fn numeric(&mut self, column: &'static str, raw: Option<String>) -> Option<Numeric> {
        let raw = raw?;
        if raw.trim().is_empty() {
            return None;
        }
        let parsed = Numeric::parse(&raw);
        if parsed.is_none() {
            self.invalid(column, raw);
        }
        parsed
    }

    fn float(&mut self, column: &'static str, raw: Option<String>) -> Option<f64> {
        let raw = raw?;
        if raw.trim().is_empty() {
            return None;
        }
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => {
                self.invalid(column, raw);
                None
            }
        }
    }

    fn invalid(&mut self, column: &'static str, value: String) {
        self.report.push(
            self.record.clone(),
            None,
            IssueKind::InvalidNumber { column, value },
        );
    }
}

/// One positional incentive row: `State, Project Name, Date, Category, Types Supported`.
///
/// Trailing fields missing from a short row are left empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IncentiveRow {
    pub state: Option<String>,
    pub project_name: Option<String>,
    pub date: Option<String>,
    pub category: Option<String>,
    pub types_supported: Option<String>,
}

/// A state law or incentive, stored under its state's key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IncentiveRecord {
    #[serde(rename = "Project Name")]
    pub project_name: Option<String>,
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "Category")]
    pub category: Option<String>,
    #[serde(rename = "Types Supported")]
    pub types_supported: Option<String>,
}

impl IncentiveRecord {
    /// Splits a raw row into its full state name and record.
    pub fn from_row(
        row: IncentiveRow,
        row_number: usize,
        table: &StateTable,
        report: &mut BatchReport,
    ) -> Option<(String, Self)> {
        let record = RecordRef::Row(row_number);
        let state = match row.state.as_deref().map(str::trim) {
            None | Some("") => {
                report.push(record, None, IssueKind::MissingState);
                return None;
            }
            Some(code) => match table.lookup(code) {
                Some(name) => name.to_string(),
                None => {
                    report.push(record, None, IssueKind::UnknownState(code.into()));
                    return None;
                }
            },
        };

        Some((
            state,
            IncentiveRecord {
                project_name: row.project_name,
                date: row.date,
                category: row.category,
                types_supported: row.types_supported,
            },
        ))
    }
}
