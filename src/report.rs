//! Per-record diagnostics collected over a batch.
//!
//! A bad record never aborts a run. Each problem becomes a [`RecordIssue`],
//! is logged once, and is kept in the [`BatchReport`] returned to the caller.

use std::fmt;

use thiserror::Error;
use tracing::{info, warn};

use crate::records::Numeric;

/// What was wrong with a single record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IssueKind {
    #[error("missing open date")]
    MissingDate,

    #[error("invalid date '{0}'")]
    InvalidDate(String),

    #[error("missing state code")]
    MissingState,

    #[error("unknown state code '{0}'")]
    UnknownState(String),

    #[error("non-numeric value '{value}' in column '{column}'")]
    InvalidNumber { column: &'static str, value: String },

    #[error("unreadable row: {0}")]
    MalformedRow(String),
}

impl IssueKind {
    /// Whether the record carrying this issue was left out of the output.
    pub fn drops_record(&self) -> bool {
        !matches!(self, IssueKind::InvalidNumber { .. })
    }
}

/// How a record is identified in diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordRef {
    /// Station identified by its `ID` column.
    Station(Numeric),
    /// 1-based data row in a CSV input.
    Row(usize),
    Unidentified,
}

impl RecordRef {
    pub fn station(id: Option<&Numeric>) -> Self {
        id.map_or(RecordRef::Unidentified, |id| RecordRef::Station(id.clone()))
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordRef::Station(id) => write!(f, "station ID {id}"),
            RecordRef::Row(row) => write!(f, "row {row}"),
            RecordRef::Unidentified => f.write_str("unidentified record"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordIssue {
    pub record: RecordRef,
    pub kind: IssueKind,
}

/// Issues gathered by one pipeline stage.
#[derive(Debug, Default)]
pub struct BatchReport {
    issues: Vec<RecordIssue>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an issue and emits its diagnostic line.
    pub fn push(&mut self, record: RecordRef, state: Option<&str>, kind: IssueKind) {
        warn!(
            record = %record,
            state = state.unwrap_or("-"),
            issue = %kind,
            "Record issue"
        );

        self.issues.push(RecordIssue { record, kind });
    }

    pub fn issues(&self) -> &[RecordIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of records left out of the output.
    pub fn dropped(&self) -> usize {
        self.issues.iter().filter(|i| i.kind.drops_record()).count()
    }

    pub fn log_summary(&self, stage: &str) {
        info!(
            stage,
            issues = self.len(),
            dropped = self.dropped(),
            "Batch report"
        );
    }
}
