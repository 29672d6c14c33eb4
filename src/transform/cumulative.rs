//! Monthly cumulative station counts per state.
//!
//! Each state's stations are bucketed by (year, month) of their open date and
//! folded into a running total. The total is never reset between years, so
//! the value for any month is the number of stations opened up to the end of
//! that month across the whole history.
//!
//! Every year that has at least one station gets all twelve months, with
//! empty months carrying the previous total forward. Years without any
//! station are not emitted.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::records::StationRecord;
use crate::report::BatchReport;
use crate::transform::types::{CumulativeTable, Month, MonthlyTotals, StateGrouped, YearlyTotals};

/// Builds the cumulative table for every state in `grouped`.
///
/// States whose stations all lack a usable open date still get an (empty)
/// entry so that every input state is present in the output.
pub fn cumulative_by_state(
    grouped: &StateGrouped<StationRecord>,
    report: &mut BatchReport,
) -> CumulativeTable {
    let mut table = CumulativeTable::new();

    for (state, stations) in grouped {
        let mut dates = Vec::with_capacity(stations.len());
        for station in stations {
            match station.parsed_open_date() {
                Ok(date) => dates.push(date),
                Err(issue) => report.push(station.record_ref(), Some(state.as_str()), issue),
            }
        }

        let totals = cumulative_for_dates(dates);
        debug!(state = %state, years = totals.len(), "Cumulative totals computed");
        table.insert(state.clone(), totals);
    }

    table
}

/// Folds open dates into per-month running totals.
pub fn cumulative_for_dates(dates: impl IntoIterator<Item = NaiveDate>) -> YearlyTotals {
    let mut opened: BTreeMap<i32, [u64; 12]> = BTreeMap::new();
    for date in dates {
        opened.entry(date.year()).or_default()[date.month0() as usize] += 1;
    }

    let mut running = 0u64;
    opened
        .into_iter()
        .map(|(year, counts)| {
            let totals = counts.map(|count| {
                running += count;
                running
            });
            (year, MonthlyTotals::from_array(totals))
        })
        .collect()
}

/// Total reached at the last month of the latest year, or 0 when empty.
pub fn final_total(totals: &YearlyTotals) -> u64 {
    totals
        .values()
        .next_back()
        .map_or(0, |months| months.get(Month::December))
}
