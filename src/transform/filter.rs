//! Open-date range filter for grouped stations.

use tracing::debug;

use crate::dates::DateRange;
use crate::records::StationRecord;
use crate::report::BatchReport;
use crate::transform::types::StateGrouped;

/// Keeps stations opened within `range` and sorts each state by open date.
///
/// Stations without a usable open date are dropped and reported. States with
/// no remaining stations are left out. Ties keep their input order.
pub fn filter_and_sort(
    grouped: &StateGrouped<StationRecord>,
    range: DateRange,
    report: &mut BatchReport,
) -> StateGrouped<StationRecord> {
    let mut filtered = StateGrouped::new();

    for (state, stations) in grouped {
        let mut dated = Vec::with_capacity(stations.len());

        for station in stations {
            match station.parsed_open_date() {
                Ok(date) if range.contains(date) => dated.push((date, station)),
                Ok(_) => {}
                Err(issue) => report.push(station.record_ref(), Some(state.as_str()), issue),
            }
        }

        dated.sort_by_key(|(date, _)| *date);

        debug!(
            state = %state,
            kept = dated.len(),
            total = stations.len(),
            "Filtered stations"
        );

        if !dated.is_empty() {
            filtered.insert(
                state.clone(),
                dated.into_iter().map(|(_, s)| s.clone()).collect(),
            );
        }
    }

    filtered
}
