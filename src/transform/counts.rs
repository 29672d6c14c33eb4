//! Per-state record counts.

use crate::dates::DateRange;
use crate::records::StationRecord;
use crate::report::BatchReport;
use crate::transform::types::{StateCounts, StateGrouped};

/// Number of records per state, in the grouping's state order.
pub fn count_by_state<T>(grouped: &StateGrouped<T>) -> StateCounts {
    grouped
        .iter()
        .map(|(state, records)| (state.clone(), records.len()))
        .collect()
}

/// Number of stations per state opened within `range`.
///
/// Every input state is present, with 0 when nothing matches. Stations with
/// an unusable open date are not counted and are reported.
pub fn count_in_range(
    grouped: &StateGrouped<StationRecord>,
    range: DateRange,
    report: &mut BatchReport,
) -> StateCounts {
    let mut counts = StateCounts::with_capacity(grouped.len());

    for (state, stations) in grouped {
        let mut count = 0;
        for station in stations {
            match station.parsed_open_date() {
                Ok(date) if range.contains(date) => count += 1,
                Ok(_) => {}
                Err(issue) => report.push(station.record_ref(), Some(state.as_str()), issue),
            }
        }
        counts.insert(state.clone(), count);
    }

    counts
}
