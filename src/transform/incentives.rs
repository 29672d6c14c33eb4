//! Per-state date ordering of laws and incentives.

use std::cmp::Ordering;

use tracing::debug;

use crate::dates::parse_calendar_date;
use crate::records::IncentiveRecord;
use crate::transform::types::StateGrouped;

/// How many states were sorted by parsed date versus raw text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SortOutcome {
    pub by_date: usize,
    pub lexicographic: usize,
}

/// Sorts each state's incentives ascending by `Date`.
///
/// A state is sorted by calendar date when every one of its dates parses.
/// Otherwise the whole state is compared on the raw text, with missing dates
/// first. Both orders are stable.
pub fn sort_incentives(grouped: &mut StateGrouped<IncentiveRecord>) -> SortOutcome {
    let mut outcome = SortOutcome::default();

    for (state, incentives) in grouped.iter_mut() {
        let parsed: Option<Vec<_>> = incentives
            .iter()
            .map(|i| i.date.as_deref().and_then(parse_calendar_date))
            .collect();

        match parsed {
            Some(dates) => {
                let mut keyed: Vec<_> = dates.into_iter().zip(incentives.drain(..)).collect();
                keyed.sort_by_key(|(date, _)| *date);
                incentives.extend(keyed.into_iter().map(|(_, i)| i));
                outcome.by_date += 1;
            }
            None => {
                incentives.sort_by(compare_raw_dates);
                debug!(state = %state, "Incentive dates not uniform, sorted as text");
                outcome.lexicographic += 1;
            }
        }
    }

    outcome
}

fn compare_raw_dates(a: &IncentiveRecord, b: &IncentiveRecord) -> Ordering {
    a.date.as_deref().cmp(&b.date.as_deref())
}
