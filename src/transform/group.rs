//! Grouping by state name and its inverse.

use crate::transform::types::StateGrouped;

/// Partitions `(state, record)` pairs by state.
///
/// Records keep their relative input order inside each group; states appear
/// in the order they are first seen. Callers sort the keys when they need
/// name order.
pub fn group_by_state<T>(pairs: impl IntoIterator<Item = (String, T)>) -> StateGrouped<T> {
    let mut grouped = StateGrouped::new();
    for (state, record) in pairs {
        grouped.entry(state).or_insert_with(Vec::new).push(record);
    }
    grouped
}

/// Flattens a grouping back into `(state, record)` pairs, group by group.
pub fn flatten<T>(grouped: StateGrouped<T>) -> impl Iterator<Item = (String, T)> {
    grouped
        .into_iter()
        .flat_map(|(state, records)| records.into_iter().map(move |r| (state.clone(), r)))
}
