//! Pure transformations over loaded records.
//!
//! Grouping by state, date filtering and sorting, monthly cumulative totals,
//! incentive ordering and per-state counts. Nothing here touches the
//! filesystem; diagnostics go into a [`crate::report::BatchReport`].

pub mod counts;
pub mod cumulative;
pub mod filter;
pub mod group;
pub mod incentives;
pub mod types;
