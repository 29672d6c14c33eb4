//! One load → transform → write run per subcommand.
//!
//! Each function reads a single input file, writes a single output file and
//! returns what the run found so callers (and tests) can inspect it.

use std::path::Path;

use anyhow::Result;
use tracing::{debug, info};

use crate::dates::DateRange;
use crate::loader::{load_grouped, load_incentive_csv, load_station_csv};
use crate::output::{CUMULATIVE_INDENT, DEFAULT_INDENT, write_json};
use crate::records::{IncentiveRecord, StationRecord};
use crate::report::BatchReport;
use crate::states::{Locale, StateTable};
use crate::transform::counts::{count_by_state, count_in_range};
use crate::transform::cumulative::{cumulative_by_state, final_total};
use crate::transform::filter::filter_and_sort;
use crate::transform::group::group_by_state;
use crate::transform::incentives::{SortOutcome, sort_incentives};
use crate::transform::types::{CumulativeTable, StateCounts};

/// Station CSV → stations grouped by full state name, states sorted by name.
#[tracing::instrument(skip_all, fields(input = %input.display(), locale = ?locale))]
pub fn group_stations(input: &Path, output: &Path, locale: Locale) -> Result<BatchReport> {
    let table = StateTable::new(locale);
    let mut report = BatchReport::new();

    let stations = load_station_csv(input, &table, &mut report)?;
    let station_count = stations.len();
    let mut grouped = group_by_state(stations.into_iter().map(|s| (s.state.clone(), s)));
    grouped.sort_keys();
    info!(stations = station_count, states = grouped.len(), "Stations grouped");

    write_json(output, &grouped, DEFAULT_INDENT)?;
    finish("group-stations", output, &report);
    Ok(report)
}

/// Incentive CSV → incentives grouped by full state name, states in
/// first-appearance order.
#[tracing::instrument(skip_all, fields(input = %input.display(), locale = ?locale))]
pub fn group_incentives(input: &Path, output: &Path, locale: Locale) -> Result<BatchReport> {
    let table = StateTable::new(locale);
    let mut report = BatchReport::new();

    let incentives = load_incentive_csv(input, &table, &mut report)?;
    let incentive_count = incentives.len();
    let grouped = group_by_state(incentives);
    info!(incentives = incentive_count, states = grouped.len(), "Incentives grouped");

    write_json(output, &grouped, DEFAULT_INDENT)?;
    finish("group-incentives", output, &report);
    Ok(report)
}

/// Grouped stations → stations opened within `range`, sorted by open date.
#[tracing::instrument(skip_all, fields(input = %input.display(), start = %range.start, end = %range.end))]
pub fn filter_stations(input: &Path, output: &Path, range: DateRange) -> Result<BatchReport> {
    let grouped = load_grouped::<StationRecord>(input)?;
    let mut report = BatchReport::new();

    let filtered = filter_and_sort(&grouped, range, &mut report);
    info!(
        states_in = grouped.len(),
        states_out = filtered.len(),
        stations_out = filtered.values().map(Vec::len).sum::<usize>(),
        "Stations filtered"
    );

    write_json(output, &filtered, DEFAULT_INDENT)?;
    finish("filter-stations", output, &report);
    Ok(report)
}

/// Grouped stations → monthly cumulative totals per state.
#[tracing::instrument(skip_all, fields(input = %input.display()))]
pub fn cumulative_stations(input: &Path, output: &Path) -> Result<(CumulativeTable, BatchReport)> {
    let grouped = load_grouped::<StationRecord>(input)?;
    let mut report = BatchReport::new();

    let table = cumulative_by_state(&grouped, &mut report);
    for (state, totals) in &table {
        debug!(state = %state, total = final_total(totals), "State cumulative total");
    }

    write_json(output, &table, CUMULATIVE_INDENT)?;
    finish("cumulative", output, &report);
    Ok((table, report))
}

/// Grouped incentives → incentives sorted by date within each state.
#[tracing::instrument(skip_all, fields(input = %input.display()))]
pub fn sort_incentives_file(input: &Path, output: &Path) -> Result<SortOutcome> {
    let mut grouped = load_grouped::<IncentiveRecord>(input)?;

    let outcome = sort_incentives(&mut grouped);
    info!(
        by_date = outcome.by_date,
        lexicographic = outcome.lexicographic,
        "Incentives sorted"
    );

    write_json(output, &grouped, DEFAULT_INDENT)?;
    info!(output = %output.display(), "Output written");
    Ok(outcome)
}

/// Grouped incentives → number of laws and incentives per state.
#[tracing::instrument(skip_all, fields(input = %input.display()))]
pub fn count_incentives(input: &Path, output: &Path) -> Result<StateCounts> {
    let grouped = load_grouped::<IncentiveRecord>(input)?;

    let counts = count_by_state(&grouped);
    for (state, count) in &counts {
        debug!(state = %state, laws = count, "State law count");
    }

    write_json(output, &counts, DEFAULT_INDENT)?;
    info!(output = %output.display(), "Output written");
    Ok(counts)
}

/// Grouped stations → number of stations per state, optionally within `range`.
#[tracing::instrument(skip_all, fields(input = %input.display()))]
pub fn count_stations(
    input: &Path,
    output: &Path,
    range: Option<DateRange>,
) -> Result<(StateCounts, BatchReport)> {
    let grouped = load_grouped::<StationRecord>(input)?;
    let mut report = BatchReport::new();

    let counts = match range {
        Some(range) => count_in_range(&grouped, range, &mut report),
        None => count_by_state(&grouped),
    };
    info!(
        states = counts.len(),
        stations = counts.values().sum::<usize>(),
        "Stations counted"
    );

    write_json(output, &counts, DEFAULT_INDENT)?;
    finish("count-stations", output, &report);
    Ok((counts, report))
}

fn finish(stage: &str, output: &Path, report: &BatchReport) {
    report.log_summary(stage);
    info!(output = %output.display(), "Output written");
}
