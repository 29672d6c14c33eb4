use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use ev_station_prep::dates::{DateRange, parse_open_date};
use ev_station_prep::loader::{load_cumulative, load_grouped};
use ev_station_prep::pipeline;
use ev_station_prep::records::{IncentiveRecord, Numeric, StationRecord};
use ev_station_prep::report::{IssueKind, RecordRef};
use ev_station_prep::states::Locale;
use ev_station_prep::transform::group::{flatten, group_by_state};
use ev_station_prep::transform::types::Month;

const STATIONS_CSV: &str = "\
Fuel Type Code,Station Name,City,State,ZIP,EV Level1 EVSE Num,EV Level2 EVSE Num,EV DC Fast Count,EV Network,Latitude,Longitude,Open Date,ID
ELEC,Civic Center,Sacramento,CA,95814,,2.0,,ChargePoint Network,38.58,-121.49,03/15/19,1001
ELEC,Downtown Garage,Austin,TX,78701,,4.0,1.0,Non-Networked,30.27,-97.74,12/31/15,2001
ELEC,Harbor Lot,Long Beach,CA,90802,,,2.0,EVgo,33.77,-118.19,01/10/20,1002
ELEC,Library,Austin,TX,78702,1.0,2.0,,Non-Networked,30.26,-97.73,01/01/16,2002
ELEC,Market St,San Francisco,CA,94103,,6.0,,Tesla,37.77,-122.41,03/02/20,1003
ELEC,Broken Record,Houston,TX,77002,,1.0,,,29.76,-95.36,13/40/99,2003
ELEC,Island Depot,San Juan,PR,00901,,1.0,,,18.46,-66.10,05/05/21,3001
";

const INCENTIVES_CSV: &str = "\
CA,Zero Emission Vehicle Rebate,2015-06-30,Incentives,ELEC
TX,Alternative Fuel Grant,2018-01-15,Incentives,ELEC
CA,Clean Vehicle Rebate,2010-03-01,Incentives,ELEC
US,Plug-In Vehicle Tax Credit,2009-02-17,Incentives,\"ELEC, PHEV\"
CA,HOV Lane Exemption,2011-01-01,Laws and Regulations,ELEC
";

fn write(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

fn station_ids(stations: &[StationRecord]) -> Vec<i64> {
    stations
        .iter()
        .map(|s| match s.id {
            Some(Numeric::Integer(id)) => id,
            _ => -1,
        })
        .collect()
}

fn default_range() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2016, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
    )
    .unwrap()
}

#[test]
fn test_station_pipeline_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("alt_fuel_stations.csv");
    let grouped_path = dir.path().join("stations_par_etat.json");
    let filtered_path = dir.path().join("filtered_stations_per_state.json");
    let cumulative_path = dir.path().join("stations_cumulative.json");
    write(&csv, STATIONS_CSV);

    // Grouping: unknown state code dropped with one diagnostic.
    let report = pipeline::group_stations(&csv, &grouped_path, Locale::English).unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report.issues()[0].kind, IssueKind::UnknownState("PR".into()));

    let grouped = load_grouped::<StationRecord>(&grouped_path).unwrap();
    let states: Vec<&str> = grouped.keys().map(String::as_str).collect();
    assert_eq!(states, vec!["California", "Texas"]);
    assert_eq!(station_ids(&grouped["California"]), vec![1001, 1002, 1003]);
    assert_eq!(
        grouped["Texas"][0].ev_dc_fast_count,
        Some(Numeric::Integer(1))
    );

    // Filtering: 12/31/15 excluded, 01/01/16 included, invalid date reported once.
    let report = pipeline::filter_stations(&grouped_path, &filtered_path, default_range()).unwrap();
    let filtered = load_grouped::<StationRecord>(&filtered_path).unwrap();
    assert_eq!(station_ids(&filtered["Texas"]), vec![2002]);
    assert_eq!(station_ids(&filtered["California"]), vec![1001, 1002, 1003]);
    assert_eq!(report.len(), 1);
    assert_eq!(report.issues()[0].record, RecordRef::Station(Numeric::Integer(2003)));

    for stations in filtered.values() {
        let dates: Vec<NaiveDate> = stations
            .iter()
            .map(|s| parse_open_date(s.open_date.as_deref().unwrap()).unwrap())
            .collect();
        assert!(dates.iter().all(|d| default_range().contains(*d)));
        assert!(dates.windows(2).all(|w| w[0] <= w[1]));
    }

    // Cumulative: the invalid date is excluded here too.
    let (table, report) = pipeline::cumulative_stations(&grouped_path, &cumulative_path).unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(
        report.issues()[0].kind,
        IssueKind::InvalidDate("13/40/99".into())
    );

    let ca = &table["California"];
    assert_eq!(ca[&2019].get(Month::February), 0);
    assert_eq!(ca[&2019].get(Month::March), 1);
    assert_eq!(ca[&2019].get(Month::December), 1);
    assert_eq!(ca[&2020].get(Month::January), 2);
    assert_eq!(ca[&2020].get(Month::February), 2);
    assert_eq!(ca[&2020].get(Month::March), 3);

    let tx = &table["Texas"];
    assert_eq!(tx[&2015].get(Month::December), 1);
    assert_eq!(tx[&2016].get(Month::January), 2);

    // Round-trip through the written file is lossless.
    let reloaded = load_cumulative(&cumulative_path).unwrap();
    assert_eq!(reloaded, table);
}

#[test]
fn test_cumulative_file_layout() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("stations.csv");
    let grouped_path = dir.path().join("grouped.json");
    let cumulative_path = dir.path().join("cumulative.json");
    write(&csv, STATIONS_CSV);

    pipeline::group_stations(&csv, &grouped_path, Locale::English).unwrap();
    pipeline::cumulative_stations(&grouped_path, &cumulative_path).unwrap();

    let json = fs::read_to_string(&cumulative_path).unwrap();
    assert!(json.contains("\n  \"California\": {"));
    assert!(json.find("\"2019\"").unwrap() < json.find("\"2020\"").unwrap());
    assert!(json.find("\"december\"").unwrap() > json.find("\"january\"").unwrap());
    assert!(json.find("\"april\"").unwrap() > json.find("\"march\"").unwrap());
}

#[test]
fn test_french_locale_grouping() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("stations.csv");
    let grouped_path = dir.path().join("stations_fr.json");
    write(&csv, STATIONS_CSV);

    pipeline::group_stations(&csv, &grouped_path, Locale::French).unwrap();

    let grouped = load_grouped::<StationRecord>(&grouped_path).unwrap();
    assert!(grouped["Californie"].iter().all(|s| s.state == "Californie"));
    assert_eq!(grouped["Californie"].len(), 3);

    let json = fs::read_to_string(&grouped_path).unwrap();
    assert!(!json.contains("California"));
}

#[test]
fn test_regrouping_grouped_file_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("stations.csv");
    let grouped_path = dir.path().join("grouped.json");
    write(&csv, STATIONS_CSV);

    pipeline::group_stations(&csv, &grouped_path, Locale::English).unwrap();
    let grouped = load_grouped::<StationRecord>(&grouped_path).unwrap();

    let regrouped = group_by_state(flatten(grouped.clone()));
    assert_eq!(regrouped, grouped);
}

#[test]
fn test_incentive_pipeline_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("laws_and_incentives.csv");
    let grouped_path = dir.path().join("laws_and_incentives_grouped.json");
    let sorted_path = dir.path().join("laws_and_incentives_sorted.json");
    let counts_path = dir.path().join("state_law_counts.json");
    write(&csv, INCENTIVES_CSV);

    let report = pipeline::group_incentives(&csv, &grouped_path, Locale::English).unwrap();
    assert!(report.is_empty());

    let outcome = pipeline::sort_incentives_file(&grouped_path, &sorted_path).unwrap();
    assert_eq!(outcome.by_date, 3);
    assert_eq!(outcome.lexicographic, 0);

    let sorted = load_grouped::<IncentiveRecord>(&sorted_path).unwrap();
    let ca_dates: Vec<&str> = sorted["California"]
        .iter()
        .map(|i| i.date.as_deref().unwrap())
        .collect();
    assert_eq!(ca_dates, vec!["2010-03-01", "2011-01-01", "2015-06-30"]);

    let counts = pipeline::count_incentives(&grouped_path, &counts_path).unwrap();
    assert_eq!(counts["California"], 3);
    assert_eq!(counts["Texas"], 1);
    assert_eq!(counts["United States of America"], 1);

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&counts_path).unwrap()).unwrap();
    assert_eq!(written["California"], 3);
}

#[test]
fn test_count_stations_with_and_without_range() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("stations.csv");
    let grouped_path = dir.path().join("grouped.json");
    let counts_path = dir.path().join("counts.json");
    write(&csv, STATIONS_CSV);

    pipeline::group_stations(&csv, &grouped_path, Locale::English).unwrap();

    let (all, report) = pipeline::count_stations(&grouped_path, &counts_path, None).unwrap();
    assert_eq!(all["California"], 3);
    assert_eq!(all["Texas"], 3);
    assert!(report.is_empty());

    let (in_range, report) =
        pipeline::count_stations(&grouped_path, &counts_path, Some(default_range())).unwrap();
    assert_eq!(in_range["California"], 3);
    assert_eq!(in_range["Texas"], 1);

    assert_eq!(report.len(), 1);
    assert_eq!(report.issues()[0].record, RecordRef::Station(Numeric::Integer(2003)));
    assert_eq!(report.issues()[0].kind, IssueKind::InvalidDate("13/40/99".into()));
}

#[test]
fn test_grouped_stations_are_sorted_by_state_name() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("stations.csv");
    let grouped_path = dir.path().join("grouped.json");
    write(
        &csv,
        "\
State,Open Date,ID
TX,01/01/20,1
CA,02/01/20,2
AL,03/01/20,3
TX,04/01/20,4
",
    );

    pipeline::group_stations(&csv, &grouped_path, Locale::English).unwrap();

    let grouped = load_grouped::<StationRecord>(&grouped_path).unwrap();
    let states: Vec<&str> = grouped.keys().map(String::as_str).collect();
    assert_eq!(states, vec!["Alabama", "California", "Texas"]);
    assert_eq!(station_ids(&grouped["Texas"]), vec![1, 4]);
}

#[test]
fn test_short_incentive_row_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("laws_and_incentives.csv");
    let grouped_path = dir.path().join("grouped.json");
    write(
        &csv,
        "\
CA,Clean Vehicle Rebate,2010-03-01,Incentives,ELEC
TX,Grant,2018-01-15
CA,HOV Lane Exemption,2011-01-01,Laws and Regulations,ELEC
",
    );

    let report = pipeline::group_incentives(&csv, &grouped_path, Locale::English).unwrap();
    assert!(report.is_empty());

    let grouped = load_grouped::<IncentiveRecord>(&grouped_path).unwrap();
    assert_eq!(grouped["California"].len(), 2);
    let texas = &grouped["Texas"][0];
    assert_eq!(texas.project_name.as_deref(), Some("Grant"));
    assert_eq!(texas.date.as_deref(), Some("2018-01-15"));
    assert_eq!(texas.category, None);
    assert_eq!(texas.types_supported, None);
}

#[test]
fn test_record_issues_are_printed_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("stations.csv");
    let grouped_path = dir.path().join("grouped.json");
    write(&csv, STATIONS_CSV);

    let output = std::process::Command::new(env!("CARGO_BIN_EXE_ev_station_prep"))
        .current_dir(dir.path())
        .env("LOG_FILE_PATH", dir.path().join("logs/run.log"))
        .env_remove("RUST_LOG")
        .args(["group-stations", "--input"])
        .arg(&csv)
        .arg("--output")
        .arg(&grouped_path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("Record issue").count(), 1);
    assert!(stdout.contains("unknown state code 'PR'"));
}

#[test]
fn test_missing_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let result = pipeline::filter_stations(
        &dir.path().join("does_not_exist.json"),
        &dir.path().join("out.json"),
        default_range(),
    );
    assert!(result.is_err());
    assert!(!dir.path().join("out.json").exists());
}

#[test]
fn test_unexpected_station_column_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("stations.csv");
    write(&csv, "State,Open Date,ID,Owner\nCA,01/01/20,1,City\n");

    let err = pipeline::group_stations(&csv, &dir.path().join("out.json"), Locale::English)
        .unwrap_err();
    assert!(format!("{err:#}").contains("unexpected column 'Owner'"));
}
