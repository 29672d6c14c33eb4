//! CLI entry point for the EV station data preparation tool.
//!
//! Each subcommand is one batch step: it reads a CSV or JSON file, applies a
//! single transformation and writes one JSON file for the front-end.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use ev_station_prep::dates::DateRange;
use ev_station_prep::pipeline;
use ev_station_prep::states::Locale;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "ev_station_prep")]
#[command(about = "Prepare EV charging station and incentive data for the map front-end", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Group a station CSV by full state name
    GroupStations {
        /// Station CSV with a header row
        #[arg(short, long, default_value = "public/data/alt_fuel_stations.csv")]
        input: PathBuf,

        #[arg(short, long, default_value = "public/data/stations_par_etat.json")]
        output: PathBuf,

        /// Language of the state names
        #[arg(short, long, value_enum, default_value_t = Locale::English)]
        locale: Locale,
    },
    /// Group the positional laws and incentives CSV by full state name
    GroupIncentives {
        #[arg(short, long, default_value = "public/data/laws_and_incentives.csv")]
        input: PathBuf,

        #[arg(short, long, default_value = "laws_and_incentives_grouped.json")]
        output: PathBuf,

        /// Language of the state names
        #[arg(short, long, value_enum, default_value_t = Locale::English)]
        locale: Locale,
    },
    /// Keep stations opened within a date range, sorted by open date
    FilterStations {
        #[arg(short, long, default_value = "public/data/stations_par_etat.json")]
        input: PathBuf,

        #[arg(short, long, default_value = "filtered_stations_per_state.json")]
        output: PathBuf,

        /// First open date kept (inclusive, YYYY-MM-DD)
        #[arg(long, default_value = "2016-01-01")]
        start: NaiveDate,

        /// Last open date kept (inclusive, YYYY-MM-DD)
        #[arg(long, default_value = "2023-12-31")]
        end: NaiveDate,
    },
    /// Compute monthly cumulative station counts per state
    Cumulative {
        #[arg(short, long, default_value = "public/data/stations_par_etat.json")]
        input: PathBuf,

        #[arg(short, long, default_value = "stations_cumulative.json")]
        output: PathBuf,
    },
    /// Sort each state's incentives by date
    SortIncentives {
        #[arg(short, long, default_value = "laws_and_incentives.json")]
        input: PathBuf,

        #[arg(short, long, default_value = "laws_and_incentives_sorted.json")]
        output: PathBuf,
    },
    /// Count laws and incentives per state
    CountIncentives {
        #[arg(short, long, default_value = "laws_and_incentives_grouped.json")]
        input: PathBuf,

        #[arg(short, long, default_value = "state_law_counts.json")]
        output: PathBuf,
    },
    /// Count stations per state, optionally within a date range
    CountStations {
        #[arg(short, long, default_value = "public/data/stations_par_etat.json")]
        input: PathBuf,

        #[arg(short, long, default_value = "station_counts.json")]
        output: PathBuf,

        /// First open date counted (inclusive, YYYY-MM-DD); requires --end
        #[arg(long, requires = "end")]
        start: Option<NaiveDate>,

        /// Last open date counted (inclusive, YYYY-MM-DD); requires --start
        #[arg(long, requires = "start")]
        end: Option<NaiveDate>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stdout + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/ev_station_prep.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("ev_station_prep.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stdout_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stdout)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::GroupStations {
            input,
            output,
            locale,
        } => {
            pipeline::group_stations(&input, &output, locale)?;
        }
        Commands::GroupIncentives {
            input,
            output,
            locale,
        } => {
            pipeline::group_incentives(&input, &output, locale)?;
        }
        Commands::FilterStations {
            input,
            output,
            start,
            end,
        } => {
            let range = DateRange::new(start, end)?;
            pipeline::filter_stations(&input, &output, range)?;
        }
        Commands::Cumulative { input, output } => {
            pipeline::cumulative_stations(&input, &output)?;
        }
        Commands::SortIncentives { input, output } => {
            pipeline::sort_incentives_file(&input, &output)?;
        }
        Commands::CountIncentives { input, output } => {
            pipeline::count_incentives(&input, &output)?;
        }
        Commands::CountStations {
            input,
            output,
            start,
            end,
        } => {
            let range = match (start, end) {
                (Some(start), Some(end)) => Some(DateRange::new(start, end)?),
                _ => None,
            };
            pipeline::count_stations(&input, &output, range)?;
        }
    }

    Ok(())
}
