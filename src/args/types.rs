use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::PathBuf;

use crate::record::RecordConfig;

pub const DEFAULT_BIND: &str = "0.0.0.0:8081";

#[derive(Parser, Debug)]
#[command(author, version, about = "Golf league handicap and scoring engine", long_about = None)]
pub struct Cli {
    /// SQLite database filename; `:memory:` for a throwaway database.
    #[arg(short = 'n', long, value_name = "DATABASE_NAME")]
    pub db_name: Option<String>,
    /// Optional TOML file with db_name, bind, record_limit and record_lookback_years.
    #[arg(long, value_name = "CONFIG_TOML", value_parser = crate::args::validation::check_readable_file)]
    pub config_toml: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create the schema if it does not exist.
    InitDb,
    /// Recompute golfer indices and append entries that changed.
    UpdateHandicaps {
        #[arg(long)]
        golfer_id: Option<i64>,
        #[arg(long)]
        prior_end_date: NaiveDate,
        #[arg(long)]
        new_end_date: NaiveDate,
        /// Last day counted by pending records; defaults to the current date.
        #[arg(long)]
        today: Option<NaiveDate>,
        #[arg(long)]
        force: bool,
        #[arg(long)]
        dry_run: bool,
    },
    /// List golfers whose stored index disagrees with a recomputation.
    AuditHandicaps {
        #[arg(long)]
        as_of: NaiveDate,
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Show a golfer's active and pending scoring records.
    HandicapRecord {
        #[arg(long)]
        golfer_id: i64,
        #[arg(long)]
        as_of: NaiveDate,
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Rebuild derived hole results for every round played in a year.
    RecalculateHoleResults {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        dry_run: bool,
    },
    ValidateRound {
        #[arg(long, value_parser = crate::args::validation::check_readable_file)]
        json: PathBuf,
    },
    ValidateMatch {
        #[arg(long, value_parser = crate::args::validation::check_readable_file)]
        json: PathBuf,
    },
    SubmitRound {
        #[arg(long, value_parser = crate::args::validation::check_readable_file)]
        json: PathBuf,
    },
    Standings {
        #[arg(long)]
        flight_id: i64,
    },
    /// Serve the validation endpoints over HTTP.
    Serve {
        #[arg(long, value_name = "ADDRESS")]
        bind: Option<String>,
    },
}

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub db_name: Option<String>,
    pub bind: Option<String>,
    pub record_limit: Option<usize>,
    pub record_lookback_years: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct CleanArgs {
    pub db_name: String,
    pub bind: String,
    pub record: RecordConfig,
    pub command: Command,
}
