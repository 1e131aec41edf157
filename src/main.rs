use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use rusty_golf_league::args::{self, CleanArgs, Command, read_json};
use rusty_golf_league::controller::repair::recalculate_hole_results;
use rusty_golf_league::controller::standings::standings_for_flight;
use rusty_golf_league::controller::submit::{RoundSubmission, submit_round};
use rusty_golf_league::controller::update::{
    UpdateRequest, audit_handicaps, handicap_record, update_golfer_handicaps,
};
use rusty_golf_league::score::{
    MatchValidationRequest, RoundValidationRequest, validate_match, validate_round,
};
use rusty_golf_league::{SqliteStorage, server};

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn today_or(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

async fn run(args: CleanArgs) -> Result<()> {
    let storage = SqliteStorage::open(&args.db_name)
        .with_context(|| format!("open database {}", args.db_name))?;

    match args.command {
        Command::InitDb => {
            storage.create_schema().await.context("create schema")?;
        }
        Command::UpdateHandicaps {
            golfer_id,
            prior_end_date,
            new_end_date,
            today,
            force,
            dry_run,
        } => {
            let request = UpdateRequest {
                golfer_id,
                prior_end_date,
                new_end_date,
                force_update: force,
                dry_run,
                today: today_or(today),
            };
            let cancel = CancellationToken::new();
            let on_ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("interrupt received; stopping after the current golfer");
                    on_ctrl_c.cancel();
                }
            });
            let report = update_golfer_handicaps(&storage, &request, &args.record, &cancel).await?;
            print_json(&report)?;
        }
        Command::AuditHandicaps { as_of, today } => {
            let stale = audit_handicaps(&storage, as_of, today_or(today), &args.record).await?;
            print_json(&stale)?;
        }
        Command::HandicapRecord {
            golfer_id,
            as_of,
            today,
        } => {
            let record =
                handicap_record(&storage, golfer_id, as_of, today_or(today), &args.record).await?;
            print_json(&record)?;
        }
        Command::RecalculateHoleResults { year, dry_run } => {
            let report =
                recalculate_hole_results(&storage, year, dry_run, Local::now().naive_local())
                    .await?;
            print_json(&report)?;
        }
        Command::ValidateRound { json } => {
            let request: RoundValidationRequest = read_json(&json)?;
            print_json(&validate_round(&request))?;
        }
        Command::ValidateMatch { json } => {
            let request: MatchValidationRequest = read_json(&json)?;
            print_json(&validate_match(&request))?;
        }
        Command::SubmitRound { json } => {
            let submission: RoundSubmission = read_json(&json)?;
            let summary = submit_round(&storage, &submission).await?;
            print_json(&summary)?;
        }
        Command::Standings { flight_id } => {
            let standings = standings_for_flight(&storage, flight_id).await?;
            print_json(&standings)?;
        }
        Command::Serve { .. } => {
            server::serve(storage, args.record, &args.bind).await?;
        }
    }
    Ok(())
}

#[actix_web::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let args = match args::args_checks() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(args).await {
        error!("command failed: {e:#}");
        std::process::exit(1);
    }
}
