mod common;

use assert_float_eq::*;
use chrono::NaiveDateTime;
use rusqlite::{Connection, params};

use rusty_golf_league::controller::repair::recalculate_hole_results;
use rusty_golf_league::model::HoleScore;
use rusty_golf_league::{SqliteStorage, Storage};

fn repair_time() -> NaiveDateTime {
    common::date(2024, 1, 15).and_hms_opt(6, 30, 0).unwrap()
}

fn round_row(conn: &Connection, round_id: i64) -> rusqlite::Result<(i32, f64, String)> {
    conn.query_row(
        "SELECT adjusted_gross_score, score_differential, date_updated FROM golf_round WHERE round_id = ?1",
        params![round_id],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )
}

#[tokio::test]
async fn test5_rewrites_only_what_disagrees() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let db_path = dir.path().join("league.db");
    let db_name = db_path.to_string_lossy().to_string();
    let storage = SqliteStorage::open(&db_name)?;
    common::load(&storage, include_str!("test_repair.sql")).await?;

    let report = recalculate_hole_results(&storage, 2023, false, repair_time()).await?;
    assert_eq!(2, report.rounds_checked);
    assert_eq!(9, report.holes_checked);
    assert_eq!(vec![21], report.rounds_updated);
    assert_eq!(1, report.corrections.len());
    let correction = &report.corrections[0];
    assert_eq!(4, correction.hole_number);
    assert_eq!(
        HoleScore {
            handicap_strokes: 1,
            adjusted_gross_score: 9,
            net_score: 8,
        },
        correction.stored
    );
    assert_eq!(8, correction.recomputed.adjusted_gross_score);

    let conn = Connection::open(&db_path)?;
    let (adjusted, differential, updated) = round_row(&conn, 21)?;
    assert_eq!(46, adjusted);
    assert_float_absolute_eq!(11.0, differential, 1e-9);
    assert_eq!("2024-01-15 06:30:00", updated);
    // the round without a card is left alone
    let (adjusted, _, updated) = round_row(&conn, 23)?;
    assert_eq!(45, adjusted);
    assert_eq!("2023-06-13 20:00:00", updated);

    let holes = storage.hole_results_for_rounds(&[21]).await?;
    assert_eq!(8, holes[3].adjusted_gross_score);
    assert_eq!(9, holes[3].gross_score);

    let again = recalculate_hole_results(&storage, 2023, false, repair_time()).await?;
    assert!(again.corrections.is_empty());
    assert!(again.rounds_updated.is_empty());
    Ok(())
}

#[tokio::test]
async fn test5_legacy_rounds_already_agree() -> Result<(), Box<dyn std::error::Error>> {
    let storage = common::setup_test_storage(include_str!("test_repair.sql")).await?;

    let report = recalculate_hole_results(&storage, 2021, false, repair_time()).await?;
    assert_eq!(1, report.rounds_checked);
    assert_eq!(9, report.holes_checked);
    assert!(report.corrections.is_empty());
    assert!(report.rounds_updated.is_empty());
    Ok(())
}

#[tokio::test]
async fn test5_dry_run_reports_without_writing() -> Result<(), Box<dyn std::error::Error>> {
    let storage = common::setup_test_storage(include_str!("test_repair.sql")).await?;

    let report = recalculate_hole_results(&storage, 2023, true, repair_time()).await?;
    assert!(report.dry_run);
    assert_eq!(vec![21], report.rounds_updated);

    let cards = storage.rounds_played_in_year(2023).await?;
    let card = cards.iter().find(|c| c.round_id == 21).expect("round 21");
    assert_eq!(47, card.adjusted_gross_score);
    assert_eq!(9, card.hole_results[3].adjusted_gross_score);
    Ok(())
}
