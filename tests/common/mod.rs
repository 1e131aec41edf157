#![allow(dead_code)]

use chrono::NaiveDate;
use rusty_golf_league::SqliteStorage;
use rusty_golf_league::StorageError;
use rusty_golf_league::storage::sqlite::TABLE_DROP;

pub const COURSE_FIXTURE: &str = include_str!("../test_course.sql");

/// In-memory database with the schema and the course, tee and golfer
/// fixture loaded, followed by `fixture_sql`.
///
/// # Errors
///
/// Will return `Err` if the schema or a fixture fails to load
pub async fn setup_test_storage(fixture_sql: &str) -> Result<SqliteStorage, StorageError> {
    let storage = SqliteStorage::open_in_memory()?;
    load(&storage, fixture_sql).await?;
    Ok(storage)
}

/// Same as [`setup_test_storage`] against an existing (e.g. file-backed) store.
///
/// # Errors
///
/// Will return `Err` if the schema or a fixture fails to load
pub async fn load(storage: &SqliteStorage, fixture_sql: &str) -> Result<(), StorageError> {
    storage.execute_batch(TABLE_DROP).await?;
    storage.create_schema().await?;
    storage.execute_batch(COURSE_FIXTURE).await?;
    storage.execute_batch(fixture_sql).await
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
