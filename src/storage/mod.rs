use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use crate::model::{
    Golfer, HandicapIndex, HoleResult, MatchResult, NewRound, QualifyingScore, RoundCard,
    RoundRepair, RoundSummary, Team, Tee,
};

pub mod sqlite;

pub use sqlite::SqliteStorage;

#[derive(Debug, Clone)]
pub struct StorageError {
    message: String,
}

impl StorageError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for StorageError {}

impl From<String> for StorageError {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for StorageError {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::new(value.to_string())
    }
}

/// Rounds, qualifying scores and tee metadata for one golfer, read together
/// so that they describe the same moment.
#[derive(Debug, Clone, Default)]
pub struct ScoringSnapshot {
    pub rounds: Vec<RoundSummary>,
    pub qualifying_scores: Vec<QualifyingScore>,
    pub tees: HashMap<i64, Tee>,
}

#[async_trait]
pub trait Storage: Send + Sync {
    async fn golfers(&self) -> Result<Vec<Golfer>, StorageError>;
    async fn golfer(&self, golfer_id: i64) -> Result<Option<Golfer>, StorageError>;
    async fn tee_metadata(&self, tee_id: i64) -> Result<Option<Tee>, StorageError>;
    async fn rounds_for_golfer(
        &self,
        golfer_id: i64,
        min_date: NaiveDate,
        max_date: NaiveDate,
    ) -> Result<Vec<RoundSummary>, StorageError>;
    async fn hole_results_for_rounds(
        &self,
        round_ids: &[i64],
    ) -> Result<Vec<HoleResult>, StorageError>;
    async fn qualifying_scores_for_golfer(
        &self,
        golfer_id: i64,
        min_year: i32,
    ) -> Result<Vec<QualifyingScore>, StorageError>;
    async fn scoring_snapshot(
        &self,
        golfer_id: i64,
        min_date: NaiveDate,
        max_date: NaiveDate,
    ) -> Result<ScoringSnapshot, StorageError>;
    async fn handicap_history(&self, golfer_id: i64) -> Result<Vec<HandicapIndex>, StorageError>;
    /// Append every entry and move each golfer's current index, all or nothing.
    async fn commit_handicap_batch(&self, entries: &[HandicapIndex]) -> Result<(), StorageError>;
    async fn rounds_played_in_year(&self, year: i32) -> Result<Vec<RoundCard>, StorageError>;
    /// Rewrite corrected hole results and round totals, bumping `date_updated`
    /// on every affected round, all or nothing.
    async fn apply_round_repairs(
        &self,
        repairs: &[RoundRepair],
        updated_at: NaiveDateTime,
    ) -> Result<(), StorageError>;
    async fn insert_round(&self, round: &NewRound) -> Result<i64, StorageError>;
    async fn teams_in_flight(&self, flight_id: i64) -> Result<Vec<Team>, StorageError>;
    async fn match_results(&self, flight_id: i64) -> Result<Vec<MatchResult>, StorageError>;
}
