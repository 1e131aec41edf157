//! Scoring-record selection: which differentials feed a golfer's index.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::LeagueError;
use crate::handicap::HandicapSystem;
use crate::model::{QualifyingScore, RoundSummary, ScoringType};
use crate::storage::ScoringSnapshot;

pub const DEFAULT_RECORD_LIMIT: usize = 10;
pub const DEFAULT_LOOKBACK_YEARS: i32 = 2;

/// Qualifying scores only step in when fewer real rounds than this are found.
pub const MINIMUM_ROUNDS_BEFORE_QUALIFYING: usize = 2;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordConfig {
    pub limit: usize,
    pub lookback_years: i32,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_RECORD_LIMIT,
            lookback_years: DEFAULT_LOOKBACK_YEARS,
        }
    }
}

impl RecordConfig {
    /// First day counted by a record that ends on `reference_date`.
    #[must_use]
    pub fn window_start(&self, reference_date: NaiveDate) -> NaiveDate {
        NaiveDate::from_ymd_opt(reference_date.year() - self.lookback_years, 1, 1)
            .unwrap_or(NaiveDate::MIN)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RecordSource {
    Round { round_id: i64 },
    Qualifying { qualifying_score_id: i64 },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ScoringRecordEntry {
    pub source: RecordSource,
    pub date_played: NaiveDate,
    pub course_name: Option<String>,
    pub score_differential: f64,
}

impl ScoringRecordEntry {
    #[must_use]
    pub fn round_id(&self) -> Option<i64> {
        match self.source {
            RecordSource::Round { round_id } => Some(round_id),
            RecordSource::Qualifying { .. } => None,
        }
    }

    fn sort_key(&self) -> (NaiveDate, i64) {
        let id = match self.source {
            RecordSource::Round { round_id } => round_id,
            RecordSource::Qualifying {
                qualifying_score_id,
            } => qualifying_score_id,
        };
        (self.date_played, id)
    }
}

impl From<&RoundSummary> for ScoringRecordEntry {
    fn from(round: &RoundSummary) -> Self {
        Self {
            source: RecordSource::Round {
                round_id: round.round_id,
            },
            date_played: round.date_played,
            course_name: Some(round.course_name.clone()),
            score_differential: round.score_differential,
        }
    }
}

impl From<&QualifyingScore> for ScoringRecordEntry {
    fn from(score: &QualifyingScore) -> Self {
        Self {
            source: RecordSource::Qualifying {
                qualifying_score_id: score.qualifying_score_id,
            },
            date_played: score.date_played,
            course_name: score.course_name.clone(),
            score_differential: score.score_differential,
        }
    }
}

fn sort_most_recent_first(entries: &mut [ScoringRecordEntry]) {
    entries.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));
}

/// The most recent `limit` individual rounds played in `[min_date, max_date]`,
/// newest first. With fewer than two of them, qualifying scores from
/// `min_date`'s year onward are merged in by date when `include_qualifying`
/// is set, still holding at most `limit` entries.
#[must_use]
pub fn select_scoring_record(
    rounds: &[RoundSummary],
    qualifying_scores: &[QualifyingScore],
    min_date: NaiveDate,
    max_date: NaiveDate,
    limit: usize,
    include_qualifying: bool,
) -> Vec<ScoringRecordEntry> {
    let mut record: Vec<ScoringRecordEntry> = rounds
        .iter()
        .filter(|r| r.scoring_type == ScoringType::Individual)
        .filter(|r| r.date_played >= min_date && r.date_played <= max_date)
        .map(ScoringRecordEntry::from)
        .collect();
    sort_most_recent_first(&mut record);
    record.truncate(limit);

    if include_qualifying && record.len() < MINIMUM_ROUNDS_BEFORE_QUALIFYING {
        record.extend(
            qualifying_scores
                .iter()
                .filter(|q| q.date_played.year() >= min_date.year())
                .map(ScoringRecordEntry::from),
        );
        sort_most_recent_first(&mut record);
        record.truncate(limit);
    }

    record
}

/// Pending entries topped up with the most recent active entries until the
/// list holds `limit` differentials.
#[must_use]
pub fn backfill_pending(
    pending: &[ScoringRecordEntry],
    active: &[ScoringRecordEntry],
    limit: usize,
) -> Vec<ScoringRecordEntry> {
    let mut combined: Vec<ScoringRecordEntry> = pending.iter().take(limit).cloned().collect();
    let missing = limit - combined.len();
    combined.extend(active.iter().take(missing).cloned());
    combined
}

#[must_use]
pub fn differentials(record: &[ScoringRecordEntry]) -> Vec<f64> {
    record.iter().map(|e| e.score_differential).collect()
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HandicapRecord {
    pub as_of: NaiveDate,
    pub handicap_system: HandicapSystem,
    /// Rounds up to and including `as_of`.
    pub active: Vec<ScoringRecordEntry>,
    /// Rounds after `as_of`, back-filled from `active`.
    pub pending: Vec<ScoringRecordEntry>,
    pub active_index: Option<f64>,
    pub pending_index: Option<f64>,
}

impl HandicapRecord {
    #[must_use]
    pub fn active_round_ids(&self) -> HashSet<i64> {
        self.active.iter().filter_map(ScoringRecordEntry::round_id).collect()
    }

    /// Round ids played after `as_of`, excluding back-filled active rounds.
    #[must_use]
    pub fn pending_round_ids(&self) -> HashSet<i64> {
        self.pending
            .iter()
            .filter(|e| e.date_played > self.as_of)
            .filter_map(ScoringRecordEntry::round_id)
            .collect()
    }

    #[must_use]
    pub fn latest_round_id(&self) -> Option<i64> {
        self.active.iter().find_map(ScoringRecordEntry::round_id)
    }
}

/// Recompute each round's differential from the snapshot's tee metadata.
///
/// # Errors
///
/// Returns `MissingPrerequisite` if a round's tee is absent from the snapshot
/// and `StaleRead` if the tee was re-rated after the round summary was read.
pub fn rounds_with_current_differentials(
    snapshot: &ScoringSnapshot,
) -> Result<Vec<RoundSummary>, LeagueError> {
    snapshot
        .rounds
        .iter()
        .map(|round| {
            let tee = snapshot.tees.get(&round.tee_id).ok_or_else(|| {
                LeagueError::MissingPrerequisite(format!("tee {} for round {}", round.tee_id, round.round_id))
            })?;
            if tee.slope != round.tee_slope || (tee.rating - round.tee_rating).abs() > f64::EPSILON {
                return Err(LeagueError::StaleRead(format!(
                    "tee {} changed while round {} was being scored",
                    tee.tee_id, round.round_id
                )));
            }
            let system = HandicapSystem::for_date(round.date_played);
            Ok(RoundSummary {
                score_differential: system.score_differential(
                    tee.rating,
                    tee.slope,
                    round.adjusted_gross_score,
                    0.0,
                ),
                ..round.clone()
            })
        })
        .collect()
}

/// Active and pending records, and the index each yields, as of a date.
///
/// # Errors
///
/// Propagates tee metadata errors from [`rounds_with_current_differentials`].
pub fn build_handicap_record(
    snapshot: &ScoringSnapshot,
    as_of: NaiveDate,
    today: NaiveDate,
    config: &RecordConfig,
) -> Result<HandicapRecord, LeagueError> {
    let rounds = rounds_with_current_differentials(snapshot)?;
    let min_date = config.window_start(as_of);
    let pending_start = as_of.checked_add_days(Days::new(1)).unwrap_or(as_of);

    let active = select_scoring_record(
        &rounds,
        &snapshot.qualifying_scores,
        min_date,
        as_of,
        config.limit,
        true,
    );
    let pending_only = select_scoring_record(
        &rounds,
        &snapshot.qualifying_scores,
        pending_start,
        today,
        config.limit,
        false,
    );
    let pending = backfill_pending(&pending_only, &active, config.limit);

    let handicap_system = HandicapSystem::for_date(as_of);
    let active_index = handicap_system.handicap_index(&differentials(&active));
    let pending_index = handicap_system.handicap_index(&differentials(&pending));

    Ok(HandicapRecord {
        as_of,
        handicap_system,
        active,
        pending,
        active_index,
        pending_index,
    })
}
