use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::LeagueError;
use crate::handicap::rounding::tenths;
use crate::model::{Golfer, HandicapIndex};
use crate::record::{HandicapRecord, RecordConfig, build_handicap_record};
use crate::storage::Storage;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UpdateRequest {
    pub golfer_id: Option<i64>,
    pub prior_end_date: NaiveDate,
    pub new_end_date: NaiveDate,
    pub force_update: bool,
    pub dry_run: bool,
    /// Last day that counts towards the pending record.
    pub today: NaiveDate,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UpdateReason {
    IndexChanged,
    PendingRoundsActivated,
    Forced,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HandicapChange {
    pub golfer_id: i64,
    pub golfer_name: String,
    pub stored_value: Option<f64>,
    pub prior_value: Option<f64>,
    pub new_value: f64,
    pub reasons: Vec<UpdateReason>,
    pub entry: HandicapIndex,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SkippedGolfer {
    pub golfer_id: i64,
    pub golfer_name: String,
    /// Current index on file; no longer supported by anything in the window.
    pub stored_value: Option<f64>,
    pub reason: String,
}

/// A stored current index that a recomputation does not reproduce.
/// `computed_value` is `None` when the golfer no longer has an index at all.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StaleIndex {
    pub golfer_id: i64,
    pub golfer_name: String,
    pub stored_value: Option<f64>,
    pub computed_value: Option<f64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UpdateReport {
    pub golfers_checked: usize,
    pub changes: Vec<HandicapChange>,
    pub skipped: Vec<SkippedGolfer>,
    pub dry_run: bool,
    pub committed: bool,
}

enum GolferOutcome {
    Changed(HandicapChange),
    Unchanged,
    NoIndex,
}

fn same_index(a: Option<f64>, b: Option<f64>) -> bool {
    a.map(tenths) == b.map(tenths)
}

fn decide(
    golfer: &Golfer,
    prior: &HandicapRecord,
    new: &HandicapRecord,
    force_update: bool,
) -> GolferOutcome {
    let Some(new_value) = new.active_index else {
        return GolferOutcome::NoIndex;
    };

    let mut reasons = Vec::new();
    if !same_index(golfer.handicap_index, Some(new_value)) {
        reasons.push(UpdateReason::IndexChanged);
    }
    let now_active = new.active_round_ids();
    if prior
        .pending_round_ids()
        .iter()
        .any(|round_id| now_active.contains(round_id))
    {
        reasons.push(UpdateReason::PendingRoundsActivated);
    }
    if force_update {
        reasons.push(UpdateReason::Forced);
    }
    if reasons.is_empty() {
        return GolferOutcome::Unchanged;
    }

    GolferOutcome::Changed(HandicapChange {
        golfer_id: golfer.golfer_id,
        golfer_name: golfer.name.clone(),
        stored_value: golfer.handicap_index,
        prior_value: prior.active_index,
        new_value,
        reasons,
        entry: HandicapIndex {
            golfer_id: golfer.golfer_id,
            round_id: new.latest_round_id(),
            date_posted: new.as_of,
            round_number: i64::try_from(new.active.len()).unwrap_or(i64::MAX),
            value: new_value,
        },
    })
}

async fn evaluate_golfer(
    storage: &dyn Storage,
    golfer: &Golfer,
    request: &UpdateRequest,
    config: &RecordConfig,
) -> Result<GolferOutcome, LeagueError> {
    let min_date = config
        .window_start(request.prior_end_date)
        .min(config.window_start(request.new_end_date));
    let max_date = request.today.max(request.new_end_date);
    let snapshot = storage
        .scoring_snapshot(golfer.golfer_id, min_date, max_date)
        .await?;

    let prior = build_handicap_record(&snapshot, request.prior_end_date, max_date, config)?;
    let new = build_handicap_record(&snapshot, request.new_end_date, max_date, config)?;
    Ok(decide(golfer, &prior, &new, request.force_update))
}

async fn golfers_for_request(
    storage: &dyn Storage,
    golfer_id: Option<i64>,
) -> Result<Vec<Golfer>, LeagueError> {
    match golfer_id {
        Some(golfer_id) => {
            let golfer = storage
                .golfer(golfer_id)
                .await?
                .ok_or_else(|| LeagueError::MissingPrerequisite(format!("golfer {golfer_id}")))?;
            Ok(vec![golfer])
        }
        None => Ok(storage.golfers().await?),
    }
}

/// Recompute golfer indices and append a new entry for every golfer whose
/// stored index is out of date, whose pending rounds became active, or all of
/// them when forced. All entries commit together; any failure leaves storage
/// untouched.
///
/// # Errors
///
/// Returns `MissingPrerequisite` for an unknown golfer, `BatchAborted` naming
/// the golfer whose recomputation failed, `Cancelled` if `cancel` fires
/// between golfers, and `Db` if the batch cannot be written.
pub async fn update_golfer_handicaps(
    storage: &dyn Storage,
    request: &UpdateRequest,
    config: &RecordConfig,
    cancel: &CancellationToken,
) -> Result<UpdateReport, LeagueError> {
    let golfers = golfers_for_request(storage, request.golfer_id).await?;
    info!(
        golfers = golfers.len(),
        prior_end_date = %request.prior_end_date,
        new_end_date = %request.new_end_date,
        force_update = request.force_update,
        dry_run = request.dry_run,
        "updating handicaps"
    );

    let mut changes = Vec::new();
    let mut skipped = Vec::new();
    for golfer in &golfers {
        if cancel.is_cancelled() {
            warn!(golfer_id = golfer.golfer_id, "handicap update cancelled");
            return Err(LeagueError::Cancelled);
        }
        let outcome = evaluate_golfer(storage, golfer, request, config)
            .await
            .map_err(|e| LeagueError::BatchAborted {
                golfer_id: golfer.golfer_id,
                source: Box::new(e),
            })?;
        match outcome {
            GolferOutcome::Changed(change) => {
                debug!(
                    golfer_id = change.golfer_id,
                    stored = ?change.stored_value,
                    new = change.new_value,
                    reasons = ?change.reasons,
                    "index update"
                );
                changes.push(change);
            }
            GolferOutcome::Unchanged => {
                debug!(golfer_id = golfer.golfer_id, "index unchanged");
            }
            GolferOutcome::NoIndex => {
                if let Some(stored) = golfer.handicap_index {
                    warn!(
                        golfer_id = golfer.golfer_id,
                        stored, "stored index has no supporting rounds"
                    );
                }
                skipped.push(SkippedGolfer {
                    golfer_id: golfer.golfer_id,
                    golfer_name: golfer.name.clone(),
                    stored_value: golfer.handicap_index,
                    reason: LeagueError::InsufficientData(
                        "no rounds or qualifying scores in the window".to_string(),
                    )
                    .to_string(),
                });
            }
        }
    }

    let committed = if request.dry_run || changes.is_empty() {
        false
    } else {
        let entries: Vec<HandicapIndex> = changes.iter().map(|c| c.entry.clone()).collect();
        storage.commit_handicap_batch(&entries).await?;
        true
    };

    info!(
        changes = changes.len(),
        skipped = skipped.len(),
        committed,
        "handicap update finished"
    );
    Ok(UpdateReport {
        golfers_checked: golfers.len(),
        changes,
        skipped,
        dry_run: request.dry_run,
        committed,
    })
}

/// Golfers whose stored current index disagrees with a recomputation as of
/// `as_of`, including golfers whose stored index is no longer backed by any
/// round or qualifying score. Writes nothing.
///
/// # Errors
///
/// Same as [`update_golfer_handicaps`].
pub async fn audit_handicaps(
    storage: &dyn Storage,
    as_of: NaiveDate,
    today: NaiveDate,
    config: &RecordConfig,
) -> Result<Vec<StaleIndex>, LeagueError> {
    let request = UpdateRequest {
        golfer_id: None,
        prior_end_date: as_of,
        new_end_date: as_of,
        force_update: false,
        dry_run: true,
        today,
    };
    let report =
        update_golfer_handicaps(storage, &request, config, &CancellationToken::new()).await?;
    let changed = report
        .changes
        .into_iter()
        .filter(|c| c.reasons.contains(&UpdateReason::IndexChanged))
        .map(|c| StaleIndex {
            golfer_id: c.golfer_id,
            golfer_name: c.golfer_name,
            stored_value: c.stored_value,
            computed_value: Some(c.new_value),
        });
    let withdrawn = report
        .skipped
        .into_iter()
        .filter(|s| s.stored_value.is_some())
        .map(|s| StaleIndex {
            golfer_id: s.golfer_id,
            golfer_name: s.golfer_name,
            stored_value: s.stored_value,
            computed_value: None,
        });
    let mut stale: Vec<StaleIndex> = changed.chain(withdrawn).collect();
    stale.sort_by_key(|s| s.golfer_id);
    Ok(stale)
}

/// Active and pending records for one golfer.
///
/// # Errors
///
/// Returns `MissingPrerequisite` for an unknown golfer and propagates storage
/// and stale-read failures.
pub async fn handicap_record(
    storage: &dyn Storage,
    golfer_id: i64,
    as_of: NaiveDate,
    today: NaiveDate,
    config: &RecordConfig,
) -> Result<HandicapRecord, LeagueError> {
    storage
        .golfer(golfer_id)
        .await?
        .ok_or_else(|| LeagueError::MissingPrerequisite(format!("golfer {golfer_id}")))?;
    let snapshot = storage
        .scoring_snapshot(golfer_id, config.window_start(as_of), today.max(as_of))
        .await?;
    build_handicap_record(&snapshot, as_of, today.max(as_of), config)
}
