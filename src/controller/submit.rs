use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

use crate::error::LeagueError;
use crate::handicap::HandicapSystem;
use crate::model::{HoleResult, NewRound, RoundSummary, RoundType, ScoringType, Tee};
use crate::score::{
    HoleValidationRequest, RoundValidationRequest, RoundValidationResponse, validate_round,
};
use crate::storage::Storage;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HoleScoreInput {
    pub number: i32,
    pub gross_score: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RoundSubmission {
    pub tee_id: i64,
    pub date_played: NaiveDate,
    pub round_type: RoundType,
    pub scoring_type: ScoringType,
    pub golfer_ids: Vec<i64>,
    /// Overrides the playing handicap derived from the golfers' indices.
    pub course_handicap: Option<i32>,
    pub holes: Vec<HoleScoreInput>,
}

/// Round totals and differential from a validated card.
#[must_use]
pub fn summarize_round(
    round_id: i64,
    submission: &RoundSubmission,
    tee: &Tee,
    card: &RoundValidationResponse,
) -> RoundSummary {
    let system = HandicapSystem::for_date(submission.date_played);
    let adjusted_gross_score = card.adjusted_gross_score();
    RoundSummary {
        round_id,
        date_played: submission.date_played,
        round_type: submission.round_type,
        scoring_type: submission.scoring_type,
        tee_id: tee.tee_id,
        course_name: tee.course_name.clone(),
        tee_name: tee.name.clone(),
        tee_par: tee.par(),
        tee_rating: tee.rating,
        tee_slope: tee.slope,
        playing_handicap: card.course_handicap,
        par: card.holes.iter().map(|h| h.par).sum(),
        gross_score: card.gross_score(),
        adjusted_gross_score,
        net_score: card.net_score(),
        score_differential: system.score_differential(
            tee.rating,
            tee.slope,
            adjusted_gross_score,
            0.0,
        ),
    }
}

async fn playing_handicap(
    storage: &dyn Storage,
    submission: &RoundSubmission,
    tee: &Tee,
) -> Result<i32, LeagueError> {
    let system = HandicapSystem::for_date(submission.date_played);
    let mut total = 0;
    for &golfer_id in &submission.golfer_ids {
        let golfer = storage
            .golfer(golfer_id)
            .await?
            .ok_or_else(|| LeagueError::MissingPrerequisite(format!("golfer {golfer_id}")))?;
        if submission.course_handicap.is_some() {
            continue;
        }
        let index = golfer.handicap_index.ok_or_else(|| {
            LeagueError::MissingPrerequisite(format!(
                "golfer {golfer_id} has no handicap index; supply a course handicap"
            ))
        })?;
        total += system.course_handicap(tee.par(), tee.rating, tee.slope, index);
    }
    Ok(submission.course_handicap.unwrap_or(total))
}

/// Hole numbers that are repeated on the card or that the tee has but the
/// card lacks.
fn holes_not_covered(tee: &Tee, holes: &[HoleScoreInput]) -> Vec<i32> {
    let mut seen = BTreeSet::new();
    let mut problems: BTreeSet<i32> = holes
        .iter()
        .filter(|input| !seen.insert(input.number))
        .map(|input| input.number)
        .collect();
    problems.extend(
        tee.holes
            .iter()
            .map(|hole| hole.number)
            .filter(|number| !seen.contains(number)),
    );
    problems.into_iter().collect()
}

/// Validate a card, derive its hole results and totals, and store it.
///
/// # Errors
///
/// Returns `InvalidRequest` when an individual round does not name exactly
/// one golfer, `MissingPrerequisite` for an unknown tee, golfer or hole,
/// `InvalidCard` naming missing, repeated or out-of-range holes, and `Db` if
/// the write fails.
pub async fn submit_round(
    storage: &dyn Storage,
    submission: &RoundSubmission,
) -> Result<RoundSummary, LeagueError> {
    if submission.golfer_ids.is_empty() {
        return Err(LeagueError::MissingPrerequisite(
            "round has no golfers".to_string(),
        ));
    }
    if submission.scoring_type == ScoringType::Individual && submission.golfer_ids.len() != 1 {
        return Err(LeagueError::InvalidRequest(format!(
            "individual round needs exactly one golfer, got {}",
            submission.golfer_ids.len()
        )));
    }
    let tee = storage
        .tee_metadata(submission.tee_id)
        .await?
        .ok_or_else(|| LeagueError::MissingPrerequisite(format!("tee {}", submission.tee_id)))?;
    let course_handicap = playing_handicap(storage, submission, &tee).await?;

    let holes = submission
        .holes
        .iter()
        .map(|input| {
            let hole = tee.hole(input.number).ok_or_else(|| {
                LeagueError::MissingPrerequisite(format!(
                    "hole {} at tee {}",
                    input.number, tee.tee_id
                ))
            })?;
            Ok(HoleValidationRequest {
                number: hole.number,
                par: hole.par,
                stroke_index: hole.stroke_index,
                gross_score: input.gross_score,
            })
        })
        .collect::<Result<Vec<_>, LeagueError>>()?;
    let uncovered = holes_not_covered(&tee, &submission.holes);
    if !uncovered.is_empty() {
        return Err(LeagueError::InvalidCard { holes: uncovered });
    }

    let card = validate_round(&RoundValidationRequest {
        date_played: submission.date_played,
        course_handicap,
        holes,
    })
    .into_result()?;

    let pending = summarize_round(0, submission, &tee, &card);
    let hole_results = card
        .holes
        .iter()
        .map(|h| HoleResult {
            round_id: 0,
            hole_number: h.number,
            par: h.par,
            stroke_index: h.stroke_index,
            gross_score: h.gross_score,
            handicap_strokes: h.handicap_strokes,
            adjusted_gross_score: h.adjusted_gross_score,
            net_score: h.net_score,
        })
        .collect();

    let round_id = storage
        .insert_round(&NewRound {
            tee_id: tee.tee_id,
            date_played: submission.date_played,
            round_type: submission.round_type,
            scoring_type: submission.scoring_type,
            golfer_ids: submission.golfer_ids.clone(),
            playing_handicap: course_handicap,
            gross_score: pending.gross_score,
            adjusted_gross_score: pending.adjusted_gross_score,
            net_score: pending.net_score,
            score_differential: pending.score_differential,
            hole_results,
        })
        .await?;

    info!(
        round_id,
        tee_id = tee.tee_id,
        golfers = ?submission.golfer_ids,
        differential = pending.score_differential,
        "round submitted"
    );
    Ok(RoundSummary {
        round_id,
        ..pending
    })
}
