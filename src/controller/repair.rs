use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::LeagueError;
use crate::handicap::HandicapSystem;
use crate::handicap::rounding::tenths;
use crate::model::{HoleScore, RoundCard, RoundRepair};
use crate::storage::Storage;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HoleResultCorrection {
    pub round_id: i64,
    pub hole_number: i32,
    pub stored: HoleScore,
    pub recomputed: HoleScore,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RepairReport {
    pub year: i32,
    pub rounds_checked: usize,
    pub holes_checked: usize,
    pub corrections: Vec<HoleResultCorrection>,
    pub rounds_updated: Vec<i64>,
    pub dry_run: bool,
}

/// Recompute every derived field of one card. `None` if nothing disagrees,
/// or if the round has no hole results to derive from.
#[must_use]
pub fn repair_round(card: &RoundCard) -> Option<(RoundRepair, Vec<HoleResultCorrection>)> {
    if card.hole_results.is_empty() {
        return None;
    }
    let system = HandicapSystem::for_date(card.date_played);
    let mut corrections = Vec::new();
    let mut rewritten = Vec::new();
    let (mut adjusted_gross_score, mut net_score) = (0, 0);

    for hole in &card.hole_results {
        let recomputed = system.score_hole(
            hole.par,
            hole.stroke_index,
            hole.gross_score,
            card.playing_handicap,
        );
        adjusted_gross_score += recomputed.adjusted_gross_score;
        net_score += recomputed.net_score;
        if recomputed != hole.derived() {
            corrections.push(HoleResultCorrection {
                round_id: card.round_id,
                hole_number: hole.hole_number,
                stored: hole.derived(),
                recomputed,
            });
            let mut fixed = hole.clone();
            fixed.apply(recomputed);
            rewritten.push(fixed);
        }
    }

    let score_differential =
        system.score_differential(card.tee_rating, card.tee_slope, adjusted_gross_score, 0.0);
    let totals_drifted = adjusted_gross_score != card.adjusted_gross_score
        || net_score != card.net_score
        || tenths(score_differential) != tenths(card.score_differential);

    if rewritten.is_empty() && !totals_drifted {
        return None;
    }
    Some((
        RoundRepair {
            round_id: card.round_id,
            hole_results: rewritten,
            adjusted_gross_score,
            net_score,
            score_differential,
        },
        corrections,
    ))
}

/// Rebuild handicap strokes, adjusted gross and net scores for every hole
/// played in `year`, rewriting only what disagrees and bumping each affected
/// round's `date_updated`.
///
/// # Errors
///
/// Returns `Db` if the rounds cannot be read or the corrections cannot be
/// written. A failed write leaves every row as it was.
pub async fn recalculate_hole_results(
    storage: &dyn Storage,
    year: i32,
    dry_run: bool,
    now: NaiveDateTime,
) -> Result<RepairReport, LeagueError> {
    let cards = storage.rounds_played_in_year(year).await?;
    let holes_checked = cards.iter().map(|c| c.hole_results.len()).sum();

    let mut repairs = Vec::new();
    let mut corrections = Vec::new();
    for card in &cards {
        if let Some((repair, mut found)) = repair_round(card) {
            repairs.push(repair);
            corrections.append(&mut found);
        }
    }
    let rounds_updated: Vec<i64> = repairs.iter().map(|r| r.round_id).collect();

    if !dry_run && !repairs.is_empty() {
        storage.apply_round_repairs(&repairs, now).await?;
    }

    info!(
        year,
        rounds = cards.len(),
        holes = holes_checked,
        corrections = corrections.len(),
        rounds_updated = rounds_updated.len(),
        dry_run,
        "hole results recalculated"
    );
    Ok(RepairReport {
        year,
        rounds_checked: cards.len(),
        holes_checked,
        corrections,
        rounds_updated,
        dry_run,
    })
}
