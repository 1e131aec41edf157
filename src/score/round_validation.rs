use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::LeagueError;
use crate::handicap::HandicapSystem;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HoleValidationRequest {
    pub number: i32,
    pub par: i32,
    pub stroke_index: i32,
    pub gross_score: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RoundValidationRequest {
    pub date_played: NaiveDate,
    pub course_handicap: i32,
    pub holes: Vec<HoleValidationRequest>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HoleValidationResponse {
    pub number: i32,
    pub par: i32,
    pub stroke_index: i32,
    pub gross_score: i32,
    pub handicap_strokes: i32,
    pub adjusted_gross_score: i32,
    pub net_score: i32,
    /// Pace-of-play cap; absent under rules that had none.
    pub max_gross_score: Option<i32>,
    pub is_valid: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RoundValidationResponse {
    pub date_played: NaiveDate,
    pub course_handicap: i32,
    pub handicap_system: HandicapSystem,
    pub holes: Vec<HoleValidationResponse>,
    pub is_valid: bool,
}

impl RoundValidationResponse {
    #[must_use]
    pub fn invalid_holes(&self) -> Vec<i32> {
        self.holes
            .iter()
            .filter(|h| !h.is_valid)
            .map(|h| h.number)
            .collect()
    }

    #[must_use]
    pub fn gross_score(&self) -> i32 {
        self.holes.iter().map(|h| h.gross_score).sum()
    }

    #[must_use]
    pub fn adjusted_gross_score(&self) -> i32 {
        self.holes.iter().map(|h| h.adjusted_gross_score).sum()
    }

    #[must_use]
    pub fn net_score(&self) -> i32 {
        self.holes.iter().map(|h| h.net_score).sum()
    }

    #[must_use]
    pub fn hole(&self, number: i32) -> Option<&HoleValidationResponse> {
        self.holes.iter().find(|h| h.number == number)
    }

    /// # Errors
    ///
    /// Returns `InvalidCard` naming every hole outside the allowed range.
    pub fn into_result(self) -> Result<Self, LeagueError> {
        if self.is_valid {
            Ok(self)
        } else {
            Err(LeagueError::InvalidCard {
                holes: self.invalid_holes(),
            })
        }
    }
}

fn validate_hole(
    system: HandicapSystem,
    course_handicap: i32,
    hole: &HoleValidationRequest,
) -> HoleValidationResponse {
    let score = system.score_hole(
        hole.par,
        hole.stroke_index,
        hole.gross_score,
        course_handicap,
    );
    let max_gross_score =
        system.hole_pace_of_play_maximum(hole.par, hole.stroke_index, course_handicap);
    let is_valid = hole.gross_score >= 1 && max_gross_score.is_none_or(|max| hole.gross_score <= max);

    HoleValidationResponse {
        number: hole.number,
        par: hole.par,
        stroke_index: hole.stroke_index,
        gross_score: hole.gross_score,
        handicap_strokes: score.handicap_strokes,
        adjusted_gross_score: score.adjusted_gross_score,
        net_score: score.net_score,
        max_gross_score,
        is_valid,
    }
}

/// Check a submitted card and fill in the derived per-hole fields. Has no
/// side effects; an invalid card is reported, not rejected.
#[must_use]
pub fn validate_round(request: &RoundValidationRequest) -> RoundValidationResponse {
    let system = HandicapSystem::for_date(request.date_played);
    let holes: Vec<HoleValidationResponse> = request
        .holes
        .iter()
        .map(|hole| validate_hole(system, request.course_handicap, hole))
        .collect();
    let is_valid = holes.iter().all(|h| h.is_valid);

    RoundValidationResponse {
        date_played: request.date_played,
        course_handicap: request.course_handicap,
        handicap_system: system,
        holes,
        is_valid,
    }
}
