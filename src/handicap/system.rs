use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{hole, index, round, rounding};
use crate::model::HoleScore;

/// First season scored under the current rules.
pub const CURRENT_SYSTEM_FIRST_YEAR: i32 = 2022;

pub const MAXIMUM_HANDICAP_INDEX: f64 = 30.0;

/// Points on offer in a team match.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct MatchPoints {
    pub hole_win: f64,
    pub hole_tie: f64,
    pub hole_loss: f64,
    pub total_net_win: f64,
    pub total_net_tie: f64,
    pub total_net_loss: f64,
}

impl MatchPoints {
    /// Points awarded when every one of `holes` holes is contested.
    #[must_use]
    pub fn total_available(&self, holes: usize) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let holes = holes as f64;
        holes * (self.hole_win + self.hole_loss) + self.total_net_win + self.total_net_loss
    }
}

const LEAGUE_MATCH_POINTS: MatchPoints = MatchPoints {
    hole_win: 1.0,
    hole_tie: 0.5,
    hole_loss: 0.0,
    total_net_win: 2.0,
    total_net_tie: 1.0,
    total_net_loss: 0.0,
};

/// The rule set in force for a round. Chosen from the date played, never by
/// the caller, and passed through every computation that depends on it.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HandicapSystem {
    /// Equitable stroke control, 9-hole handicap doubled into the
    /// 18-stroke-index space, truncated differentials.
    Legacy,
    /// Net double bogey, pace-of-play pick-up, rounded differentials.
    Current,
}

impl fmt::Display for HandicapSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HandicapSystem::Legacy => "legacy",
            HandicapSystem::Current => "current",
        };
        write!(f, "{s}")
    }
}

impl HandicapSystem {
    #[must_use]
    pub fn for_year(year: i32) -> Self {
        if year >= CURRENT_SYSTEM_FIRST_YEAR {
            Self::Current
        } else {
            Self::Legacy
        }
    }

    #[must_use]
    pub fn for_date(date_played: NaiveDate) -> Self {
        Self::for_year(date_played.year())
    }

    #[must_use]
    pub const fn maximum_handicap_index(self) -> f64 {
        MAXIMUM_HANDICAP_INDEX
    }

    #[must_use]
    pub const fn match_points(self) -> MatchPoints {
        LEAGUE_MATCH_POINTS
    }

    #[must_use]
    pub fn hole_handicap_strokes(self, stroke_index: i32, course_handicap: i32) -> i32 {
        match self {
            Self::Legacy => {
                hole::handicap_strokes(stroke_index, course_handicap.saturating_mul(2))
            }
            Self::Current => hole::handicap_strokes(stroke_index, course_handicap),
        }
    }

    /// Highest score a hole may count for handicap purposes. `None` means no
    /// handicap has been established yet.
    #[must_use]
    pub fn hole_maximum_strokes(
        self,
        par: i32,
        stroke_index: i32,
        course_handicap: Option<i32>,
    ) -> i32 {
        match self {
            Self::Legacy => hole::equitable_stroke_control_maximum(par, course_handicap),
            Self::Current => hole::net_double_bogey_maximum(
                par,
                course_handicap.map(|ch| self.hole_handicap_strokes(stroke_index, ch)),
            ),
        }
    }

    #[must_use]
    pub fn hole_adjusted_gross_score(
        self,
        par: i32,
        stroke_index: i32,
        gross_score: i32,
        course_handicap: Option<i32>,
    ) -> i32 {
        let maximum = self.hole_maximum_strokes(par, stroke_index, course_handicap);
        hole::adjusted_gross_score(gross_score, maximum)
    }

    /// Card-legality cap. The legacy rules had none.
    #[must_use]
    pub fn hole_pace_of_play_maximum(
        self,
        par: i32,
        stroke_index: i32,
        course_handicap: i32,
    ) -> Option<i32> {
        match self {
            Self::Legacy => None,
            Self::Current => Some(hole::pace_of_play_maximum(
                par,
                self.hole_handicap_strokes(stroke_index, course_handicap),
            )),
        }
    }

    #[must_use]
    pub fn score_hole(
        self,
        par: i32,
        stroke_index: i32,
        gross_score: i32,
        course_handicap: i32,
    ) -> HoleScore {
        let handicap_strokes = self.hole_handicap_strokes(stroke_index, course_handicap);
        HoleScore {
            handicap_strokes,
            adjusted_gross_score: self.hole_adjusted_gross_score(
                par,
                stroke_index,
                gross_score,
                Some(course_handicap),
            ),
            net_score: gross_score.saturating_sub(handicap_strokes),
        }
    }

    /// Course handicap with the index saturated at the maximum.
    #[must_use]
    pub fn course_handicap(self, par: i32, rating: f64, slope: i32, handicap_index: f64) -> i32 {
        let handicap_index = handicap_index.min(self.maximum_handicap_index());
        round::course_handicap(par, rating, slope, handicap_index)
    }

    #[must_use]
    pub fn score_differential(
        self,
        rating: f64,
        slope: i32,
        adjusted_gross_score: i32,
        playing_conditions_correction: f64,
    ) -> f64 {
        let raw = round::raw_score_differential(
            rating,
            slope,
            adjusted_gross_score,
            playing_conditions_correction,
        );
        match self {
            Self::Legacy => rounding::truncate_tenths(raw),
            Self::Current => rounding::round_tenths(raw),
        }
    }

    /// `None` when the record is empty: no index is not the same as 0.0.
    #[must_use]
    pub fn handicap_index(self, differentials: &[f64]) -> Option<f64> {
        index::handicap_index(differentials, self.maximum_handicap_index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::*;

    #[test]
    fn selected_by_year() {
        assert_eq!(HandicapSystem::Legacy, HandicapSystem::for_year(2021));
        assert_eq!(HandicapSystem::Current, HandicapSystem::for_year(2022));
        let date = NaiveDate::from_ymd_opt(2021, 12, 31).unwrap_or_default();
        assert_eq!(HandicapSystem::Legacy, HandicapSystem::for_date(date));
    }

    #[test]
    fn eleven_points_per_nine_hole_match() {
        for system in [HandicapSystem::Legacy, HandicapSystem::Current] {
            assert_float_absolute_eq!(11.0, system.match_points().total_available(9));
        }
    }

    #[test]
    fn legacy_doubles_the_playing_handicap() {
        let legacy = HandicapSystem::Legacy;
        assert_eq!(1, legacy.hole_handicap_strokes(9, 5));
        assert_eq!(1, legacy.hole_handicap_strokes(10, 5));
        assert_eq!(0, legacy.hole_handicap_strokes(11, 5));
        assert_eq!(-1, legacy.hole_handicap_strokes(17, -1));
    }

    #[test]
    fn legacy_truncates_and_current_rounds() {
        // 113 / 120 * 9.0 = 8.475
        assert_float_absolute_eq!(8.4, HandicapSystem::Legacy.score_differential(36.0, 120, 45, 0.0));
        assert_float_absolute_eq!(8.5, HandicapSystem::Current.score_differential(36.0, 120, 45, 0.0));
        // 113 / 120 * -2.0 = -1.883
        assert_float_absolute_eq!(-1.8, HandicapSystem::Legacy.score_differential(36.0, 120, 34, 0.0));
        assert_float_absolute_eq!(-1.9, HandicapSystem::Current.score_differential(36.0, 120, 34, 0.0));
    }

    #[test]
    fn course_handicap_saturates_at_maximum_index() {
        let current = HandicapSystem::Current;
        assert_eq!(
            current.course_handicap(36, 36.0, 113, 30.0),
            current.course_handicap(36, 36.0, 113, 42.5)
        );
    }

    #[test]
    fn out_of_range_course_handicaps_do_not_overflow() {
        for system in [HandicapSystem::Legacy, HandicapSystem::Current] {
            for ch in [i32::MIN, i32::MIN + 1, i32::MAX] {
                let score = system.score_hole(4, 1, 5, ch);
                assert!(score.adjusted_gross_score <= 10);
                let _ = system.hole_pace_of_play_maximum(4, 1, ch);
            }
        }
    }

    #[test]
    fn pace_of_play_only_in_current_rules() {
        assert_eq!(Some(9), HandicapSystem::Current.hole_pace_of_play_maximum(4, 3, 12));
        assert_eq!(None, HandicapSystem::Legacy.hole_pace_of_play_maximum(4, 3, 12));
    }
}
