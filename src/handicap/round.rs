//! Round-level primitives: playing handicap at a tee and score differential.

use super::rounding::round_half_up;

pub const STANDARD_SLOPE: f64 = 113.0;

/// Strokes received over 9 holes at a tee for a given handicap index.
///
/// Each term is rounded half-up on its own: the slope-adjusted index and the
/// rating-to-par adjustment.
#[must_use]
pub fn course_handicap(par: i32, rating: f64, slope: i32, handicap_index: f64) -> i32 {
    let slope_adjusted = handicap_index * f64::from(slope) / STANDARD_SLOPE;
    round_half_up(slope_adjusted) + round_half_up(rating - f64::from(par))
}

/// Unrounded differential; each rule variant applies its own rounding.
#[must_use]
pub fn raw_score_differential(
    rating: f64,
    slope: i32,
    adjusted_gross_score: i32,
    playing_conditions_correction: f64,
) -> f64 {
    (STANDARD_SLOPE / f64::from(slope))
        * (f64::from(adjusted_gross_score) - rating - playing_conditions_correction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::*;

    #[test]
    fn course_handicap_at_a_sloped_tee() {
        assert_eq!(15, course_handicap(36, 34.7, 134, 13.1));
        assert_eq!(0, course_handicap(36, 36.0, 113, 0.0));
        assert_eq!(-1, course_handicap(36, 34.7, 113, 0.0));
    }

    #[test]
    fn plus_index_gives_strokes_back() {
        assert_eq!(-4, course_handicap(36, 35.8, 130, -3.4));
    }

    #[test]
    fn differential_scales_by_slope() {
        assert_float_absolute_eq!(12.1, raw_score_differential(70.9, 113, 83, 0.0), 1e-9);
        assert_float_absolute_eq!(0.0, raw_score_differential(36.0, 125, 36, 0.0), 1e-9);
    }
}
