//! Per-hole scoring primitives shared by both rule variants.

/// Strokes received on a hole with the given stroke index (1..=18) for a
/// course handicap expressed in the 18-stroke-index space.
///
/// A plus handicap gives a stroke back on the easiest holes, one per hole.
#[must_use]
pub fn handicap_strokes(stroke_index: i32, course_handicap: i32) -> i32 {
    if course_handicap >= 0 {
        let extra = i32::from(course_handicap % 18 >= stroke_index);
        course_handicap / 18 + extra
    } else if 18_i32.saturating_sub(stroke_index) < course_handicap.saturating_neg() {
        -1
    } else {
        0
    }
}

/// Net double bogey, capped at par + 5. Par + 5 when no handicap is
/// established.
#[must_use]
pub fn net_double_bogey_maximum(par: i32, strokes: Option<i32>) -> i32 {
    match strokes {
        Some(strokes) => par
            .saturating_add(2)
            .saturating_add(strokes)
            .min(par.saturating_add(5)),
        None => par.saturating_add(5),
    }
}

/// Equitable stroke control, keyed by 9-hole course handicap.
#[must_use]
pub fn equitable_stroke_control_maximum(par: i32, course_handicap: Option<i32>) -> i32 {
    match course_handicap {
        Some(ch) if ch <= 4 => par.saturating_add(2),
        Some(5..=9) => 7,
        Some(10..=14) => 8,
        Some(15..=19) => 9,
        _ => 10,
    }
}

#[must_use]
pub fn adjusted_gross_score(gross_score: i32, maximum: i32) -> i32 {
    gross_score.min(maximum)
}

/// Pace-of-play pick-up point: double par plus strokes received.
#[must_use]
pub fn pace_of_play_maximum(par: i32, strokes: i32) -> i32 {
    par.saturating_mul(2).saturating_add(strokes)
}
