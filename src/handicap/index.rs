//! Handicap index from a scoring record.

use super::rounding::truncate_tenths;

pub const INDEX_MULTIPLIER: f64 = 0.96;

/// How many of the lowest differentials count for a record of `len` scores.
#[must_use]
pub fn differentials_counted(len: usize) -> usize {
    match len {
        0 => 0,
        1..=3 => 1,
        4 | 5 => 2,
        6 | 7 => 3,
        8 | 9 => 4,
        _ => 5,
    }
}

/// Mean of the lowest counted differentials, multiplied by 0.96, truncated to
/// tenths and held to `[0.0, maximum]`. `None` for an empty record.
#[must_use]
pub fn handicap_index(differentials: &[f64], maximum: f64) -> Option<f64> {
    let counted = differentials_counted(differentials.len());
    if counted == 0 {
        return None;
    }

    let mut sorted = differentials.to_vec();
    sorted.sort_by(f64::total_cmp);

    #[allow(clippy::cast_precision_loss)]
    let mean = sorted.iter().take(counted).sum::<f64>() / counted as f64;
    let index = truncate_tenths(mean * INDEX_MULTIPLIER);
    Some(index.clamp(0.0, maximum))
}
