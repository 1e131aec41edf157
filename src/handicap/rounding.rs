// Values are computed in binary floating point, so 113 / 121 * 12.1 lands on
// 11.2999... rather than 11.3. The guard nudges a value that sits within
// float noise of a boundary onto the side the exact decimal would land.
const BOUNDARY_GUARD: f64 = 1e-9;

/// Round half away from zero to one decimal place.
#[must_use]
pub fn round_tenths(value: f64) -> f64 {
    let scaled = value * 10.0;
    (scaled + scaled.signum() * BOUNDARY_GUARD).round() / 10.0
}

/// Truncate toward zero to one decimal place.
#[must_use]
pub fn truncate_tenths(value: f64) -> f64 {
    let scaled = value * 10.0;
    (scaled + scaled.signum() * BOUNDARY_GUARD).trunc() / 10.0
}

/// Round to the nearest integer, halves going up.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_half_up(value: f64) -> i32 {
    (value + 0.5 + BOUNDARY_GUARD).floor() as i32
}

/// Tenths as an integer, for comparing one-decimal values without float
/// equality.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn tenths(value: f64) -> i64 {
    (value * 10.0).round() as i64
}
