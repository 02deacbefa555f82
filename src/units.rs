//! Inch/millimeter conversion and fractional-inch rounding.

use crate::config::MM_PER_INCH;

/// Convert inches to millimeters.
#[inline]
pub fn in_to_mm(inches: f64) -> f64 {
    inches * MM_PER_INCH
}

/// Convert millimeters to inches.
#[inline]
pub fn mm_to_in(mm: f64) -> f64 {
    mm / MM_PER_INCH
}

/// Round `value` to the nearest multiple of `increment`.
///
/// With an increment of 1/16 this is `round(value * 16) / 16`. A non-positive
/// increment leaves the value unchanged.
pub fn round_to_nearest(value: f64, increment: f64) -> f64 {
    if increment <= 0.0 || !increment.is_finite() {
        return value;
    }
    (value / increment).round() * increment
}

/// Format an inch value as a whole number plus reduced fraction, e.g. `39 3/8`.
///
/// The value is rounded to the nearest `1/denominator` first. Whole values
/// print without a fraction and values under one inch print without a whole part.
pub fn format_fraction(inches: f64, denominator: u32) -> String {
    let denominator = denominator.max(1);
    let sign = if inches < 0.0 { "-" } else { "" };
    let total = (inches.abs() * denominator as f64).round() as u64;
    let whole = total / denominator as u64;
    let remainder = total % denominator as u64;

    if remainder == 0 {
        return format!("{}{}", sign, whole);
    }

    let divisor = gcd(remainder, denominator as u64);
    let (num, den) = (remainder / divisor, denominator as u64 / divisor);

    if whole == 0 {
        format!("{}{}/{}", sign, num, den)
    } else {
        format!("{}{} {}/{}", sign, whole, num, den)
    }
}

/// Denominator matching a rounding increment, e.g. 0.0625 -> 16.
///
/// Increments that are not a reciprocal of a whole number fall back to 16.
pub fn fraction_denominator(increment: f64) -> u32 {
    if increment <= 0.0 || increment > 1.0 {
        return 16;
    }
    let den = (1.0 / increment).round();
    if (1.0 / den - increment).abs() < 1e-9 {
        den as u32
    } else {
        16
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}
