// ============================================================================
// Square Root
// Newton-Raphson refinement at a ramped working precision with guard digits
// ============================================================================
//
// r := (r + x / r) / 2 roughly doubles the number of correct digits per step.
// The f64 seed is good for ~15 digits, so the working precision starts there
// and doubles until it reaches the requested precision plus GUARD_DIGITS.
// Refinement then continues at full working precision until two successive
// iterates round to the same requested digits.

use super::big_decimal::{BigDecimal, RoundingMode};
use num_bigint::BigInt;

/// Extra digits carried above the requested precision
pub const GUARD_DIGITS: u32 = 8;

/// Correct digits delivered by the f64 seed
const SEED_DIGITS: u32 = 15;

/// Refinement steps allowed at full working precision
const MAX_ITERATIONS: u32 = 64;

/// Square root of `value` to `precision` significant digits, rounded half-up.
///
/// Returns `None` for negative input. Zero yields exact zero whatever the
/// precision.
pub fn sqrt(value: &BigDecimal, precision: u32) -> Option<BigDecimal> {
    if value.is_negative() {
        return None;
    }
    if value.is_zero() {
        return Some(BigDecimal::zero());
    }

    let precision = precision.max(1);
    let working = precision.saturating_add(GUARD_DIGITS);

    let mut estimate = seed(value);
    let mut digits = SEED_DIGITS;
    while digits < working {
        digits = digits.saturating_mul(2).min(working);
        estimate = refine(value, &estimate, digits);
        tracing::trace!(digits, working, "sqrt ramp-up step");
    }

    let mut settled = estimate.round(precision, RoundingMode::HalfUp);
    for iteration in 1..=MAX_ITERATIONS {
        estimate = refine(value, &estimate, working);
        let rounded = estimate.round(precision, RoundingMode::HalfUp);
        tracing::trace!(iteration, working, "sqrt refinement step");
        if rounded == settled {
            return Some(rounded);
        }
        settled = rounded;
    }

    tracing::warn!(precision, "sqrt did not settle within {} iterations", MAX_ITERATIONS);
    Some(settled)
}

/// f64 estimate of the root, valid far outside the f64 range.
///
/// Splits `value` as `m × 10^(2k)` with `m` in [1, 100) so that odd and
/// huge exponents seed the same way.
fn seed(value: &BigDecimal) -> BigDecimal {
    let half_exponent = value.adjusted_exponent().div_euclid(2);
    let mantissa = value
        .round(SEED_DIGITS + 2, RoundingMode::HalfUp)
        .scale_by_power_of_ten(-2 * half_exponent)
        .to_f64();

    BigDecimal::from_f64(mantissa.sqrt())
        .unwrap_or_else(BigDecimal::one)
        .scale_by_power_of_ten(half_exponent)
}

/// One Newton step evaluated at `digits` significant digits.
fn refine(value: &BigDecimal, estimate: &BigDecimal, digits: u32) -> BigDecimal {
    let half = BigDecimal::new(BigInt::from(5), 1);
    value
        .div(estimate, digits, RoundingMode::HalfUp)
        .and_then(|quotient| estimate.add(&quotient))
        .map_or_else(
            || estimate.clone(),
            |sum| sum.mul(&half).round(digits, RoundingMode::HalfUp),
        )
}
