// ============================================================================
// DecimalNum
// Arbitrary-precision backend: a BigDecimal plus its precision context
// ============================================================================

use super::big_decimal::{BigDecimal, RoundingMode};
use super::errors::{NumError, NumResult};
use super::num::{Num, NumKind};
use super::sqrt;
use crate::factory::{DecimalNumFactory, MAX_PRECISION};
use num_traits::ToPrimitive;
use std::fmt;
use std::sync::Arc;

/// Rounding applied to every decimal result
pub const ROUNDING: RoundingMode = RoundingMode::HalfUp;

/// Number backed by a [`BigDecimal`] rounded to a fixed number of
/// significant digits.
///
/// The precision comes from the factory that minted the value and never
/// changes afterwards. Operations between two decimals round to the larger
/// of the two precisions; the precision is a rounding policy, not a type
/// boundary.
#[derive(Clone)]
pub struct DecimalNum {
    delegate: BigDecimal,
    precision: u32,
}

impl DecimalNum {
    /// Round `value` half-up into a number carrying `precision`.
    pub(crate) fn new(value: BigDecimal, precision: u32) -> Self {
        Self {
            delegate: value.round(precision, ROUNDING),
            precision,
        }
    }

    /// The underlying decimal
    #[inline]
    pub fn delegate(&self) -> &BigDecimal {
        &self.delegate
    }

    /// Significant digits this value is computed and rounded to
    #[inline]
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// The cached factory for this value's precision.
    pub fn factory(&self) -> Arc<DecimalNumFactory> {
        DecimalNumFactory::cached(self.precision)
    }

    #[inline]
    fn context(&self, other: &Self) -> u32 {
        self.precision.max(other.precision)
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    pub fn plus(&self, augend: &Self) -> Self {
        let precision = self.context(augend);
        Self::new(
            self.delegate.add_rounded(&augend.delegate, precision, ROUNDING),
            precision,
        )
    }

    pub fn minus(&self, subtrahend: &Self) -> Self {
        let precision = self.context(subtrahend);
        Self::new(
            self.delegate.sub_rounded(&subtrahend.delegate, precision, ROUNDING),
            precision,
        )
    }

    pub fn multiplied_by(&self, multiplicand: &Self) -> Self {
        Self::new(
            self.delegate.mul(&multiplicand.delegate),
            self.context(multiplicand),
        )
    }

    /// `None` when dividing by zero.
    pub fn divided_by(&self, divisor: &Self) -> Option<Self> {
        let precision = self.context(divisor);
        self.delegate
            .div(&divisor.delegate, precision, ROUNDING)
            .map(|quotient| Self::new(quotient, precision))
    }

    /// `None` when dividing by zero.
    pub fn remainder(&self, divisor: &Self) -> Option<Self> {
        self.delegate
            .rem(&divisor.delegate)
            .map(|remainder| Self::new(remainder, self.context(divisor)))
    }

    /// `None` for a negative power of zero.
    pub fn pow(&self, exponent: i32) -> Option<Self> {
        self.delegate
            .pow(exponent, self.precision, ROUNDING)
            .map(|power| Self::new(power, self.precision))
    }

    /// Real power, split as `x^(a+b) = x^a · x^b`.
    ///
    /// `a` is the integral part of the exponent and goes through the exact
    /// decimal power; `b` lies in (-1, 1) so `x^b` cannot overflow an f64.
    /// `None` when the exponent's integral part exceeds `i32` or `x^b` has
    /// no real value.
    pub fn pow_num(&self, exponent: &Self) -> Option<Self> {
        let precision = self.context(exponent);
        // an i32 has at most 10 integer digits
        if !exponent.delegate.is_zero() && exponent.delegate.adjusted_exponent() >= 10 {
            return None;
        }
        let whole = exponent.delegate.with_scale(0, RoundingMode::Down)?;
        let a = whole.unscaled().to_i32()?;
        let b = exponent.delegate.sub_rounded(&whole, 17, ROUNDING).to_f64();

        let x_pow_a = self.delegate.pow(a, precision, ROUNDING)?;
        let x_pow_b = BigDecimal::from_f64(self.delegate.to_f64().powf(b))?;
        Some(Self::new(x_pow_a.mul(&x_pow_b), precision))
    }

    pub fn negate(&self) -> Self {
        Self::new(self.delegate.negate(), self.precision)
    }

    pub fn abs(&self) -> Self {
        Self::new(self.delegate.abs(), self.precision)
    }

    pub fn floor(&self) -> Self {
        self.to_integral(RoundingMode::Floor)
    }

    pub fn ceil(&self) -> Self {
        self.to_integral(RoundingMode::Ceiling)
    }

    fn to_integral(&self, mode: RoundingMode) -> Self {
        if self.delegate.scale() <= 0 {
            return self.clone();
        }
        self.delegate
            .with_scale(0, mode)
            .map_or_else(|| self.clone(), |integral| Self::new(integral, self.precision))
    }

    /// Natural logarithm through f64, re-rounded to this precision.
    ///
    /// The value is split as `m × 10^e` first, so inputs beyond the f64 range
    /// still have a logarithm. `None` for zero and negative values.
    pub fn log(&self) -> Option<Self> {
        if !self.delegate.is_positive() {
            return None;
        }
        let exponent = self.delegate.adjusted_exponent();
        let mantissa = self
            .delegate
            .round(17, ROUNDING)
            .scale_by_power_of_ten(-exponent)
            .to_f64();
        let log = mantissa.ln() + exponent as f64 * std::f64::consts::LN_10;
        BigDecimal::from_f64(log).map(|value| Self::new(value, self.precision))
    }

    /// Square root to `precision` digits; the result carries that precision.
    ///
    /// The requested precision is clamped into `1..=MAX_PRECISION`. `None`
    /// for negative values.
    pub fn sqrt(&self, precision: u32) -> Option<Self> {
        let precision = precision.clamp(1, MAX_PRECISION);
        sqrt::sqrt(&self.delegate, precision).map(|root| Self::new(root, precision))
    }

    // ========================================================================
    // Approximate Equality
    // ========================================================================

    /// True if both values agree once rounded half-up to `digits`
    /// significant digits.
    ///
    /// `other` may come from any backend; a double is compared through its
    /// shortest decimal rendering. NaN and infinities never match.
    pub fn matches(&self, other: &Num, digits: u32) -> bool {
        let Some(other) = other.to_big_decimal() else {
            return false;
        };

        let ours = self.delegate.round(digits, ROUNDING);
        let theirs = other.round(digits, ROUNDING);
        if ours == theirs {
            return true;
        }
        tracing::debug!(%ours, %theirs, digits, "decimal values do not match");
        false
    }

    /// True if `|self - other| < delta`.
    ///
    /// # Errors
    /// `TypeMismatch` if `other` or `delta` is not a decimal (NaN is allowed
    /// and never matches).
    pub fn matches_within(&self, other: &Num, delta: &Num) -> NumResult<bool> {
        let other = match other {
            Num::Decimal(other) => other,
            Num::NaN => return Ok(false),
            Num::Double(_) => return Err(mismatch(other)),
        };
        let delta = match delta {
            Num::Decimal(delta) => delta,
            Num::NaN => return Ok(false),
            Num::Double(_) => return Err(mismatch(delta)),
        };

        let difference = self.minus(other).abs();
        if difference.delegate < delta.delegate {
            return Ok(true);
        }
        tracing::debug!(
            ours = %self,
            theirs = %other,
            %difference,
            %delta,
            "decimal values differ by more than delta"
        );
        Ok(false)
    }
}

fn mismatch(other: &Num) -> NumError {
    NumError::TypeMismatch {
        left: NumKind::Decimal,
        right: other.kind(),
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

/// Numeric equality; scale and precision are ignored.
impl PartialEq for DecimalNum {
    fn eq(&self, other: &Self) -> bool {
        self.delegate == other.delegate
    }
}

impl fmt::Debug for DecimalNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DecimalNum({}, precision={})", self.delegate, self.precision)
    }
}

/// All stored digits, trailing zeros included.
impl fmt::Display for DecimalNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.delegate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_VALUE: &str = "1.92874923847928374923847239847293687236482374982374923874923874\
        9283749238472983749238749832749274";

    fn num(s: &str, precision: u32) -> DecimalNum {
        DecimalNum::new(s.parse().unwrap(), precision)
    }

    #[test]
    fn test_new_rounds_to_precision() {
        let x = num("1.23456789", 4);
        assert_eq!(x.to_string(), "1.235");
        assert_eq!(x.precision(), 4);

        let y = num("-1.23456789", 4);
        assert_eq!(y.to_string(), "-1.235");
    }

    #[test]
    fn test_arithmetic_uses_larger_precision() {
        let coarse = num("1", 3);
        let fine = num("3", 10);
        let q = coarse.divided_by(&fine).unwrap();
        assert_eq!(q.precision(), 10);
        assert_eq!(q.to_string(), "0.3333333333");

        let sum = num("1.23", 3).plus(&num("0.001", 3));
        assert_eq!(sum.to_string(), "1.23");
    }

    #[test]
    fn test_plus_and_minus_far_apart_magnitudes() {
        let huge = num("1E+1000000000", 32);
        let one = num("1", 32);

        assert_eq!(huge.plus(&one), huge);
        assert_eq!(one.plus(&huge), huge);
        assert_eq!(huge.minus(&one), huge);
        assert_eq!(one.minus(&huge), huge.negate());

        let tiny = num("1E-1000000000", 32);
        assert_eq!(one.plus(&tiny), one);
        assert!(tiny.minus(&tiny).delegate().is_zero());

        let nudged = Num::Decimal(one.plus(&tiny));
        assert!(one.matches_within(&nudged, &Num::Decimal(tiny)).unwrap());
    }

    #[test]
    fn test_remainder_with_scales_far_apart() {
        let huge = num("1E+2147483647", 32);
        assert_eq!(huge.remainder(&num("7", 32)).unwrap(), num("3", 32));
    }

    #[test]
    fn test_division_by_zero() {
        assert!(num("1", 10).divided_by(&num("0", 10)).is_none());
        assert!(num("1", 10).remainder(&num("0", 10)).is_none());
    }

    #[test]
    fn test_pow_num() {
        let x = num("0.2", 32);
        assert!(x
            .pow_num(&num("0.2", 32))
            .unwrap()
            .matches(&Num::Decimal(num("0.7247796636776955", 32)), 14));
        assert!(x
            .pow_num(&num("-0.2", 32))
            .unwrap()
            .matches(&Num::Decimal(num("1.37972966146", 32)), 12));
        assert_eq!(x.pow_num(&num("3", 32)).unwrap(), num("0.008", 32));
        assert_eq!(num("2", 32).pow_num(&num("-2", 32)).unwrap(), num("0.25", 32));
        assert!(num("-8", 32).pow_num(&num("0.5", 32)).is_none());
    }

    #[test]
    fn test_pow_num_extreme_exponents() {
        let two = num("2", 32);
        assert!(two.pow_num(&num("1E+1000000000", 32)).is_none());
        assert!(two.pow_num(&num("-3E+10", 32)).is_none());
        assert_eq!(two.pow_num(&num("1E-1000000000", 32)).unwrap(), num("1", 32));
        assert_eq!(two.pow_num(&num("0E+20", 32)).unwrap(), num("1", 32));
    }

    #[test]
    fn test_floor_and_ceil() {
        assert_eq!(num("2.7", 10).floor(), num("2", 10));
        assert_eq!(num("-2.7", 10).floor(), num("-3", 10));
        assert_eq!(num("2.2", 10).ceil(), num("3", 10));
        assert_eq!(num("-2.2", 10).ceil(), num("-2", 10));
        assert_eq!(num("1.5E+3", 10).floor(), num("1500", 10));

        let tiny = num("1E-1000000000", 10);
        assert_eq!(tiny.floor(), num("0", 10));
        assert_eq!(tiny.ceil(), num("1", 10));
        assert_eq!(tiny.negate().floor(), num("-1", 10));
        assert_eq!(tiny.negate().ceil(), num("0", 10));
    }

    #[test]
    fn test_log() {
        let e = num("2.718281828459045", 32);
        assert!(e.log().unwrap().matches(&Num::Decimal(num("1", 32)), 14));
        assert!(num("1", 32).log().unwrap().delegate().is_zero());

        let huge = num("1E+500", 32);
        let expected = num("1151.2925464970229", 32);
        assert!(huge.log().unwrap().matches(&Num::Decimal(expected), 14));

        assert!(num("0", 32).log().is_none());
        assert!(num("-1", 32).log().is_none());
    }

    #[test]
    fn test_sqrt_carries_requested_precision() {
        let root = num("2", 32).sqrt(10).unwrap();
        assert_eq!(root.precision(), 10);
        assert_eq!(root.to_string(), "1.414213562");
        assert!(num("-2", 32).sqrt(10).is_none());
        assert_eq!(num("2", 32).sqrt(0).unwrap().precision(), 1);
    }

    #[test]
    fn test_matches_digits() {
        let high = num(LONG_VALUE, 128);
        let double = Num::double(LONG_VALUE.parse().unwrap());
        assert!(high.matches(&double, 17));
        assert!(!high.matches(&double, 18));

        let same = Num::Decimal(high.clone());
        assert!(high.matches(&same, 10000));
        assert!(!high.matches(&Num::NaN, 1));
    }

    #[test]
    fn test_matches_within() {
        let high = num(LONG_VALUE, 128);
        let lower = Num::Decimal(num("1.9287492384792837", 128));

        let loose = Num::Decimal(num("0.0000000000000001", 128));
        let tight = Num::Decimal(num("0.00000000000000001", 128));
        assert!(high.matches_within(&lower, &loose).unwrap());
        assert!(!high.matches_within(&lower, &tight).unwrap());

        let same = Num::Decimal(high.clone());
        let tiny = Num::Decimal(num("1E-85", 128));
        assert!(high.matches_within(&same, &tiny).unwrap());

        assert_eq!(
            high.matches_within(&Num::double(1.0), &loose),
            Err(NumError::TypeMismatch {
                left: NumKind::Decimal,
                right: NumKind::Double
            })
        );
        assert!(!high.matches_within(&Num::NaN, &loose).unwrap());
    }
}
