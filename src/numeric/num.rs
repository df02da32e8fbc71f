// ============================================================================
// Num
// The value contract shared by every backend and the undefined sentinel
// ============================================================================

use super::big_decimal::BigDecimal;
use super::decimal_num::DecimalNum;
use super::double_num::DoubleNum;
use super::errors::{NumError, NumResult};
use crate::factory::{DoubleNumFactory, NaNFactory};
use crate::interfaces::NumFactory;
use num_traits::ToPrimitive;
use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Backend tag of a [`Num`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NumKind {
    Double,
    Decimal,
    NaN,
}

impl fmt::Display for NumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumKind::Double => write!(f, "DoubleNum"),
            NumKind::Decimal => write!(f, "DecimalNum"),
            NumKind::NaN => write!(f, "NaN"),
        }
    }
}

/// Immutable number.
///
/// Values of different backends are never combined: binary operations across
/// `Double` and `Decimal` fail with [`NumError::TypeMismatch`]. `NaN` is the
/// undefined result; it absorbs every arithmetic operation and, unlike an
/// IEEE NaN, is equal to itself.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(into = "super::persistence::NumRecord", try_from = "super::persistence::NumRecord")
)]
pub enum Num {
    Double(DoubleNum),
    Decimal(DecimalNum),
    NaN,
}

impl Num {
    /// Wrap a float; a float NaN becomes the sentinel.
    #[inline]
    pub(crate) fn double(value: f64) -> Self {
        if value.is_nan() {
            Num::NaN
        } else {
            Num::Double(DoubleNum::new(value))
        }
    }

    #[inline]
    fn decimal(value: Option<DecimalNum>) -> Self {
        value.map_or(Num::NaN, Num::Decimal)
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    pub fn kind(&self) -> NumKind {
        match self {
            Num::Double(_) => NumKind::Double,
            Num::Decimal(_) => NumKind::Decimal,
            Num::NaN => NumKind::NaN,
        }
    }

    #[inline]
    pub fn is_nan(&self) -> bool {
        matches!(self, Num::NaN)
    }

    /// The factory that mints values of this kind and precision.
    pub fn factory(&self) -> Arc<dyn NumFactory> {
        match self {
            Num::Double(_) => DoubleNumFactory::instance(),
            Num::Decimal(value) => value.factory(),
            Num::NaN => NaNFactory::instance(),
        }
    }

    /// Precision context of a decimal value
    pub fn precision(&self) -> Option<u32> {
        match self {
            Num::Decimal(value) => Some(value.precision()),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<&DecimalNum> {
        match self {
            Num::Decimal(value) => Some(value),
            _ => None,
        }
    }

    /// Exact decimal view; `None` for NaN and infinities.
    pub fn to_big_decimal(&self) -> Option<BigDecimal> {
        match self {
            Num::Double(value) => BigDecimal::from_f64(value.value()),
            Num::Decimal(value) => Some(value.delegate().clone()),
            Num::NaN => None,
        }
    }

    fn mismatch(&self, other: &Num) -> NumError {
        NumError::TypeMismatch {
            left: self.kind(),
            right: other.kind(),
        }
    }

    /// Dispatch a binary operation on the backend pair.
    fn combine(
        &self,
        other: &Num,
        double: impl FnOnce(f64, f64) -> f64,
        decimal: impl FnOnce(&DecimalNum, &DecimalNum) -> Option<DecimalNum>,
    ) -> NumResult<Num> {
        match (self, other) {
            (Num::NaN, _) | (_, Num::NaN) => Ok(Num::NaN),
            (Num::Double(a), Num::Double(b)) => Ok(Num::double(double(a.value(), b.value()))),
            (Num::Decimal(a), Num::Decimal(b)) => Ok(Num::decimal(decimal(a, b))),
            _ => Err(self.mismatch(other)),
        }
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    pub fn plus(&self, augend: &Num) -> NumResult<Num> {
        self.combine(augend, |a, b| a + b, |a, b| Some(a.plus(b)))
    }

    pub fn minus(&self, subtrahend: &Num) -> NumResult<Num> {
        self.combine(subtrahend, |a, b| a - b, |a, b| Some(a.minus(b)))
    }

    pub fn multiplied_by(&self, multiplicand: &Num) -> NumResult<Num> {
        self.combine(multiplicand, |a, b| a * b, |a, b| Some(a.multiplied_by(b)))
    }

    /// Division by zero yields [`Num::NaN`] on both backends.
    pub fn divided_by(&self, divisor: &Num) -> NumResult<Num> {
        self.combine(
            divisor,
            |a, b| if b == 0.0 { f64::NAN } else { a / b },
            DecimalNum::divided_by,
        )
    }

    /// Truncated remainder carrying the sign of `self`; zero divisor yields
    /// [`Num::NaN`].
    pub fn remainder(&self, divisor: &Num) -> NumResult<Num> {
        self.combine(divisor, |a, b| a % b, DecimalNum::remainder)
    }

    pub fn min(&self, other: &Num) -> NumResult<Num> {
        self.combine(
            other,
            f64::min,
            |a, b| Some(if a.delegate() <= b.delegate() { a.clone() } else { b.clone() }),
        )
    }

    pub fn max(&self, other: &Num) -> NumResult<Num> {
        self.combine(
            other,
            f64::max,
            |a, b| Some(if a.delegate() >= b.delegate() { a.clone() } else { b.clone() }),
        )
    }

    /// Integer power. A negative power of decimal zero is [`Num::NaN`].
    pub fn pow(&self, exponent: i32) -> Num {
        match self {
            Num::Double(value) => Num::double(value.value().powi(exponent)),
            Num::Decimal(value) => Num::decimal(value.pow(exponent)),
            Num::NaN => Num::NaN,
        }
    }

    /// Real power. A result without a real value is [`Num::NaN`].
    pub fn pow_num(&self, exponent: &Num) -> NumResult<Num> {
        self.combine(exponent, f64::powf, DecimalNum::pow_num)
    }

    pub fn negate(&self) -> Num {
        match self {
            Num::Double(value) => Num::double(-value.value()),
            Num::Decimal(value) => Num::Decimal(value.negate()),
            Num::NaN => Num::NaN,
        }
    }

    pub fn abs(&self) -> Num {
        match self {
            Num::Double(value) => Num::double(value.value().abs()),
            Num::Decimal(value) => Num::Decimal(value.abs()),
            Num::NaN => Num::NaN,
        }
    }

    pub fn floor(&self) -> Num {
        match self {
            Num::Double(value) => Num::double(value.value().floor()),
            Num::Decimal(value) => Num::Decimal(value.floor()),
            Num::NaN => Num::NaN,
        }
    }

    pub fn ceil(&self) -> Num {
        match self {
            Num::Double(value) => Num::double(value.value().ceil()),
            Num::Decimal(value) => Num::Decimal(value.ceil()),
            Num::NaN => Num::NaN,
        }
    }

    /// Natural logarithm; zero and negative values yield [`Num::NaN`].
    pub fn log(&self) -> Num {
        match self {
            Num::Double(value) if value.value() > 0.0 => Num::double(value.value().ln()),
            Num::Decimal(value) => Num::decimal(value.log()),
            _ => Num::NaN,
        }
    }

    /// Square root at the backend's native precision: the f64 root, or the
    /// value's own precision context for decimals.
    pub fn sqrt(&self) -> Num {
        match self {
            Num::Double(value) => Num::double(value.value().sqrt()),
            Num::Decimal(value) => Num::decimal(value.sqrt(value.precision())),
            Num::NaN => Num::NaN,
        }
    }

    /// Square root to `precision` significant digits.
    ///
    /// Negative values yield [`Num::NaN`], zero yields exact zero. A double
    /// result is rounded into the nearest `f64` after the decimal computation.
    pub fn sqrt_with_precision(&self, precision: u32) -> Num {
        match self {
            Num::Double(value) => value.sqrt_with_precision(precision),
            Num::Decimal(value) => Num::decimal(value.sqrt(precision)),
            Num::NaN => Num::NaN,
        }
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    /// Ordering of two values of the same backend; `None` if either is NaN.
    pub fn compare(&self, other: &Num) -> NumResult<Option<Ordering>> {
        match (self, other) {
            (Num::NaN, _) | (_, Num::NaN) => Ok(None),
            (Num::Double(a), Num::Double(b)) => Ok(a.value().partial_cmp(&b.value())),
            (Num::Decimal(a), Num::Decimal(b)) => Ok(Some(a.delegate().cmp(b.delegate()))),
            _ => Err(self.mismatch(other)),
        }
    }

    /// Numeric equality. NaN equals NaN and nothing else.
    pub fn is_equal(&self, other: &Num) -> NumResult<bool> {
        if self.is_nan() || other.is_nan() {
            return Ok(self.is_nan() && other.is_nan());
        }
        Ok(self.compare(other)? == Some(Ordering::Equal))
    }

    pub fn is_greater_than(&self, other: &Num) -> NumResult<bool> {
        Ok(self.compare(other)? == Some(Ordering::Greater))
    }

    pub fn is_greater_than_or_equal(&self, other: &Num) -> NumResult<bool> {
        Ok(matches!(
            self.compare(other)?,
            Some(Ordering::Greater | Ordering::Equal)
        ))
    }

    pub fn is_less_than(&self, other: &Num) -> NumResult<bool> {
        Ok(self.compare(other)? == Some(Ordering::Less))
    }

    pub fn is_less_than_or_equal(&self, other: &Num) -> NumResult<bool> {
        Ok(matches!(
            self.compare(other)?,
            Some(Ordering::Less | Ordering::Equal)
        ))
    }

    fn signum(&self) -> Option<Ordering> {
        match self {
            Num::Double(value) => value.value().partial_cmp(&0.0),
            Num::Decimal(value) => Some(value.delegate().cmp(&BigDecimal::zero())),
            Num::NaN => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.signum() == Some(Ordering::Equal)
    }

    pub fn is_positive(&self) -> bool {
        self.signum() == Some(Ordering::Greater)
    }

    pub fn is_positive_or_zero(&self) -> bool {
        matches!(self.signum(), Some(Ordering::Greater | Ordering::Equal))
    }

    pub fn is_negative(&self) -> bool {
        self.signum() == Some(Ordering::Less)
    }

    pub fn is_negative_or_zero(&self) -> bool {
        matches!(self.signum(), Some(Ordering::Less | Ordering::Equal))
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    pub fn to_f64(&self) -> f64 {
        match self {
            Num::Double(value) => value.value(),
            Num::Decimal(value) => value.delegate().to_f64(),
            Num::NaN => f64::NAN,
        }
    }

    pub fn to_f32(&self) -> f32 {
        self.to_f64() as f32
    }

    /// Truncates toward zero, saturating at the `i32` range.
    ///
    /// # Errors
    /// `UnsupportedConversion` for NaN.
    pub fn to_i32(&self) -> NumResult<i32> {
        match self {
            Num::Double(value) => Ok(value.value() as i32),
            Num::Decimal(value) => {
                let whole = truncated_i64(value.delegate());
                Ok(whole.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
            },
            Num::NaN => Err(NumError::UnsupportedConversion { target: "i32" }),
        }
    }

    /// Truncates toward zero, saturating at the `i64` range.
    ///
    /// # Errors
    /// `UnsupportedConversion` for NaN.
    pub fn to_i64(&self) -> NumResult<i64> {
        match self {
            Num::Double(value) => Ok(value.value() as i64),
            Num::Decimal(value) => Ok(truncated_i64(value.delegate())),
            Num::NaN => Err(NumError::UnsupportedConversion { target: "i64" }),
        }
    }
}

/// Integral part of a decimal, saturating at the `i64` range.
///
/// Values with 19 or more integer digits saturate before any rescaling, so
/// huge exponents never materialize their digits.
fn truncated_i64(value: &BigDecimal) -> i64 {
    if value.is_zero() {
        return 0;
    }
    let saturated = if value.is_negative() { i64::MIN } else { i64::MAX };
    if value.adjusted_exponent() >= 19 {
        return saturated;
    }
    value
        .to_bigint()
        .and_then(|whole| whole.to_i64())
        .unwrap_or(saturated)
}

// ============================================================================
// Trait Implementations
// ============================================================================

/// NaN equals NaN; values of different backends are never equal.
impl PartialEq for Num {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Num::NaN, Num::NaN) => true,
            (Num::Double(a), Num::Double(b)) => a == b,
            (Num::Decimal(a), Num::Decimal(b)) => a == b,
            _ => false,
        }
    }
}

/// Follows `PartialEq`: NaN is equal to NaN and unordered against anything
/// else, and values of different backends are unordered.
///
/// The operators therefore disagree with the contract predicates on NaN:
/// `Num::NaN >= Num::NaN` is true while
/// [`is_greater_than_or_equal`](Num::is_greater_than_or_equal) returns
/// `Ok(false)`, because the predicates treat NaN as unordered even against
/// itself. Use the predicates for indicator logic.
impl PartialOrd for Num {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Num::NaN, Num::NaN) => Some(Ordering::Equal),
            _ => self.compare(other).ok().flatten(),
        }
    }
}

impl Neg for Num {
    type Output = Num;

    fn neg(self) -> Num {
        self.negate()
    }
}

impl Neg for &Num {
    type Output = Num;

    fn neg(self) -> Num {
        self.negate()
    }
}

impl From<DoubleNum> for Num {
    fn from(value: DoubleNum) -> Self {
        Num::double(value.value())
    }
}

impl From<DecimalNum> for Num {
    fn from(value: DecimalNum) -> Self {
        Num::Decimal(value)
    }
}

/// Canonical rendering: enough digits to rebuild an equal value of the same
/// backend.
impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Num::Double(value) => write!(f, "{}", value),
            Num::Decimal(value) => write!(f, "{}", value),
            Num::NaN => write!(f, "NaN"),
        }
    }
}
