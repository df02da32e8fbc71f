// ============================================================================
// Arbitrary-Precision Decimal
// Unscaled big integer plus a decimal scale, rounded on explicit request
// ============================================================================

use super::errors::{NumError, NumResult};
use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Rounding applied when digits are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoundingMode {
    /// Away from zero
    Up,
    /// Toward zero (truncate)
    Down,
    /// Toward positive infinity
    Ceiling,
    /// Toward negative infinity
    Floor,
    /// Nearest neighbour, ties away from zero
    #[default]
    HalfUp,
    /// Nearest neighbour, ties toward zero
    HalfDown,
    /// Nearest neighbour, ties to the even neighbour
    HalfEven,
}

/// Decimal number of unbounded size.
///
/// Stores `unscaled × 10^-scale`. Addition, subtraction, multiplication and
/// remainder are exact; division, powers and square roots take an explicit
/// number of significant digits and a [`RoundingMode`].
///
/// Trailing zeros are kept, so `2.50` and `2.5` render differently but
/// compare equal.
#[derive(Clone)]
pub struct BigDecimal {
    unscaled: BigInt,
    scale: i64,
}

// ============================================================================
// Digit Helpers
// ============================================================================

/// 10^exponent as a big integer
fn ten_pow(exponent: u32) -> BigInt {
    BigInt::from(10u8).pow(exponent)
}

/// 10^gap for a scale difference, or `None` when the gap is negative or
/// needs more than `u32::MAX` digits.
fn scale_factor(gap: i64) -> Option<BigInt> {
    u32::try_from(gap).ok().map(ten_pow)
}

/// Number of decimal digits in `value` (zero has one digit).
fn digit_count(value: &BigInt) -> u32 {
    if value.is_zero() {
        return 1;
    }

    // bit length bounds the digit count to within one
    let bits = value.bits();
    let mut digits = ((bits - 1) as f64 * std::f64::consts::LOG10_2) as u32 + 1;
    let magnitude = value.abs();
    if magnitude >= ten_pow(digits) {
        digits += 1;
    } else if digits > 1 && magnitude < ten_pow(digits - 1) {
        digits -= 1;
    }
    digits
}

/// Divide by a positive divisor, rounding the quotient with `mode`.
fn divide_and_round(dividend: &BigInt, divisor: &BigInt, mode: RoundingMode) -> BigInt {
    let (quotient, remainder) = dividend.div_rem(divisor);
    if remainder.is_zero() {
        return quotient;
    }

    // truncated division: the remainder carries the dividend's sign
    let negative = remainder.is_negative();
    let doubled = remainder.abs() * 2u32;
    let away_from_zero = match mode {
        RoundingMode::Up => true,
        RoundingMode::Down => false,
        RoundingMode::Ceiling => !negative,
        RoundingMode::Floor => negative,
        RoundingMode::HalfUp => doubled >= *divisor,
        RoundingMode::HalfDown => doubled > *divisor,
        RoundingMode::HalfEven => match doubled.cmp(divisor) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => quotient.is_odd(),
        },
    };

    if !away_from_zero {
        quotient
    } else if negative {
        quotient - 1u32
    } else {
        quotient + 1u32
    }
}

/// Rounded value of a quantity smaller in magnitude than half a unit.
///
/// Only the modes that round away from zero for this sign produce ±1.
fn round_vanishing(sign: Sign, mode: RoundingMode) -> BigInt {
    let away_from_zero = match mode {
        RoundingMode::Up => true,
        RoundingMode::Ceiling => sign == Sign::Plus,
        RoundingMode::Floor => sign == Sign::Minus,
        _ => false,
    };
    match (away_from_zero, sign) {
        (true, Sign::Plus) => BigInt::one(),
        (true, Sign::Minus) => -BigInt::one(),
        _ => BigInt::zero(),
    }
}

impl BigDecimal {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Create from an unscaled integer and a scale (`unscaled × 10^-scale`).
    #[inline]
    pub fn new(unscaled: BigInt, scale: i64) -> Self {
        Self { unscaled, scale }
    }

    /// Zero with scale 0
    pub fn zero() -> Self {
        Self::new(BigInt::zero(), 0)
    }

    /// One with scale 0
    pub fn one() -> Self {
        Self::new(BigInt::one(), 0)
    }

    /// Create from a float using its shortest round-trip digits.
    ///
    /// `0.1` becomes exactly `0.1`, not the binary expansion of the nearest
    /// double. Returns `None` for NaN and infinities.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        format!("{:e}", value).parse().ok()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    #[inline]
    pub fn scale(&self) -> i64 {
        self.scale
    }

    /// Number of significant digits held in the unscaled value.
    pub fn precision(&self) -> u32 {
        digit_count(&self.unscaled)
    }

    /// Power of ten of the most significant digit.
    pub fn adjusted_exponent(&self) -> i64 {
        i64::from(self.precision()) - 1 - self.scale
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.unscaled.is_zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.unscaled.is_negative()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.unscaled.is_positive()
    }

    pub fn negate(&self) -> Self {
        Self::new(-&self.unscaled, self.scale)
    }

    pub fn abs(&self) -> Self {
        Self::new(self.unscaled.abs(), self.scale)
    }

    // ========================================================================
    // Exact Arithmetic
    // ========================================================================

    /// Both unscaled values brought to the larger scale.
    ///
    /// Returns `None` when the scales are more than `u32::MAX` apart.
    fn aligned(&self, other: &Self) -> Option<(BigInt, BigInt, i64)> {
        match self.scale.cmp(&other.scale) {
            Ordering::Equal => Some((self.unscaled.clone(), other.unscaled.clone(), self.scale)),
            Ordering::Less => Some((
                &self.unscaled * scale_factor(other.scale - self.scale)?,
                other.unscaled.clone(),
                other.scale,
            )),
            Ordering::Greater => Some((
                self.unscaled.clone(),
                &other.unscaled * scale_factor(self.scale - other.scale)?,
                self.scale,
            )),
        }
    }

    /// Exact sum; `None` when the operands' scales cannot be aligned.
    ///
    /// Every digit of both operands is kept, so adding values of wildly
    /// different magnitude materializes all the digits in between. Use
    /// [`add_rounded`](Self::add_rounded) when only a bounded number of
    /// significant digits is wanted.
    pub fn add(&self, other: &Self) -> Option<Self> {
        let (a, b, scale) = self.aligned(other)?;
        Some(Self::new(a + b, scale))
    }

    /// Exact difference; `None` when the operands' scales cannot be aligned.
    pub fn sub(&self, other: &Self) -> Option<Self> {
        let (a, b, scale) = self.aligned(other)?;
        Some(Self::new(a - b, scale))
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self::new(&self.unscaled * &other.unscaled, self.scale + other.scale)
    }

    /// Truncated remainder, carrying the sign of the dividend.
    ///
    /// Returns `None` when `divisor` is zero.
    pub fn rem(&self, divisor: &Self) -> Option<Self> {
        if divisor.is_zero() {
            return None;
        }
        if self.abs() < divisor.abs() {
            return Some(self.clone());
        }

        if self.scale >= divisor.scale {
            // |self| >= |divisor| bounds the gap by self's digit count
            let modulus = &divisor.unscaled * scale_factor(self.scale - divisor.scale)?;
            Some(Self::new(&self.unscaled % modulus, self.scale))
        } else {
            // (u × 10^gap) mod d without building 10^gap
            let modulus = divisor.unscaled.abs();
            let gap = BigInt::from(divisor.scale - self.scale);
            let factor = BigInt::from(10u8).modpow(&gap, &modulus);
            Some(Self::new((&self.unscaled * factor) % &modulus, divisor.scale))
        }
    }

    // ========================================================================
    // Rounded Addition
    // ========================================================================

    /// Sum rounded to `precision` significant digits.
    ///
    /// When the smaller operand lies entirely below both the rounding
    /// position and the last digit of the larger one, it can only decide the
    /// direction of rounding. It is then replaced by a single unit a few
    /// places lower with the same sign, so the work stays proportional to the
    /// digits kept rather than to the distance between the magnitudes.
    pub fn add_rounded(&self, other: &Self, precision: u32, mode: RoundingMode) -> Self {
        if self.is_zero() && other.is_zero() {
            return Self::new(BigInt::zero(), self.scale.max(other.scale));
        }
        if other.is_zero() {
            return self.round(precision, mode);
        }
        if self.is_zero() {
            return other.round(precision, mode);
        }

        let (large, small) = if self.adjusted_exponent() >= other.adjusted_exponent() {
            (self, other)
        } else {
            (other, self)
        };

        // lowest digit position that can still influence the rounded sum
        let last_kept = large.adjusted_exponent() - i64::from(precision.max(1)) + 1;
        let floor = last_kept.min(-large.scale);
        let sum = if precision > 0 && small.adjusted_exponent() < floor - 3 {
            let sticky = Self::new(
                if small.is_negative() {
                    -BigInt::one()
                } else {
                    BigInt::one()
                },
                4 - floor,
            );
            large.add(&sticky)
        } else {
            large.add(small)
        };

        match sum {
            Some(sum) => sum.round(precision, mode),
            None => large.round(precision, mode),
        }
    }

    /// Difference rounded to `precision` significant digits.
    pub fn sub_rounded(&self, other: &Self, precision: u32, mode: RoundingMode) -> Self {
        self.add_rounded(&other.negate(), precision, mode)
    }

    // ========================================================================
    // Rounded Arithmetic
    // ========================================================================

    /// Quotient rounded to `precision` significant digits.
    ///
    /// Exact quotients drop trailing zeros down to the scale difference of
    /// the operands, so `100000000 / 100` is `1000000` rather than a 32-digit
    /// string of zeros. Returns `None` when `divisor` is zero.
    pub fn div(&self, divisor: &Self, precision: u32, mode: RoundingMode) -> Option<Self> {
        if divisor.is_zero() {
            return None;
        }

        let preferred_scale = self.scale - divisor.scale;
        if self.is_zero() {
            return Some(Self::new(BigInt::zero(), preferred_scale.max(0)));
        }

        // enough digits for precision + 1 quotient digits
        let shift = (i64::from(precision) + i64::from(divisor.precision())
            - i64::from(self.precision())
            + 1)
        .max(0);
        let dividend = &self.unscaled * scale_factor(shift)?;
        let (quotient, remainder) = dividend.div_rem(&divisor.unscaled);

        // sticky digit keeps half-way detection honest for inexact quotients
        let exact = remainder.is_zero();
        let sticky = if exact {
            BigInt::zero()
        } else if self.is_negative() == divisor.is_negative() {
            BigInt::one()
        } else {
            -BigInt::one()
        };

        let raw = Self::new(quotient * 10u32 + sticky, preferred_scale + shift + 1);
        let rounded = raw.round(precision, mode);
        if exact {
            Some(rounded.strip_trailing_zeros_to(preferred_scale))
        } else {
            Some(rounded)
        }
    }

    /// Integer power rounded to `precision` significant digits.
    ///
    /// Uses square-and-multiply with guard digits on every intermediate
    /// product. Returns `None` for a negative power of zero.
    pub fn pow(&self, exponent: i32, precision: u32, mode: RoundingMode) -> Option<Self> {
        if exponent == 0 {
            return Some(Self::one());
        }

        let magnitude = exponent.unsigned_abs();
        let working = precision
            .saturating_add(digit_count(&BigInt::from(magnitude)))
            .saturating_add(1);

        let mut result = Self::one();
        let mut base = self.clone();
        let mut remaining = magnitude;
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = result.mul(&base).round(working, mode);
            }
            remaining >>= 1;
            if remaining > 0 {
                base = base.mul(&base).round(working, mode);
            }
        }

        if exponent < 0 {
            result = Self::one().div(&result, working, mode)?;
        }
        Some(result.round(precision, mode))
    }

    // ========================================================================
    // Rounding and Scaling
    // ========================================================================

    /// Round to at most `precision` significant digits.
    ///
    /// A precision of 0 leaves the value untouched.
    pub fn round(&self, precision: u32, mode: RoundingMode) -> Self {
        let digits = self.precision();
        if precision == 0 || digits <= precision {
            return self.clone();
        }

        let dropped = digits - precision;
        let mut unscaled = divide_and_round(&self.unscaled, &ten_pow(dropped), mode);
        let mut scale = self.scale - i64::from(dropped);

        // 999.. rounded up gained a digit; the last one is a zero
        if digit_count(&unscaled) > precision {
            unscaled = unscaled / 10u32;
            scale -= 1;
        }
        Self::new(unscaled, scale)
    }

    /// Rescale to exactly `scale` fractional digits.
    ///
    /// Returns `None` when widening the scale would append more than
    /// `u32::MAX` zeros. Narrowing always succeeds: dropping more places than
    /// the value has digits rounds it to 0 or one unit at the new scale.
    pub fn with_scale(&self, scale: i64, mode: RoundingMode) -> Option<Self> {
        match scale.cmp(&self.scale) {
            Ordering::Equal => Some(self.clone()),
            Ordering::Greater => Some(Self::new(
                &self.unscaled * scale_factor(scale - self.scale)?,
                scale,
            )),
            Ordering::Less => {
                let dropped = self.scale - scale;
                if dropped > i64::from(self.precision()) {
                    return Some(Self::new(round_vanishing(self.unscaled.sign(), mode), scale));
                }
                let divisor = scale_factor(dropped)?;
                Some(Self::new(
                    divide_and_round(&self.unscaled, &divisor, mode),
                    scale,
                ))
            },
        }
    }

    /// Multiply by 10^n without touching the digits.
    pub fn scale_by_power_of_ten(&self, n: i64) -> Self {
        Self::new(self.unscaled.clone(), self.scale.saturating_sub(n))
    }

    /// Remove trailing zeros, never going below `preferred_scale`.
    pub fn strip_trailing_zeros_to(&self, preferred_scale: i64) -> Self {
        if self.is_zero() {
            return Self::new(BigInt::zero(), preferred_scale.max(0));
        }

        let ten = BigInt::from(10u8);
        let mut unscaled = self.unscaled.clone();
        let mut scale = self.scale;
        while scale > preferred_scale {
            let (quotient, remainder) = unscaled.div_rem(&ten);
            if !remainder.is_zero() {
                break;
            }
            unscaled = quotient;
            scale -= 1;
        }
        Self::new(unscaled, scale)
    }

    pub fn strip_trailing_zeros(&self) -> Self {
        self.strip_trailing_zeros_to(i64::MIN)
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// Integral part, truncated toward zero.
    ///
    /// Returns `None` when the integral part has more than `u32::MAX`
    /// trailing zeros.
    pub fn to_bigint(&self) -> Option<BigInt> {
        self.with_scale(0, RoundingMode::Down)
            .map(|integral| integral.unscaled)
    }

    /// Nearest double; saturates to ±infinity outside the f64 range.
    pub fn to_f64(&self) -> f64 {
        format!("{}e{}", self.unscaled, -self.scale)
            .parse()
            .unwrap_or(f64::NAN)
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl Default for BigDecimal {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialEq for BigDecimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BigDecimal {}

impl PartialOrd for BigDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigDecimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (left_sign, right_sign) = (self.unscaled.sign(), other.unscaled.sign());
        if left_sign != right_sign {
            return left_sign.cmp(&right_sign);
        }
        if left_sign == Sign::NoSign {
            return Ordering::Equal;
        }

        // different leading-digit positions decide without aligning
        let by_magnitude = self.adjusted_exponent().cmp(&other.adjusted_exponent());
        if by_magnitude != Ordering::Equal {
            return if left_sign == Sign::Minus {
                by_magnitude.reverse()
            } else {
                by_magnitude
            };
        }

        // same leading position: scales differ exactly as the digit counts do
        let (left_digits, right_digits) = (self.precision(), other.precision());
        let a = &self.unscaled * ten_pow(right_digits.saturating_sub(left_digits));
        let b = &other.unscaled * ten_pow(left_digits.saturating_sub(right_digits));
        a.cmp(&b)
    }
}

impl From<i64> for BigDecimal {
    fn from(value: i64) -> Self {
        Self::new(BigInt::from(value), 0)
    }
}

impl From<rust_decimal::Decimal> for BigDecimal {
    fn from(value: rust_decimal::Decimal) -> Self {
        Self::new(BigInt::from(value.mantissa()), i64::from(value.scale()))
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl fmt::Debug for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BigDecimal({}, scale={})", self, self.scale)
    }
}

impl fmt::Display for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.unscaled.magnitude().to_string();
        let sign = if self.unscaled.is_negative() { "-" } else { "" };
        let adjusted = digits.len() as i64 - 1 - self.scale;

        if self.scale >= 0 && adjusted >= -6 {
            let scale = self.scale as usize;
            if scale == 0 {
                write!(f, "{}{}", sign, digits)
            } else if digits.len() > scale {
                let (int_part, frac_part) = digits.split_at(digits.len() - scale);
                write!(f, "{}{}.{}", sign, int_part, frac_part)
            } else {
                write!(f, "{}0.{}{}", sign, "0".repeat(scale - digits.len()), digits)
            }
        } else {
            let (first, rest) = digits.split_at(1);
            if rest.is_empty() {
                write!(f, "{}{}E{:+}", sign, first, adjusted)
            } else {
                write!(f, "{}{}.{}E{:+}", sign, first, rest, adjusted)
            }
        }
    }
}

// ============================================================================
// String Parsing
// ============================================================================

impl FromStr for BigDecimal {
    type Err = NumError;

    /// Parse a decimal string.
    ///
    /// # Examples
    /// - "123" -> 123
    /// - "-0.001" -> -0.001
    /// - "1.5E+3" -> 1.5E+3
    /// - ".5" -> 0.5
    fn from_str(s: &str) -> NumResult<Self> {
        let parse_error = || NumError::Parse {
            input: s.to_string(),
        };

        let trimmed = s.trim();
        let (negative, body) = if let Some(rest) = trimmed.strip_prefix('-') {
            (true, rest)
        } else if let Some(rest) = trimmed.strip_prefix('+') {
            (false, rest)
        } else {
            (false, trimmed)
        };

        // Split off the exponent
        let (mantissa, exponent) = match body.find(|c: char| c == 'e' || c == 'E') {
            Some(pos) => {
                let exponent: i64 = body[pos + 1..].parse().map_err(|_| parse_error())?;
                (&body[..pos], exponent)
            },
            None => (body, 0),
        };

        // Split on decimal point
        let (int_part, frac_part) = match mantissa.find('.') {
            Some(pos) => (&mantissa[..pos], &mantissa[pos + 1..]),
            None => (mantissa, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty())
            || !all_digits(int_part)
            || !all_digits(frac_part)
        {
            return Err(parse_error());
        }

        let mut unscaled: BigInt = format!("{}{}", int_part, frac_part)
            .parse()
            .map_err(|_| parse_error())?;
        if negative {
            unscaled = -unscaled;
        }

        // scales stay within i32, like the values other decimal libraries accept
        let scale = (frac_part.len() as i64)
            .checked_sub(exponent)
            .filter(|scale| i32::try_from(*scale).is_ok())
            .ok_or_else(parse_error)?;
        Ok(Self::new(unscaled, scale))
    }
}

// ============================================================================
// Tests
// ============================================================================
