// ============================================================================
// DoubleNum
// Fixed-width backend: a 64-bit binary float
// ============================================================================

use super::big_decimal::BigDecimal;
use super::num::Num;
use super::sqrt;
use std::fmt;

/// Number backed by an `f64`.
///
/// Arithmetic is native float arithmetic. A `DoubleNum` never holds a float
/// NaN: results without a value become [`Num::NaN`] instead. Infinities are
/// kept.
#[derive(Clone, Copy, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct DoubleNum(f64);

impl DoubleNum {
    #[inline]
    pub(crate) const fn new(value: f64) -> Self {
        Self(value)
    }

    /// The wrapped float
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Square root computed to `precision` significant digits, then rounded
    /// into the nearest `f64`.
    ///
    /// Digits beyond what a double can hold are lost; requesting 200 digits
    /// gives the same answer as requesting 17.
    pub fn sqrt_with_precision(self, precision: u32) -> Num {
        if self.0 < 0.0 {
            return Num::NaN;
        }
        if self.0 == 0.0 || self.0.is_infinite() {
            return Num::Double(self);
        }

        match BigDecimal::from_f64(self.0).and_then(|value| sqrt::sqrt(&value, precision)) {
            Some(root) => Num::double(root.to_f64()),
            None => Num::NaN,
        }
    }
}

impl fmt::Debug for DoubleNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DoubleNum({})", self.0)
    }
}

/// Shortest representation that parses back to the same `f64`.
impl fmt::Display for DoubleNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trips() {
        for value in [1.3, 0.1, -2.5e-10, 1e21, 123456789.125] {
            let rendered = DoubleNum::new(value).to_string();
            assert_eq!(rendered.parse::<f64>().unwrap(), value);
        }
        assert_eq!(DoubleNum::new(1.0).to_string(), "1");
        assert_eq!(DoubleNum::new(f64::INFINITY).to_string(), "inf");
    }

    #[test]
    fn test_sqrt_with_precision() {
        let root = DoubleNum::new(2.0).sqrt_with_precision(50);
        assert_eq!(root.to_f64(), std::f64::consts::SQRT_2);

        let coarse = DoubleNum::new(2.0).sqrt_with_precision(3);
        assert_eq!(coarse.to_f64(), 1.41);
    }

    #[test]
    fn test_sqrt_with_precision_domain() {
        assert!(DoubleNum::new(-1.2).sqrt_with_precision(12).is_nan());
        assert_eq!(DoubleNum::new(0.0).sqrt_with_precision(12).to_f64(), 0.0);
        assert_eq!(
            DoubleNum::new(f64::INFINITY).sqrt_with_precision(100).to_f64(),
            f64::INFINITY
        );
    }
}
