// ============================================================================
// Num Factory Interface
// Defines the contract for minting numbers of one backend and precision
// ============================================================================

use crate::numeric::{BigDecimal, Num, NumKind, NumResult};
use std::fmt::Debug;

/// Mints [`Num`] values of exactly one backend (and, for decimals, one
/// precision).
///
/// Code that only holds a value can mint compatible constants through
/// [`Num::factory`] without knowing which backend is active.
/// Implementations: DoubleNumFactory, DecimalNumFactory, NaNFactory.
pub trait NumFactory: Send + Sync + Debug {
    /// Backend of every value this factory mints
    fn kind(&self) -> NumKind;

    /// Significant digits, for decimal factories
    fn precision(&self) -> Option<u32>;

    fn num_of_i64(&self, value: i64) -> Num;

    /// Mint from a float. Float NaN always mints [`Num::NaN`].
    fn num_of_f64(&self, value: f64) -> Num;

    /// Mint from a decimal string: optional sign, digits with at most one
    /// decimal point, optional exponent. `"NaN"` mints the sentinel.
    ///
    /// # Errors
    /// `Parse` on malformed input.
    fn num_of_str(&self, value: &str) -> NumResult<Num>;

    fn num_of_big_decimal(&self, value: BigDecimal) -> Num;

    /// Mint from a fixed 96-bit decimal
    fn num_of_decimal(&self, value: rust_decimal::Decimal) -> Num {
        self.num_of_big_decimal(BigDecimal::from(value))
    }

    fn minus_one(&self) -> Num {
        self.num_of_i64(-1)
    }

    fn zero(&self) -> Num {
        self.num_of_i64(0)
    }

    fn one(&self) -> Num {
        self.num_of_i64(1)
    }

    fn two(&self) -> Num {
        self.num_of_i64(2)
    }

    fn three(&self) -> Num {
        self.num_of_i64(3)
    }

    fn hundred(&self) -> Num {
        self.num_of_i64(100)
    }

    fn thousand(&self) -> Num {
        self.num_of_i64(1000)
    }

    /// True if `num` could have come from this factory: same backend, or NaN
    fn produces(&self, num: &Num) -> bool {
        num.is_nan() || num.kind() == self.kind()
    }

    /// Re-mint a value of any backend through this factory.
    ///
    /// Values are never converted implicitly; this is the explicit step
    /// required before combining values of different backends.
    fn convert(&self, num: &Num) -> Num {
        match num.to_big_decimal() {
            Some(value) => self.num_of_big_decimal(value),
            None => self.num_of_f64(num.to_f64()),
        }
    }
}
