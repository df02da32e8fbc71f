// ============================================================================
// Numeric Module
// Number values, their two backends and the undefined sentinel
// ============================================================================
//
// This module provides:
// - Num: the value contract (Double | Decimal | NaN)
// - DoubleNum / DecimalNum: fixed-width and arbitrary-precision backends
// - BigDecimal: the decimal representation behind DecimalNum
// - sqrt: Newton root extraction to a requested number of digits
// - NumError: error types for minting, combining and converting
//
// Design principles:
// - Values are immutable; every operation returns a new Num
// - Backends never mix: cross-backend operations are a TypeMismatch
// - NaN is a value, not an error

mod big_decimal;
mod decimal_num;
mod double_num;
mod errors;
mod num;
#[cfg(feature = "serde")]
mod persistence;
pub mod sqrt;

pub use big_decimal::{BigDecimal, RoundingMode};
pub use decimal_num::{DecimalNum, ROUNDING};
pub use double_num::DoubleNum;
pub use errors::{NumError, NumResult};
pub use num::{Num, NumKind};
#[cfg(feature = "serde")]
pub use persistence::NumRecord;
