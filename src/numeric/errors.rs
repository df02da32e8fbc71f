// ============================================================================
// Numeric Errors
// Error types for the numeric value contract
// ============================================================================

use super::num::NumKind;
use std::fmt;

/// Errors that can occur while minting, combining or converting numbers.
///
/// The undefined sentinel (`Num::NaN`) is not an error: arithmetic without a
/// numeric result returns it as a normal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NumError {
    /// Binary operation between two different non-NaN backends
    TypeMismatch { left: NumKind, right: NumKind },
    /// The NaN sentinel cannot be turned into an integral value
    UnsupportedConversion { target: &'static str },
    /// Input string is not a valid number
    Parse { input: String },
    /// Requested digit count is zero or too large
    InvalidPrecision { precision: u32 },
    /// Serialized bytes could not be produced or read back
    Persistence { reason: String },
}

impl fmt::Display for NumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumError::TypeMismatch { left, right } => {
                write!(f, "type mismatch: cannot combine {} with {}", left, right)
            },
            NumError::UnsupportedConversion { target } => {
                write!(f, "unsupported conversion: NaN has no {} value", target)
            },
            NumError::Parse { input } => write!(f, "invalid number: could not parse {:?}", input),
            NumError::InvalidPrecision { precision } => write!(
                f,
                "invalid precision: {} significant digits requested",
                precision
            ),
            NumError::Persistence { reason } => write!(f, "persistence failure: {}", reason),
        }
    }
}

impl std::error::Error for NumError {}

/// Result type alias for numeric operations
pub type NumResult<T> = Result<T, NumError>;
