// ============================================================================
// Num Configuration
// Backend selection and the factory built from it
// ============================================================================

use super::decimal_factory::{DecimalNumFactory, DEFAULT_PRECISION, MAX_PRECISION};
use super::double_factory::DoubleNumFactory;
use crate::interfaces::NumFactory;
use crate::numeric::{NumError, NumResult};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Backend
// ============================================================================

/// Numeric backend every value of a computation uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NumBackend {
    /// 64-bit binary floats
    /// - Fast, ~15-17 significant digits
    /// - Use case: indicator sweeps over long series
    Double,

    /// Arbitrary-precision decimals
    /// - Every result rounded half-up to `precision` significant digits
    /// - Use case: reproducible performance figures, verification
    Decimal {
        /// Significant digits (1..=MAX_PRECISION)
        precision: u32,
    },
}

// ============================================================================
// Configuration
// ============================================================================

/// Numeric configuration of an analysis run
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NumConfig {
    pub backend: NumBackend,
}

impl NumConfig {
    pub fn new(backend: NumBackend) -> Self {
        Self { backend }
    }

    /// Fixed-width floats
    pub fn double_precision() -> Self {
        Self::new(NumBackend::Double)
    }

    /// Decimals with `precision` significant digits
    pub fn decimal(precision: u32) -> Self {
        Self::new(NumBackend::Decimal { precision })
    }

    /// Decimals with 128 significant digits
    pub fn high_precision() -> Self {
        Self::decimal(128)
    }

    /// Builder method: Switch to decimals with `precision` digits
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.backend = NumBackend::Decimal { precision };
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> NumResult<()> {
        match self.backend {
            NumBackend::Double => Ok(()),
            NumBackend::Decimal { precision } => {
                if precision == 0 || precision > MAX_PRECISION {
                    return Err(NumError::InvalidPrecision { precision });
                }
                Ok(())
            },
        }
    }
}

impl Default for NumConfig {
    fn default() -> Self {
        Self::decimal(DEFAULT_PRECISION)
    }
}

// ============================================================================
// Factory Functions
// ============================================================================

/// Returns the shared factory for a configuration
///
/// # Arguments
/// * `config` - Backend selection
///
/// # Returns
/// * `NumResult<Arc<dyn NumFactory>>` - The cached factory or `InvalidPrecision`
///
/// # Example
/// ```
/// use ta_num::prelude::*;
///
/// let factory = create_from_config(&NumConfig::decimal(64)).unwrap();
/// let third = factory.one().divided_by(&factory.three()).unwrap();
/// assert_eq!(third.precision(), Some(64));
/// ```
pub fn create_from_config(config: &NumConfig) -> NumResult<Arc<dyn NumFactory>> {
    config.validate()?;

    match config.backend {
        NumBackend::Double => Ok(DoubleNumFactory::instance()),
        NumBackend::Decimal { precision } => Ok(DecimalNumFactory::get_instance(precision)?),
    }
}
