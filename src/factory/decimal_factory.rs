// ============================================================================
// Decimal Factory
// Arbitrary-precision factories, one per precision, cached process-wide
// ============================================================================

use crate::interfaces::NumFactory;
use crate::numeric::{BigDecimal, DecimalNum, Num, NumError, NumKind, NumResult};
use crossbeam_skiplist::SkipMap;
use std::sync::{Arc, LazyLock, OnceLock};

/// Precision of [`DecimalNumFactory::default_instance`]
pub const DEFAULT_PRECISION: u32 = 32;

/// Largest precision a factory can be created for
pub const MAX_PRECISION: u32 = 10_000_000;

/// Precision -> factory.
///
/// The skip list makes lookups lock-free; the `OnceLock` in each slot makes
/// sure a factory is built once even when several threads ask for a new
/// precision at the same time. Entries are never evicted.
static CACHE: LazyLock<SkipMap<u32, OnceLock<Arc<DecimalNumFactory>>>> =
    LazyLock::new(SkipMap::new);

/// Factory of [`Num::Decimal`] values rounded half-up to a fixed number of
/// significant digits.
#[derive(Debug)]
pub struct DecimalNumFactory {
    precision: u32,
    minus_one: Num,
    zero: Num,
    one: Num,
    two: Num,
    three: Num,
    hundred: Num,
    thousand: Num,
}

impl DecimalNumFactory {
    fn new(precision: u32) -> Self {
        let constant = |value: i64| Num::Decimal(DecimalNum::new(BigDecimal::from(value), precision));
        Self {
            precision,
            minus_one: constant(-1),
            zero: constant(0),
            one: constant(1),
            two: constant(2),
            three: constant(3),
            hundred: constant(100),
            thousand: constant(1000),
        }
    }

    /// The shared factory for `precision` significant digits.
    ///
    /// # Errors
    /// `InvalidPrecision` for 0 or anything above [`MAX_PRECISION`].
    pub fn get_instance(precision: u32) -> NumResult<Arc<DecimalNumFactory>> {
        if precision == 0 || precision > MAX_PRECISION {
            return Err(NumError::InvalidPrecision { precision });
        }
        Ok(Self::cached(precision))
    }

    /// The shared factory for [`DEFAULT_PRECISION`] digits
    pub fn default_instance() -> Arc<DecimalNumFactory> {
        Self::cached(DEFAULT_PRECISION)
    }

    /// Precisions that already have a factory, ascending
    pub fn cached_precisions() -> Vec<u32> {
        CACHE
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .map(|entry| *entry.key())
            .collect()
    }

    /// Cache lookup for a precision already known to be valid.
    pub(crate) fn cached(precision: u32) -> Arc<DecimalNumFactory> {
        if let Some(entry) = CACHE.get(&precision) {
            if let Some(factory) = entry.value().get() {
                return Arc::clone(factory);
            }
        }

        let entry = CACHE.get_or_insert(precision, OnceLock::new());
        let factory = entry.value().get_or_init(|| {
            tracing::debug!(precision, "creating decimal factory");
            Arc::new(DecimalNumFactory::new(precision))
        });
        Arc::clone(factory)
    }

    fn mint(&self, value: BigDecimal) -> Num {
        Num::Decimal(DecimalNum::new(value, self.precision))
    }
}

impl NumFactory for DecimalNumFactory {
    fn kind(&self) -> NumKind {
        NumKind::Decimal
    }

    fn precision(&self) -> Option<u32> {
        Some(self.precision)
    }

    fn num_of_i64(&self, value: i64) -> Num {
        self.mint(BigDecimal::from(value))
    }

    /// Exact shortest decimal of the float; infinities mint [`Num::NaN`].
    fn num_of_f64(&self, value: f64) -> Num {
        BigDecimal::from_f64(value).map_or(Num::NaN, |value| self.mint(value))
    }

    fn num_of_str(&self, value: &str) -> NumResult<Num> {
        if value == "NaN" {
            return Ok(Num::NaN);
        }
        Ok(self.mint(value.parse()?))
    }

    fn num_of_big_decimal(&self, value: BigDecimal) -> Num {
        self.mint(value)
    }

    fn minus_one(&self) -> Num {
        self.minus_one.clone()
    }

    fn zero(&self) -> Num {
        self.zero.clone()
    }

    fn one(&self) -> Num {
        self.one.clone()
    }

    fn two(&self) -> Num {
        self.two.clone()
    }

    fn three(&self) -> Num {
        self.three.clone()
    }

    fn hundred(&self) -> Num {
        self.hundred.clone()
    }

    fn thousand(&self) -> Num {
        self.thousand.clone()
    }
}
