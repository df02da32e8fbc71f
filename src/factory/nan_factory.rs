// ============================================================================
// NaN Factory
// Factory of the undefined sentinel
// ============================================================================

use crate::interfaces::NumFactory;
use crate::numeric::{BigDecimal, Num, NumKind, NumResult};
use std::sync::{Arc, LazyLock};

static INSTANCE: LazyLock<Arc<NaNFactory>> = LazyLock::new(|| Arc::new(NaNFactory));

/// Origin of [`Num::NaN`]. Every value it mints is the sentinel.
#[derive(Debug)]
pub struct NaNFactory;

impl NaNFactory {
    pub fn instance() -> Arc<NaNFactory> {
        Arc::clone(&INSTANCE)
    }
}

impl NumFactory for NaNFactory {
    fn kind(&self) -> NumKind {
        NumKind::NaN
    }

    fn precision(&self) -> Option<u32> {
        None
    }

    fn num_of_i64(&self, _value: i64) -> Num {
        Num::NaN
    }

    fn num_of_f64(&self, _value: f64) -> Num {
        Num::NaN
    }

    fn num_of_str(&self, _value: &str) -> NumResult<Num> {
        Ok(Num::NaN)
    }

    fn num_of_big_decimal(&self, _value: BigDecimal) -> Num {
        Num::NaN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_everything_is_nan() {
        let factory = NaNFactory::instance();
        assert!(factory.one().is_nan());
        assert!(factory.hundred().is_nan());
        assert!(factory.num_of_f64(1.5).is_nan());
        assert!(factory.num_of_str("12").unwrap().is_nan());
        assert!(factory.convert(&crate::factory::DoubleNumFactory::instance().one()).is_nan());
    }

    #[test]
    fn test_produces_only_nan() {
        let factory = NaNFactory::instance();
        assert!(factory.produces(&Num::NaN));
        assert!(!factory.produces(&crate::factory::DoubleNumFactory::instance().one()));
        assert!(Arc::ptr_eq(&factory, &NaNFactory::instance()));
    }
}
