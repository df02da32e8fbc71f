// ============================================================================
// Double Factory
// Process-wide factory of fixed-width numbers
// ============================================================================

use crate::interfaces::NumFactory;
use crate::numeric::{BigDecimal, Num, NumKind, NumResult};
use std::sync::{Arc, LazyLock};

static INSTANCE: LazyLock<Arc<DoubleNumFactory>> = LazyLock::new(|| Arc::new(DoubleNumFactory));

/// Factory of [`Num::Double`] values
#[derive(Debug)]
pub struct DoubleNumFactory;

impl DoubleNumFactory {
    pub fn instance() -> Arc<DoubleNumFactory> {
        Arc::clone(&INSTANCE)
    }
}

impl NumFactory for DoubleNumFactory {
    fn kind(&self) -> NumKind {
        NumKind::Double
    }

    fn precision(&self) -> Option<u32> {
        None
    }

    fn num_of_i64(&self, value: i64) -> Num {
        Num::double(value as f64)
    }

    fn num_of_f64(&self, value: f64) -> Num {
        Num::double(value)
    }

    /// Also accepts the infinities `Display` produces for doubles.
    fn num_of_str(&self, value: &str) -> NumResult<Num> {
        if value == "NaN" {
            return Ok(Num::NaN);
        }
        match value.to_ascii_lowercase().as_str() {
            "inf" | "+inf" | "infinity" | "+infinity" => return Ok(Num::double(f64::INFINITY)),
            "-inf" | "-infinity" => return Ok(Num::double(f64::NEG_INFINITY)),
            _ => {},
        }
        let parsed: BigDecimal = value.parse()?;
        Ok(self.num_of_big_decimal(parsed))
    }

    /// Nearest `f64`; saturates to an infinity outside the f64 range.
    fn num_of_big_decimal(&self, value: BigDecimal) -> Num {
        Num::double(value.to_f64())
    }
}
