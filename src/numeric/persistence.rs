// ============================================================================
// Persistence
// Serialized form of Num and the byte round trip
// ============================================================================

use super::errors::{NumError, NumResult};
use super::num::{Num, NumKind};
use crate::factory::{DecimalNumFactory, DoubleNumFactory, DEFAULT_PRECISION};
use crate::interfaces::NumFactory;
use serde::{Deserialize, Serialize};

/// Serialized shape of a [`Num`]: backend tag, canonical string and, for
/// decimals, the precision context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumRecord {
    pub kind: NumKind,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
}

impl From<Num> for NumRecord {
    fn from(num: Num) -> Self {
        Self {
            kind: num.kind(),
            value: num.to_string(),
            precision: num.precision(),
        }
    }
}

impl TryFrom<NumRecord> for Num {
    type Error = NumError;

    fn try_from(record: NumRecord) -> NumResult<Self> {
        match record.kind {
            NumKind::Double => DoubleNumFactory::instance().num_of_str(&record.value),
            NumKind::Decimal => {
                let precision = record.precision.unwrap_or(DEFAULT_PRECISION);
                DecimalNumFactory::get_instance(precision)?.num_of_str(&record.value)
            },
            NumKind::NaN => Ok(Num::NaN),
        }
    }
}

impl Num {
    /// Serialize to JSON bytes.
    pub fn to_bytes(&self) -> NumResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| NumError::Persistence {
            reason: e.to_string(),
        })
    }

    /// Rebuild a value written by [`Num::to_bytes`].
    ///
    /// The result is a new value; its `f64` view equals the original's.
    pub fn from_bytes(bytes: &[u8]) -> NumResult<Num> {
        serde_json::from_slice(bytes).map_err(|e| NumError::Persistence {
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_round_trip() {
        let original = DoubleNumFactory::instance().num_of_f64(1.3);
        let bytes = original.to_bytes().unwrap();
        let restored = Num::from_bytes(&bytes).unwrap();

        assert_eq!(restored.kind(), NumKind::Double);
        assert_eq!(restored.to_f64(), original.to_f64());
    }

    #[test]
    fn test_decimal_round_trip_keeps_precision() {
        let factory = DecimalNumFactory::get_instance(64).unwrap();
        let original = factory.num_of_str("1.3").unwrap().divided_by(&factory.three()).unwrap();
        let restored = Num::from_bytes(&original.to_bytes().unwrap()).unwrap();

        assert_eq!(restored, original);
        assert_eq!(restored.precision(), Some(64));
        assert_eq!(restored.to_f64(), original.to_f64());
    }

    #[test]
    fn test_record_shape() {
        let value = DecimalNumFactory::get_instance(10).unwrap().num_of_i64(42);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"kind":"Decimal","value":"42","precision":10}"#);

        let json = serde_json::to_string(&Num::NaN).unwrap();
        assert_eq!(json, r#"{"kind":"NaN","value":"NaN"}"#);
    }

    #[test]
    fn test_special_values_round_trip() {
        assert!(Num::from_bytes(&Num::NaN.to_bytes().unwrap()).unwrap().is_nan());

        let inf = DoubleNumFactory::instance().num_of_f64(f64::NEG_INFINITY);
        let restored = Num::from_bytes(&inf.to_bytes().unwrap()).unwrap();
        assert_eq!(restored.to_f64(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_bad_bytes() {
        assert!(matches!(
            Num::from_bytes(b"not json"),
            Err(NumError::Persistence { .. })
        ));
        assert!(matches!(
            Num::from_bytes(br#"{"kind":"Decimal","value":"1.2.3"}"#),
            Err(NumError::Persistence { .. })
        ));
        assert!(matches!(
            Num::from_bytes(br#"{"kind":"Decimal","value":"1","precision":0}"#),
            Err(NumError::Persistence { .. })
        ));
    }
}
