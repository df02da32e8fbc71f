// ============================================================================
// Technical Analysis Numbers
// Interchangeable numeric backends for price and indicator arithmetic
// ============================================================================

//! # ta-num
//!
//! The numeric layer of a technical-analysis toolkit: every price, volume and
//! indicator value is a [`Num`](numeric::Num).
//!
//! ## Features
//!
//! - **Two backends** behind one value type: 64-bit floats and arbitrary-precision decimals
//! - **No silent mixing**: combining different backends is a `TypeMismatch` error
//! - **Undefined results** propagate as `Num::NaN` instead of failing arithmetic chains
//! - **Square roots to any number of digits** (Newton iteration with guard digits)
//! - **Lock-free factory cache**, one decimal factory per precision
//!
//! ## Example
//!
//! ```rust
//! use ta_num::prelude::*;
//!
//! // Pick a backend once, mint everything through its factory
//! let factory = create_from_config(&NumConfig::decimal(50)).unwrap();
//!
//! let close = factory.num_of_str("101.25").unwrap();
//! let open = factory.num_of_i64(100);
//! let change = close.minus(&open).unwrap().divided_by(&open).unwrap();
//! assert_eq!(change.to_string(), "0.0125");
//!
//! // Constants of the same kind come from the value itself
//! let percent = change.multiplied_by(&change.factory().hundred()).unwrap();
//! assert_eq!(percent.to_f64(), 1.25);
//!
//! // Square root to an explicit number of digits
//! let root = factory.two().sqrt_with_precision(20);
//! assert_eq!(root.to_string(), "1.4142135623730950488");
//!
//! // Backends never mix implicitly
//! let double = DoubleNumFactory::instance().num_of_f64(1.0);
//! assert!(close.plus(&double).is_err());
//! ```

pub mod factory;
pub mod interfaces;
pub mod numeric;

// Re-exports for convenience
pub mod prelude {
    pub use crate::factory::{
        create_from_config, DecimalNumFactory, DoubleNumFactory, NaNFactory, NumBackend,
        NumConfig,
    };
    pub use crate::interfaces::NumFactory;
    pub use crate::numeric::{BigDecimal, DecimalNum, Num, NumError, NumKind, NumResult};
}

#[cfg(test)]
mod integration_tests {
    use super::prelude::*;
    use std::sync::Arc;

    fn factories() -> Vec<Arc<dyn NumFactory>> {
        vec![
            create_from_config(&NumConfig::double_precision()).unwrap(),
            create_from_config(&NumConfig::default()).unwrap(),
        ]
    }

    #[test]
    fn test_arithmetic_on_every_backend() {
        for factory in factories() {
            let ten = factory.num_of_i64(10);
            let million = ten.pow(6);
            let hundred = factory.hundred();
            let hundred_million = hundred.pow(4);
            let five = factory.num_of_i64(5);
            let five_hundred_54 = factory.num_of_i64(554);

            assert!(hundred_million.divided_by(&hundred).unwrap().is_equal(&million).unwrap());
            assert!(hundred_million.remainder(&hundred).unwrap().is_zero());
            assert!(hundred_million.remainder(&five).unwrap().is_zero());

            let zero_dot_two = factory.num_of_f64(0.2);
            assert!((zero_dot_two.pow(5).to_f64() - 0.00032).abs() < 1e-15);
            assert!(
                (zero_dot_two.pow_num(&zero_dot_two).unwrap().to_f64() - 0.7247796636776955).abs()
                    < 1e-15
            );
            assert!(
                (zero_dot_two.pow_num(&factory.num_of_f64(-0.2)).unwrap().to_f64()
                    - 1.37972966146)
                    .abs()
                    < 1e-11
            );

            assert_eq!(five_hundred_54.max(&five).unwrap(), factory.num_of_i64(554));
            assert_eq!(five_hundred_54.min(&five).unwrap(), five);
            assert!(five_hundred_54.is_greater_than(&five).unwrap());
            assert!(!five.is_greater_than(&factory.num_of_i64(5)).unwrap());
            assert!(!five.is_greater_than_or_equal(&five_hundred_54).unwrap());
            assert!(five.is_greater_than_or_equal(&factory.num_of_f64(5.0)).unwrap());
            assert_eq!(five, factory.num_of_f64(5.0));
            assert_ne!(five, factory.num_of_f64(4.9));
        }
    }

    #[test]
    fn test_add_then_subtract() {
        for factory in factories() {
            let a = factory.num_of_str("1234.5678").unwrap();
            let b = factory.num_of_str("0.0001").unwrap();
            let back = a.plus(&b).unwrap().minus(&b).unwrap();
            assert!((back.to_f64() - a.to_f64()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_constants_follow_the_factory() {
        let nan = NaNFactory::instance();
        assert!(nan.zero().is_nan());
        assert!(nan.one().is_nan());
        assert!(nan.hundred().is_nan());

        for factory in factories() {
            assert_eq!(factory.zero().kind(), factory.kind());
            assert!(factory.one().is_equal(&factory.num_of_i64(1)).unwrap());
            assert!(factory.hundred().is_equal(&factory.num_of_i64(100)).unwrap());
            assert_eq!(factory.three().factory().kind(), factory.kind());
        }
    }

    #[test]
    fn test_nan_propagation() {
        let u = Num::NaN;
        for factory in factories() {
            let v = factory.num_of_i64(3);
            assert_eq!(u.plus(&v).unwrap(), u);
            assert_eq!(u.minus(&v).unwrap(), u);
            assert_eq!(u.multiplied_by(&v).unwrap(), u);
            assert_eq!(u.divided_by(&u).unwrap(), u);
            assert_eq!(u.remainder(&v).unwrap(), u);
            assert_eq!(u.max(&v).unwrap(), u);
            assert_eq!(v.min(&u).unwrap(), u);
            assert_eq!(u.pow(12), u);
            assert_eq!(u.pow_num(&u).unwrap(), u);
            assert_eq!(u.sqrt_with_precision(30), u);
        }

        assert_eq!(u, Num::NaN);
        assert!(u.is_equal(&Num::NaN).unwrap());
        assert!(u.to_f64().is_nan());
        assert!(u.to_f32().is_nan());
        assert!(matches!(u.to_i32(), Err(NumError::UnsupportedConversion { .. })));
        assert!(matches!(u.to_i64(), Err(NumError::UnsupportedConversion { .. })));
    }

    #[test]
    fn test_backends_never_mix() {
        let decimal = DecimalNumFactory::default_instance().num_of_i64(12);
        let double = DoubleNumFactory::instance().num_of_i64(12);
        let mismatch = NumError::TypeMismatch {
            left: NumKind::Decimal,
            right: NumKind::Double,
        };

        assert_eq!(decimal.plus(&double), Err(mismatch.clone()));
        assert_eq!(decimal.is_greater_than(&double), Err(mismatch));
        assert!(double.multiplied_by(&decimal).is_err());
        assert_ne!(decimal, double);

        let converted = DecimalNumFactory::default_instance().convert(&double);
        assert_eq!(decimal.plus(&converted).unwrap().to_i32(), Ok(24));
    }

    #[test]
    fn test_precisions_mix_freely() {
        let coarse = DecimalNumFactory::get_instance(5).unwrap().num_of_str("1.2345").unwrap();
        let fine = DecimalNumFactory::get_instance(40).unwrap().num_of_str("1E-20").unwrap();
        let sum = coarse.plus(&fine).unwrap();
        assert_eq!(sum.precision(), Some(40));
        assert_eq!(sum.to_string(), "1.23450000000000000001");
    }

    #[test]
    fn test_sqrt_on_every_backend() {
        for factory in factories() {
            assert!(factory.num_of_f64(-1.2).sqrt_with_precision(12).is_nan());
            assert!(factory.num_of_f64(-1.2).sqrt().is_nan());
            assert!(factory.zero().sqrt_with_precision(12).is_zero());
            assert!(factory.zero().sqrt().is_zero());
        }

        let odd = DecimalNumFactory::default_instance().num_of_str("3E11").unwrap().sqrt();
        assert_eq!(odd.to_string(), "547722.55750516611345696978280080");
    }

    #[test]
    fn test_sqrt_beyond_double_range() {
        let double = DoubleNumFactory::instance().num_of_f64(f64::MAX);
        let squared = double.multiplied_by(&double).unwrap();
        assert_eq!(squared.to_f64(), f64::INFINITY);
        assert_eq!(squared.sqrt_with_precision(100).to_f64(), f64::INFINITY);

        let factory = DecimalNumFactory::get_instance(100).unwrap();
        let max = factory.num_of_f64(f64::MAX);
        let squared = max.multiplied_by(&max).unwrap().multiplied_by(&factory.two()).unwrap();
        let root = squared.sqrt_with_precision(100);
        assert_eq!(root.precision(), Some(100));
        assert!(root.is_greater_than(&max).unwrap());
        assert_eq!(root.to_f64(), f64::INFINITY);

        let delta = squared.multiplied_by(&factory.num_of_str("1E-97").unwrap()).unwrap();
        let square = root.multiplied_by(&root).unwrap();
        assert!(square.as_decimal().unwrap().matches_within(&squared, &delta).unwrap());
    }

    #[test]
    fn test_concurrent_cache_creates_one_factory() {
        const PRECISION: u32 = 4242;
        let seen: Vec<Arc<DecimalNumFactory>> = crossbeam::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|_| DecimalNumFactory::get_instance(PRECISION).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        })
        .unwrap();

        assert!(seen.iter().all(|factory| Arc::ptr_eq(factory, &seen[0])));
        assert_eq!(
            DecimalNumFactory::cached_precisions()
                .iter()
                .filter(|p| **p == PRECISION)
                .count(),
            1
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialization_round_trip() {
        for factory in factories() {
            let original = factory.num_of_f64(1.3);
            let restored = Num::from_bytes(&original.to_bytes().unwrap()).unwrap();
            assert_eq!(restored.to_f64(), original.to_f64());
            assert_eq!(restored.kind(), original.kind());
        }
    }
}
