//! # Conversion Properties of the Primitive System
//!
//! Every cast either reproduces its input when widened back or fails with
//! evidence. Bounds are enforced before any arithmetic. The little-endian
//! layouts are symmetric at their canonical widths.

use std::sync::OnceLock;

use castgraph_core::{primitive_system, ConversionErrorKind, DomainSystem, ReprTag, Time, Value};
use num_bigint::BigInt;
use proptest::prelude::*;
use rust_decimal::Decimal;

fn system() -> &'static DomainSystem {
    static SYSTEM: OnceLock<DomainSystem> = OnceLock::new();
    SYSTEM.get_or_init(|| primitive_system().expect("standard system seals"))
}

// =========================================================================
// Concrete cases
// =========================================================================

#[test]
fn bytes_decode_little_endian() {
    let n = system().convert(ReprTag::Bytes, ReprTag::Int32, &Value::Bytes(vec![0x2A, 0, 0, 0]));
    assert_eq!(n, Ok(Value::Int32(42)));
}

#[test]
fn short_slots_zero_extend() {
    assert_eq!(
        system().cast(ReprTag::Int32, &Value::Bytes(vec![0xFF])),
        Ok(Value::Int32(255))
    );
    assert_eq!(
        system().cast(ReprTag::Int32, &Value::Bytes(vec![0xFF; 4])),
        Ok(Value::Int32(-1))
    );
    assert_eq!(
        system().cast(ReprTag::Int64, &Value::Bytes(vec![0x01, 0x01])),
        Ok(Value::Int64(257))
    );
}

#[test]
fn malformed_slots_are_invalid_format() {
    for bytes in [vec![], vec![0u8; 5]] {
        let err = system()
            .cast(ReprTag::Int32, &Value::Bytes(bytes.clone()))
            .unwrap_err();
        assert!(
            matches!(err.kind, ConversionErrorKind::InvalidFormat { .. }),
            "{} bytes: {err}",
            bytes.len()
        );
        assert_eq!(err.evidence, Some(Value::Bytes(bytes)));
    }
    let err = system().cast(ReprTag::Time, &Value::Bytes(vec![0; 12])).unwrap_err();
    assert!(matches!(err.kind, ConversionErrorKind::InvalidFormat { .. }));
}

#[test]
fn whole_decimal_narrows() {
    assert_eq!(
        system().cast(ReprTag::Int32, &Value::Decimal(Decimal::new(30, 1))),
        Ok(Value::Int32(3))
    );
}

#[test]
fn fractional_decimal_reports_delta() {
    let err = system()
        .cast(ReprTag::Int32, &Value::Decimal(Decimal::new(35, 1)))
        .unwrap_err();
    assert_eq!(
        err.kind,
        ConversionErrorKind::PrecisionLoss {
            delta: Value::Decimal(Decimal::new(5, 1))
        }
    );
    assert_eq!(err.evidence, Some(Value::Decimal(Decimal::new(35, 1))));
}

#[test]
fn bounds_checked_before_round_trip() {
    let err = system()
        .cast(ReprTag::Int32, &Value::Float64(3e9 + 0.5))
        .unwrap_err();
    assert_eq!(
        err.kind,
        ConversionErrorKind::OutOfBounds {
            min: Value::Int32(i32::MIN),
            max: Value::Int32(i32::MAX),
        }
    );
}

#[test]
fn nan_is_invalid_format_for_integers() {
    let err = system().cast(ReprTag::Int64, &Value::Float64(f64::NAN)).unwrap_err();
    assert!(matches!(err.kind, ConversionErrorKind::InvalidFormat { .. }));
}

#[test]
fn infinity_out_of_bounds_for_bounded_targets() {
    let err = system()
        .cast(ReprTag::Int64, &Value::Float64(f64::INFINITY))
        .unwrap_err();
    assert!(matches!(err.kind, ConversionErrorKind::OutOfBounds { .. }));
    let err = system()
        .cast(ReprTag::BigInteger, &Value::Float64(f64::NEG_INFINITY))
        .unwrap_err();
    assert!(matches!(err.kind, ConversionErrorKind::InvalidFormat { .. }));
}

#[test]
fn integer_overflow_text_is_out_of_bounds() {
    let err = system()
        .cast(ReprTag::Int32, &Value::Text("2147483648".into()))
        .unwrap_err();
    assert!(matches!(err.kind, ConversionErrorKind::OutOfBounds { .. }));
    let err = system()
        .cast(ReprTag::Int32, &Value::Text("twelve".into()))
        .unwrap_err();
    assert!(matches!(err.kind, ConversionErrorKind::InvalidFormat { .. }));
}

// =========================================================================
// Properties
// =========================================================================

fn decimals() -> impl Strategy<Value = Decimal> {
    (any::<i64>(), 0u32..=12).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

proptest! {
    #[test]
    fn int32_bytes_round_trip(n in any::<i32>()) {
        let bytes = system().cast(ReprTag::Bytes, &Value::Int32(n)).unwrap();
        prop_assert_eq!(&bytes, &Value::Bytes(n.to_le_bytes().to_vec()));
        prop_assert_eq!(system().cast(ReprTag::Int32, &bytes), Ok(Value::Int32(n)));
    }

    #[test]
    fn int64_bytes_round_trip(n in any::<i64>()) {
        let bytes = system().cast(ReprTag::Bytes, &Value::Int64(n)).unwrap();
        prop_assert_eq!(system().cast(ReprTag::Int64, &bytes), Ok(Value::Int64(n)));
    }

    #[test]
    fn short_slot_matches_unsigned_fold(bytes in prop::collection::vec(any::<u8>(), 1..=8)) {
        let expected = bytes
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, b)| acc | (u64::from(*b) << (8 * i)));
        prop_assert_eq!(
            system().cast(ReprTag::Int64, &Value::Bytes(bytes)),
            Ok(Value::Int64(expected as i64))
        );
    }

    #[test]
    fn float64_to_int32_round_trip_or_fails(x in -3.0e9f64..3.0e9) {
        match system().cast(ReprTag::Int32, &Value::Float64(x)) {
            Ok(Value::Int32(n)) => prop_assert_eq!(f64::from(n), x),
            Ok(other) => prop_assert!(false, "unexpected {other:?}"),
            Err(err) => match err.kind {
                ConversionErrorKind::PrecisionLoss { delta } => {
                    prop_assert!(x.fract() != 0.0);
                    prop_assert_eq!(delta, Value::Float64(x - x.trunc()));
                }
                ConversionErrorKind::OutOfBounds { .. } => {
                    prop_assert!(x < f64::from(i32::MIN) || x > f64::from(i32::MAX));
                }
                other => prop_assert!(false, "unexpected {other}"),
            },
        }
    }

    #[test]
    fn int64_to_float64_round_trip_or_fails(n in any::<i64>()) {
        match system().cast(ReprTag::Float64, &Value::Int64(n)) {
            Ok(Value::Float64(f)) => prop_assert_eq!(f as i128, i128::from(n)),
            Ok(other) => prop_assert!(false, "unexpected {other:?}"),
            Err(err) => prop_assert!(
                matches!(err.kind, ConversionErrorKind::PrecisionLoss { .. }),
                "unexpected {err}"
            ),
        }
    }

    #[test]
    fn int64_to_int32_bounds(n in any::<i64>()) {
        let result = system().cast(ReprTag::Int32, &Value::Int64(n));
        match i32::try_from(n) {
            Ok(small) => prop_assert_eq!(result, Ok(Value::Int32(small))),
            Err(_) => {
                let err = result.unwrap_err();
                prop_assert_eq!(
                    err.kind,
                    ConversionErrorKind::OutOfBounds {
                        min: Value::Int32(i32::MIN),
                        max: Value::Int32(i32::MAX),
                    }
                );
            }
        }
    }

    #[test]
    fn decimal_to_int64_exact_or_fails(d in decimals()) {
        match system().cast(ReprTag::Int64, &Value::Decimal(d)) {
            Ok(Value::Int64(n)) => prop_assert_eq!(Decimal::from(n), d),
            Ok(other) => prop_assert!(false, "unexpected {other:?}"),
            Err(err) => {
                prop_assert!(!d.fract().is_zero());
                prop_assert_eq!(
                    err.kind,
                    ConversionErrorKind::PrecisionLoss { delta: Value::Decimal(d - d.trunc()) }
                );
            }
        }
    }

    #[test]
    fn big_integer_to_int32_bounds(n in any::<i64>()) {
        let result = system().cast(ReprTag::Int32, &Value::BigInteger(BigInt::from(n)));
        match i32::try_from(n) {
            Ok(small) => prop_assert_eq!(result, Ok(Value::Int32(small))),
            Err(_) => {
                let kind = result.unwrap_err().kind;
                prop_assert!(
                    matches!(kind, ConversionErrorKind::OutOfBounds { .. }),
                    "expected out of bounds for {}, got {:?}",
                    n,
                    kind
                );
            }
        }
    }

    #[test]
    fn int64_text_round_trip(n in any::<i64>()) {
        let text = system().cast(ReprTag::Text, &Value::Int64(n)).unwrap();
        prop_assert_eq!(&text, &Value::Text(n.to_string()));
        prop_assert_eq!(system().cast(ReprTag::Int64, &text), Ok(Value::Int64(n)));
    }

    #[test]
    fn float64_text_round_trip(x in prop::num::f64::NORMAL | prop::num::f64::ZERO) {
        let text = system().cast(ReprTag::Text, &Value::Float64(x)).unwrap();
        let Ok(Value::Float64(back)) = system().cast(ReprTag::Float64, &text) else {
            panic!("{text} did not parse back");
        };
        prop_assert_eq!(back.to_bits(), x.to_bits());
    }

    #[test]
    fn decimal_bytes_round_trip(d in decimals()) {
        let bytes = system().cast(ReprTag::Bytes, &Value::Decimal(d)).unwrap();
        prop_assert_eq!(system().cast(ReprTag::Decimal, &bytes), Ok(Value::Decimal(d)));
    }

    #[test]
    fn relative_time_bytes_round_trip(nanos in any::<i64>()) {
        let time = Value::Time(Time::relative(nanos));
        let bytes = system().cast(ReprTag::Bytes, &time).unwrap();
        prop_assert_eq!(system().cast(ReprTag::Time, &bytes), Ok(time));
    }
}
