//! # Numeric Conversions
//!
//! Every ordered pair of `decimal`, `big_integer`, `float64`, `float32`,
//! `int32`, `int64`. Widening pairs that are exact for every input
//! (`int32 -> int64`, `float32 -> float64`, any integer to `big_integer`
//! or `decimal`, `int32 -> float64`) never fail. Everything else goes
//! through [`crate::precision`]: NaN, then bounds, then round trip.
//!
//! Float to float narrowing passes NaN and infinities through unchanged;
//! every other float source rejects NaN.

use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::caster::Caster;
use crate::error::ConversionError;
use crate::precision::{check_bounds, checked_narrow, reject_infinity, reject_nan};
use crate::tag::{EdgeKey, ReprTag};
use crate::value::Value;

// Target ranges expressed in the float source. The upper bounds are the
// largest floats that still fit; the next float up is 2^31 or 2^63.
const I32_LOW_F64: f64 = -2_147_483_648.0;
const I32_HIGH_F64: f64 = 2_147_483_647.0;
const I64_LOW_F64: f64 = -9_223_372_036_854_775_808.0;
const I64_HIGH_F64: f64 = 9_223_372_036_854_774_784.0;
const I32_LOW_F32: f32 = -2_147_483_648.0;
const I32_HIGH_F32: f32 = 2_147_483_520.0;
const I64_LOW_F32: f32 = -9_223_372_036_854_775_808.0;
const I64_HIGH_F32: f32 = 9_223_371_487_098_961_920.0;

/// All thirty numeric conversions.
pub fn casters() -> Vec<Caster> {
    vec![
        // int32
        Caster::typed(ReprTag::Int32, ReprTag::Int64, |_, n: &i32| Ok(i64::from(*n))),
        Caster::typed(ReprTag::Int32, ReprTag::Float64, |_, n: &i32| Ok(f64::from(*n))),
        Caster::typed(ReprTag::Int32, ReprTag::Float32, |edge, n: &i32| {
            integer_to_float(edge, *n, |n| n as f32, |f| f as i128)
        }),
        Caster::typed(ReprTag::Int32, ReprTag::BigInteger, |_, n: &i32| Ok(BigInt::from(*n))),
        Caster::typed(ReprTag::Int32, ReprTag::Decimal, |_, n: &i32| Ok(Decimal::from(*n))),
        // int64
        Caster::typed(ReprTag::Int64, ReprTag::Int32, int64_to_int32),
        Caster::typed(ReprTag::Int64, ReprTag::Float64, |edge, n: &i64| {
            integer_to_float(edge, *n, |n| n as f64, |f| f as i128)
        }),
        Caster::typed(ReprTag::Int64, ReprTag::Float32, |edge, n: &i64| {
            integer_to_float(edge, *n, |n| n as f32, |f| f as i128)
        }),
        Caster::typed(ReprTag::Int64, ReprTag::BigInteger, |_, n: &i64| Ok(BigInt::from(*n))),
        Caster::typed(ReprTag::Int64, ReprTag::Decimal, |_, n: &i64| Ok(Decimal::from(*n))),
        // float64
        Caster::typed(ReprTag::Float64, ReprTag::Float32, float64_to_float32),
        Caster::typed(ReprTag::Float64, ReprTag::Int32, float64_to_int32),
        Caster::typed(ReprTag::Float64, ReprTag::Int64, float64_to_int64),
        Caster::typed(ReprTag::Float64, ReprTag::BigInteger, float64_to_big_integer),
        Caster::typed(ReprTag::Float64, ReprTag::Decimal, float64_to_decimal),
        // float32
        Caster::typed(ReprTag::Float32, ReprTag::Float64, |_, v: &f32| Ok(f64::from(*v))),
        Caster::typed(ReprTag::Float32, ReprTag::Int32, float32_to_int32),
        Caster::typed(ReprTag::Float32, ReprTag::Int64, float32_to_int64),
        Caster::typed(ReprTag::Float32, ReprTag::BigInteger, float32_to_big_integer),
        Caster::typed(ReprTag::Float32, ReprTag::Decimal, float32_to_decimal),
        // big_integer
        Caster::typed(ReprTag::BigInteger, ReprTag::Int32, big_integer_to_int32),
        Caster::typed(ReprTag::BigInteger, ReprTag::Int64, big_integer_to_int64),
        Caster::typed(ReprTag::BigInteger, ReprTag::Float64, big_integer_to_float64),
        Caster::typed(ReprTag::BigInteger, ReprTag::Float32, big_integer_to_float32),
        big_integer_to_decimal(),
        // decimal
        Caster::typed(ReprTag::Decimal, ReprTag::Int32, decimal_to_int32),
        Caster::typed(ReprTag::Decimal, ReprTag::Int64, decimal_to_int64),
        Caster::typed(ReprTag::Decimal, ReprTag::Float64, decimal_to_float64),
        Caster::typed(ReprTag::Decimal, ReprTag::Float32, decimal_to_float32),
        Caster::typed(ReprTag::Decimal, ReprTag::BigInteger, decimal_to_big_integer),
    ]
}

/// `big_integer -> decimal`, also the second hop of `digest -> decimal`.
pub fn big_integer_to_decimal() -> Caster {
    Caster::typed(ReprTag::BigInteger, ReprTag::Decimal, |edge, n: &BigInt| {
        n.to_i128()
            .and_then(|wide| Decimal::try_from_i128_with_scale(wide, 0).ok())
            .ok_or_else(|| out_of_bounds(edge, n.clone(), decimal_range()))
    })
}

// ─── Ranges ──────────────────────────────────────────────────────────

fn int32_range() -> (Value, Value) {
    (Value::Int32(i32::MIN), Value::Int32(i32::MAX))
}

fn int64_range() -> (Value, Value) {
    (Value::Int64(i64::MIN), Value::Int64(i64::MAX))
}

fn float32_range() -> (Value, Value) {
    (Value::Float32(f32::MIN), Value::Float32(f32::MAX))
}

fn float64_range() -> (Value, Value) {
    (Value::Float64(f64::MIN), Value::Float64(f64::MAX))
}

fn decimal_range() -> (Value, Value) {
    (Value::Decimal(Decimal::MIN), Value::Decimal(Decimal::MAX))
}

fn out_of_bounds(edge: EdgeKey, source: impl Into<Value>, range: (Value, Value)) -> ConversionError {
    ConversionError::out_of_bounds(edge, source.into(), range.0, range.1)
}

// ─── Integer sources ─────────────────────────────────────────────────

fn int64_to_int32(edge: EdgeKey, n: &i64) -> Result<i32, ConversionError> {
    let (min, max) = int32_range();
    check_bounds(edge, n, &i64::from(i32::MIN), &i64::from(i32::MAX), min, max)?;
    i32::try_from(*n).map_err(|_| out_of_bounds(edge, *n, int32_range()))
}

/// Integer to float: the float is widened back through `i128`, which holds
/// every integral float reachable from a 64-bit source exactly.
fn integer_to_float<N, F>(
    edge: EdgeKey,
    n: N,
    narrow: impl FnOnce(N) -> F,
    widen: impl FnOnce(F) -> i128,
) -> Result<F, ConversionError>
where
    N: Copy + Into<i128> + TryFrom<i128> + Into<Value>,
    F: Copy,
{
    let forward = narrow(n);
    let diff = Into::<i128>::into(n) - widen(forward);
    if diff == 0 {
        return Ok(forward);
    }
    let delta = match N::try_from(diff) {
        Ok(d) => Into::<Value>::into(d),
        Err(_) => Value::BigInteger(BigInt::from(diff)),
    };
    Err(ConversionError::precision_loss(edge, Into::<Value>::into(n), delta))
}

fn big_integer_to_int32(edge: EdgeKey, n: &BigInt) -> Result<i32, ConversionError> {
    n.to_i32()
        .ok_or_else(|| out_of_bounds(edge, n.clone(), int32_range()))
}

fn big_integer_to_int64(edge: EdgeKey, n: &BigInt) -> Result<i64, ConversionError> {
    n.to_i64()
        .ok_or_else(|| out_of_bounds(edge, n.clone(), int64_range()))
}

fn big_integer_to_float64(edge: EdgeKey, n: &BigInt) -> Result<f64, ConversionError> {
    let forward = match n.to_f64() {
        Some(f) if f.is_finite() => f,
        _ => return Err(out_of_bounds(edge, n.clone(), float64_range())),
    };
    checked_narrow(edge, n, |_| forward, |f| {
        BigInt::from_f64(*f).unwrap_or_default()
    })
}

fn big_integer_to_float32(edge: EdgeKey, n: &BigInt) -> Result<f32, ConversionError> {
    let forward = match n.to_f32() {
        Some(f) if f.is_finite() => f,
        _ => return Err(out_of_bounds(edge, n.clone(), float32_range())),
    };
    checked_narrow(edge, n, |_| forward, |f| {
        BigInt::from_f32(*f).unwrap_or_default()
    })
}

// ─── Float sources ───────────────────────────────────────────────────

fn float64_to_float32(edge: EdgeKey, v: &f64) -> Result<f32, ConversionError> {
    if !v.is_finite() {
        return Ok(*v as f32);
    }
    let (min, max) = float32_range();
    check_bounds(edge, v, &f64::from(f32::MIN), &f64::from(f32::MAX), min, max)?;
    checked_narrow(edge, v, |v| *v as f32, |f| f64::from(*f))
}

fn float64_to_int32(edge: EdgeKey, v: &f64) -> Result<i32, ConversionError> {
    reject_nan(edge, *v)?;
    let (min, max) = int32_range();
    check_bounds(edge, v, &I32_LOW_F64, &I32_HIGH_F64, min, max)?;
    checked_narrow(edge, v, |v| *v as i32, |n| f64::from(*n))
}

fn float64_to_int64(edge: EdgeKey, v: &f64) -> Result<i64, ConversionError> {
    reject_nan(edge, *v)?;
    let (min, max) = int64_range();
    check_bounds(edge, v, &I64_LOW_F64, &I64_HIGH_F64, min, max)?;
    checked_narrow(edge, v, |v| *v as i64, |n| *n as f64)
}

fn float32_to_int32(edge: EdgeKey, v: &f32) -> Result<i32, ConversionError> {
    reject_nan(edge, *v)?;
    let (min, max) = int32_range();
    check_bounds(edge, v, &I32_LOW_F32, &I32_HIGH_F32, min, max)?;
    checked_narrow(edge, v, |v| *v as i32, |n| *n as f32)
}

fn float32_to_int64(edge: EdgeKey, v: &f32) -> Result<i64, ConversionError> {
    reject_nan(edge, *v)?;
    let (min, max) = int64_range();
    check_bounds(edge, v, &I64_LOW_F32, &I64_HIGH_F32, min, max)?;
    checked_narrow(edge, v, |v| *v as i64, |n| *n as f32)
}

fn float64_to_big_integer(edge: EdgeKey, v: &f64) -> Result<BigInt, ConversionError> {
    reject_nan(edge, *v)?;
    reject_infinity(edge, *v)?;
    let whole = checked_narrow(edge, v, |v| v.trunc(), |w| *w)?;
    BigInt::from_f64(whole).ok_or_else(|| {
        ConversionError::invalid_format(edge, Some(Value::Float64(*v)), "not an integral float")
    })
}

fn float32_to_big_integer(edge: EdgeKey, v: &f32) -> Result<BigInt, ConversionError> {
    reject_nan(edge, *v)?;
    reject_infinity(edge, *v)?;
    let whole = checked_narrow(edge, v, |v| v.trunc(), |w| *w)?;
    BigInt::from_f32(whole).ok_or_else(|| {
        ConversionError::invalid_format(edge, Some(Value::Float32(*v)), "not an integral float")
    })
}

/// Decimal values of floats are taken from their double value in both
/// directions, so `float32 -> decimal -> float32` is exact.
fn decimal_of(f: f64) -> Option<Decimal> {
    Decimal::from_f64(f)
}

fn double_of(d: &Decimal) -> f64 {
    d.to_f64().unwrap_or(f64::NAN)
}

fn float64_to_decimal(edge: EdgeKey, v: &f64) -> Result<Decimal, ConversionError> {
    reject_nan(edge, *v)?;
    let decimal = decimal_of(*v).ok_or_else(|| out_of_bounds(edge, *v, decimal_range()))?;
    checked_narrow(edge, v, |_| decimal, double_of)
}

fn float32_to_decimal(edge: EdgeKey, v: &f32) -> Result<Decimal, ConversionError> {
    reject_nan(edge, *v)?;
    let decimal =
        decimal_of(f64::from(*v)).ok_or_else(|| out_of_bounds(edge, *v, decimal_range()))?;
    checked_narrow(edge, v, |_| decimal, |d| double_of(d) as f32)
}

// ─── Decimal sources ─────────────────────────────────────────────────

fn decimal_whole(edge: EdgeKey, d: &Decimal) -> Result<Decimal, ConversionError> {
    checked_narrow(edge, d, |d| d.trunc(), |w| *w)
}

fn decimal_to_int32(edge: EdgeKey, d: &Decimal) -> Result<i32, ConversionError> {
    let (min, max) = int32_range();
    check_bounds(edge, d, &Decimal::from(i32::MIN), &Decimal::from(i32::MAX), min, max)?;
    decimal_whole(edge, d)?
        .to_i32()
        .ok_or_else(|| out_of_bounds(edge, *d, int32_range()))
}

fn decimal_to_int64(edge: EdgeKey, d: &Decimal) -> Result<i64, ConversionError> {
    let (min, max) = int64_range();
    check_bounds(edge, d, &Decimal::from(i64::MIN), &Decimal::from(i64::MAX), min, max)?;
    decimal_whole(edge, d)?
        .to_i64()
        .ok_or_else(|| out_of_bounds(edge, *d, int64_range()))
}

fn decimal_to_big_integer(edge: EdgeKey, d: &Decimal) -> Result<BigInt, ConversionError> {
    let mut whole = decimal_whole(edge, d)?;
    whole.rescale(0);
    Ok(BigInt::from(whole.mantissa()))
}

fn decimal_to_float64(edge: EdgeKey, d: &Decimal) -> Result<f64, ConversionError> {
    let forward = double_of(d);
    checked_narrow(edge, d, |_| forward, |f| decimal_of(*f).unwrap_or_default())
}

fn decimal_to_float32(edge: EdgeKey, d: &Decimal) -> Result<f32, ConversionError> {
    let forward = double_of(d) as f32;
    checked_narrow(edge, d, |_| forward, |f| {
        decimal_of(f64::from(*f)).unwrap_or_default()
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn caster(from: ReprTag, to: ReprTag) -> Caster {
        casters()
            .into_iter()
            .find(|c| c.edge() == EdgeKey::new(from, to))
            .unwrap()
    }

    proptest! {
        /// int64 -> int32 -> int64 is exact, or int64 -> int32 fails.
        #[test]
        fn int64_int32_round_trip(n in any::<i64>()) {
            let narrow = caster(ReprTag::Int64, ReprTag::Int32);
            let widen = caster(ReprTag::Int32, ReprTag::Int64);
            if let Ok(mid) = narrow.cast(&Value::Int64(n)) {
                prop_assert_eq!(widen.cast(&mid), Ok(Value::Int64(n)));
            } else {
                prop_assert!(n < i64::from(i32::MIN) || n > i64::from(i32::MAX));
            }
        }

        /// float64 -> int64 never returns a value that differs from the input.
        #[test]
        fn float64_int64_honest(v in any::<f64>()) {
            if let Ok(Value::Int64(n)) = caster(ReprTag::Float64, ReprTag::Int64).cast(&Value::Float64(v)) {
                prop_assert_eq!(n as f64, v);
            }
        }

        /// int64 -> float64 succeeds only when the float is the integer.
        #[test]
        fn int64_float64_honest(n in any::<i64>()) {
            if let Ok(Value::Float64(f)) = caster(ReprTag::Int64, ReprTag::Float64).cast(&Value::Int64(n)) {
                prop_assert_eq!(f as i128, i128::from(n));
            }
        }

        /// big_integer -> int32 equals the input or reports its range.
        #[test]
        fn big_integer_int32_bounds(n in any::<i64>()) {
            match caster(ReprTag::BigInteger, ReprTag::Int32).cast(&Value::BigInteger(BigInt::from(n))) {
                Ok(Value::Int32(m)) => prop_assert_eq!(i64::from(m), n),
                Ok(other) => prop_assert!(false, "unexpected {}", other),
                Err(e) => prop_assert_eq!(e.kind.name(), "out_of_bounds"),
            }
        }
    }
}
