//! # Binary Conversions
//!
//! `bytes` to and from the fixed-width shapes. All packing and unpacking is
//! done by [`crate::codec`]; this module only decides the slot width and how
//! the decoded bits are reinterpreted.
//!
//! | edge | layout |
//! |------|--------|
//! | `bytes -> int32` | 1..=4 bytes, zero-extended, two's complement |
//! | `bytes -> int64` | 1..=8 bytes, zero-extended, two's complement |
//! | `bytes -> float64` | exactly 8 bytes |
//! | `bytes -> float32` | 8-byte double slot, then narrowed |
//! | `bytes -> <digest>` | exactly the algorithm width |
//! | `bytes -> text` | strict UTF-8 |
//! | `bytes -> time` | 8 bytes relative, 16 bytes absolute |
//!
//! The numeric inverses write the canonical width (4 for `int32`, 8 for
//! everything else; `float32` is widened into the double slot).

use crate::caster::Caster;
use crate::codec::{self, TimeSlot};
use crate::digest::Digest;
use crate::error::ConversionError;
use crate::precision::{check_bounds, checked_narrow};
use crate::tag::{EdgeKey, ReprTag};
use crate::temporal::Time;
use crate::value::Value;

use super::malformed_bytes;

/// `bytes` to every fixed-width shape, plus the numeric inverses.
///
/// `bytes -> text` and `bytes -> time` are included; their inverses belong
/// to the `text` and `time` domains ([`super::text`], [`super::time`]), as
/// does `<digest> -> bytes` ([`super::digest`]).
pub fn casters() -> Vec<Caster> {
    let mut casters = vec![
        Caster::typed(ReprTag::Bytes, ReprTag::Int32, bytes_to_int32),
        Caster::typed(ReprTag::Bytes, ReprTag::Int64, bytes_to_int64),
        Caster::typed(ReprTag::Bytes, ReprTag::Float64, bytes_to_float64),
        Caster::typed(ReprTag::Bytes, ReprTag::Float32, bytes_to_float32),
        bytes_to_text(),
        bytes_to_time(),
        Caster::typed(ReprTag::Int32, ReprTag::Bytes, |_, n: &i32| {
            Ok(codec::encode_u32(*n as u32).to_vec())
        }),
        Caster::typed(ReprTag::Int64, ReprTag::Bytes, |_, n: &i64| {
            Ok(codec::encode_u64(*n as u64).to_vec())
        }),
        Caster::typed(ReprTag::Float64, ReprTag::Bytes, |_, v: &f64| {
            Ok(codec::encode_f64(*v).to_vec())
        }),
        Caster::typed(ReprTag::Float32, ReprTag::Bytes, |_, v: &f32| {
            Ok(codec::encode_f64(f64::from(*v)).to_vec())
        }),
    ];
    casters.extend(ReprTag::digests().iter().map(|&tag| bytes_to_digest(tag)));
    casters
}

/// `bytes -> text`: strict UTF-8.
pub fn bytes_to_text() -> Caster {
    Caster::typed(ReprTag::Bytes, ReprTag::Text, |edge, bytes: &Vec<u8>| {
        String::from_utf8(bytes.clone()).map_err(|e| {
            ConversionError::invalid_format(edge, Some(Value::Bytes(bytes.clone())), e.to_string())
        })
    })
}

/// `bytes -> time`: an 8-byte duration or a 16-byte instant.
pub fn bytes_to_time() -> Caster {
    Caster::typed(ReprTag::Bytes, ReprTag::Time, |edge, bytes: &Vec<u8>| {
        let time = match codec::decode_time(bytes).map_err(|e| malformed_bytes(edge, bytes, e))? {
            TimeSlot::Relative(nanoseconds) => Time::Relative { nanoseconds },
            TimeSlot::Absolute {
                seconds,
                nanoseconds,
            } => Time::Absolute {
                seconds,
                nanoseconds,
            },
        };
        Ok(time)
    })
}

/// `bytes -> <digest>`: the bytes are taken as the digest, not hashed.
pub fn bytes_to_digest(algorithm: ReprTag) -> Caster {
    Caster::typed(ReprTag::Bytes, algorithm, move |_, bytes: &Vec<u8>| {
        Digest::new(algorithm, bytes.clone())
    })
}

fn bytes_to_int32(edge: EdgeKey, bytes: &Vec<u8>) -> Result<i32, ConversionError> {
    codec::decode_u32(bytes)
        .map(|bits| bits as i32)
        .map_err(|e| malformed_bytes(edge, bytes, e))
}

fn bytes_to_int64(edge: EdgeKey, bytes: &Vec<u8>) -> Result<i64, ConversionError> {
    codec::decode_u64(bytes)
        .map(|bits| bits as i64)
        .map_err(|e| malformed_bytes(edge, bytes, e))
}

fn bytes_to_float64(edge: EdgeKey, bytes: &Vec<u8>) -> Result<f64, ConversionError> {
    codec::decode_f64(bytes).map_err(|e| malformed_bytes(edge, bytes, e))
}

fn bytes_to_float32(edge: EdgeKey, bytes: &Vec<u8>) -> Result<f32, ConversionError> {
    let double = bytes_to_float64(edge, bytes)?;
    if !double.is_finite() {
        return Ok(double as f32);
    }
    check_bounds(
        edge,
        &double,
        &f64::from(f32::MIN),
        &f64::from(f32::MAX),
        Value::Float32(f32::MIN),
        Value::Float32(f32::MAX),
    )
    .and_then(|()| checked_narrow(edge, &double, |v| *v as f32, |f| f64::from(*f)))
    .map_err(|mut e| {
        e.evidence = Some(Value::Bytes(bytes.clone()));
        e
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
        #[test]
        fn int32_round_trip(n in any::<i32>()) {
            let bytes = caster(ReprTag::Int32, ReprTag::Bytes).cast(&Value::Int32(n)).unwrap();
            prop_assert_eq!(caster(ReprTag::Bytes, ReprTag::Int32).cast(&bytes), Ok(Value::Int32(n)));
        }

        #[test]
        fn int64_round_trip(n in any::<i64>()) {
            let bytes = caster(ReprTag::Int64, ReprTag::Bytes).cast(&Value::Int64(n)).unwrap();
            prop_assert_eq!(caster(ReprTag::Bytes, ReprTag::Int64).cast(&bytes), Ok(Value::Int64(n)));
        }

        #[test]
        fn float32_round_trip(v in any::<f32>().prop_filter("NaN", |v| !v.is_nan())) {
            let bytes = caster(ReprTag::Float32, ReprTag::Bytes).cast(&Value::Float32(v)).unwrap();
            prop_assert_eq!(caster(ReprTag::Bytes, ReprTag::Float32).cast(&bytes), Ok(Value::Float32(v)));
        }
    }
}
