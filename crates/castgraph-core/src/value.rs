//! # Values — One Variant per Representation
//!
//! `Value` is the dynamically-tagged carrier passed through every
//! conversion function. Each variant holds exactly one concrete shape and
//! `Value::tag()` reports which `ReprTag` it is an instance of.
//!
//! `Value::None(tag)` exists for the sentinels of abstract storage tags
//! (`number`, `hash`) that have no concrete shape of their own.

use num_bigint::BigInt;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::digest::{to_hex, Digest};
use crate::tag::ReprTag;
use crate::temporal::Time;

/// A value in one concrete representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// UTF-8 text.
    Text(String),
    /// 32-bit signed integer.
    Int32(i32),
    /// 64-bit signed integer.
    Int64(i64),
    /// Single precision float.
    Float32(f32),
    /// Double precision float.
    Float64(f64),
    /// Arbitrary-precision integer.
    BigInteger(BigInt),
    /// Base-10 decimal.
    Decimal(Decimal),
    /// Fixed-width digest; its tag is the digest algorithm.
    Digest(Digest),
    /// Duration or instant.
    Time(Time),
    /// Sentinel of an abstract storage tag.
    None(ReprTag),
}

impl Value {
    /// The representation this value is an instance of.
    pub fn tag(&self) -> ReprTag {
        match self {
            Self::Bytes(_) => ReprTag::Bytes,
            Self::Text(_) => ReprTag::Text,
            Self::Int32(_) => ReprTag::Int32,
            Self::Int64(_) => ReprTag::Int64,
            Self::Float32(_) => ReprTag::Float32,
            Self::Float64(_) => ReprTag::Float64,
            Self::BigInteger(_) => ReprTag::BigInteger,
            Self::Decimal(_) => ReprTag::Decimal,
            Self::Digest(d) => d.algorithm(),
            Self::Time(_) => ReprTag::Time,
            Self::None(tag) => *tag,
        }
    }

    /// Whether this is a `None` sentinel.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None(_))
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bytes(b) => write!(f, "0x{}", to_hex(b)),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Int32(n) => write!(f, "{n}"),
            Self::Int64(n) => write!(f, "{n}"),
            Self::Float32(n) => write!(f, "{n}"),
            Self::Float64(n) => write!(f, "{n}"),
            Self::BigInteger(n) => write!(f, "{n}"),
            Self::Decimal(n) => write!(f, "{n}"),
            Self::Digest(d) => write!(f, "{d}"),
            Self::Time(t) => write!(f, "{t}"),
            Self::None(tag) => write!(f, "none({tag})"),
        }
    }
}

// ─── Conversions into Value ─────────────────────────────────────────

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    Vec<u8> => Bytes,
    String => Text,
    i32 => Int32,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
    BigInt => BigInteger,
    Decimal => Decimal,
    Digest => Digest,
    Time => Time,
}

// ─── Typed extraction ───────────────────────────────────────────────

/// A Rust type that is the payload of exactly one `Value` variant.
///
/// Lets conversion rules be written against typed inputs; the variant
/// check happens once, in `Caster::typed`.
pub trait Representation: Sized {
    /// Borrow the payload if `value` holds this shape.
    fn extract(value: &Value) -> Option<&Self>;
}

macro_rules! representation {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Representation for $ty {
                fn extract(value: &Value) -> Option<&Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

representation! {
    Vec<u8> => Bytes,
    String => Text,
    i32 => Int32,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
    BigInt => BigInteger,
    Decimal => Decimal,
    Digest => Digest,
    Time => Time,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_tag_of_each_variant() {
        let digest = Digest::new(ReprTag::Sha1, vec![0; 20]).unwrap();
        let cases = vec![
            (Value::Bytes(vec![1]), ReprTag::Bytes),
            (Value::Text("x".into()), ReprTag::Text),
            (Value::Int32(1), ReprTag::Int32),
            (Value::Int64(1), ReprTag::Int64),
            (Value::Float32(1.0), ReprTag::Float32),
            (Value::Float64(1.0), ReprTag::Float64),
            (Value::BigInteger(BigInt::from(1)), ReprTag::BigInteger),
            (Value::Decimal(Decimal::ONE), ReprTag::Decimal),
            (Value::Digest(digest), ReprTag::Sha1),
            (Value::Time(Time::relative(5)), ReprTag::Time),
            (Value::None(ReprTag::Number), ReprTag::Number),
        ];
        for (value, tag) in cases {
            assert_eq!(value.tag(), tag, "{value}");
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Bytes(vec![0x2A, 0, 0, 0]).to_string(), "0x2a000000");
        assert_eq!(Value::Text("hi".into()).to_string(), "\"hi\"");
        assert_eq!(Value::Decimal(Decimal::from_str("3.5").unwrap()).to_string(), "3.5");
        assert_eq!(Value::None(ReprTag::Hash).to_string(), "none(hash)");
    }

    #[test]
    fn test_extract_matches_variant_only() {
        assert_eq!(i32::extract(&Value::Int32(7)), Some(&7));
        assert_eq!(i32::extract(&Value::Int64(7)), None);
        assert_eq!(String::extract(&Value::Text("a".into())).map(String::as_str), Some("a"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let values = vec![
            Value::Bytes(vec![1, 2, 3]),
            Value::Int64(-9),
            Value::BigInteger(BigInt::from(-123_456_789_i64)),
            Value::Decimal(Decimal::from_str("12.250").unwrap()),
            Value::Time(Time::relative(-5)),
            Value::None(ReprTag::Number),
        ];
        for value in values {
            let json = serde_json::to_string(&value).unwrap();
            let parsed: Value = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, value);
        }
    }
}
