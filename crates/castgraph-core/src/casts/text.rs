//! # Text Conversions
//!
//! Rendering every non-digest shape to `text` and parsing `text` back into
//! the numeric shapes and `time`.
//!
//! Parsing rules:
//!
//! - Integer overflow is `OutOfBounds` with the target's range; any other
//!   failure is `InvalidFormat`.
//! - Floats accept what `str::parse` accepts. A finite literal that
//!   overflows to infinity is `OutOfBounds`; `inf`, `-inf` and `NaN`
//!   are taken literally.
//! - Decimals are parsed exactly: text with more digits than a decimal can
//!   hold is rejected, never rounded.
//! - Times use the forms documented on [`Time`].

use std::num::IntErrorKind;
use std::str::FromStr;

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;

use crate::caster::Caster;
use crate::error::ConversionError;
use crate::tag::{EdgeKey, ReprTag};
use crate::temporal::{Time, TimeParseError};
use crate::value::Value;

/// Render every numeric shape to text.
pub fn renderers() -> Vec<Caster> {
    vec![
        Caster::typed(ReprTag::Int32, ReprTag::Text, |_, n: &i32| Ok(n.to_string())),
        Caster::typed(ReprTag::Int64, ReprTag::Text, |_, n: &i64| Ok(n.to_string())),
        Caster::typed(ReprTag::Float32, ReprTag::Text, |_, v: &f32| Ok(v.to_string())),
        Caster::typed(ReprTag::Float64, ReprTag::Text, |_, v: &f64| Ok(v.to_string())),
        Caster::typed(ReprTag::BigInteger, ReprTag::Text, |_, n: &BigInt| Ok(n.to_string())),
        Caster::typed(ReprTag::Decimal, ReprTag::Text, |_, d: &Decimal| Ok(d.to_string())),
    ]
}

/// Parse text into every numeric shape and `time`.
pub fn parsers() -> Vec<Caster> {
    vec![
        Caster::typed(ReprTag::Text, ReprTag::Int32, |edge, s: &String| {
            parse_integer::<i32>(edge, s, Value::Int32(i32::MIN), Value::Int32(i32::MAX))
        }),
        Caster::typed(ReprTag::Text, ReprTag::Int64, |edge, s: &String| {
            parse_integer::<i64>(edge, s, Value::Int64(i64::MIN), Value::Int64(i64::MAX))
        }),
        Caster::typed(ReprTag::Text, ReprTag::Float32, |edge, s: &String| {
            parse_float::<f32>(edge, s, Value::Float32(f32::MIN), Value::Float32(f32::MAX))
        }),
        Caster::typed(ReprTag::Text, ReprTag::Float64, |edge, s: &String| {
            parse_float::<f64>(edge, s, Value::Float64(f64::MIN), Value::Float64(f64::MAX))
        }),
        text_to_big_integer(),
        text_to_decimal(),
        text_to_time(),
    ]
}

/// `text -> bytes`: the UTF-8 encoding.
pub fn text_to_bytes() -> Caster {
    Caster::typed(ReprTag::Text, ReprTag::Bytes, |_, s: &String| Ok(s.clone().into_bytes()))
}

/// `text -> big_integer`: optional sign, then decimal digits.
pub fn text_to_big_integer() -> Caster {
    Caster::typed(ReprTag::Text, ReprTag::BigInteger, |edge, s: &String| {
        BigInt::from_str(s).map_err(|e| invalid(edge, s, e.to_string()))
    })
}

/// `text -> decimal`, exact.
pub fn text_to_decimal() -> Caster {
    Caster::typed(ReprTag::Text, ReprTag::Decimal, |edge, s: &String| {
        Decimal::from_str_exact(s).map_err(|e| {
            if exceeds_decimal(s) {
                ConversionError::out_of_bounds(
                    edge,
                    Value::Text(s.clone()),
                    Value::Decimal(Decimal::MIN),
                    Value::Decimal(Decimal::MAX),
                )
            } else {
                invalid(edge, s, e.to_string())
            }
        })
    })
}

/// Whether the integral part of `s` is a number beyond the decimal range.
fn exceeds_decimal(s: &str) -> bool {
    let whole = s.split_once('.').map_or(s, |(whole, _)| whole);
    BigInt::from_str(whole).is_ok_and(|n| {
        n.to_i128()
            .and_then(|wide| Decimal::try_from_i128_with_scale(wide, 0).ok())
            .is_none()
    })
}

/// `text -> time`: RFC 3339 UTC instants and `[-]<seconds>[.<fraction>]s`
/// durations.
pub fn text_to_time() -> Caster {
    Caster::typed(ReprTag::Text, ReprTag::Time, |edge, s: &String| {
        Time::parse(s).map_err(|e| match e {
            TimeParseError::OutOfRange(_) => ConversionError::out_of_bounds(
                edge,
                Value::Text(s.clone()),
                Value::Time(Time::MIN_RELATIVE),
                Value::Time(Time::MAX_RELATIVE),
            ),
            malformed @ TimeParseError::Malformed { .. } => invalid(edge, s, malformed.to_string()),
        })
    })
}

fn invalid(edge: EdgeKey, s: &str, reason: String) -> ConversionError {
    ConversionError::invalid_format(edge, Some(Value::Text(s.to_string())), reason)
}

fn parse_integer<N>(edge: EdgeKey, s: &str, min: Value, max: Value) -> Result<N, ConversionError>
where
    N: FromStr<Err = std::num::ParseIntError>,
{
    s.parse::<N>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            ConversionError::out_of_bounds(edge, Value::Text(s.to_string()), min, max)
        }
        _ => invalid(edge, s, e.to_string()),
    })
}

/// A float type parsed from text.
trait ParsedFloat: FromStr<Err = std::num::ParseFloatError> + Copy {
    fn is_infinite(self) -> bool;
}

impl ParsedFloat for f32 {
    fn is_infinite(self) -> bool {
        f32::is_infinite(self)
    }
}

impl ParsedFloat for f64 {
    fn is_infinite(self) -> bool {
        f64::is_infinite(self)
    }
}

fn parse_float<F: ParsedFloat>(
    edge: EdgeKey,
    s: &str,
    min: Value,
    max: Value,
) -> Result<F, ConversionError> {
    let v = s.parse::<F>().map_err(|e| invalid(edge, s, e.to_string()))?;
    if v.is_infinite() && !names_infinity(s) {
        return Err(ConversionError::out_of_bounds(edge, Value::Text(s.to_string()), min, max));
    }
    Ok(v)
}

fn names_infinity(s: &str) -> bool {
    let unsigned = s.trim_start_matches(['+', '-']);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}
