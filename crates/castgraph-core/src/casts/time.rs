//! # Time Conversions
//!
//! A relative time writes the 8-byte slot and an absolute time the 16-byte
//! slot, so `time -> bytes -> time` is exact for every value. Text uses the
//! forms documented on [`Time`]; an instant outside the calendar range chrono
//! can format (including [`Time::NEVER`]) has no text form.

use chrono::{DateTime, Utc};

use crate::caster::Caster;
use crate::codec;
use crate::error::ConversionError;
use crate::tag::ReprTag;
use crate::temporal::Time;
use crate::value::Value;

/// `time -> bytes` and `time -> text`.
pub fn casters() -> Vec<Caster> {
    vec![time_to_bytes(), time_to_text()]
}

/// `time -> bytes`.
pub fn time_to_bytes() -> Caster {
    Caster::typed(ReprTag::Time, ReprTag::Bytes, |_, t: &Time| {
        let bytes = match *t {
            Time::Relative { nanoseconds } => codec::encode_duration(nanoseconds).to_vec(),
            Time::Absolute {
                seconds,
                nanoseconds,
            } => codec::encode_instant(seconds, nanoseconds).to_vec(),
        };
        Ok(bytes)
    })
}

/// `time -> text`.
pub fn time_to_text() -> Caster {
    Caster::typed(ReprTag::Time, ReprTag::Text, |edge, t: &Time| {
        t.render().ok_or_else(|| {
            ConversionError::out_of_bounds(
                edge,
                Value::Time(*t),
                Value::Time(Time::from_utc(DateTime::<Utc>::MIN_UTC)),
                Value::Time(Time::from_utc(DateTime::<Utc>::MAX_UTC)),
            )
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConversionErrorKind;

    #[test]
    fn test_relative_writes_eight_bytes() {
        let Ok(Value::Bytes(bytes)) = time_to_bytes().cast(&Value::Time(Time::relative(1))) else {
            panic!("relative as bytes");
        };
        assert_eq!(bytes, vec![1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_absolute_writes_nanoseconds_first() {
        let time = Time::absolute(2, 1).unwrap();
        let Ok(Value::Bytes(bytes)) = time_to_bytes().cast(&Value::Time(time)) else {
            panic!("absolute as bytes");
        };
        assert_eq!(bytes.len(), 16);
        assert_eq!(bytes[0], 1);
        assert_eq!(bytes[8], 2);
    }

    #[test]
    fn test_text() {
        assert_eq!(
            time_to_text().cast(&Value::Time(Time::relative(-1_500_000_000))),
            Ok(Value::Text("-1.5s".into()))
        );
        assert_eq!(
            time_to_text().cast(&Value::Time(Time::absolute(0, 0).unwrap())),
            Ok(Value::Text("1970-01-01T00:00:00Z".into()))
        );
    }

    #[test]
    fn test_never_has_no_text() {
        let err = time_to_text().cast(&Value::Time(Time::NEVER)).unwrap_err();
        assert!(matches!(err.kind, ConversionErrorKind::OutOfBounds { .. }));
    }
}
