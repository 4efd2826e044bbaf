//! # Time Values — Relative Durations and Absolute Instants
//!
//! `Time` has two shapes that mirror the binary layouts one-to-one:
//!
//! ```text
//! Relative  [ nanoseconds: i64 LE ]                          8 bytes
//! Absolute  [ nanoseconds: u64 LE ][ seconds: i64 LE ]      16 bytes
//! ```
//!
//! Absolute instants are seconds since the Unix epoch (UTC) plus a
//! sub-second nanosecond field that is always below 10^9.
//!
//! ## Text Form
//!
//! - Absolute: RFC 3339, UTC only, `Z` suffix, sub-seconds only when non-zero
//!   (`2026-01-15T12:00:00Z`, `2026-01-15T12:00:00.500Z`). Offsets other
//!   than `Z` are rejected so the text form of an instant is unique.
//! - Relative: signed seconds with an optional fraction and an `s` suffix
//!   (`90s`, `-1.5s`, `0.000000001s`).

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Nanoseconds in one second.
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// A relative duration or an absolute instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Time {
    /// A signed duration in nanoseconds.
    Relative {
        /// Total nanoseconds.
        nanoseconds: i64,
    },
    /// An instant since the Unix epoch, UTC.
    Absolute {
        /// Whole seconds since the epoch.
        seconds: i64,
        /// Sub-second nanoseconds, `0..1_000_000_000`.
        nanoseconds: u32,
    },
}

/// Failure to read a time value from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    /// The text is not a time in either accepted form.
    #[error("malformed time {input:?}: {reason}")]
    Malformed {
        /// The rejected text.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The text is a well-formed duration too long for 64-bit nanoseconds.
    #[error("duration {0:?} does not fit in 64-bit nanoseconds")]
    OutOfRange(String),
}

impl Time {
    /// The time domain's "never" sentinel: the earliest representable instant.
    pub const NEVER: Time = Time::Absolute {
        seconds: i64::MIN,
        nanoseconds: 0,
    };

    /// Longest relative duration.
    pub const MAX_RELATIVE: Time = Time::Relative {
        nanoseconds: i64::MAX,
    };

    /// Shortest (most negative) relative duration.
    pub const MIN_RELATIVE: Time = Time::Relative {
        nanoseconds: i64::MIN,
    };

    /// A relative duration of `nanoseconds`.
    pub fn relative(nanoseconds: i64) -> Self {
        Self::Relative { nanoseconds }
    }

    /// An absolute instant. `None` if `nanoseconds` is not below one second.
    pub fn absolute(seconds: i64, nanoseconds: u32) -> Option<Self> {
        (i64::from(nanoseconds) < NANOS_PER_SECOND).then_some(Self::Absolute {
            seconds,
            nanoseconds,
        })
    }

    /// An absolute instant from a chrono UTC datetime.
    ///
    /// Leap-second nanoseconds (>= 10^9) are clamped to the last nanosecond
    /// of the second.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self::Absolute {
            seconds: dt.timestamp(),
            nanoseconds: dt.timestamp_subsec_nanos().min(999_999_999),
        }
    }

    /// The current instant.
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// Whether this is a relative duration.
    pub fn is_relative(&self) -> bool {
        matches!(self, Self::Relative { .. })
    }

    /// Whether this is the `NEVER` sentinel.
    pub fn is_never(&self) -> bool {
        *self == Self::NEVER
    }

    /// The chrono datetime of an absolute instant.
    ///
    /// `None` for relative durations and for instants outside chrono's range.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match *self {
            Self::Relative { .. } => None,
            Self::Absolute {
                seconds,
                nanoseconds,
            } => DateTime::from_timestamp(seconds, nanoseconds),
        }
    }

    /// Render in the canonical text form.
    ///
    /// `None` when an absolute instant lies outside the calendar range
    /// chrono can format (this includes `NEVER`).
    pub fn render(&self) -> Option<String> {
        match *self {
            Self::Relative { nanoseconds } => Some(render_relative(nanoseconds)),
            Self::Absolute { .. } => self
                .to_utc()
                .map(|dt| dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        }
    }

    /// Parse either text form.
    ///
    /// # Errors
    ///
    /// `OutOfRange` for durations beyond 64-bit nanoseconds, `Malformed`
    /// for anything else that is not a time.
    pub fn parse(s: &str) -> Result<Self, TimeParseError> {
        if let Some(body) = s.strip_suffix('s') {
            return parse_relative(s, body);
        }
        if !s.ends_with('Z') {
            return Err(malformed(s, "absolute times must be UTC with a Z suffix"));
        }
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| malformed(s, &e.to_string()))?;
        Ok(Self::from_utc(dt.with_timezone(&Utc)))
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.render(), *self) {
            (Some(text), _) => f.write_str(&text),
            (None, Self::Absolute { seconds, nanoseconds }) => {
                write!(f, "@{seconds}.{nanoseconds:09}")
            }
            (None, Self::Relative { nanoseconds }) => write!(f, "{nanoseconds}ns"),
        }
    }
}

fn malformed(input: &str, reason: &str) -> TimeParseError {
    TimeParseError::Malformed {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

fn render_relative(nanoseconds: i64) -> String {
    let total = i128::from(nanoseconds);
    let sign = if total < 0 { "-" } else { "" };
    let magnitude = total.abs();
    let per_second = i128::from(NANOS_PER_SECOND);
    let (secs, frac) = (magnitude / per_second, magnitude % per_second);
    if frac == 0 {
        return format!("{sign}{secs}s");
    }
    let digits = format!("{frac:09}");
    format!("{sign}{secs}.{}s", digits.trim_end_matches('0'))
}

fn parse_relative(input: &str, body: &str) -> Result<Time, TimeParseError> {
    let (negative, unsigned) = match body.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, body),
    };
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (unsigned, ""),
    };
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) {
        return Err(malformed(input, "expected [-]<seconds>[.<fraction>]s"));
    }
    if unsigned.contains('.') && fraction.is_empty() {
        return Err(malformed(input, "empty fraction"));
    }
    if fraction.len() > 9 {
        return Err(malformed(input, "more than nanosecond precision"));
    }

    let out_of_range = || TimeParseError::OutOfRange(input.to_string());
    let secs: i128 = whole.parse().map_err(|_| out_of_range())?;
    let nanos: i128 = if fraction.is_empty() {
        0
    } else {
        format!("{fraction:0<9}").parse().map_err(|_| out_of_range())?
    };
    let magnitude = secs
        .checked_mul(i128::from(NANOS_PER_SECOND))
        .and_then(|n| n.checked_add(nanos))
        .ok_or_else(out_of_range)?;
    let total = if negative { -magnitude } else { magnitude };
    let nanoseconds = i64::try_from(total).map_err(|_| out_of_range())?;
    Ok(Time::Relative { nanoseconds })
}
