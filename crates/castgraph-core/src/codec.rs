//! # Byte Codec — Little-Endian Fixed-Width Slots
//!
//! Every binary representation in the crate goes through this module.
//! Byte index 0 holds the least-significant 8 bits:
//!
//! ```text
//! decode:  value = byte[0] | byte[1] << 8 | ... | byte[n-1] << 8(n-1)
//! encode:  byte[i] = (value >> 8i) & 0xFF
//! ```
//!
//! ## Invariant
//!
//! Decoding is a fold of `acc | (byte << 8·i)`, one byte per step. Shifts
//! and additions are never mixed in a single expression, so there is no
//! operator-precedence trap to fall into.
//!
//! Variable-width integer slots (1..=4 bytes for 32-bit, 1..=8 for 64-bit)
//! are unsigned and zero-extended: missing high-order bytes are zero. The
//! caller decides how to reinterpret the widened bits.

use thiserror::Error;

/// Width of the float slot and of a relative time slot.
pub const WORD_WIDTH: usize = 8;

/// Width of an absolute time slot (nanoseconds word, then seconds word).
pub const INSTANT_WIDTH: usize = 16;

/// Shape failure while decoding a slot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Zero bytes where at least one is needed.
    #[error("empty slot")]
    EmptySlot,

    /// More bytes than the slot can hold.
    #[error("{width}-byte input does not fit a {max}-byte slot")]
    SlotTooWide {
        /// Input width.
        width: usize,
        /// Slot capacity.
        max: usize,
    },

    /// A fixed-width slot received the wrong number of bytes.
    #[error("expected {expected} bytes, got {actual}")]
    WrongWidth {
        /// Required width.
        expected: String,
        /// Input width.
        actual: usize,
    },

    /// The nanoseconds word of an instant is a whole second or more.
    #[error("nanoseconds field {0} is not below one second")]
    NanosecondsOverflow(u64),
}

/// A decoded time slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSlot {
    /// 8-byte slot: signed nanoseconds.
    Relative(i64),
    /// 16-byte slot: seconds and sub-second nanoseconds.
    Absolute {
        /// Seconds since the epoch.
        seconds: i64,
        /// Nanoseconds, below 10^9.
        nanoseconds: u32,
    },
}

// ─── Integer slots ───────────────────────────────────────────────────

fn decode_slot(bytes: &[u8], max: usize) -> Result<u64, CodecError> {
    if bytes.is_empty() {
        return Err(CodecError::EmptySlot);
    }
    if bytes.len() > max {
        return Err(CodecError::SlotTooWide {
            width: bytes.len(),
            max,
        });
    }
    Ok(bytes
        .iter()
        .enumerate()
        .fold(0u64, |acc, (i, &byte)| acc | (u64::from(byte) << (8 * i))))
}

fn exact(bytes: &[u8], width: usize) -> Result<&[u8], CodecError> {
    if bytes.len() == width {
        Ok(bytes)
    } else {
        Err(CodecError::WrongWidth {
            expected: width.to_string(),
            actual: bytes.len(),
        })
    }
}

/// Decode a 1..=8 byte slot, zero-extended to 64 bits.
pub fn decode_u64(bytes: &[u8]) -> Result<u64, CodecError> {
    decode_slot(bytes, 8)
}

/// Decode a 1..=4 byte slot, zero-extended to 32 bits.
pub fn decode_u32(bytes: &[u8]) -> Result<u32, CodecError> {
    // At most four bytes were folded in, so the high half is zero.
    decode_slot(bytes, 4).map(|v| v as u32)
}

/// Encode the low `width` bytes of `value` (1..=8), least significant first.
///
/// Bytes beyond the width are dropped; callers that need the full value
/// pass `width = 8`. A zero width yields an empty vector.
pub fn encode_unsigned(value: u64, width: usize) -> Vec<u8> {
    (0..width.min(8))
        .map(|i| ((value >> (8 * i)) & 0xFF) as u8)
        .collect()
}

/// Encode all eight bytes of `value`.
pub fn encode_u64(value: u64) -> [u8; 8] {
    let mut out = [0u8; 8];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = ((value >> (8 * i)) & 0xFF) as u8;
    }
    out
}

/// Encode all four bytes of `value`.
pub fn encode_u32(value: u32) -> [u8; 4] {
    let mut out = [0u8; 4];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = ((value >> (8 * i)) & 0xFF) as u8;
    }
    out
}

// ─── Float slot ──────────────────────────────────────────────────────

/// Encode an IEEE-754 double into the 8-byte float slot.
pub fn encode_f64(value: f64) -> [u8; 8] {
    encode_u64(value.to_bits())
}

/// Decode the 8-byte float slot. Exactly eight bytes are required.
pub fn decode_f64(bytes: &[u8]) -> Result<f64, CodecError> {
    let bytes = exact(bytes, WORD_WIDTH)?;
    decode_u64(bytes).map(f64::from_bits)
}

// ─── Time slots ──────────────────────────────────────────────────────

/// Encode a relative duration: one 8-byte word of signed nanoseconds.
pub fn encode_duration(nanoseconds: i64) -> [u8; 8] {
    encode_u64(nanoseconds as u64)
}

/// Encode an absolute instant: nanoseconds word first, then seconds word.
pub fn encode_instant(seconds: i64, nanoseconds: u32) -> [u8; 16] {
    let mut out = [0u8; INSTANT_WIDTH];
    out[..WORD_WIDTH].copy_from_slice(&encode_u64(u64::from(nanoseconds)));
    out[WORD_WIDTH..].copy_from_slice(&encode_u64(seconds as u64));
    out
}

/// Decode a time slot: 8 bytes are a duration, 16 bytes an instant.
pub fn decode_time(bytes: &[u8]) -> Result<TimeSlot, CodecError> {
    match bytes.len() {
        WORD_WIDTH => decode_u64(bytes).map(|bits| TimeSlot::Relative(bits as i64)),
        INSTANT_WIDTH => {
            let (nanos_word, seconds_word) = bytes.split_at(WORD_WIDTH);
            let nanos = decode_u64(nanos_word)?;
            let seconds = decode_u64(seconds_word)? as i64;
            let nanoseconds = u32::try_from(nanos)
                .ok()
                .filter(|n| *n < 1_000_000_000)
                .ok_or(CodecError::NanosecondsOverflow(nanos))?;
            Ok(TimeSlot::Absolute {
                seconds,
                nanoseconds,
            })
        }
        actual => Err(CodecError::WrongWidth {
            expected: format!("{WORD_WIDTH} or {INSTANT_WIDTH}"),
            actual,
        }),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// decode(encode(v)) == v for every 64-bit value.
        #[test]
        fn u64_slot_symmetric(v in any::<u64>()) {
            prop_assert_eq!(decode_u64(&encode_u64(v)), Ok(v));
        }

        /// encode(decode(bytes)) == bytes for every 1..=8 byte slot.
        #[test]
        fn variable_slot_symmetric(bytes in prop::collection::vec(any::<u8>(), 1..=8)) {
            let v = decode_u64(&bytes).unwrap();
            prop_assert_eq!(encode_unsigned(v, bytes.len()), bytes);
        }

        /// encode(decode(bytes)) == bytes for every 1..=4 byte slot.
        #[test]
        fn u32_slot_symmetric(bytes in prop::collection::vec(any::<u8>(), 1..=4)) {
            let v = decode_u32(&bytes).unwrap();
            prop_assert_eq!(encode_unsigned(u64::from(v), bytes.len()), bytes);
        }

        /// The float slot preserves every bit pattern, NaN payloads included.
        #[test]
        fn f64_slot_symmetric(bits in any::<u64>()) {
            let v = f64::from_bits(bits);
            prop_assert_eq!(decode_f64(&encode_f64(v)).map(f64::to_bits), Ok(bits));
        }

        /// Both time slots are symmetric.
        #[test]
        fn time_slots_symmetric(nanos in any::<i64>(), secs in any::<i64>(), sub in 0u32..1_000_000_000) {
            prop_assert_eq!(decode_time(&encode_duration(nanos)), Ok(TimeSlot::Relative(nanos)));
            prop_assert_eq!(
                decode_time(&encode_instant(secs, sub)),
                Ok(TimeSlot::Absolute { seconds: secs, nanoseconds: sub })
            );
        }
    }
}
