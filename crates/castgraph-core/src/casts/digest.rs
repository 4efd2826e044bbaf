//! # Digest Conversions
//!
//! Digests leave the hash domain only as their raw bytes, as an unsigned
//! big-endian integer, or as lowercase hex text. Nothing converts into a
//! digest except `bytes` of the exact width ([`super::binary`]).

use num_bigint::{BigInt, BigUint};

use crate::caster::Caster;
use crate::digest::Digest;
use crate::tag::ReprTag;

/// `<digest> -> bytes`, `<digest> -> big_integer` and `<digest> -> text`
/// for each of the four digest tags.
pub fn casters() -> Vec<Caster> {
    ReprTag::digests()
        .iter()
        .flat_map(|&tag| [to_bytes(tag), to_big_integer(tag), to_text(tag)])
        .collect()
}

/// The raw digest bytes.
pub fn to_bytes(algorithm: ReprTag) -> Caster {
    Caster::typed(algorithm, ReprTag::Bytes, |_, d: &Digest| Ok(d.as_bytes().to_vec()))
}

/// The digest read as an unsigned big-endian integer.
pub fn to_big_integer(algorithm: ReprTag) -> Caster {
    Caster::typed(algorithm, ReprTag::BigInteger, |_, d: &Digest| {
        Ok(BigInt::from(BigUint::from_bytes_be(d.as_bytes())))
    })
}

/// Lowercase hex.
pub fn to_text(algorithm: ReprTag) -> Caster {
    Caster::typed(algorithm, ReprTag::Text, |_, d: &Digest| Ok(d.to_hex()))
}
