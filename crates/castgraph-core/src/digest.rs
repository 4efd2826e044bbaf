//! # Digest Values — Fixed-Width Hash Representations
//!
//! A `Digest` is a byte string whose width is fixed by its algorithm tag
//! (`md5` 16, `sha1` 20, `sha256` 32, `sha512` 64). Producing digests is the
//! job of an external hashing capability; this crate only carries them as
//! representations and converts between them and other shapes.
//!
//! ## Invariant
//!
//! `Digest::new()` is the only constructor, and deserialization goes through
//! it. Any byte string whose length differs from the algorithm width is
//! rejected. A `Digest` in hand always has the
//! right width for its tag.

use serde::{Deserialize, Serialize};

use crate::error::ConversionError;
use crate::tag::{EdgeKey, ReprTag};
use crate::value::Value;

/// A fixed-width digest with its algorithm tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Digest {
    algorithm: ReprTag,
    bytes: Vec<u8>,
}

// -- Validating Deserialize for Digest ----------------------------------------

#[derive(Deserialize)]
struct RawDigest {
    algorithm: ReprTag,
    bytes: Vec<u8>,
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawDigest::deserialize(deserializer)?;
        Self::new(raw.algorithm, raw.bytes).map_err(serde::de::Error::custom)
    }
}

impl Digest {
    /// Wrap raw digest bytes produced by `algorithm`.
    ///
    /// # Errors
    ///
    /// `InvalidFormat` (reported as a `bytes -> algorithm` cast) when
    /// `algorithm` is not a digest tag or the width does not match.
    pub fn new(algorithm: ReprTag, bytes: Vec<u8>) -> Result<Self, ConversionError> {
        let edge = EdgeKey::new(ReprTag::Bytes, algorithm);
        let Some(width) = algorithm.digest_width() else {
            return Err(ConversionError::invalid_format(
                edge,
                Some(Value::Bytes(bytes)),
                format!("{algorithm} is not a digest representation"),
            ));
        };
        if bytes.len() != width {
            let reason = format!("{algorithm} digest needs {width} bytes, got {}", bytes.len());
            return Err(ConversionError::invalid_format(edge, Some(Value::Bytes(bytes)), reason));
        }
        Ok(Self { algorithm, bytes })
    }

    /// The algorithm tag (`md5`, `sha1`, `sha256` or `sha512`).
    pub fn algorithm(&self) -> ReprTag {
        self.algorithm
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase hex rendering of the digest bytes.
    pub fn to_hex(&self) -> String {
        to_hex(&self.bytes)
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

/// Lowercase hex rendering of arbitrary bytes.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConversionErrorKind;

    #[test]
    fn test_new_accepts_exact_width() {
        for tag in ReprTag::digests() {
            let width = tag.digest_width().unwrap();
            let digest = Digest::new(*tag, vec![0xAB; width]).unwrap();
            assert_eq!(digest.algorithm(), *tag);
            assert_eq!(digest.as_bytes().len(), width);
        }
    }

    #[test]
    fn test_new_rejects_wrong_width() {
        let err = Digest::new(ReprTag::Sha256, vec![0; 31]).unwrap_err();
        assert!(matches!(err.kind, ConversionErrorKind::InvalidFormat { .. }));
        assert_eq!(err.to, ReprTag::Sha256);
    }

    #[test]
    fn test_new_rejects_non_digest_tag() {
        assert!(Digest::new(ReprTag::Int32, vec![0; 4]).is_err());
        assert!(Digest::new(ReprTag::Hash, vec![]).is_err());
    }

    #[test]
    fn test_deserialize_checks_width() {
        let json = r#"{"algorithm":"md5","bytes":[1,2,3]}"#;
        assert!(serde_json::from_str::<Digest>(json).is_err());

        let digest = Digest::new(ReprTag::Sha1, vec![7; 20]).unwrap();
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(serde_json::from_str::<Digest>(&json).unwrap(), digest);
    }

    #[test]
    fn test_deserialized_value_cannot_forge_a_digest() {
        let short = r#"{"tag":"digest","value":{"algorithm":"md5","bytes":[1,2,3]}}"#;
        assert!(serde_json::from_str::<Value>(short).is_err());

        let not_a_digest = r#"{"tag":"digest","value":{"algorithm":"int32","bytes":[0,0,0,0]}}"#;
        assert!(serde_json::from_str::<Value>(not_a_digest).is_err());
    }

    #[test]
    fn test_display() {
        let digest = Digest::new(ReprTag::Md5, (0u8..16).collect()).unwrap();
        assert_eq!(digest.to_string(), "md5:000102030405060708090a0b0c0d0e0f");
    }
}
