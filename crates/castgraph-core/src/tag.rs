//! # Representation Tags — Nodes of the Conversion Graph
//!
//! Defines the `ReprTag` enum: one variant per concrete storage shape a
//! value can take. Tags are the nodes of the conversion graph; every
//! conversion edge is keyed by a `(from, to)` pair of tags.
//!
//! ## Invariant
//!
//! The enum is closed. Adding a representation forces every exhaustive
//! `match` over tags (widths, names, parsing) to handle it at compile time,
//! so a new shape can never be silently missing from the catalogue.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ConversionError;

/// A concrete storage shape.
///
/// | Tag | Shape |
/// |-----|-------|
/// | `bytes` | Arbitrary byte string |
/// | `text` | UTF-8 string |
/// | `int32` / `int64` | Two's-complement signed integers |
/// | `float32` / `float64` | IEEE-754 floats |
/// | `big_integer` | Arbitrary-precision signed integer |
/// | `decimal` | 96-bit mantissa base-10 decimal |
/// | `number` | Abstract storage of the number domain |
/// | `hash` | Abstract storage of the hash domain |
/// | `md5` / `sha1` / `sha256` / `sha512` | 16 / 20 / 32 / 64-byte digests |
/// | `time` | Relative duration or absolute instant |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReprTag {
    /// Arbitrary byte string.
    Bytes,
    /// UTF-8 text.
    Text,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// IEEE-754 single precision float.
    Float32,
    /// IEEE-754 double precision float.
    Float64,
    /// Arbitrary-precision signed integer.
    BigInteger,
    /// Base-10 decimal with up to 28 significant digits.
    Decimal,
    /// Abstract number storage. Only the number domain's none value has it.
    Number,
    /// Abstract digest storage. Only the hash domain's none value has it.
    Hash,
    /// 16-byte MD5 digest.
    Md5,
    /// 20-byte SHA-1 digest.
    Sha1,
    /// 32-byte SHA-256 digest.
    Sha256,
    /// 64-byte SHA-512 digest.
    Sha512,
    /// Relative duration or absolute instant.
    Time,
}

/// Total number of representation tags.
pub const REPR_TAG_COUNT: usize = 15;

impl ReprTag {
    /// Returns every tag in canonical order.
    pub fn all() -> &'static [ReprTag] {
        &[
            Self::Bytes,
            Self::Text,
            Self::Int32,
            Self::Int64,
            Self::Float32,
            Self::Float64,
            Self::BigInteger,
            Self::Decimal,
            Self::Number,
            Self::Hash,
            Self::Md5,
            Self::Sha1,
            Self::Sha256,
            Self::Sha512,
            Self::Time,
        ]
    }

    /// The four fixed-width digest tags.
    pub fn digests() -> &'static [ReprTag] {
        &[Self::Md5, Self::Sha1, Self::Sha256, Self::Sha512]
    }

    /// The six concrete numeric tags accepted by the number domain.
    pub fn numerics() -> &'static [ReprTag] {
        &[
            Self::Decimal,
            Self::BigInteger,
            Self::Float64,
            Self::Float32,
            Self::Int32,
            Self::Int64,
        ]
    }

    /// Returns the snake_case identifier. Matches the serde form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bytes => "bytes",
            Self::Text => "text",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::BigInteger => "big_integer",
            Self::Decimal => "decimal",
            Self::Number => "number",
            Self::Hash => "hash",
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
            Self::Time => "time",
        }
    }

    /// Byte width of a digest tag, `None` for every other tag.
    pub fn digest_width(&self) -> Option<usize> {
        match self {
            Self::Md5 => Some(16),
            Self::Sha1 => Some(20),
            Self::Sha256 => Some(32),
            Self::Sha512 => Some(64),
            Self::Bytes
            | Self::Text
            | Self::Int32
            | Self::Int64
            | Self::Float32
            | Self::Float64
            | Self::BigInteger
            | Self::Decimal
            | Self::Number
            | Self::Hash
            | Self::Time => None,
        }
    }

    /// Whether this tag is one of the fixed-width digests.
    pub fn is_digest(&self) -> bool {
        self.digest_width().is_some()
    }

    /// Whether this tag only exists as the storage of an abstract domain.
    pub fn is_abstract(&self) -> bool {
        matches!(self, Self::Number | Self::Hash)
    }
}

impl std::fmt::Display for ReprTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReprTag {
    type Err = ConversionError;

    /// Parse a tag from its snake_case identifier. Case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| {
                ConversionError::invalid_format(
                    EdgeKey::new(Self::Text, Self::Text),
                    Some(crate::value::Value::Text(s.to_string())),
                    format!("unknown representation tag: {s:?}"),
                )
            })
    }
}

/// A directed `(from, to)` pair of tags. The key of every conversion edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    /// Source representation.
    pub from: ReprTag,
    /// Target representation.
    pub to: ReprTag,
}

impl EdgeKey {
    /// Create an edge key.
    pub fn new(from: ReprTag, to: ReprTag) -> Self {
        Self { from, to }
    }

    /// Whether the edge starts and ends at the same tag.
    pub fn is_loop(&self) -> bool {
        self.from == self.to
    }
}

impl std::fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_tags_count() {
        assert_eq!(ReprTag::all().len(), REPR_TAG_COUNT);
    }

    #[test]
    fn test_all_tags_unique() {
        let mut seen = std::collections::HashSet::new();
        for tag in ReprTag::all() {
            assert!(seen.insert(tag), "Duplicate tag: {tag}");
        }
    }

    #[test]
    fn test_as_str_roundtrip() {
        for tag in ReprTag::all() {
            let parsed: ReprTag = tag
                .as_str()
                .parse()
                .unwrap_or_else(|e| panic!("Failed to parse {tag}: {e}"));
            assert_eq!(*tag, parsed);
        }
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("Int32".parse::<ReprTag>().is_err());
        assert!("double".parse::<ReprTag>().is_err());
        assert!("".parse::<ReprTag>().is_err());
    }

    #[test]
    fn test_serde_format_matches_as_str() {
        for tag in ReprTag::all() {
            let json = serde_json::to_string(tag).unwrap();
            assert_eq!(json, format!("\"{}\"", tag.as_str()));
        }
    }

    #[test]
    fn test_digest_widths() {
        assert_eq!(ReprTag::Md5.digest_width(), Some(16));
        assert_eq!(ReprTag::Sha1.digest_width(), Some(20));
        assert_eq!(ReprTag::Sha256.digest_width(), Some(32));
        assert_eq!(ReprTag::Sha512.digest_width(), Some(64));
        assert_eq!(ReprTag::Hash.digest_width(), None);
        assert_eq!(ReprTag::digests().len(), 4);
        assert!(ReprTag::digests().iter().all(ReprTag::is_digest));
    }

    #[test]
    fn test_abstract_tags() {
        let abstract_tags: Vec<_> = ReprTag::all().iter().filter(|t| t.is_abstract()).collect();
        assert_eq!(abstract_tags, vec![&ReprTag::Number, &ReprTag::Hash]);
    }

    #[test]
    fn test_edge_key_display() {
        let key = EdgeKey::new(ReprTag::Decimal, ReprTag::Int32);
        assert_eq!(key.to_string(), "decimal -> int32");
        assert!(!key.is_loop());
        assert!(EdgeKey::new(ReprTag::Text, ReprTag::Text).is_loop());
    }
}
