//! # Error Types — Runtime Conversion Failures and Build-Time Defects
//!
//! Two families, both built with `thiserror`:
//!
//! - [`ConversionError`] is returned by `cast` / `resolve`. It is a value,
//!   never a panic, and carries enough evidence (both tags, the offending
//!   value, the delta or bounds) for the caller to retry with another
//!   target, substitute a default, or propagate.
//! - [`SystemValidationError`] is returned while sealing a domain or a
//!   system. A system that fails validation never comes into existence.
//!
//! The kinds are a closed enumeration. Every failure site picks one
//! variant and fills its evidence fields explicitly.

use thiserror::Error;

use crate::domain::DomainKind;
use crate::tag::{EdgeKey, ReprTag};
use crate::value::Value;

// ─── Runtime ─────────────────────────────────────────────────────────

/// What went wrong in a conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionErrorKind {
    /// The input does not have the shape the source tag requires.
    InvalidFormat {
        /// Human-readable description of the shape violation.
        reason: String,
    },

    /// The forward conversion succeeded but widening the result back did
    /// not reproduce the input.
    PrecisionLoss {
        /// `source - rewidened`, in the source representation.
        delta: Value,
    },

    /// The magnitude of the input exceeds the target's range.
    OutOfBounds {
        /// Smallest value of the target representation.
        min: Value,
        /// Largest value of the target representation.
        max: Value,
    },

    /// No conversion exists for the pair.
    Unsupported {
        /// Whether the pair was explicitly blocked rather than merely absent.
        blocked: bool,
    },
}

impl ConversionErrorKind {
    /// Short snake_case name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidFormat { .. } => "invalid_format",
            Self::PrecisionLoss { .. } => "precision_loss",
            Self::OutOfBounds { .. } => "out_of_bounds",
            Self::Unsupported { .. } => "unsupported",
        }
    }
}

impl std::fmt::Display for ConversionErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFormat { reason } => write!(f, "invalid format ({reason})"),
            Self::PrecisionLoss { delta } => write!(f, "precision loss (delta {delta})"),
            Self::OutOfBounds { min, max } => write!(f, "out of bounds [{min}, {max}]"),
            Self::Unsupported { blocked: true } => f.write_str("unsupported (blocked)"),
            Self::Unsupported { blocked: false } => f.write_str("unsupported"),
        }
    }
}

/// A failed conversion, with evidence.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("cannot convert {from} -> {to}: {kind}")]
pub struct ConversionError {
    /// What went wrong.
    pub kind: ConversionErrorKind,
    /// Source representation of the attempted conversion.
    pub from: ReprTag,
    /// Target representation of the attempted conversion.
    pub to: ReprTag,
    /// The offending input, when there was one.
    pub evidence: Option<Value>,
    /// The failing hop, when this conversion was composed from several.
    #[source]
    pub cause: Option<Box<ConversionError>>,
}

impl ConversionError {
    fn new(kind: ConversionErrorKind, edge: EdgeKey, evidence: Option<Value>) -> Self {
        Self {
            kind,
            from: edge.from,
            to: edge.to,
            evidence,
            cause: None,
        }
    }

    /// The input does not have the shape `edge.from` requires.
    pub fn invalid_format(
        edge: EdgeKey,
        evidence: Option<Value>,
        reason: impl Into<String>,
    ) -> Self {
        let kind = ConversionErrorKind::InvalidFormat {
            reason: reason.into(),
        };
        Self::new(kind, edge, evidence)
    }

    /// Narrowing `evidence` lost `delta`.
    pub fn precision_loss(edge: EdgeKey, evidence: Value, delta: Value) -> Self {
        Self::new(ConversionErrorKind::PrecisionLoss { delta }, edge, Some(evidence))
    }

    /// `evidence` lies outside `[min, max]` of the target.
    pub fn out_of_bounds(edge: EdgeKey, evidence: Value, min: Value, max: Value) -> Self {
        Self::new(ConversionErrorKind::OutOfBounds { min, max }, edge, Some(evidence))
    }

    /// No conversion exists for `edge`.
    pub fn unsupported(edge: EdgeKey, blocked: bool) -> Self {
        Self::new(ConversionErrorKind::Unsupported { blocked }, edge, None)
    }

    /// The pair this error is about.
    pub fn edge(&self) -> EdgeKey {
        EdgeKey::new(self.from, self.to)
    }

    /// Re-report a failing hop as a failure of the enclosing conversion.
    ///
    /// The kind (and so any delta or bounds) is kept; the pair and evidence
    /// become the outer ones; the hop is kept as `cause`.
    pub fn within(self, outer: EdgeKey, evidence: &Value) -> Self {
        Self {
            kind: self.kind.clone(),
            from: outer.from,
            to: outer.to,
            evidence: Some(evidence.clone()),
            cause: Some(Box::new(self)),
        }
    }

    /// Wrap for contract-style reporting on behalf of `plaintiff`.
    pub fn into_violation(self, plaintiff: impl Into<String>) -> Violation {
        Violation {
            plaintiff: plaintiff.into(),
            error: self,
        }
    }
}

/// A conversion failure reported against the party that demanded it.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{plaintiff}: {error}")]
pub struct Violation {
    /// Who demanded the conversion.
    pub plaintiff: String,
    /// The underlying failure.
    #[source]
    pub error: ConversionError,
}

// ─── Build time ──────────────────────────────────────────────────────

/// A defect found while sealing a domain or a system.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SystemValidationError {
    /// The same pair is both registered and blocked in one domain.
    #[error("domain {domain}: {edge} is both registered and blocked")]
    ContradictoryEdge {
        /// Domain being sealed.
        domain: String,
        /// The conflicting pair.
        edge: EdgeKey,
    },

    /// The same pair is registered twice in one domain.
    #[error("domain {domain}: {edge} is registered more than once")]
    DuplicateEdge {
        /// Domain being sealed.
        domain: String,
        /// The repeated pair.
        edge: EdgeKey,
    },

    /// An edge or block touches no tag the domain accepts.
    #[error("domain {domain}: {edge} touches no representation of the domain")]
    ForeignEdge {
        /// Domain being sealed.
        domain: String,
        /// The detached pair.
        edge: EdgeKey,
    },

    /// A chain function neither starts nor ends at its intermediate tag.
    #[error("domain {domain}: chain function {edge} does not pass through {via}")]
    DetachedChain {
        /// Domain being sealed.
        domain: String,
        /// Declared intermediate tag.
        via: ReprTag,
        /// The chain function's pair.
        edge: EdgeKey,
    },

    /// A chain function composes with no direct edge of the domain.
    #[error("domain {domain}: chain function {edge} via {via} composes with no registered edge")]
    UnresolvedChain {
        /// Domain being sealed.
        domain: String,
        /// Declared intermediate tag.
        via: ReprTag,
        /// The chain function's pair.
        edge: EdgeKey,
    },

    /// Two chains synthesize the same pair.
    #[error("domain {domain}: {edge} is reachable via both {first} and {second}")]
    AmbiguousChain {
        /// Domain being sealed.
        domain: String,
        /// The doubly-synthesized pair.
        edge: EdgeKey,
        /// First intermediate tag.
        first: ReprTag,
        /// Second intermediate tag.
        second: ReprTag,
    },

    /// The none value is not an instance of the storage tag.
    #[error("domain {domain}: none value has representation {actual}, storage is {expected}")]
    NoneValueMismatch {
        /// Domain being sealed.
        domain: String,
        /// Storage tag of the domain.
        expected: ReprTag,
        /// Tag of the supplied none value.
        actual: ReprTag,
    },

    /// The domain's kind does not satisfy the system requirement.
    #[error("domain {domain} of kind {kind} is not allowed in system {system}")]
    KindMismatch {
        /// System being built.
        system: String,
        /// Rejected domain.
        domain: String,
        /// Its kind.
        kind: DomainKind,
    },

    /// Two domains share a name.
    #[error("system {system}: duplicate domain name {domain}")]
    DuplicateDomain {
        /// System being built.
        system: String,
        /// The repeated name.
        domain: String,
    },

    /// A tag is stored or accepted by two domains.
    #[error("representation {tag} is owned by both {first} and {second}")]
    TagConflict {
        /// The contested tag.
        tag: ReprTag,
        /// Domain that claimed it first.
        first: String,
        /// Domain that claimed it second.
        second: String,
    },

    /// Two domains provide the same pair with equal precedence.
    #[error("{edge} is provided by both {first} and {second}")]
    AmbiguousEdge {
        /// The contested pair.
        edge: EdgeKey,
        /// One providing domain.
        first: String,
        /// The other providing domain.
        second: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn edge() -> EdgeKey {
        EdgeKey::new(ReprTag::Decimal, ReprTag::Int32)
    }

    #[test]
    fn test_precision_loss_display() {
        let err = ConversionError::precision_loss(edge(), Value::Float64(3.5), Value::Float64(0.5));
        let msg = err.to_string();
        assert!(msg.contains("decimal -> int32"));
        assert!(msg.contains("precision loss"));
        assert!(msg.contains("0.5"));
    }

    #[test]
    fn test_out_of_bounds_display() {
        let err = ConversionError::out_of_bounds(
            edge(),
            Value::Int64(1 << 40),
            Value::Int32(i32::MIN),
            Value::Int32(i32::MAX),
        );
        assert!(err.to_string().contains("[-2147483648, 2147483647]"));
        assert_eq!(err.kind.name(), "out_of_bounds");
    }

    #[test]
    fn test_unsupported_has_no_evidence() {
        let err = ConversionError::unsupported(edge(), true);
        assert!(err.evidence.is_none());
        assert!(err.to_string().contains("blocked"));
        assert_eq!(err.edge(), edge());
    }

    #[test]
    fn test_within_keeps_kind_and_cause() {
        let hop = ConversionError::precision_loss(
            EdgeKey::new(ReprTag::Text, ReprTag::Int32),
            Value::Text("x".into()),
            Value::Int32(1),
        );
        let outer = EdgeKey::new(ReprTag::Bytes, ReprTag::Int32);
        let err = hop.clone().within(outer, &Value::Bytes(vec![1]));
        assert_eq!(err.kind, hop.kind);
        assert_eq!(err.edge(), outer);
        assert_eq!(err.evidence, Some(Value::Bytes(vec![1])));
        assert_eq!(err.cause.as_deref(), Some(&hop));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_violation_wraps_error() {
        let violation = ConversionError::unsupported(edge(), false).into_violation("ledger");
        assert!(violation.to_string().starts_with("ledger: cannot convert"));
        assert!(violation.source().is_some());
    }

    #[test]
    fn test_validation_error_display() {
        let err = SystemValidationError::ContradictoryEdge {
            domain: "number".into(),
            edge: edge(),
        };
        let msg = err.to_string();
        assert!(msg.contains("number"));
        assert!(msg.contains("decimal -> int32"));
    }
}
