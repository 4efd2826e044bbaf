//! # Conversion Functions
//!
//! A [`Caster`] is a pure, stateless function from one representation to
//! another, typed by its `(from, to)` edge. Casters are built once, are
//! cheap to clone (the function is behind an `Arc`), and are safe to call
//! from any number of threads.
//!
//! Composition ([`Caster::then`]) is how chains are synthesized: the
//! composed caster reports a failing hop under its own pair, keeping the
//! hop's error as the cause.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ConversionError;
use crate::tag::{EdgeKey, ReprTag};
use crate::value::{Representation, Value};

type CastFn = dyn Fn(&Value) -> Result<Value, ConversionError> + Send + Sync;

/// How an edge came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "provenance", rename_all = "snake_case")]
pub enum Provenance {
    /// Registered directly.
    Direct,
    /// Synthesized by composing two edges through `via`.
    Chained {
        /// The intermediate representation.
        via: ReprTag,
    },
    /// The identity on a single tag.
    Identity,
}

impl Provenance {
    /// The intermediate tag of a chained edge.
    pub fn via(&self) -> Option<ReprTag> {
        match self {
            Self::Chained { via } => Some(*via),
            Self::Direct | Self::Identity => None,
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => f.write_str("direct"),
            Self::Chained { via } => write!(f, "chained via {via}"),
            Self::Identity => f.write_str("identity"),
        }
    }
}

/// A conversion function bound to one edge.
#[derive(Clone)]
pub struct Caster {
    edge: EdgeKey,
    provenance: Provenance,
    func: Arc<CastFn>,
}

impl Caster {
    /// A direct caster over untyped values.
    ///
    /// `func` only ever sees values whose tag is `from`.
    pub fn new<F>(from: ReprTag, to: ReprTag, func: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, ConversionError> + Send + Sync + 'static,
    {
        Self {
            edge: EdgeKey::new(from, to),
            provenance: Provenance::Direct,
            func: Arc::new(func),
        }
    }

    /// A direct caster over a typed payload.
    ///
    /// The payload is extracted from the value before `func` runs; a value
    /// holding another shape is `InvalidFormat`.
    pub fn typed<S, T, F>(from: ReprTag, to: ReprTag, func: F) -> Self
    where
        S: Representation + 'static,
        T: Into<Value>,
        F: Fn(EdgeKey, &S) -> Result<T, ConversionError> + Send + Sync + 'static,
    {
        let edge = EdgeKey::new(from, to);
        Self::new(from, to, move |value| {
            let payload = S::extract(value).ok_or_else(|| {
                ConversionError::invalid_format(
                    edge,
                    Some(value.clone()),
                    format!("payload is not a {from} value"),
                )
            })?;
            func(edge, payload).map(Into::into)
        })
    }

    /// The identity on `tag`.
    pub fn identity(tag: ReprTag) -> Self {
        Self {
            edge: EdgeKey::new(tag, tag),
            provenance: Provenance::Identity,
            func: Arc::new(|value| Ok(value.clone())),
        }
    }

    /// The edge this caster implements.
    pub fn edge(&self) -> EdgeKey {
        self.edge
    }

    /// Source representation.
    pub fn from(&self) -> ReprTag {
        self.edge.from
    }

    /// Target representation.
    pub fn to(&self) -> ReprTag {
        self.edge.to
    }

    /// How this caster came to exist.
    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Convert `value`.
    ///
    /// # Errors
    ///
    /// `InvalidFormat` if `value` is not an instance of [`Caster::from`];
    /// otherwise whatever the conversion rule reports.
    pub fn cast(&self, value: &Value) -> Result<Value, ConversionError> {
        let actual = value.tag();
        if actual != self.edge.from {
            return Err(ConversionError::invalid_format(
                self.edge,
                Some(value.clone()),
                format!("expected a {} value, got {actual}", self.edge.from),
            ));
        }
        (self.func)(value)
    }

    /// Compose `self` then `next` into one caster `self.from -> next.to`.
    ///
    /// Returns `None` unless `self.to == next.from`. The result is marked
    /// as chained via the shared tag.
    pub fn then(&self, next: &Caster) -> Option<Caster> {
        if self.edge.to != next.edge.from {
            return None;
        }
        let edge = EdgeKey::new(self.edge.from, next.edge.to);
        let (first, second) = (self.clone(), next.clone());
        Some(Self {
            edge,
            provenance: Provenance::Chained { via: self.edge.to },
            func: Arc::new(move |value| {
                let mid = first.cast(value).map_err(|e| e.within(edge, value))?;
                second.cast(&mid).map_err(|e| e.within(edge, value))
            }),
        })
    }
}

impl std::fmt::Debug for Caster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Caster")
            .field("edge", &self.edge)
            .field("provenance", &self.provenance)
            .finish_non_exhaustive()
    }
}
