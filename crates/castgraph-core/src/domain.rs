//! # Value Domains — Storage, Accepted Representations, and Edges
//!
//! A [`ValueDomain`] is a named unit bundling a canonical storage tag, the
//! set of tags it accepts as instances, a sentinel "none" value, and the
//! conversion edges that start or end at its tags.
//!
//! Domains are assembled with a consuming [`ValueDomainBuilder`] and sealed
//! by [`ValueDomainBuilder::build`]. A sealed domain is immutable.
//!
//! ## Chains
//!
//! `chain(via, f)` declares a one-hop composition through `via`. At seal
//! time, against the domain's *direct* edges only:
//!
//! - `f: A -> via` composes with every direct `via -> C` into `A -> C`;
//! - `f: via -> B` composes every direct `C -> via` with `f` into `C -> B`.
//!
//! Synthesized edges are never chained again. A direct edge for the same
//! pair wins over a synthesized one; a blocked pair is never synthesized.
//!
//! ## Invariant
//!
//! After `build()` succeeds, no pair is both an edge and a block, every edge
//! and block touches an accepted tag, and the none value is an instance of
//! the storage tag.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::caster::Caster;
use crate::error::SystemValidationError;
use crate::tag::{EdgeKey, ReprTag};
use crate::value::Value;

/// The runtime kind of a domain, checked by a system's membership filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainKind {
    /// A single scalar representation family.
    Primitive,
    /// A domain composed from other domains.
    Structured,
}

impl DomainKind {
    /// Every kind.
    pub fn all() -> &'static [DomainKind] {
        &[Self::Primitive, Self::Structured]
    }

    /// The snake_case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primitive => "primitive",
            Self::Structured => "structured",
        }
    }
}

impl std::fmt::Display for DomainKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Builder ─────────────────────────────────────────────────────────

/// Builder for a [`ValueDomain`].
///
/// ```
/// use castgraph_core::{Caster, ReprTag, Value, ValueDomainBuilder};
///
/// let domain = ValueDomainBuilder::new("counter", ReprTag::Int64, Value::Int64(0))
///     .register_edge(Caster::typed(ReprTag::Int64, ReprTag::Text, |_, n: &i64| Ok(n.to_string())))
///     .block(ReprTag::Int64, ReprTag::Time)
///     .build()
///     .expect("valid domain");
///
/// assert_eq!(domain.edges().count(), 1);
/// ```
#[derive(Debug)]
pub struct ValueDomainBuilder {
    name: String,
    kind: DomainKind,
    storage: ReprTag,
    none: Value,
    accepted: BTreeSet<ReprTag>,
    edges: Vec<Caster>,
    chains: Vec<(ReprTag, Caster)>,
    blocks: Vec<EdgeKey>,
}

impl ValueDomainBuilder {
    /// Begin a primitive-kind domain storing `storage`, with sentinel `none`.
    pub fn new(name: impl Into<String>, storage: ReprTag, none: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            kind: DomainKind::Primitive,
            storage,
            none: none.into(),
            accepted: BTreeSet::from([storage]),
            edges: Vec::new(),
            chains: Vec::new(),
            blocks: Vec::new(),
        }
    }

    /// The name the domain will have.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the domain kind.
    pub fn kind(mut self, kind: DomainKind) -> Self {
        self.kind = kind;
        self
    }

    /// Declare an additional representation recognized as an instance.
    pub fn accept_tag(mut self, tag: ReprTag) -> Self {
        self.accepted.insert(tag);
        self
    }

    /// Declare several accepted representations.
    pub fn accept_tags(mut self, tags: impl IntoIterator<Item = ReprTag>) -> Self {
        self.accepted.extend(tags);
        self
    }

    /// Add a direct conversion.
    pub fn register_edge(mut self, caster: Caster) -> Self {
        self.edges.push(caster);
        self
    }

    /// Add several direct conversions.
    pub fn register_edges(mut self, casters: impl IntoIterator<Item = Caster>) -> Self {
        self.edges.extend(casters);
        self
    }

    /// Declare a one-hop chain through `via`; `caster` must start or end there.
    pub fn chain(mut self, via: ReprTag, caster: Caster) -> Self {
        self.chains.push((via, caster));
        self
    }

    /// Record that no conversion exists for `from -> to`.
    pub fn block(mut self, from: ReprTag, to: ReprTag) -> Self {
        self.blocks.push(EdgeKey::new(from, to));
        self
    }

    /// Drop a registered direct edge before sealing.
    pub fn remove_edge(mut self, from: ReprTag, to: ReprTag) -> Self {
        let edge = EdgeKey::new(from, to);
        self.edges.retain(|c| c.edge() != edge);
        self
    }

    /// Validate and seal.
    ///
    /// # Errors
    ///
    /// The first [`SystemValidationError`] found: a none value of the wrong
    /// tag, an edge or block touching no accepted tag, a duplicate edge, a
    /// pair both registered and blocked, or a chain that is detached,
    /// composes with nothing, or collides with another chain.
    pub fn build(self) -> Result<ValueDomain, SystemValidationError> {
        let name = self.name;
        if self.none.tag() != self.storage {
            return Err(SystemValidationError::NoneValueMismatch {
                domain: name,
                expected: self.storage,
                actual: self.none.tag(),
            });
        }

        let accepted = self.accepted;
        let touches = |edge: &EdgeKey| accepted.contains(&edge.from) || accepted.contains(&edge.to);

        let mut blocks = BTreeSet::new();
        for edge in self.blocks {
            if !touches(&edge) {
                return Err(SystemValidationError::ForeignEdge { domain: name, edge });
            }
            blocks.insert(edge);
        }

        let mut direct: BTreeMap<EdgeKey, Caster> = BTreeMap::new();
        for caster in self.edges {
            let edge = caster.edge();
            if !touches(&edge) {
                return Err(SystemValidationError::ForeignEdge { domain: name, edge });
            }
            if blocks.contains(&edge) {
                return Err(SystemValidationError::ContradictoryEdge { domain: name, edge });
            }
            if direct.insert(edge, caster).is_some() {
                return Err(SystemValidationError::DuplicateEdge { domain: name, edge });
            }
        }

        let chained = synthesize_chains(&name, &direct, &blocks, self.chains)?;
        let chained_count = chained.len();
        let mut edges = direct;
        edges.extend(chained);

        tracing::debug!(
            domain = %name,
            kind = %self.kind,
            storage = %self.storage,
            edges = edges.len(),
            chained = chained_count,
            blocks = blocks.len(),
            "value domain sealed"
        );

        Ok(ValueDomain {
            name,
            kind: self.kind,
            storage: self.storage,
            none: self.none,
            accepted,
            edges,
            blocks,
        })
    }
}

fn synthesize_chains(
    domain: &str,
    direct: &BTreeMap<EdgeKey, Caster>,
    blocks: &BTreeSet<EdgeKey>,
    chains: Vec<(ReprTag, Caster)>,
) -> Result<BTreeMap<EdgeKey, Caster>, SystemValidationError> {
    let mut synthesized: BTreeMap<EdgeKey, Caster> = BTreeMap::new();
    for (via, hop) in chains {
        let candidates: Vec<Caster> = if hop.to() == via {
            direct
                .values()
                .filter(|next| next.from() == via)
                .filter_map(|next| hop.then(next))
                .collect()
        } else if hop.from() == via {
            direct
                .values()
                .filter(|prev| prev.to() == via)
                .filter_map(|prev| prev.then(&hop))
                .collect()
        } else {
            return Err(SystemValidationError::DetachedChain {
                domain: domain.to_string(),
                via,
                edge: hop.edge(),
            });
        };
        if candidates.is_empty() {
            return Err(SystemValidationError::UnresolvedChain {
                domain: domain.to_string(),
                via,
                edge: hop.edge(),
            });
        }

        for caster in candidates {
            let edge = caster.edge();
            if edge.is_loop() {
                continue;
            }
            if direct.contains_key(&edge) {
                tracing::trace!(domain, %edge, %via, "direct edge shadows chain");
                continue;
            }
            if blocks.contains(&edge) {
                tracing::trace!(domain, %edge, %via, "blocked pair not chained");
                continue;
            }
            if let Some(existing) = synthesized.get(&edge) {
                return Err(SystemValidationError::AmbiguousChain {
                    domain: domain.to_string(),
                    edge,
                    first: existing.provenance().via().unwrap_or(via),
                    second: via,
                });
            }
            tracing::trace!(domain, %edge, %via, "chain synthesized");
            synthesized.insert(edge, caster);
        }
    }
    Ok(synthesized)
}

// ─── Sealed domain ───────────────────────────────────────────────────

/// A sealed, immutable value domain.
#[derive(Debug, Clone)]
pub struct ValueDomain {
    name: String,
    kind: DomainKind,
    storage: ReprTag,
    none: Value,
    accepted: BTreeSet<ReprTag>,
    edges: BTreeMap<EdgeKey, Caster>,
    blocks: BTreeSet<EdgeKey>,
}

impl ValueDomain {
    /// Unique name within a system.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runtime kind.
    pub fn kind(&self) -> DomainKind {
        self.kind
    }

    /// Canonical storage representation.
    pub fn storage(&self) -> ReprTag {
        self.storage
    }

    /// The sentinel "none" value, an instance of [`ValueDomain::storage`].
    pub fn none_value(&self) -> &Value {
        &self.none
    }

    /// Every accepted tag, storage included, in canonical order.
    pub fn accepted(&self) -> impl Iterator<Item = ReprTag> + '_ {
        self.accepted.iter().copied()
    }

    /// Whether `tag` is an accepted representation.
    pub fn accepts(&self, tag: ReprTag) -> bool {
        self.accepted.contains(&tag)
    }

    /// Every edge, direct and chained, ordered by pair.
    pub fn edges(&self) -> impl Iterator<Item = &Caster> + '_ {
        self.edges.values()
    }

    /// The edge for `edge`, if the domain provides one.
    pub fn edge(&self, edge: EdgeKey) -> Option<&Caster> {
        self.edges.get(&edge)
    }

    /// Edges leaving an accepted tag, keyed by `(own, target)`.
    pub fn from_edges(&self) -> impl Iterator<Item = &Caster> + '_ {
        self.edges.values().filter(|c| self.accepts(c.from()))
    }

    /// Edges arriving at an accepted tag, keyed by `(source, own)`.
    pub fn to_edges(&self) -> impl Iterator<Item = &Caster> + '_ {
        self.edges.values().filter(|c| self.accepts(c.to()))
    }

    /// Blocked pairs, ordered.
    pub fn blocks(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.blocks.iter().copied()
    }

    /// Whether `edge` is blocked by this domain.
    pub fn is_blocked(&self, edge: EdgeKey) -> bool {
        self.blocks.contains(&edge)
    }
}
