//! # Domain Systems — Assembly, Validation, and Resolution
//!
//! A [`DomainSystemBuilder`] collects sealed [`ValueDomain`]s during a
//! single-threaded startup phase. [`DomainSystemBuilder::build`] cross-checks
//! them and flattens every edge into one index. The resulting
//! [`DomainSystem`] is immutable, `Send + Sync`, and answers every lookup
//! with a single hash probe.
//!
//! ## Resolution Order
//!
//! `resolve(from, to)`:
//!
//! 1. a block on the exact pair (any domain's, or a system policy block)
//!    returns `Unsupported { blocked: true }`;
//! 2. a direct edge;
//! 3. a chained edge;
//! 4. the identity, when `from == to` and a domain owns the tag;
//! 5. otherwise `Unsupported { blocked: false }`.
//!
//! Steps 2 to 4 are settled once at build time: when two domains provide
//! the same pair, the direct edge wins over the chained one and equal
//! provenance fails the build. The index therefore does not depend on the
//! order domains were added.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::caster::{Caster, Provenance};
use crate::domain::{ValueDomain, ValueDomainBuilder};
use crate::error::{ConversionError, SystemValidationError};
use crate::filter::Filter;
use crate::tag::{EdgeKey, ReprTag};
use crate::value::Value;

/// How a pair resolves, without casting anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "resolution", rename_all = "snake_case")]
pub enum Resolution {
    /// A registered edge.
    Direct,
    /// A one-hop chain through `via`.
    Chained {
        /// The intermediate representation.
        via: ReprTag,
    },
    /// The pair is explicitly blocked.
    Blocked,
    /// `from == to` on an owned tag.
    Identity,
    /// Nothing is registered for the pair.
    Unsupported,
}

impl Resolution {
    /// Whether a conversion exists.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Blocked | Self::Unsupported)
    }
}

impl From<Provenance> for Resolution {
    fn from(provenance: Provenance) -> Self {
        match provenance {
            Provenance::Direct => Self::Direct,
            Provenance::Chained { via } => Self::Chained { via },
            Provenance::Identity => Self::Identity,
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => f.write_str("direct"),
            Self::Chained { via } => write!(f, "chained via {via}"),
            Self::Blocked => f.write_str("blocked"),
            Self::Identity => f.write_str("identity"),
            Self::Unsupported => f.write_str("unsupported"),
        }
    }
}

// ─── Builder ─────────────────────────────────────────────────────────

/// Assembles sealed domains into a [`DomainSystem`].
pub struct DomainSystemBuilder {
    name: String,
    requirement: Box<dyn Filter<ValueDomain>>,
    domains: Vec<ValueDomain>,
    owners: BTreeMap<ReprTag, String>,
    blocks: BTreeSet<EdgeKey>,
}

impl DomainSystemBuilder {
    /// Begin a system whose members must pass `requirement`.
    pub fn new(name: impl Into<String>, requirement: impl Filter<ValueDomain> + 'static) -> Self {
        Self {
            name: name.into(),
            requirement: Box::new(requirement),
            domains: Vec::new(),
            owners: BTreeMap::new(),
            blocks: BTreeSet::new(),
        }
    }

    /// Begin a new domain. Seal it and pass it to [`DomainSystemBuilder::add`].
    pub fn prepare(
        &self,
        name: impl Into<String>,
        storage: ReprTag,
        none: impl Into<Value>,
    ) -> ValueDomainBuilder {
        ValueDomainBuilder::new(name, storage, none)
    }

    /// Insert a sealed domain.
    ///
    /// # Errors
    ///
    /// [`SystemValidationError::KindMismatch`] if the membership filter
    /// discards the domain, [`SystemValidationError::DuplicateDomain`] if
    /// the name is taken, [`SystemValidationError::TagConflict`] if another
    /// domain already owns one of its accepted tags.
    pub fn add(mut self, domain: ValueDomain) -> Result<Self, SystemValidationError> {
        if !self.requirement.filter(&domain).is_kept() {
            return Err(SystemValidationError::KindMismatch {
                system: self.name,
                domain: domain.name().to_string(),
                kind: domain.kind(),
            });
        }
        if self.domains.iter().any(|d| d.name() == domain.name()) {
            return Err(SystemValidationError::DuplicateDomain {
                system: self.name,
                domain: domain.name().to_string(),
            });
        }
        for tag in domain.accepted() {
            if let Some(owner) = self.owners.get(&tag) {
                return Err(SystemValidationError::TagConflict {
                    tag,
                    first: owner.clone(),
                    second: domain.name().to_string(),
                });
            }
        }
        for tag in domain.accepted() {
            self.owners.insert(tag, domain.name().to_string());
        }
        self.domains.push(domain);
        Ok(self)
    }

    /// Block `from -> to` across the whole system, on top of every domain.
    pub fn block(mut self, from: ReprTag, to: ReprTag) -> Self {
        self.blocks.insert(EdgeKey::new(from, to));
        self
    }

    /// Cross-validate and seal.
    ///
    /// # Errors
    ///
    /// [`SystemValidationError::AmbiguousEdge`] when two domains provide the
    /// same pair with equal provenance.
    pub fn build(self) -> Result<DomainSystem, SystemValidationError> {
        let mut order: Vec<usize> = (0..self.domains.len()).collect();
        order.sort_by(|&a, &b| self.domains[a].name().cmp(self.domains[b].name()));

        let mut blocks = self.blocks;
        let mut index: HashMap<EdgeKey, (usize, Caster)> = HashMap::new();
        for &position in &order {
            let domain = &self.domains[position];
            blocks.extend(domain.blocks());
            for caster in domain.edges() {
                let edge = caster.edge();
                let Some((holder, existing)) = index.get(&edge) else {
                    index.insert(edge, (position, caster.clone()));
                    continue;
                };
                match (existing.provenance(), caster.provenance()) {
                    (Provenance::Direct, Provenance::Chained { .. }) => {
                        tracing::trace!(%edge, shadowed = domain.name(), "direct edge wins");
                    }
                    (Provenance::Chained { .. }, Provenance::Direct) => {
                        tracing::trace!(%edge, shadowed = self.domains[*holder].name(), "direct edge wins");
                        index.insert(edge, (position, caster.clone()));
                    }
                    _ => {
                        return Err(SystemValidationError::AmbiguousEdge {
                            edge,
                            first: self.domains[*holder].name().to_string(),
                            second: domain.name().to_string(),
                        });
                    }
                }
            }
        }

        let mut owners = BTreeMap::new();
        for (position, domain) in self.domains.iter().enumerate() {
            for tag in domain.accepted() {
                owners.insert(tag, position);
                index
                    .entry(EdgeKey::new(tag, tag))
                    .or_insert_with(|| (position, Caster::identity(tag)));
            }
        }

        let index: HashMap<EdgeKey, Caster> = index
            .into_iter()
            .map(|(edge, (_, caster))| (edge, caster))
            .collect();

        tracing::debug!(
            system = %self.name,
            requirement = %self.requirement.describe(),
            domains = self.domains.len(),
            edges = index.len(),
            blocks = blocks.len(),
            "domain system sealed"
        );

        Ok(DomainSystem {
            name: self.name,
            requirement: self.requirement.describe(),
            domains: self.domains,
            owners,
            index,
            blocks,
        })
    }
}

impl std::fmt::Debug for DomainSystemBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainSystemBuilder")
            .field("name", &self.name)
            .field("requirement", &self.requirement.describe())
            .field("domains", &self.domains.len())
            .field("blocks", &self.blocks)
            .finish()
    }
}

// ─── Sealed system ───────────────────────────────────────────────────

/// A sealed, immutable set of value domains with a flat edge index.
#[derive(Debug, Clone)]
pub struct DomainSystem {
    name: String,
    requirement: String,
    domains: Vec<ValueDomain>,
    owners: BTreeMap<ReprTag, usize>,
    index: HashMap<EdgeKey, Caster>,
    blocks: BTreeSet<EdgeKey>,
}

impl DomainSystem {
    /// System name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description of the membership requirement.
    pub fn requirement(&self) -> &str {
        &self.requirement
    }

    /// The conversion for `from -> to`.
    ///
    /// # Errors
    ///
    /// `Unsupported` when the pair is blocked or nothing provides it.
    pub fn resolve(&self, from: ReprTag, to: ReprTag) -> Result<&Caster, ConversionError> {
        let edge = EdgeKey::new(from, to);
        if self.blocks.contains(&edge) {
            return Err(ConversionError::unsupported(edge, true));
        }
        self.index
            .get(&edge)
            .ok_or_else(|| ConversionError::unsupported(edge, false))
    }

    /// How `from -> to` resolves.
    pub fn resolution(&self, from: ReprTag, to: ReprTag) -> Resolution {
        let edge = EdgeKey::new(from, to);
        if self.blocks.contains(&edge) {
            return Resolution::Blocked;
        }
        self.index
            .get(&edge)
            .map_or(Resolution::Unsupported, |c| c.provenance().into())
    }

    /// Convert `value` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// `InvalidFormat` if `value` is not a `from` value; `Unsupported` if
    /// the pair does not resolve; otherwise the conversion's own failure.
    pub fn convert(&self, from: ReprTag, to: ReprTag, value: &Value) -> Result<Value, ConversionError> {
        let actual = value.tag();
        if actual != from {
            return Err(ConversionError::invalid_format(
                EdgeKey::new(from, to),
                Some(value.clone()),
                format!("expected a {from} value, got {actual}"),
            ));
        }
        self.resolve(from, to)?.cast(value)
    }

    /// Convert `value` to `to`, taking the source tag from the value.
    ///
    /// # Errors
    ///
    /// As [`DomainSystem::convert`].
    pub fn cast(&self, to: ReprTag, value: &Value) -> Result<Value, ConversionError> {
        self.convert(value.tag(), to, value)
    }

    /// The domain called `name`.
    pub fn domain(&self, name: &str) -> Option<&ValueDomain> {
        self.domains.iter().find(|d| d.name() == name)
    }

    /// The domain that owns `tag`.
    pub fn domain_of(&self, tag: ReprTag) -> Option<&ValueDomain> {
        self.owners.get(&tag).map(|&i| &self.domains[i])
    }

    /// Domains in the order they were added.
    pub fn domains(&self) -> impl Iterator<Item = &ValueDomain> + '_ {
        self.domains.iter()
    }

    /// Every resolvable edge, identities included, ordered by pair.
    ///
    /// Blocked pairs are left out.
    pub fn edges(&self) -> Vec<&Caster> {
        let mut edges: Vec<&Caster> = self
            .index
            .values()
            .filter(|c| !self.blocks.contains(&c.edge()))
            .collect();
        edges.sort_by_key(|c| c.edge());
        edges
    }

    /// Every blocked pair, ordered.
    pub fn blocks(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.blocks.iter().copied()
    }
}
