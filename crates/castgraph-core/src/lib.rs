#![deny(missing_docs)]

//! # castgraph-core — Value Domains and Their Conversion Graph
//!
//! A registry of conversions between concrete value representations
//! (byte strings, integers, floats, arbitrary-precision numbers, decimals,
//! digests, text, time). Representations are the nodes of a directed graph;
//! each edge is a [`Caster`] that either converts exactly or fails with a
//! structured [`ConversionError`].
//!
//! ## Layers
//!
//! 1. **Representations.** [`ReprTag`] names each shape; [`Value`] carries
//!    one. [`codec`] fixes the little-endian binary layouts.
//! 2. **Conversions.** [`casts`] holds every rule. Numeric narrowing goes
//!    through [`precision`]: NaN rejection, bounds, then a round trip that
//!    must reproduce the input.
//! 3. **Domains.** A [`ValueDomainBuilder`] groups the edges of one family
//!    of representations, declares blocks and one-hop chains, and seals
//!    into an immutable [`ValueDomain`].
//! 4. **Systems.** A [`DomainSystemBuilder`] admits domains through a
//!    [`Filter`], cross-checks them, and seals a [`DomainSystem`] whose
//!    [`resolve`](DomainSystem::resolve) is a single lookup.
//!
//! [`primitive_system`] assembles the five standard domains.
//!
//! ## Example
//!
//! ```
//! use castgraph_core::{primitive_system, ReprTag, Value};
//!
//! let system = primitive_system()?;
//! let n = system.convert(ReprTag::Bytes, ReprTag::Int32, &Value::Bytes(vec![0x2A, 0, 0, 0]))?;
//! assert_eq!(n, Value::Int32(42));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Invariant
//!
//! Sealed domains and systems are immutable and `Send + Sync`. All
//! validation happens while sealing; a system that exists is consistent,
//! and resolving or casting never panics and never logs.

pub mod caster;
pub mod casts;
pub mod codec;
pub mod digest;
pub mod domain;
pub mod error;
pub mod filter;
pub mod precision;
pub mod primitive;
pub mod system;
pub mod tag;
pub mod temporal;
pub mod value;

// Re-export primary types at crate root for ergonomic imports.
pub use caster::{Caster, Provenance};
pub use codec::{CodecError, TimeSlot};
pub use digest::Digest;
pub use domain::{DomainKind, ValueDomain, ValueDomainBuilder};
pub use error::{ConversionError, ConversionErrorKind, SystemValidationError, Violation};
pub use filter::{AnyKind, Filter, FilterState, KindFilter};
pub use primitive::{primitive_builder, primitive_system, standard_domain};
pub use system::{DomainSystem, DomainSystemBuilder, Resolution};
pub use tag::{EdgeKey, ReprTag};
pub use temporal::{Time, TimeParseError};
pub use value::{Representation, Value};
