//! # Standard Primitive System
//!
//! Five primitive-kind domains covering every concrete representation:
//!
//! | domain | storage | accepts | none |
//! |--------|---------|---------|------|
//! | `binary` | `bytes` | | empty bytes |
//! | `hash` | `hash` | `md5`, `sha1`, `sha256`, `sha512` | `None(hash)` |
//! | `number` | `number` | the six numeric tags | `None(number)` |
//! | `text` | `text` | | empty text |
//! | `time` | `time` | | [`Time::NEVER`] |
//!
//! Each builder is exposed unsealed so callers can extend or restrict a
//! domain before assembling their own system. [`primitive_system`] seals
//! all five as they are.
//!
//! ## Chains
//!
//! - `binary` reaches `decimal` and `big_integer` through `text`.
//! - `hash` reaches `decimal` through `big_integer`.
//! - `number` carries `decimal -> bytes` and `big_integer -> bytes`
//!   composed through `text`. The fixed-width shapes have no text route to
//!   `bytes`; their only byte form is the little-endian slot of `binary`.

use crate::caster::Caster;
use crate::casts::{binary, digest, numeric, text, time};
use crate::domain::{DomainKind, ValueDomainBuilder};
use crate::error::SystemValidationError;
use crate::filter::KindFilter;
use crate::system::{DomainSystem, DomainSystemBuilder};
use crate::tag::ReprTag;
use crate::temporal::Time;
use crate::value::Value;

/// Name of the sealed standard system.
pub const PRIMITIVE_SYSTEM: &str = "primitive";

/// Names of the standard domains, in the order [`primitive_system`] adds them.
pub const DOMAIN_NAMES: [&str; 5] = ["binary", "hash", "number", "text", "time"];

/// `binary`: byte strings and the fixed binary layouts of every other shape.
pub fn binary_domain() -> ValueDomainBuilder {
    ValueDomainBuilder::new("binary", ReprTag::Bytes, Value::Bytes(Vec::new()))
        .kind(DomainKind::Primitive)
        .register_edges(binary::casters())
        .chain(ReprTag::Text, text::text_to_decimal())
        .chain(ReprTag::Text, text::text_to_big_integer())
}

/// `hash`: the four digest algorithms.
pub fn hash_domain() -> ValueDomainBuilder {
    let mut builder = ValueDomainBuilder::new("hash", ReprTag::Hash, Value::None(ReprTag::Hash))
        .kind(DomainKind::Primitive)
        .accept_tags(ReprTag::digests().iter().copied())
        .register_edges(digest::casters())
        .chain(ReprTag::BigInteger, numeric::big_integer_to_decimal());
    for &algorithm in ReprTag::digests() {
        for to in [
            ReprTag::Float64,
            ReprTag::Float32,
            ReprTag::Int32,
            ReprTag::Int64,
            ReprTag::Time,
        ] {
            builder = builder.block(algorithm, to);
        }
    }
    builder
}

/// `number`: the six numeric shapes and every conversion among them.
pub fn number_domain() -> ValueDomainBuilder {
    let mut builder =
        ValueDomainBuilder::new("number", ReprTag::Number, Value::None(ReprTag::Number))
            .kind(DomainKind::Primitive)
            .accept_tags(ReprTag::numerics().iter().copied())
            .register_edges(numeric::casters())
            .register_edges(text::renderers())
            .register_edges(unbounded_to_bytes());
    for &from in ReprTag::numerics() {
        builder = builder.block(from, ReprTag::Time);
    }
    builder
}

/// `decimal -> bytes` and `big_integer -> bytes` as their UTF-8 text.
fn unbounded_to_bytes() -> Vec<Caster> {
    let encode = text::text_to_bytes();
    text::renderers()
        .iter()
        .filter(|render| matches!(render.from(), ReprTag::Decimal | ReprTag::BigInteger))
        .filter_map(|render| render.then(&encode))
        .collect()
}

/// `text`: UTF-8 strings and every parse rule.
pub fn text_domain() -> ValueDomainBuilder {
    ValueDomainBuilder::new("text", ReprTag::Text, Value::Text(String::new()))
        .kind(DomainKind::Primitive)
        .register_edge(text::text_to_bytes())
        .register_edges(text::parsers())
}

/// `time`: relative durations and absolute instants.
pub fn time_domain() -> ValueDomainBuilder {
    let mut builder = ValueDomainBuilder::new("time", ReprTag::Time, Value::Time(Time::NEVER))
        .kind(DomainKind::Primitive)
        .register_edges(time::casters());
    for &to in ReprTag::numerics() {
        builder = builder.block(ReprTag::Time, to);
    }
    builder
}

/// The unsealed builder of the standard domain called `name`.
pub fn standard_domain(name: &str) -> Option<ValueDomainBuilder> {
    match name {
        "binary" => Some(binary_domain()),
        "hash" => Some(hash_domain()),
        "number" => Some(number_domain()),
        "text" => Some(text_domain()),
        "time" => Some(time_domain()),
        _ => None,
    }
}

/// A builder for a primitive-only system, not yet holding any domain.
pub fn primitive_builder(name: impl Into<String>) -> DomainSystemBuilder {
    DomainSystemBuilder::new(name, KindFilter(DomainKind::Primitive))
}

/// Seal the five standard domains into the `primitive` system.
///
/// # Errors
///
/// Never in practice; the standard domains are consistent. The error is
/// surfaced rather than hidden so the function stays panic-free.
pub fn primitive_system() -> Result<DomainSystem, SystemValidationError> {
    let mut system = primitive_builder(PRIMITIVE_SYSTEM);
    for domain in [
        binary_domain(),
        hash_domain(),
        number_domain(),
        text_domain(),
        time_domain(),
    ] {
        system = system.add(domain.build()?)?;
    }
    system.build()
}
