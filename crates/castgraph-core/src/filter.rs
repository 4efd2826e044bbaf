//! # Membership Filters
//!
//! A [`Filter`] decides whether a value is kept or discarded. Systems use a
//! `Filter<ValueDomain>` as their membership predicate: a domain the filter
//! discards is rejected at `add` time.

use serde::{Deserialize, Serialize};

use crate::domain::{DomainKind, ValueDomain};

/// Outcome of applying a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterState {
    /// The value passes.
    Kept,
    /// The value is rejected.
    Discarded,
}

impl FilterState {
    /// Whether the value passed.
    pub fn is_kept(self) -> bool {
        self == Self::Kept
    }
}

impl From<bool> for FilterState {
    fn from(keep: bool) -> Self {
        if keep {
            Self::Kept
        } else {
            Self::Discarded
        }
    }
}

/// A predicate over `T`.
pub trait Filter<T>: Send + Sync {
    /// Decide whether `value` is kept.
    fn filter(&self, value: &T) -> FilterState;

    /// Short description for diagnostics.
    fn describe(&self) -> String;
}

/// Keeps domains of exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindFilter(pub DomainKind);

impl Filter<ValueDomain> for KindFilter {
    fn filter(&self, domain: &ValueDomain) -> FilterState {
        FilterState::from(domain.kind() == self.0)
    }

    fn describe(&self) -> String {
        format!("{} domains only", self.0)
    }
}

/// Keeps every domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnyKind;

impl Filter<ValueDomain> for AnyKind {
    fn filter(&self, _: &ValueDomain) -> FilterState {
        FilterState::Kept
    }

    fn describe(&self) -> String {
        "any domain".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValueDomainBuilder;
    use crate::tag::ReprTag;
    use crate::value::Value;

    fn domain(kind: DomainKind) -> ValueDomain {
        ValueDomainBuilder::new("d", ReprTag::Text, Value::Text(String::new()))
            .kind(kind)
            .build()
            .unwrap()
    }

    #[test]
    fn test_kind_filter() {
        let primitive = KindFilter(DomainKind::Primitive);
        assert_eq!(primitive.filter(&domain(DomainKind::Primitive)), FilterState::Kept);
        assert_eq!(primitive.filter(&domain(DomainKind::Structured)), FilterState::Discarded);
        assert_eq!(primitive.describe(), "primitive domains only");
    }

    #[test]
    fn test_any_kind() {
        for &kind in DomainKind::all() {
            assert!(AnyKind.filter(&domain(kind)).is_kept());
        }
    }
}
