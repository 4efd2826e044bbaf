//! # System Profiles
//!
//! A profile selects which standard domains a system holds and adds
//! system-wide policy blocks:
//!
//! ```yaml
//! domains: [number, text]      # empty or absent means all five
//! blocked:
//!   - { from: float64, to: int32 }
//! ```
//!
//! Unknown domain names and unknown tags are errors, as are unknown keys.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use castgraph_core::primitive::{self, DOMAIN_NAMES, PRIMITIVE_SYSTEM};
use castgraph_core::{DomainSystem, EdgeKey};

/// Parsed profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    /// Standard domains to include, by name.
    #[serde(default)]
    pub domains: Vec<String>,
    /// Extra system-wide blocks.
    #[serde(default)]
    pub blocked: Vec<EdgeKey>,
}

impl Profile {
    /// Parse a profile from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("failed to parse profile YAML")
    }

    /// Read and parse a profile file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read profile: {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("invalid profile: {}", path.display()))
    }

    /// Domain names this profile selects, in the order given.
    pub fn domain_names(&self) -> Vec<&str> {
        if self.domains.is_empty() {
            DOMAIN_NAMES.to_vec()
        } else {
            self.domains.iter().map(String::as_str).collect()
        }
    }

    /// Seal the selected standard domains and the extra blocks.
    pub fn build_system(&self) -> Result<DomainSystem> {
        let mut builder = primitive::primitive_builder(PRIMITIVE_SYSTEM);
        for name in self.domain_names() {
            let Some(domain) = primitive::standard_domain(name) else {
                bail!(
                    "unknown domain {name:?} (expected one of: {})",
                    DOMAIN_NAMES.join(", ")
                );
            };
            let domain = domain
                .build()
                .with_context(|| format!("failed to seal domain {name}"))?;
            builder = builder.add(domain)?;
        }
        for edge in &self.blocked {
            builder = builder.block(edge.from, edge.to);
        }
        tracing::debug!(
            domains = ?self.domain_names(),
            blocked = self.blocked.len(),
            "building system from profile"
        );
        Ok(builder.build()?)
    }
}

/// The system described by `path`, or the full standard system.
pub fn load_system(path: Option<&Path>) -> Result<DomainSystem> {
    match path {
        Some(path) => Profile::load(path)?.build_system(),
        None => Ok(primitive::primitive_system()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use castgraph_core::{ReprTag, Resolution};

    #[test]
    fn test_empty_profile_selects_all_domains() {
        let profile = Profile::from_yaml("{}").unwrap();
        assert_eq!(profile, Profile::default());
        assert_eq!(profile.domain_names(), DOMAIN_NAMES.to_vec());
        let system = profile.build_system().unwrap();
        assert_eq!(system.domains().count(), 5);
    }

    #[test]
    fn test_subset_and_blocks() {
        let profile = Profile::from_yaml(
            "domains: [number, text]\nblocked:\n  - { from: float64, to: int32 }\n",
        )
        .unwrap();
        let system = profile.build_system().unwrap();
        assert!(system.domain("binary").is_none());
        assert_eq!(
            system.resolution(ReprTag::Float64, ReprTag::Int32),
            Resolution::Blocked
        );
        assert_eq!(
            system.resolution(ReprTag::Text, ReprTag::Int32),
            Resolution::Direct
        );
    }

    #[test]
    fn test_unknown_domain_is_an_error() {
        let profile = Profile::from_yaml("domains: [matrix]").unwrap();
        let err = profile.build_system().unwrap_err();
        assert!(err.to_string().contains("matrix"));
    }

    #[test]
    fn test_unknown_tag_is_an_error() {
        assert!(Profile::from_yaml("blocked: [{ from: float128, to: int32 }]").is_err());
    }

    #[test]
    fn test_unknown_key_is_an_error() {
        assert!(Profile::from_yaml("domain: [text]").is_err());
    }

    #[test]
    fn test_repeated_domain_is_an_error() {
        let profile = Profile::from_yaml("domains: [text, text]").unwrap();
        assert!(profile.build_system().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.yaml");
        std::fs::write(&path, "domains: [time]\n").unwrap();
        let system = load_system(Some(&path)).unwrap();
        assert_eq!(system.domains().count(), 1);
        assert!(load_system(Some(&dir.path().join("missing.yaml"))).is_err());
        assert_eq!(load_system(None).unwrap().domains().count(), 5);
    }
}
