//! # Describe Subcommand
//!
//! Lists the domains of a system: kind, storage, accepted tags, none
//! value, edges with provenance, and blocks. `--domain` narrows the listing
//! to one domain; `--json` prints the same report as JSON.

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;

use castgraph_core::{DomainKind, DomainSystem, EdgeKey, Provenance, ReprTag, ValueDomain};

/// Arguments for the `castgraph describe` subcommand.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Describe only this domain.
    #[arg(long)]
    pub domain: Option<String>,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// A system as reported by `describe`.
#[derive(Debug, Serialize)]
pub struct SystemReport {
    /// System name.
    pub name: String,
    /// Membership requirement.
    pub requirement: String,
    /// Reported domains.
    pub domains: Vec<DomainReport>,
    /// Every blocked pair in the system.
    pub blocked: Vec<EdgeKey>,
}

/// One domain as reported by `describe`.
#[derive(Debug, Serialize)]
pub struct DomainReport {
    /// Domain name.
    pub name: String,
    /// Domain kind.
    pub kind: DomainKind,
    /// Storage tag.
    pub storage: ReprTag,
    /// Accepted tags, storage included.
    pub accepted: Vec<ReprTag>,
    /// Rendered none value.
    pub none: String,
    /// Edges registered or chained by the domain.
    pub edges: Vec<EdgeReport>,
    /// Pairs the domain blocks.
    pub blocks: Vec<EdgeKey>,
}

/// One edge as reported by `describe`.
#[derive(Debug, Serialize)]
pub struct EdgeReport {
    /// Source tag.
    pub from: ReprTag,
    /// Target tag.
    pub to: ReprTag,
    /// How the edge came to exist.
    #[serde(flatten)]
    pub provenance: Provenance,
}

impl DomainReport {
    /// Summarise a sealed domain.
    pub fn of(domain: &ValueDomain) -> Self {
        Self {
            name: domain.name().to_string(),
            kind: domain.kind(),
            storage: domain.storage(),
            accepted: domain.accepted().collect(),
            none: domain.none_value().to_string(),
            edges: domain
                .edges()
                .map(|c| EdgeReport {
                    from: c.from(),
                    to: c.to(),
                    provenance: c.provenance(),
                })
                .collect(),
            blocks: domain.blocks().collect(),
        }
    }
}

/// Build the report for `system`, optionally narrowed to one domain.
pub fn report(system: &DomainSystem, only: Option<&str>) -> Result<SystemReport> {
    let domains = match only {
        Some(name) => {
            let Some(domain) = system.domain(name) else {
                bail!("no domain named {name:?} in system {}", system.name());
            };
            vec![DomainReport::of(domain)]
        }
        None => system.domains().map(DomainReport::of).collect(),
    };
    Ok(SystemReport {
        name: system.name().to_string(),
        requirement: system.requirement().to_string(),
        domains,
        blocked: system.blocks().collect(),
    })
}

/// Plain-text rendering of a report.
pub fn render_text(report: &SystemReport) -> String {
    let mut lines = vec![format!("system {} ({})", report.name, report.requirement)];
    for domain in &report.domains {
        let accepted: Vec<_> = domain.accepted.iter().map(ReprTag::as_str).collect();
        lines.push(String::new());
        lines.push(format!("domain {} [{}]", domain.name, domain.kind));
        lines.push(format!("  storage:  {}", domain.storage));
        lines.push(format!("  accepts:  {}", accepted.join(", ")));
        lines.push(format!("  none:     {}", domain.none));
        lines.push(format!("  edges:    {}", domain.edges.len()));
        for edge in &domain.edges {
            lines.push(format!("    {} -> {} ({})", edge.from, edge.to, edge.provenance));
        }
        lines.push(format!("  blocks:   {}", domain.blocks.len()));
        for block in &domain.blocks {
            lines.push(format!("    {block}"));
        }
    }
    lines.join("\n")
}

/// Execute the describe subcommand.
///
/// Returns exit code 0; an unknown `--domain` is an operational error.
pub fn run_describe(args: &DescribeArgs, system: &DomainSystem) -> Result<u8> {
    let report = report(system, args.domain.as_deref())?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render_text(&report));
    }
    Ok(0)
}
