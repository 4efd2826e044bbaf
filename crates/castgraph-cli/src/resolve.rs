//! # Resolve Subcommand
//!
//! Prints how a pair resolves (`direct`, `chained via <tag>`, `identity`,
//! `blocked`, `unsupported`) without converting anything.

use anyhow::Result;
use clap::Args;

use castgraph_core::{DomainSystem, ReprTag, Resolution};

/// Arguments for the `castgraph resolve` subcommand.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Source representation.
    #[arg(long)]
    pub from: ReprTag,

    /// Target representation.
    #[arg(long)]
    pub to: ReprTag,

    /// Print JSON instead of a line of text.
    #[arg(long)]
    pub json: bool,
}

/// Execute the resolve subcommand. Always returns exit code 0.
pub fn run_resolve(args: &ResolveArgs, system: &DomainSystem) -> Result<u8> {
    let resolution = system.resolution(args.from, args.to);
    println!("{}", render(args, resolution)?);
    Ok(0)
}

fn render(args: &ResolveArgs, resolution: Resolution) -> Result<String> {
    if args.json {
        let report = serde_json::json!({
            "from": args.from,
            "to": args.to,
            "resolution": resolution,
        });
        return Ok(serde_json::to_string(&report)?);
    }
    Ok(format!("{} -> {}: {resolution}", args.from, args.to))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(from: ReprTag, to: ReprTag, json: bool) -> ResolveArgs {
        ResolveArgs { from, to, json }
    }

    #[test]
    fn test_text_rendering() {
        let line = render(
            &args(ReprTag::Decimal, ReprTag::Bytes, false),
            Resolution::Chained { via: ReprTag::Text },
        )
        .unwrap();
        assert_eq!(line, "decimal -> bytes: chained via text");
    }

    #[test]
    fn test_json_rendering() {
        let json = render(&args(ReprTag::Time, ReprTag::Int32, true), Resolution::Blocked).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["from"], "time");
        assert_eq!(value["resolution"]["resolution"], "blocked");
    }

    #[test]
    fn test_run_always_succeeds() {
        let system = castgraph_core::primitive_system().unwrap();
        assert_eq!(run_resolve(&args(ReprTag::Text, ReprTag::Md5, false), &system).unwrap(), 0);
    }
}
