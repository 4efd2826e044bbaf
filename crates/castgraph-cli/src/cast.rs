//! # Cast Subcommand
//!
//! Reads a value in the `--from` representation, converts it to `--to`,
//! and prints the result.
//!
//! Input for `bytes` may be hex with a `0x` prefix; any other input is taken
//! as text and converted through the system from `text` to `--from`. A
//! failed conversion prints the structured error and exits 1.

use anyhow::Result;
use clap::Args;

use castgraph_core::{ConversionError, ConversionErrorKind, DomainSystem, EdgeKey, ReprTag, Value};

/// Arguments for the `castgraph cast` subcommand.
#[derive(Args, Debug)]
pub struct CastArgs {
    /// Source representation.
    #[arg(long)]
    pub from: ReprTag,

    /// Target representation.
    #[arg(long)]
    pub to: ReprTag,

    /// The value to convert.
    #[arg(value_name = "VALUE", allow_hyphen_values = true)]
    pub value: String,
}

/// Execute the cast subcommand.
///
/// Returns exit code: 0 on success, 1 if the input or the conversion fails.
pub fn run_cast(args: &CastArgs, system: &DomainSystem) -> Result<u8> {
    let result = parse_input(system, args.from, &args.value)
        .and_then(|input| system.convert(args.from, args.to, &input));
    match result {
        Ok(value) => {
            println!("{value}");
            Ok(0)
        }
        Err(e) => {
            println!("{}", render_error(&e));
            Ok(1)
        }
    }
}

/// Turn command-line input into a `from` value.
pub fn parse_input(system: &DomainSystem, from: ReprTag, raw: &str) -> Result<Value, ConversionError> {
    if from == ReprTag::Bytes {
        if let Some(hex) = raw.strip_prefix("0x") {
            return decode_hex(hex).map(Value::Bytes).ok_or_else(|| {
                ConversionError::invalid_format(
                    EdgeKey::new(ReprTag::Text, ReprTag::Bytes),
                    Some(Value::Text(raw.to_string())),
                    "malformed hex",
                )
            });
        }
    }
    let text = Value::Text(raw.to_string());
    if from == ReprTag::Text {
        return Ok(text);
    }
    system.convert(ReprTag::Text, from, &text)
}

fn decode_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 || !hex.is_ascii() {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
        .collect()
}

/// Multi-line rendering of an error and its chain of causes.
pub fn render_error(error: &ConversionError) -> String {
    let mut out = String::new();
    let mut current = Some(error);
    let mut depth = 0;
    while let Some(e) = current {
        let indent = "  ".repeat(depth);
        let label = if depth == 0 { "FAIL" } else { "caused by" };
        out.push_str(&format!("{indent}{label}: {} {} -> {}\n", e.kind.name(), e.from, e.to));
        match &e.kind {
            ConversionErrorKind::InvalidFormat { reason } => {
                out.push_str(&format!("{indent}  reason: {reason}\n"));
            }
            ConversionErrorKind::PrecisionLoss { delta } => {
                out.push_str(&format!("{indent}  delta: {delta}\n"));
            }
            ConversionErrorKind::OutOfBounds { min, max } => {
                out.push_str(&format!("{indent}  min: {min}\n{indent}  max: {max}\n"));
            }
            ConversionErrorKind::Unsupported { blocked } => {
                out.push_str(&format!("{indent}  blocked: {blocked}\n"));
            }
        }
        if let Some(evidence) = &e.evidence {
            out.push_str(&format!("{indent}  evidence: {evidence}\n"));
        }
        current = e.cause.as_deref();
        depth += 1;
    }
    out.truncate(out.trim_end().len());
    out
}
