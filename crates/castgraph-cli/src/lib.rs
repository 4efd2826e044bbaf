//! # castgraph-cli — Command-Line Access to a Domain System
//!
//! Provides the `castgraph` binary.
//!
//! ## Subcommands
//!
//! - `castgraph cast`: convert a value between two representations.
//! - `castgraph resolve`: show how a pair resolves without converting.
//! - `castgraph describe`: list domains, edges, and blocks.
//!
//! Every subcommand runs against the standard primitive system, or the
//! subset and extra blocks a `--profile` YAML file selects:
//!
//! ```bash
//! castgraph cast --from bytes --to int32 0x2a000000
//! castgraph resolve --from decimal --to bytes
//! castgraph --profile strict.yaml describe --domain number
//! ```

pub mod cast;
pub mod describe;
pub mod profile;
pub mod resolve;
