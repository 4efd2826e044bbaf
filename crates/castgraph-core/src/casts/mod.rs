//! # Conversion Catalogue
//!
//! Every concrete conversion rule, grouped by the shape it mostly deals
//! with. Each submodule hands out ready-built [`Caster`](crate::Caster)
//! values; the value domains in [`crate::primitive`] decide which edges
//! they register.
//!
//! | module | edges |
//! |--------|-------|
//! | [`binary`] | `bytes` to and from integers, floats, digests, text, time |
//! | [`numeric`] | every ordered pair of the six numeric shapes |
//! | [`text`] | rendering to and parsing from `text` |
//! | [`digest`] | digest to `bytes`, `big_integer`, `text` |
//! | [`time`] | time to `bytes`, `text` |

pub mod binary;
pub mod digest;
pub mod numeric;
pub mod text;
pub mod time;

use crate::codec::CodecError;
use crate::error::ConversionError;
use crate::tag::EdgeKey;
use crate::value::Value;

/// Report a codec shape failure as `InvalidFormat` with the raw bytes.
pub(crate) fn malformed_bytes(edge: EdgeKey, bytes: &[u8], err: CodecError) -> ConversionError {
    ConversionError::invalid_format(edge, Some(Value::Bytes(bytes.to_vec())), err.to_string())
}
