//! # Numeric Precision Policy — Bounds and Round-Trip Checks
//!
//! Shared rules for every narrowing numeric or temporal conversion. A
//! narrowing conversion runs, in order:
//!
//! 1. [`reject_nan`] for float sources going to a shape with no NaN.
//! 2. [`check_bounds`] against the target's representable range.
//! 3. [`checked_narrow`]: compute the forward result, re-widen it to the
//!    source representation, and compare. Unequal means `PrecisionLoss`
//!    carrying `source - rewidened`.
//!
//! ## Invariant
//!
//! A narrowing conversion either reproduces its input when widened back or
//! fails. It never returns a wrapped, saturated, or truncated value.

use std::ops::Sub;

use crate::error::ConversionError;
use crate::tag::EdgeKey;
use crate::value::Value;

/// Fail with `OutOfBounds` unless `low <= source <= high`.
///
/// `low` / `high` are the target's range expressed in the source
/// representation; `min` / `max` are the same bounds as target values and
/// are what the error reports.
pub fn check_bounds<S>(
    edge: EdgeKey,
    source: &S,
    low: &S,
    high: &S,
    min: Value,
    max: Value,
) -> Result<(), ConversionError>
where
    S: PartialOrd + Clone + Into<Value>,
{
    if source < low || source > high {
        return Err(ConversionError::out_of_bounds(
            edge,
            source.clone().into(),
            min,
            max,
        ));
    }
    Ok(())
}

/// Narrow `source` and prove the narrowing lossless by widening it back.
///
/// # Errors
///
/// `PrecisionLoss` with `delta = source - widen(narrow(source))` when the
/// widened result differs from the input.
pub fn checked_narrow<S, T>(
    edge: EdgeKey,
    source: &S,
    narrow: impl FnOnce(&S) -> T,
    widen: impl FnOnce(&T) -> S,
) -> Result<T, ConversionError>
where
    S: PartialEq + Clone + Sub<Output = S> + Into<Value>,
{
    let narrowed = narrow(source);
    let rewidened = widen(&narrowed);
    if rewidened != *source {
        let delta = source.clone() - rewidened;
        return Err(ConversionError::precision_loss(
            edge,
            source.clone().into(),
            delta.into(),
        ));
    }
    Ok(narrowed)
}

/// An IEEE-754 source shape.
pub trait IeeeFloat: Copy + Into<Value> {
    /// Whether the value is NaN.
    fn is_not_a_number(self) -> bool;
    /// Whether the value is positive or negative infinity.
    fn is_infinity(self) -> bool;
}

impl IeeeFloat for f32 {
    fn is_not_a_number(self) -> bool {
        self.is_nan()
    }

    fn is_infinity(self) -> bool {
        self.is_infinite()
    }
}

impl IeeeFloat for f64 {
    fn is_not_a_number(self) -> bool {
        self.is_nan()
    }

    fn is_infinity(self) -> bool {
        self.is_infinite()
    }
}

/// Fail with `InvalidFormat` if a float source is NaN.
pub fn reject_nan<F: IeeeFloat>(edge: EdgeKey, source: F) -> Result<(), ConversionError> {
    if source.is_not_a_number() {
        return Err(ConversionError::invalid_format(
            edge,
            Some(source.into()),
            "NaN has no value in the target representation",
        ));
    }
    Ok(())
}

/// Fail with `InvalidFormat` if a float source is infinite.
///
/// Only for unbounded targets; bounded targets report infinities through
/// [`check_bounds`] as `OutOfBounds`.
pub fn reject_infinity<F: IeeeFloat>(edge: EdgeKey, source: F) -> Result<(), ConversionError> {
    if source.is_infinity() {
        return Err(ConversionError::invalid_format(
            edge,
            Some(source.into()),
            "infinity has no value in an unbounded representation",
        ));
    }
    Ok(())
}
