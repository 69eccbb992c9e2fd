//! Handheld VM error types
//!
//! Re-exports handheld-error and provides VM-specific conveniences.

pub use handheld_error::{Error, ErrorKind, Result};

// =============================================================================
// VM-specific error constructors
// =============================================================================

/// Create a ProgramCounterOutOfRange error for a jump from `from` by `offset`
/// that does not land inside `0..=len`
pub fn pc_out_of_range(from: usize, offset: i64, len: usize, accumulator: i64) -> Error {
    Error::new(
        ErrorKind::ProgramCounterOutOfRange,
        format!("jump {:+} from {} leaves a program of length {}", offset, from, len),
    )
    .with_context("from", from.to_string())
    .with_context("offset", offset.to_string())
    .with_context("len", len.to_string())
    .with_context("accumulator", accumulator.to_string())
}

/// Create an AccumulatorOverflow error
pub fn accumulator_overflow(at: usize, accumulator: i64, delta: i64) -> Error {
    Error::new(
        ErrorKind::AccumulatorOverflow,
        format!("{} {:+} overflows the accumulator", accumulator, delta),
    )
    .with_context("pc", at.to_string())
}

/// Create a NoSingleFixFound error
pub fn no_single_fix(candidates: usize) -> Error {
    Error::no_single_fix(candidates)
}

/// Wrap a serde_json failure
pub fn serialization_error(err: serde_json::Error) -> Error {
    Error::serialization_failed(err.to_string())
        .with_context("line", err.line().to_string())
        .set_source(err)
}
