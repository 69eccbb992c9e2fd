//! # handheld-error
//!
//! Unified error handling for the handheld console workspace.
//!
//! ## Design
//!
//! - **ErrorKind**: Know what went wrong (e.g., InvalidOpcode, NoSingleFixFound)
//! - **Error Context**: Locate the cause with key/value pairs (line, index, pc)
//! - **Error Source**: Wrap underlying errors without leaking raw types
//!
//! ## Usage
//!
//! ```rust
//! use handheld_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::InvalidOpcode, "unknown mnemonic 'hlt'")
//!         .with_operation("loader::parse_program")
//!         .with_context("line", "12"))
//! }
//! ```
//!
//! ## Principles
//!
//! - All functions return `Result<T, handheld_error::Error>`
//! - External errors are wrapped with `set_source(err)`
//! - Same error handled once, subsequent ops only append context

mod error;
mod kind;

pub use error::Error;
pub use kind::ErrorKind;

/// Result type alias using the handheld Error
pub type Result<T> = std::result::Result<T, Error>;
