//! # winjobs-shared
//!
//! Shared error types and result helpers used across every winjobs crate.
//! This crate depends on nothing but `serde` and the standard library, so it
//! can sit underneath domain, ports, adapters, and the binaries alike.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod errors;
mod result;

pub use errors::{Error, ErrorClass, ErrorCode, ErrorKind};
pub use result::{Result, ResultExt};
