//! # winjobs-api
//!
//! Wire DTOs and request validation for the driver HTTP surface (spec.md
//! §4.1, §6). This crate depends only on `winjobs-domain` and
//! `winjobs-shared` — it has no axum dependency, so it can be reused by
//! the user CLI's HTTP client without dragging in a server framework.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod v1;

/// Returns the api crate version.
#[must_use]
pub const fn api_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_crate_compiles() {
        assert!(!api_crate_version().is_empty());
    }
}
