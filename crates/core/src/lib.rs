//! # winjobs-core
//!
//! Core utilities and build information for the antares-winjobs workspace.
//!
//! This crate provides foundational functionality that has no dependencies on
//! other workspace crates, making it safe to import anywhere.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

/// Build-time information about the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    /// Package name from Cargo.toml
    pub name: &'static str,
    /// Package version from Cargo.toml (semver)
    pub version: &'static str,
    /// Target triple (e.g. "x86_64-unknown-linux-gnu")
    pub target: &'static str,
    /// Build profile ("debug" or "release")
    pub profile: &'static str,
}

impl BuildInfo {
    /// Returns a human-readable version string, e.g. "winjobs-driver 0.1.0".
    #[must_use]
    pub fn version_string(&self) -> String {
        format!("{} {}", self.name, self.version)
    }

    /// Returns true if this is a debug build.
    #[must_use]
    pub const fn is_debug(&self) -> bool {
        matches!(self.profile.as_bytes(), b"debug")
    }
}

/// Returns build-time information about the binary.
#[must_use]
pub const fn build_info() -> BuildInfo {
    BuildInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        target: target_triple(),
        profile: if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        },
    }
}

/// Returns the target triple at compile time.
const fn target_triple() -> &'static str {
    #[cfg(all(target_arch = "x86_64", target_os = "linux", target_env = "gnu"))]
    {
        "x86_64-unknown-linux-gnu"
    }

    #[cfg(all(target_arch = "aarch64", target_os = "linux", target_env = "gnu"))]
    {
        "aarch64-unknown-linux-gnu"
    }

    #[cfg(all(target_arch = "x86_64", target_os = "macos"))]
    {
        "x86_64-apple-darwin"
    }

    #[cfg(all(target_arch = "aarch64", target_os = "macos"))]
    {
        "aarch64-apple-darwin"
    }

    #[cfg(not(any(
        all(target_arch = "x86_64", target_os = "linux", target_env = "gnu"),
        all(target_arch = "aarch64", target_os = "linux", target_env = "gnu"),
        all(target_arch = "x86_64", target_os = "macos"),
        all(target_arch = "aarch64", target_os = "macos"),
    )))]
    {
        "unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_info_returns_non_empty_fields() {
        let info = build_info();
        assert!(!info.name.is_empty());
        assert!(!info.version.is_empty());
        assert!(!info.target.is_empty());
    }

    #[test]
    fn version_string_contains_name_and_version() {
        let info = build_info();
        let version_str = info.version_string();
        assert!(version_str.contains(info.name));
        assert!(version_str.contains(info.version));
    }

    #[test]
    fn profile_detection() {
        let info = build_info();
        assert!(info.is_debug(), "tests run in debug mode");
    }
}
