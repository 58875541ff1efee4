//! Result alias and combinators built around [`crate::Error`].

use crate::errors::Error;

/// Convenience alias used throughout the workspace.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Extension methods for chaining contextual error information.
pub trait ResultExt<T> {
    /// Map a successful value, leaving the error untouched.
    fn map_ok<U>(self, f: impl FnOnce(T) -> U) -> Result<U>;

    /// Replace the error message while keeping kind/class/code.
    fn map_err_with(self, f: impl FnOnce(Error) -> Error) -> Result<T>;

    /// Chain into another fallible step only on success.
    fn and_then_with<U>(self, f: impl FnOnce(T) -> Result<U>) -> Result<U>;
}

impl<T> ResultExt<T> for Result<T> {
    fn map_ok<U>(self, f: impl FnOnce(T) -> U) -> Result<U> {
        self.map(f)
    }

    fn map_err_with(self, f: impl FnOnce(Error) -> Error) -> Result<T> {
        self.map_err(f)
    }

    fn and_then_with<U>(self, f: impl FnOnce(T) -> Result<U>) -> Result<U> {
        self.and_then(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn map_ok_transforms_success() {
        let result: Result<i32> = Ok(1);
        assert_eq!(result.map_ok(|v| v + 1), Ok(2));
    }

    #[test]
    fn map_err_with_rewrites_message() {
        let result: Result<i32> = Err(Error::expected(ErrorCode::validation("x"), "original"));
        let mapped = result.map_err_with(|e| Error::expected(e.code, "rewritten"));
        assert_eq!(mapped.unwrap_err().message, "rewritten");
    }

    #[test]
    fn and_then_with_chains_on_success() {
        let result: Result<i32> = Ok(1);
        let chained = result.and_then_with(|v| Ok(v * 2));
        assert_eq!(chained, Ok(2));
    }
}
