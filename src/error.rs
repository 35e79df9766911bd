//! Registration errors.
//!
//! Both variants are raised synchronously by the registration calls and
//! never leave a partial entry behind in the route table. Errors raised by
//! a server while routes are applied are not represented here: they belong
//! to the server and reach the caller untouched.

use thiserror::Error;

/// Errors produced while declaring a route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The path argument was not a string, a pattern or a descriptor
    /// carrying a valid `path`.
    #[error("path (string) required")]
    InvalidPath,

    /// No handler was supplied.
    #[error("handler (function) required")]
    MissingHandler,
}

pub type RegistryResult<T> = Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(RegistryError::InvalidPath.to_string(), "path (string) required");
        assert_eq!(
            RegistryError::MissingHandler.to_string(),
            "handler (function) required"
        );
    }
}
