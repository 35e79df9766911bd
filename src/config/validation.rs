//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the bind address parses
//! - Check the mount prefix is a plain literal path
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;

/// Characters that would turn a prefix into something other than a
/// literal path.
const PATTERN_CHARS: &[char] = &['^', '$', '(', ')', '[', ']', '{', '}', '|', '?', '+', '\\'];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    BindAddress(String),

    #[error("mount.prefix {0:?} must start with '/'")]
    PrefixNotAbsolute(String),

    #[error("mount.prefix {0:?} contains an empty segment")]
    PrefixEmptySegment(String),

    #[error("mount.prefix {0:?} must be a literal path")]
    PrefixNotLiteral(String),
}

/// Check a parsed configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    let prefix = &config.mount.prefix;
    if !prefix.is_empty() {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::PrefixNotAbsolute(prefix.clone()));
        }
        if prefix.contains("//") {
            errors.push(ValidationError::PrefixEmptySegment(prefix.clone()));
        }
        if prefix.contains(PATTERN_CHARS) {
            errors.push(ValidationError::PrefixNotLiteral(prefix.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
