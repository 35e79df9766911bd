//! HTTP methods accepted by the registry.
//!
//! # Design Decisions
//! - Closed enum: only the seven verbs a route can be declared for
//! - Shortcut names live in one fixed table (`VERBS`); `del` and `opts`
//!   are the only names that differ from the HTTP token

use std::fmt;
use std::str::FromStr;

/// An HTTP method a route can be registered for.
///
/// The declaration order is the order in which tables are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

/// Shortcut verb name to method.
pub const VERBS: [(&str, Method); 7] = [
    ("get", Method::Get),
    ("post", Method::Post),
    ("put", Method::Put),
    ("del", Method::Delete),
    ("patch", Method::Patch),
    ("head", Method::Head),
    ("opts", Method::Options),
];

impl Method {
    /// All methods in application order.
    pub const ALL: [Method; 7] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Delete,
        Method::Patch,
        Method::Head,
        Method::Options,
    ];

    /// The HTTP token, e.g. `DELETE`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }

    /// The shortcut verb name, e.g. `del`.
    pub fn verb(&self) -> &'static str {
        VERBS[*self as usize].0
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known method.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown HTTP method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for Method {
    type Err = UnknownMethod;

    /// Accepts either the shortcut verb (`del`) or the HTTP token (`DELETE`),
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        VERBS
            .iter()
            .find(|(verb, method)| *verb == lower || method.as_str().eq_ignore_ascii_case(s))
            .map(|(_, method)| *method)
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}
