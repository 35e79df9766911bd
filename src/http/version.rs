//! Version selection among routes sharing a method and path.
//!
//! Clients ask for a version range with `Accept-Version` (or
//! `X-Api-Version`), e.g. `~2`, `^1.2`, `1.0.0`. Requests without the
//! header accept any version.
//!
//! # Design Decisions
//! - Unversioned routes accept every request
//! - Among acceptable routes the highest version wins; unversioned ranks
//!   lowest, ties go to the first registered
//! - Registered versions must be full semver versions

use axum::http::HeaderMap;
use semver::{Version, VersionReq};

use crate::http::handler::Handler;

pub const ACCEPT_VERSION: &str = "accept-version";
pub const X_API_VERSION: &str = "x-api-version";

struct Candidate {
    version: Option<Version>,
    handler: Handler,
}

/// Handlers registered for one method and path.
#[derive(Default)]
pub struct Candidates {
    entries: Vec<Candidate>,
}

impl Candidates {
    /// Whether a handler for exactly this version (or for no version) exists.
    pub fn contains(&self, version: Option<&Version>) -> bool {
        self.entries.iter().any(|c| c.version.as_ref() == version)
    }

    pub fn push(&mut self, version: Option<Version>, handler: Handler) {
        self.entries.push(Candidate { version, handler });
    }

    /// Pick the handler for a requested range.
    pub fn select(&self, requested: &VersionReq) -> Option<&Handler> {
        let mut best: Option<&Candidate> = None;
        for candidate in &self.entries {
            let acceptable = match &candidate.version {
                Some(version) => requested.matches(version),
                None => true,
            };
            if !acceptable {
                continue;
            }
            best = match best {
                Some(current) if candidate.version <= current.version => Some(current),
                _ => Some(candidate),
            };
        }
        best.map(|candidate| &candidate.handler)
    }

    /// Registered versions, in registration order.
    pub fn versions(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|c| c.version.as_ref().map(Version::to_string))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The version range a request asks for.
pub fn requested_version(headers: &HeaderMap) -> Result<VersionReq, semver::Error> {
    let header = headers
        .get(ACCEPT_VERSION)
        .or_else(|| headers.get(X_API_VERSION))
        .and_then(|value| value.to_str().ok())
        .map(str::trim);

    match header {
        None | Some("") | Some("*") => Ok(VersionReq::STAR),
        Some(range) => VersionReq::parse(range),
    }
}
