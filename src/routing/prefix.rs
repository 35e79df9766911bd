//! Mount-prefix composition.
//!
//! # Design Decisions
//! - An empty prefix is the identity: the stored path is used as is
//! - Prefix and path are joined by exactly one `/`, whatever slashes
//!   either side carries
//! - Pattern paths are never rewritten. Prefixing an arbitrary expression
//!   is not safe, so pattern routes always bind relative to the server
//!   root, whatever prefix was requested

use crate::routing::path::{PathExpr, PathMatcher};

/// Apply `prefix` to a stored matcher.
pub fn compose(prefix: &str, matcher: &PathMatcher) -> PathMatcher {
    match matcher {
        PathMatcher::Literal(path) => PathMatcher::Literal(join(prefix, path)),
        PathMatcher::Named {
            path: PathExpr::Literal(path),
            name,
            version,
        } => PathMatcher::Named {
            path: PathExpr::Literal(join(prefix, path)),
            name: name.clone(),
            version: version.clone(),
        },
        pattern => pattern.clone(),
    }
}

/// Join a mount prefix and a literal path.
pub fn join(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        return path.to_string();
    }

    let head = prefix.trim_end_matches('/');
    let tail = path.trim_start_matches('/');

    let mut joined = String::with_capacity(head.len() + tail.len() + 2);
    if !head.is_empty() {
        if !head.starts_with('/') {
            joined.push('/');
        }
        joined.push_str(head);
        if tail.is_empty() {
            return joined;
        }
    }
    joined.push('/');
    joined.push_str(tail);
    joined
}
