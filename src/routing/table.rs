//! Per-method route storage.
//!
//! # Design Decisions
//! - One ordered bucket per method; insertion order is match priority
//! - Entries are never deduplicated: the same path may be declared once
//!   per version and every declaration is kept
//! - Read access hands out slices, never the buckets themselves

use std::collections::BTreeMap;

use crate::routing::method::Method;
use crate::routing::path::PathMatcher;

/// A normalized `(method, matcher)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    method: Method,
    matcher: PathMatcher,
}

impl RouteSpec {
    pub fn new(method: Method, matcher: PathMatcher) -> Self {
        Self { method, matcher }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn matcher(&self) -> &PathMatcher {
        &self.matcher
    }
}

/// A `RouteSpec` paired with its handler.
#[derive(Debug, Clone)]
pub struct RouteEntry<H> {
    spec: RouteSpec,
    handler: H,
}

impl<H> RouteEntry<H> {
    pub fn new(spec: RouteSpec, handler: H) -> Self {
        Self { spec, handler }
    }

    pub fn spec(&self) -> &RouteSpec {
        &self.spec
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }
}

/// Ordered route entries, bucketed by method.
#[derive(Debug, Clone)]
pub struct RouteTable<H> {
    buckets: BTreeMap<Method, Vec<RouteEntry<H>>>,
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self {
            buckets: BTreeMap::new(),
        }
    }
}

impl<H> RouteTable<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to its method's bucket.
    pub fn push(&mut self, entry: RouteEntry<H>) {
        self.buckets
            .entry(entry.spec.method)
            .or_default()
            .push(entry);
    }

    /// Entries for `method`, in registration order.
    pub fn routes(&self, method: Method) -> &[RouteEntry<H>] {
        self.buckets
            .get(&method)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
