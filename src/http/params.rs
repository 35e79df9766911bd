//! Path parameters and path syntax translation.
//!
//! # Design Decisions
//! - Routes are declared with `:name` and `*` segments; axum wants
//!   `{name}` and `{*name}`, so paths are translated when bound
//! - Pattern captures are exposed by position (`"0"`, `"1"`, ...) and, for
//!   named groups, by name as well

use axum::body::Body;
use axum::http::Request;
use regex::{Captures, Regex};

/// Parameters captured from the request path, in capture order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(Vec<(String, String)>);

impl RouteParams {
    /// Parameters attached to `request`, or none.
    pub fn of(request: &Request<Body>) -> Self {
        request
            .extensions()
            .get::<RouteParams>()
            .cloned()
            .unwrap_or_default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn from_captures(regex: &Regex, captures: &Captures<'_>) -> Self {
        let mut params: Vec<(String, String)> = captures
            .iter()
            .skip(1)
            .enumerate()
            .filter_map(|(index, group)| group.map(|m| (index.to_string(), m.as_str().to_string())))
            .collect();

        for name in regex.capture_names().flatten() {
            if let Some(m) = captures.name(name) {
                params.push((name.to_string(), m.as_str().to_string()));
            }
        }
        Self(params)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RouteParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Translate `:name` / `*name` segments into axum's `{name}` / `{*name}`.
pub fn axum_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if let Some(name) = segment.strip_prefix(':') {
                format!("{{{}}}", name)
            } else if segment == "*" {
                "{*wildcard}".to_string()
            } else if let Some(name) = segment.strip_prefix('*') {
                format!("{{*{}}}", name)
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
