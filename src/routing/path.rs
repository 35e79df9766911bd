//! Path declarations and their normalization.
//!
//! # Responsibilities
//! - Accept every shape a route path may be declared in
//! - Validate the path first, the handler second
//! - Produce one canonical `PathMatcher` per route
//!
//! # Design Decisions
//! - `PathArg` is the only place raw input is inspected; everything past
//!   `normalize` works on the closed `PathMatcher` variant
//! - The variant follows the input shape: a descriptor always yields
//!   `Named`, even when it carries neither name nor version
//! - Literal paths always start with `/`

use std::fmt;

use regex::Regex;
use serde_json::Value;

use crate::error::{RegistryError, RegistryResult};
use crate::routing::method::Method;
use crate::routing::table::{RouteEntry, RouteSpec};

/// A compiled path pattern.
///
/// Two patterns are equal when their source expressions are.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    /// Compile a pattern from its source expression.
    pub fn new(expr: &str) -> Result<Self, regex::Error> {
        Regex::new(expr).map(Self)
    }

    /// The source expression.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn regex(&self) -> &Regex {
        &self.0
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Pattern {}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Self(regex)
    }
}

/// The path carried by a descriptor: a literal string or a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathExpr {
    Literal(String),
    Pattern(Pattern),
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathExpr::Literal(path) => f.write_str(path),
            PathExpr::Pattern(pattern) => write!(f, "/{}/", pattern.as_str()),
        }
    }
}

impl From<&str> for PathExpr {
    fn from(path: &str) -> Self {
        PathExpr::Literal(path.to_string())
    }
}

impl From<String> for PathExpr {
    fn from(path: String) -> Self {
        PathExpr::Literal(path)
    }
}

impl From<Regex> for PathExpr {
    fn from(regex: Regex) -> Self {
        PathExpr::Pattern(Pattern(regex))
    }
}

impl From<Pattern> for PathExpr {
    fn from(pattern: Pattern) -> Self {
        PathExpr::Pattern(pattern)
    }
}

/// Descriptor form of a path declaration: `{ name?, path, version? }`.
///
/// `path` is optional only so that a descriptor missing it can be
/// represented and rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub name: Option<String>,
    pub path: Option<PathExpr>,
    pub version: Option<String>,
}

impl RouteDescriptor {
    pub fn new(path: impl Into<PathExpr>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// A raw path argument as handed to a registration call.
#[derive(Debug, Clone)]
pub enum PathArg {
    Str(String),
    Pattern(Pattern),
    Descriptor(RouteDescriptor),
    /// Loosely typed input, e.g. route declarations read from a document.
    Value(Value),
}

impl From<&str> for PathArg {
    fn from(path: &str) -> Self {
        PathArg::Str(path.to_string())
    }
}

impl From<String> for PathArg {
    fn from(path: String) -> Self {
        PathArg::Str(path)
    }
}

impl From<&String> for PathArg {
    fn from(path: &String) -> Self {
        PathArg::Str(path.clone())
    }
}

impl From<Regex> for PathArg {
    fn from(regex: Regex) -> Self {
        PathArg::Pattern(Pattern(regex))
    }
}

impl From<Pattern> for PathArg {
    fn from(pattern: Pattern) -> Self {
        PathArg::Pattern(pattern)
    }
}

impl From<RouteDescriptor> for PathArg {
    fn from(descriptor: RouteDescriptor) -> Self {
        PathArg::Descriptor(descriptor)
    }
}

impl From<Value> for PathArg {
    fn from(value: Value) -> Self {
        PathArg::Value(value)
    }
}

/// How a stored route expresses its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMatcher {
    Literal(String),
    Pattern(Pattern),
    Named {
        path: PathExpr,
        name: Option<String>,
        version: Option<String>,
    },
}

impl PathMatcher {
    /// Validate a raw argument and convert it into its matcher.
    pub fn from_arg(arg: PathArg) -> RegistryResult<Self> {
        match arg {
            PathArg::Str(path) => literal(path).map(PathMatcher::Literal),
            PathArg::Pattern(pattern) => Ok(PathMatcher::Pattern(pattern)),
            PathArg::Descriptor(RouteDescriptor {
                name,
                path,
                version,
            }) => {
                let path = match path.ok_or(RegistryError::InvalidPath)? {
                    PathExpr::Literal(path) => PathExpr::Literal(literal(path)?),
                    pattern => pattern,
                };
                Ok(PathMatcher::Named {
                    path,
                    name,
                    version,
                })
            }
            PathArg::Value(value) => from_value(value),
        }
    }

    /// The literal path, if this matcher has one.
    pub fn literal_path(&self) -> Option<&str> {
        match self {
            PathMatcher::Literal(path)
            | PathMatcher::Named {
                path: PathExpr::Literal(path),
                ..
            } => Some(path.as_str()),
            _ => None,
        }
    }

    pub fn is_pattern(&self) -> bool {
        matches!(
            self,
            PathMatcher::Pattern(_)
                | PathMatcher::Named {
                    path: PathExpr::Pattern(_),
                    ..
                }
        )
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            PathMatcher::Named { name, .. } => name.as_deref(),
            _ => None,
        }
    }

    pub fn version(&self) -> Option<&str> {
        match self {
            PathMatcher::Named { version, .. } => version.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for PathMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathMatcher::Literal(path) => f.write_str(path),
            PathMatcher::Pattern(pattern) => write!(f, "/{}/", pattern.as_str()),
            PathMatcher::Named { path, .. } => fmt::Display::fmt(path, f),
        }
    }
}

/// Normalize a registration call into a table entry.
///
/// The path is validated before the handler, and nothing is produced
/// unless both are valid.
pub fn normalize<H>(
    method: Method,
    raw: impl Into<PathArg>,
    handler: Option<H>,
) -> RegistryResult<RouteEntry<H>> {
    let matcher = PathMatcher::from_arg(raw.into())?;
    let handler = handler.ok_or(RegistryError::MissingHandler)?;
    Ok(RouteEntry::new(RouteSpec::new(method, matcher), handler))
}

fn literal(path: String) -> RegistryResult<String> {
    if path.is_empty() {
        return Err(RegistryError::InvalidPath);
    }
    if path.starts_with('/') {
        Ok(path)
    } else {
        Ok(format!("/{}", path))
    }
}

fn from_value(value: Value) -> RegistryResult<PathMatcher> {
    match value {
        Value::String(path) => literal(path).map(PathMatcher::Literal),
        Value::Object(mut fields) => {
            let path = match fields.remove("path") {
                Some(Value::String(path)) => literal(path)?,
                _ => return Err(RegistryError::InvalidPath),
            };
            Ok(PathMatcher::Named {
                path: PathExpr::Literal(path),
                name: optional_string(fields.remove("name"))?,
                version: optional_string(fields.remove("version"))?,
            })
        }
        _ => Err(RegistryError::InvalidPath),
    }
}

fn optional_string(value: Option<Value>) -> RegistryResult<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(RegistryError::InvalidPath),
    }
}
