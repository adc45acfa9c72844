//! Request path validation and routing.
//!
//! Every request path goes through [`parse_path`] before any handler runs.
//! A path either yields an [`Operation`] and a validated [`RecordName`], or the
//! request is answered with "not found" and nothing else happens.

use std::fmt;
use std::sync::LazyLock;

use axum::http::Method;
use regex::Regex;

use crate::record::RecordName;

static PATH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^/(view|edit|save)/([A-Za-z0-9]+)$").expect("route pattern is valid")
});

/// The operations a request can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Show a record.
    View,
    /// Show the edit form for a record.
    Edit,
    /// Store a submitted record.
    Save,
}

impl Operation {
    /// Path prefix naming this operation.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Save => "save",
        }
    }

    /// Parse a path prefix back into an operation.
    #[must_use]
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "view" => Some(Self::View),
            "edit" => Some(Self::Edit),
            "save" => Some(Self::Save),
            _ => None,
        }
    }

    /// Check whether `method` may be used with this operation.
    #[must_use]
    pub fn accepts(self, method: &Method) -> bool {
        match self {
            Self::View | Self::Edit => *method == Method::GET || *method == Method::HEAD,
            Self::Save => *method == Method::POST,
        }
    }

    /// Value for the `Allow` header when the method is rejected.
    #[must_use]
    pub fn allowed_methods(self) -> &'static str {
        match self {
            Self::View | Self::Edit => "GET, HEAD",
            Self::Save => "POST",
        }
    }

    /// Build the path addressing `name` with this operation.
    #[must_use]
    pub fn path(self, name: &RecordName) -> String {
        format!("/{}/{name}", self.prefix())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A request path that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// The addressed operation.
    pub operation: Operation,
    /// The addressed record.
    pub name: RecordName,
}

/// Validate a raw request path and split it into operation and name.
///
/// The path is matched as received, before any percent-decoding, so encoded
/// separators such as `%2F` are rejected along with literal ones.
#[must_use]
pub fn parse_path(path: &str) -> Option<Route> {
    let captures = PATH_REGEX.captures(path)?;
    let operation = Operation::from_prefix(captures.get(1)?.as_str())?;
    let name = RecordName::parse(captures.get(2)?.as_str()).ok()?;
    Some(Route { operation, name })
}
