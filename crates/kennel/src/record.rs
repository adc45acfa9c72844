//! Core record types for kennel.
//!
//! A record is a named blob of free-form text. Its name doubles as a
//! filesystem path component, so names can only be built through validation.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Pattern every record name must match in full.
pub const NAME_PATTERN: &str = "^[A-Za-z0-9]+$";

static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(NAME_PATTERN).expect("record name pattern is valid"));

/// A validated record name.
///
/// Only ASCII letters and digits, at least one character. A `RecordName`
/// can therefore never contain a path separator, a dot, or whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordName(String);

impl RecordName {
    /// Validate `name` and wrap it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidName`] if `name` is empty or contains anything
    /// other than ASCII letters and digits.
    pub fn parse(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if NAME_REGEX.is_match(&name) {
            Ok(Self(name))
        } else {
            Err(Error::InvalidName { name })
        }
    }

    /// Borrow the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RecordName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for RecordName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RecordName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<RecordName> for String {
    fn from(name: RecordName) -> Self {
        name.0
    }
}

/// A named record and its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// The record's validated name.
    pub name: RecordName,

    /// Raw body bytes, stored without any header.
    pub body: Vec<u8>,
}

impl Record {
    /// Create a record from a name and body.
    #[must_use]
    pub fn new(name: RecordName, body: impl Into<Vec<u8>>) -> Self {
        Self {
            name,
            body: body.into(),
        }
    }

    /// Create a record with an empty body.
    ///
    /// This is what the edit form shows for a name nobody has saved yet.
    #[must_use]
    pub fn empty(name: RecordName) -> Self {
        Self {
            name,
            body: Vec::new(),
        }
    }

    /// The body decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
