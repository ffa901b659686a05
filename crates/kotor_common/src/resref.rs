//! Resource references.

use derive_more::derive::{AsRef, Deref, Display};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::text;

/// A resource name of at most [`ResRef::MAX_LENGTH`] bytes, without extension
///
/// The engine compares resource names case-insensitively but files keep whatever case they were
/// authored with, so the original spelling is stored and [`ResRef::matches`] is provided for
/// lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, AsRef, Deref, Display)]
#[as_ref(forward)]
#[deref(forward)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct ResRef(String);

impl ResRef {
    /// Longest resource name the fixed size slots can hold
    pub const MAX_LENGTH: usize = 16;

    /// Create a resource reference, failing with [`Error::FieldTooLong`] past 16 bytes
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let length = text::encode(&value, text::DEFAULT_ENCODING)?.len();
        if length > Self::MAX_LENGTH {
            return Err(Error::FieldTooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        Ok(Self(value))
    }

    /// The empty reference, used by the games for "no resource"
    pub fn blank() -> Self {
        Self::default()
    }

    /// Whether this references no resource
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }

    /// Case-insensitive comparison, as done by the resource manager
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }

    /// Borrow the name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ResRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ResRef {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ResRef {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ResRef> for String {
    fn from(value: ResRef) -> Self {
        value.0
    }
}
