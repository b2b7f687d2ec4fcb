//! Tag model

use serde::{Deserialize, Serialize};
use std::fmt;

/// A label attached to image files.
///
/// Two tags are equal when their names are equal. Names are stored exactly as
/// given: case-sensitive, no trimming.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag {
    name: String,
}

impl Tag {
    /// Create a tag with the given name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Get the tag name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
