//! Core shared types and identifiers

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::path::Path;

use crate::errors::{SharedError, SharedResult};

/// Name of a participant, unique within a group
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Participant(String);

impl Participant {
    /// Create a participant name, rejecting names that cannot be stored in a record line
    ///
    /// Surrounding whitespace is dropped, the same way record columns are read.
    pub fn new(name: impl Into<String>) -> SharedResult<Self> {
        let name = name.into();
        let trimmed = name.trim();
        let name = if trimmed.len() == name.len() {
            name
        } else {
            trimmed.to_string()
        };
        if name.is_empty() {
            return Err(SharedError::InvalidParticipant {
                name,
                reason: "name is empty".to_string(),
            });
        }
        if name.contains(',') || name.contains('\n') || name.contains('\r') {
            return Err(SharedError::InvalidParticipant {
                name,
                reason: "name contains a record delimiter".to_string(),
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Participant {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Participant {
    type Error = SharedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Participant> for String {
    fn from(value: Participant) -> Self {
        value.0
    }
}

/// Identifier for an independent group, derived from its record file name
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Group named after the file stem of its record store
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
