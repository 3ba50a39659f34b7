//! Object identifiers and group tags

use crate::error::{Result, TowerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A group tag shared by objects that are edited together.
///
/// Stored in documents as a plain integer; negative values mean "ungrouped".
pub type GroupId = i64;

/// Sentinel used by the save format for "no group"
pub const NO_GROUP: GroupId = -1;

/// A canonical object identifier.
///
/// Always the uppercase hyphenated form of a 128-bit UUID, e.g.
/// `1B4E28BA-2FA1-11D2-883F-0016D3CCA427`. Every guid has the same length and
/// they never contain one another, which keeps textual substitution safe.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Guid(String);

impl Guid {
    /// Mint a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4().hyphenated().to_string().to_uppercase())
    }

    /// Parse and case-normalize an identifier
    pub fn parse(s: &str) -> Result<Self> {
        let uuid = Uuid::parse_str(s).map_err(|_| TowerError::InvalidGuid(s.to_string()))?;
        Ok(Self(uuid.hyphenated().to_string().to_uppercase()))
    }

    /// Get the canonical string form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for Guid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guid({})", self.0)
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Guid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
