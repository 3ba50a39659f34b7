//! Duplication options

use crate::rewrite::RewriteMode;
use serde::{Deserialize, Serialize};
use tower_core::Result;

/// Options for [`copy_selection_with`](crate::copy_selection_with).
///
/// Loadable from TOML; missing keys fall back to defaults:
///
/// ```toml
/// rewrite = "textual"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyOptions {
    /// How guid references are rewritten in the copies
    pub rewrite: RewriteMode,
}

impl CopyOptions {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_rewrite(mut self, mode: RewriteMode) -> Self {
        self.rewrite = mode;
        self
    }
}
