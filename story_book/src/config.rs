//! Book configuration.
//!
//! Settings are plain TOML; every key is optional and falls back to the
//! defaults below.
//!
//! ```toml
//! default_page_prefix = "Next Page "
//! target_matching = "ignore-case"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BookError, Result};

/// How branch targets are matched against page names when edits are folded
/// back into the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameMatching {
    #[default]
    IgnoreCase,
    Exact,
}

impl NameMatching {
    pub fn matches(self, page_name: &str, wanted: &str) -> bool {
        match self {
            NameMatching::IgnoreCase => page_name.to_lowercase() == wanted.to_lowercase(),
            NameMatching::Exact => page_name == wanted,
        }
    }
}

/// Tunables for a [`Book`](crate::Book).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    /// Prefix for synthesized target names; the current page count is appended.
    pub default_page_prefix: String,

    /// Matching used when re-resolving branch targets during updates.
    pub target_matching: NameMatching,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            default_page_prefix: "Next Page ".to_string(),
            target_matching: NameMatching::IgnoreCase,
        }
    }
}

impl BookConfig {
    /// Parse and validate a TOML config.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: BookConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| BookError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_page_prefix.trim().is_empty() {
            return Err(BookError::InvalidConfig(
                "default_page_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Name given to a target page when the author left the name blank.
    pub fn default_page_name(&self, page_count: usize) -> String {
        format!("{}{}", self.default_page_prefix, page_count)
    }
}
