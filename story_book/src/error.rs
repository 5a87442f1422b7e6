//! Error and diagnostic types.

use std::path::PathBuf;

use story_model::{BranchId, PageId};
use thiserror::Error;

/// Lookup failures reported by book operations.
///
/// These never abort more than the piece of work they describe: a missing
/// page fails its whole update, a missing branch only skips that branch.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Diagnostic {
    #[error("page not found in story book: {0}")]
    PageNotFound(PageId),

    #[error("branch not found in story book: {0}")]
    BranchNotFound(BranchId),
}

/// Errors from loading or saving books and configuration.
#[derive(Error, Debug)]
pub enum BookError {
    #[error("invalid book data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, BookError>;
