//! Asset handles supplied by the asset loader.
//!
//! The storybook only ever persists an asset's canonical name. Pixel and sample
//! data stay with whoever resolved the handle.

mod names;

pub use names::*;

use serde::{Deserialize, Serialize};

/// Anything that can be resolved back to a named asset.
pub trait AssetHandle {
    /// Canonical name of the asset.
    fn name(&self) -> &str;

    /// The name to store, or `None` when the handle carries no usable name.
    fn asset_name(&self) -> Option<String> {
        let name = self.name();
        if name.is_empty() {
            None
        } else {
            Some(name.to_owned())
        }
    }
}

/// Handle to a loaded image (page backgrounds, hotspot visuals).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHandle {
    name: String,
}

impl ImageHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl AssetHandle for ImageHandle {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Handle to a loaded audio clip (background music, hotspot sound effects).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioHandle {
    name: String,
}

impl AudioHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl AssetHandle for AudioHandle {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Name stored for an optional handle. An absent handle is not an error.
pub fn handle_name<H: AssetHandle>(handle: Option<&H>) -> Option<String> {
    handle.and_then(AssetHandle::asset_name)
}
