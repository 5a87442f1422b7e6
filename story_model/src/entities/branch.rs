//! Branch definitions.

use serde::{Deserialize, Serialize};

use super::{BranchId, Identified, PageId, Vec2};
use crate::assets::{empty_as_none, handle_name, AudioHandle, ImageHandle};

/// A hotspot on a page that jumps to another page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    id: BranchId,

    pub location: Vec2,
    pub size: Vec2,

    /// Name of the hotspot image.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub image: Option<String>,

    /// Name of the hotspot sound effect.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub audio: Option<String>,

    /// Destination page. `None` when the target name did not resolve.
    #[serde(default)]
    pub next_page_id: Option<PageId>,

    /// Destination name as the author typed it, kept so the target can be
    /// resolved again after pages are renamed.
    pub next_page_name: String,

    // Live handles from the asset loader; only their names are persisted.
    #[serde(skip)]
    pub image_handle: Option<ImageHandle>,
    #[serde(skip)]
    pub audio_handle: Option<AudioHandle>,
}

impl Branch {
    /// Create a branch with a fresh ID pointing at `next_page_name`, unresolved.
    pub fn new(next_page_name: impl Into<String>) -> Self {
        Self {
            id: BranchId::new(),
            location: Vec2::ZERO,
            size: Vec2::ZERO,
            image: None,
            audio: None,
            next_page_id: None,
            next_page_name: next_page_name.into(),
            image_handle: None,
            audio_handle: None,
        }
    }

    pub fn id(&self) -> BranchId {
        self.id
    }

    /// Set the hotspot location.
    pub fn at(mut self, location: Vec2) -> Self {
        self.location = location;
        self
    }

    /// Set the hotspot size.
    pub fn sized(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    /// Attach an image handle, recording its name.
    pub fn with_image(mut self, image: Option<ImageHandle>) -> Self {
        self.image = handle_name(image.as_ref());
        self.image_handle = image;
        self
    }

    /// Attach a sound effect handle, recording its name.
    pub fn with_audio(mut self, audio: Option<AudioHandle>) -> Self {
        self.audio = handle_name(audio.as_ref());
        self.audio_handle = audio;
        self
    }

    /// Point the branch at a resolved page.
    pub fn targeting(mut self, page_id: PageId) -> Self {
        self.next_page_id = Some(page_id);
        self
    }

    pub fn is_resolved(&self) -> bool {
        self.next_page_id.is_some()
    }
}

impl Identified for Branch {
    type Id = BranchId;

    fn id(&self) -> BranchId {
        self.id
    }
}

impl PartialEq for Branch {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Branch {}

impl PartialEq<BranchId> for Branch {
    fn eq(&self, other: &BranchId) -> bool {
        self.id == *other
    }
}

impl std::hash::Hash for Branch {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
