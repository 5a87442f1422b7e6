//! Page definitions.

use serde::{Deserialize, Serialize};

use super::{BranchId, Identified, PageId};
use crate::assets::empty_as_none;

/// A story beat: a node in the storybook graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    id: PageId,

    /// Display name. Branch targets are resolved against it, ignoring case.
    pub name: String,

    /// Name of the background image, if any.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub background: Option<String>,

    /// Name of the background music clip. `None` means silence.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub background_music: Option<String>,

    /// Branches leaving this page, in the order they were added.
    #[serde(default)]
    pub branch_ids: Vec<BranchId>,
}

impl Page {
    /// Create a page with a fresh ID and no background, music or branches.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: PageId::new(),
            name: name.into(),
            background: None,
            background_music: None,
            branch_ids: Vec::new(),
        }
    }

    pub fn id(&self) -> PageId {
        self.id
    }

    /// Case-insensitive name comparison used for target lookups.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// Check if a branch originates from this page.
    pub fn owns(&self, branch_id: BranchId) -> bool {
        self.branch_ids.contains(&branch_id)
    }

    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    pub fn has_music(&self) -> bool {
        self.background_music.is_some()
    }
}

impl Identified for Page {
    type Id = PageId;

    fn id(&self) -> PageId {
        self.id
    }
}

impl PartialEq for Page {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Page {}

impl PartialEq<PageId> for Page {
    fn eq(&self, other: &PageId) -> bool {
        self.id == *other
    }
}

impl std::hash::Hash for Page {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
