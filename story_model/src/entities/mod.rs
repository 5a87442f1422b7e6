//! Entity definitions for the storybook graph.

mod branch;
mod components;
mod page;

pub use branch::*;
pub use components::*;
pub use page::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId(pub Uuid);

impl PageId {
    /// Create a new random page ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a page ID from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The unset page ID.
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BranchId(pub Uuid);

impl BranchId {
    /// Create a new random branch ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a branch ID from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for BranchId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BranchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Entities whose equality is decided by identifier alone.
///
/// Implementors should derive `PartialEq`/`Hash` from [`Identified::id`] so two
/// values with the same ID are always the same entity, whatever their fields.
pub trait Identified {
    type Id: Copy + Eq + std::hash::Hash;

    fn id(&self) -> Self::Id;

    /// Check whether `other` refers to the same entity.
    fn same_entity<O>(&self, other: &O) -> bool
    where
        O: Identified<Id = Self::Id> + ?Sized,
    {
        self.id() == other.id()
    }

    /// Check whether this entity carries the given ID.
    fn is(&self, id: Self::Id) -> bool {
        self.id() == id
    }
}
