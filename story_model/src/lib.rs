//! # Story Model
//!
//! The data half of a branching storybook: pages (story beats), branches
//! (hotspots jumping between pages) and the named asset handles they refer to.
//! This crate holds no graph logic; the `story_book` crate owns the collections
//! and the operations that keep them consistent.

pub mod assets;
pub mod entities;

pub use assets::*;
pub use entities::*;
