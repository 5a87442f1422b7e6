//! # Story Book
//!
//! The canonical storybook graph. A [`Book`] owns every page and branch and is
//! the only place they are created. The editor talks to it through two
//! mutating operations:
//!
//! - **add_branch_to_page**: adds a hotspot to a page, creating the target
//!   page when no page carries the requested name yet
//! - **update_page**: folds page and branch edits made in the editor back
//!   into the book, reporting anything it could not match
//!
//! The graph is deliberately permissive. Cycles, unowned branches and
//! unresolved targets are allowed; [`Book::check_consistency`] lists them
//! without changing anything.

pub mod book;
pub mod config;
pub mod error;
pub mod snapshot;

pub use book::*;
pub use config::*;
pub use error::*;
pub use snapshot::*;
