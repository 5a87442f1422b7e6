//! The book aggregate - owner of all pages and branches.

mod consistency;
mod create;
mod reconcile;

pub use consistency::*;
pub use create::*;
pub use reconcile::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use story_model::{Branch, BranchId, Identified, Page, PageId};
use tracing::debug;

use crate::config::BookConfig;
use crate::snapshot::BookSnapshot;

/// A branching storybook.
///
/// Pages and branches keep their insertion order for listing. Lookups by ID go
/// through indexes that are rebuilt whenever a book is loaded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "BookSnapshot", into = "BookSnapshot")]
pub struct Book {
    pages: Vec<Page>,
    branches: Vec<Branch>,

    /// Book-wide default music, passed through untouched.
    background_music: Option<String>,

    page_index: HashMap<PageId, usize>,
    branch_index: HashMap<BranchId, usize>,

    config: BookConfig,
}

impl Book {
    /// Create an empty book with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty book with the given configuration.
    pub fn with_config(config: BookConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: BookConfig) {
        self.config = config;
    }

    /// Add a page with the given name and return its ID.
    ///
    /// Names are not checked for uniqueness; name lookups return the first match.
    pub fn add_page(&mut self, name: impl Into<String>) -> PageId {
        self.push_page(Page::new(name))
    }

    /// Get a page by ID.
    pub fn find_page_by_id(&self, id: PageId) -> Option<&Page> {
        self.page_index.get(&id).and_then(|&i| self.pages.get(i))
    }

    /// Get a mutable page by ID.
    pub fn find_page_by_id_mut(&mut self, id: PageId) -> Option<&mut Page> {
        match self.page_index.get(&id) {
            Some(&i) => self.pages.get_mut(i),
            None => None,
        }
    }

    /// Get the first page whose name matches, ignoring case.
    pub fn find_page_by_name(&self, name: &str) -> Option<&Page> {
        self.pages.iter().find(|page| page.is_named(name))
    }

    /// Resolve a branch target name to a page ID, using the configured matching.
    pub fn page_id_by_name(&self, name: &str) -> Option<PageId> {
        let matching = self.config.target_matching;
        self.pages
            .iter()
            .find(|page| matching.matches(&page.name, name))
            .map(Page::id)
    }

    /// Get a branch by ID.
    pub fn find_branch(&self, id: BranchId) -> Option<&Branch> {
        self.branch_index.get(&id).and_then(|&i| self.branches.get(i))
    }

    /// Branches leaving a page, in the page's order. IDs the book does not
    /// hold are skipped.
    pub fn branches_of(&self, page_id: PageId) -> Vec<&Branch> {
        self.find_page_by_id(page_id)
            .map(|page| {
                page.branch_ids
                    .iter()
                    .filter_map(|id| self.find_branch(*id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All pages in insertion order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// All branches in insertion order.
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    pub fn background_music(&self) -> Option<&str> {
        self.background_music.as_deref()
    }

    pub fn set_background_music(&mut self, name: Option<String>) {
        self.background_music = name.filter(|n| !n.is_empty());
    }

    pub(crate) fn push_page(&mut self, page: Page) -> PageId {
        let id = page.id();
        debug!(page_id = %id, name = %page.name, "page added");
        self.page_index.entry(id).or_insert(self.pages.len());
        self.pages.push(page);
        id
    }

    pub(crate) fn push_branch(&mut self, branch: Branch) -> &Branch {
        let index = self.branches.len();
        self.branch_index.entry(branch.id()).or_insert(index);
        self.branches.push(branch);
        &self.branches[index]
    }

    /// Build a book from plain data, rebuilding the ID indexes.
    ///
    /// Should the data repeat an ID, lookups resolve to its first occurrence.
    pub(crate) fn from_parts(
        pages: Vec<Page>,
        branches: Vec<Branch>,
        background_music: Option<String>,
    ) -> Self {
        let mut page_index = HashMap::with_capacity(pages.len());
        for (i, page) in pages.iter().enumerate() {
            page_index.entry(page.id()).or_insert(i);
        }
        let mut branch_index = HashMap::with_capacity(branches.len());
        for (i, branch) in branches.iter().enumerate() {
            branch_index.entry(branch.id()).or_insert(i);
        }

        Self {
            pages,
            branches,
            background_music: background_music.filter(|n| !n.is_empty()),
            page_index,
            branch_index,
            config: BookConfig::default(),
        }
    }

    pub(crate) fn into_parts(self) -> (Vec<Page>, Vec<Branch>, Option<String>) {
        (self.pages, self.branches, self.background_music)
    }
}

/// Two books are equal when they hold the same pages and branches, by ID and
/// in the same order.
impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.pages.len() == other.pages.len()
            && self.branches.len() == other.branches.len()
            && self.pages.iter().zip(&other.pages).all(|(a, b)| a.same_entity(b))
            && self
                .branches
                .iter()
                .zip(&other.branches)
                .all(|(a, b)| a.same_entity(b))
    }
}

impl Eq for Book {}
