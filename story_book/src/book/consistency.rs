//! Consistency report.
//!
//! The book never rejects a dangling reference or a duplicate name. This
//! module only lists them so an editor can warn the author.

use std::collections::{HashMap, HashSet};

use story_model::{BranchId, PageId};

use super::Book;

/// A place where the graph does not line up.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Inconsistency {
    /// More than one stored page carries this ID. Lookups see the first.
    DuplicatePageId(PageId),
    /// More than one stored branch carries this ID. Lookups see the first.
    DuplicateBranchId(BranchId),
    /// A stored branch that no page lists.
    UnownedBranch(BranchId),
    /// A page lists a branch the book does not hold.
    MissingBranch { page: PageId, branch: BranchId },
    /// A branch points at a page the book does not hold.
    DanglingTarget { branch: BranchId, target: PageId },
    /// A branch whose target name did not resolve.
    UnresolvedTarget(BranchId),
    /// More than one page answers to this name (compared ignoring case).
    DuplicatePageName(String),
}

impl Book {
    /// List every inconsistency in the graph. Cycles are not reported.
    pub fn check_consistency(&self) -> Vec<Inconsistency> {
        let mut issues = Vec::new();

        let mut seen_pages = HashSet::new();
        for page in &self.pages {
            if !seen_pages.insert(page.id()) {
                issues.push(Inconsistency::DuplicatePageId(page.id()));
            }
        }
        let mut seen_branches = HashSet::new();
        for branch in &self.branches {
            if !seen_branches.insert(branch.id()) {
                issues.push(Inconsistency::DuplicateBranchId(branch.id()));
            }
        }

        let owned: HashSet<BranchId> = self
            .pages
            .iter()
            .flat_map(|page| page.branch_ids.iter().copied())
            .collect();

        for page in &self.pages {
            for branch_id in &page.branch_ids {
                if self.find_branch(*branch_id).is_none() {
                    issues.push(Inconsistency::MissingBranch {
                        page: page.id(),
                        branch: *branch_id,
                    });
                }
            }
        }

        for branch in &self.branches {
            if !owned.contains(&branch.id()) {
                issues.push(Inconsistency::UnownedBranch(branch.id()));
            }
            match branch.next_page_id {
                None => issues.push(Inconsistency::UnresolvedTarget(branch.id())),
                Some(target) if self.find_page_by_id(target).is_none() => {
                    issues.push(Inconsistency::DanglingTarget {
                        branch: branch.id(),
                        target,
                    });
                }
                Some(_) => {}
            }
        }

        let mut name_counts: HashMap<String, usize> = HashMap::new();
        for page in &self.pages {
            *name_counts.entry(page.name.to_lowercase()).or_default() += 1;
        }
        let mut duplicates: Vec<_> = name_counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(name, _)| name)
            .collect();
        duplicates.sort();
        issues.extend(duplicates.into_iter().map(Inconsistency::DuplicatePageName));

        issues
    }

    /// True when [`Book::check_consistency`] finds nothing.
    pub fn is_consistent(&self) -> bool {
        self.check_consistency().is_empty()
    }
}
