//! Reconciliation - folding editor changes back into the book.
//!
//! The editor works on its own copies of a page and its branches. When the
//! author is done it sends a [`PageEdit`]; [`Book::update_page`] applies it and
//! returns an [`UpdateReport`] listing what changed and what could not be
//! matched.

use story_model::{
    handle_name, AssetHandle, AudioHandle, Branch, BranchId, Identified, ImageHandle, Page,
    PageId, Vec2,
};
use tracing::{debug, error, warn};

use super::Book;
use crate::error::Diagnostic;

/// The editor's copy of a branch.
#[derive(Debug, Clone)]
pub struct BranchEdit {
    id: BranchId,
    pub location: Vec2,
    pub size: Vec2,
    /// Raw image name, re-applied verbatim when the size changes.
    pub image: Option<String>,
    pub image_handle: Option<ImageHandle>,
    pub audio_handle: Option<AudioHandle>,
    /// Target page name, re-resolved on update.
    pub next_page_name: String,
}

impl BranchEdit {
    /// Start an edit for a branch known only by ID. Every field is applied on
    /// update, so fill in all of them.
    pub fn new(id: BranchId) -> Self {
        Self {
            id,
            location: Vec2::ZERO,
            size: Vec2::ZERO,
            image: None,
            image_handle: None,
            audio_handle: None,
            next_page_name: String::new(),
        }
    }

    pub fn id(&self) -> BranchId {
        self.id
    }
}

impl From<&Branch> for BranchEdit {
    fn from(branch: &Branch) -> Self {
        Self {
            id: branch.id(),
            location: branch.location,
            size: branch.size,
            image: branch.image.clone(),
            image_handle: branch.image_handle.clone(),
            audio_handle: branch.audio_handle.clone(),
            next_page_name: branch.next_page_name.clone(),
        }
    }
}

impl Identified for BranchEdit {
    type Id = BranchId;

    fn id(&self) -> BranchId {
        self.id
    }
}

impl PartialEq for BranchEdit {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for BranchEdit {}

impl PartialEq<BranchId> for BranchEdit {
    fn eq(&self, other: &BranchId) -> bool {
        self.id == *other
    }
}

impl std::hash::Hash for BranchEdit {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Changes to a page and some of its branches.
///
/// The background and music handles are not optional overrides: `None` means
/// the author removed the asset.
#[derive(Debug, Clone)]
pub struct PageEdit {
    pub page_id: PageId,
    pub name: String,
    pub background: Option<ImageHandle>,
    pub background_music: Option<AudioHandle>,
    pub branches: Vec<BranchEdit>,
}

impl PageEdit {
    pub fn new(page_id: PageId, name: impl Into<String>) -> Self {
        Self {
            page_id,
            name: name.into(),
            background: None,
            background_music: None,
            branches: Vec::new(),
        }
    }

    pub fn with_background(mut self, background: Option<ImageHandle>) -> Self {
        self.background = background;
        self
    }

    pub fn with_music(mut self, music: Option<AudioHandle>) -> Self {
        self.background_music = music;
        self
    }

    pub fn with_branch(mut self, branch: BranchEdit) -> Self {
        self.branches.push(branch);
        self
    }

    pub fn with_branches(mut self, branches: impl IntoIterator<Item = BranchEdit>) -> Self {
        self.branches.extend(branches);
        self
    }
}

/// What [`Book::update_page`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Whether the page was found. Branch failures do not clear this.
    pub success: bool,
    pub diagnostics: Vec<Diagnostic>,
    pub background_changed: bool,
    pub background_music_changed: bool,
    pub updated_branches: Vec<BranchId>,
}

impl UpdateReport {
    fn page_not_found(page_id: PageId) -> Self {
        Self {
            diagnostics: vec![Diagnostic::PageNotFound(page_id)],
            ..Self::default()
        }
    }

    /// True when the page was found and every branch edit applied.
    pub fn is_clean(&self) -> bool {
        self.success && self.diagnostics.is_empty()
    }

    /// Branches that could not be matched.
    pub fn missing_branches(&self) -> impl Iterator<Item = BranchId> + '_ {
        self.diagnostics.iter().filter_map(|d| match d {
            Diagnostic::BranchNotFound(id) => Some(*id),
            Diagnostic::PageNotFound(_) => None,
        })
    }
}

impl Book {
    /// Apply editor changes to a page and its branches.
    ///
    /// A missing page fails the whole update and changes nothing. A branch
    /// edit that matches no branch is reported and skipped; the remaining
    /// edits are still applied.
    ///
    /// Each matched branch takes the edit's target name as well as the page ID
    /// resolved from it.
    pub fn update_page(&mut self, edit: PageEdit) -> UpdateReport {
        let PageEdit {
            page_id,
            name,
            background,
            background_music,
            branches,
        } = edit;

        let Some(page) = self.find_page_by_id_mut(page_id) else {
            error!(page_id = %page_id, "page update failed, page not found in story book");
            return UpdateReport::page_not_found(page_id);
        };

        page.name = name;
        let mut report = UpdateReport {
            success: true,
            background_changed: apply_background(page, background.as_ref()),
            background_music_changed: apply_music(page, background_music.as_ref()),
            ..UpdateReport::default()
        };

        for branch_edit in branches {
            let branch_id = branch_edit.id();
            match self.apply_branch_edit(branch_edit) {
                Ok(()) => report.updated_branches.push(branch_id),
                Err(diagnostic) => {
                    warn!(
                        page_id = %page_id,
                        branch_id = %branch_id,
                        "branch edit skipped, branch not found in story book"
                    );
                    report.diagnostics.push(diagnostic);
                }
            }
        }

        debug!(
            page_id = %page_id,
            background_changed = report.background_changed,
            music_changed = report.background_music_changed,
            branches = report.updated_branches.len(),
            skipped = report.diagnostics.len(),
            "page updated"
        );
        report
    }

    fn apply_branch_edit(&mut self, edit: BranchEdit) -> Result<(), Diagnostic> {
        let index = self
            .branch_index
            .get(&edit.id())
            .copied()
            .ok_or(Diagnostic::BranchNotFound(edit.id()))?;
        let next_page_id = self.page_id_by_name(&edit.next_page_name);
        let branch = self
            .branches
            .get_mut(index)
            .filter(|branch| edit.same_entity(&**branch))
            .ok_or(Diagnostic::BranchNotFound(edit.id()))?;

        branch.image = handle_name(edit.image_handle.as_ref());
        branch.location = edit.location;
        // The stored size is never overwritten; a differing size only
        // re-applies the raw image name from the edit.
        if branch.size != edit.size {
            branch.image = edit.image;
        }
        branch.audio = handle_name(edit.audio_handle.as_ref());
        branch.audio_handle = edit.audio_handle;
        branch.next_page_id = next_page_id;
        branch.next_page_name = edit.next_page_name;
        Ok(())
    }
}

/// Clear the background when the handle is gone, replace it when the name
/// differs. Returns whether the page changed.
fn apply_background(page: &mut Page, image: Option<&ImageHandle>) -> bool {
    match image {
        None if page.has_background() => {
            page.background = None;
            true
        }
        Some(handle) if page.background.as_deref() != Some(handle.name()) => {
            let name = handle.asset_name();
            let changed = name != page.background;
            page.background = name;
            changed
        }
        _ => false,
    }
}

/// Set, clear or replace the background music. Returns whether the page
/// changed.
fn apply_music(page: &mut Page, music: Option<&AudioHandle>) -> bool {
    let changed = match (page.background_music.as_deref(), music) {
        (None, Some(handle)) => handle.asset_name().is_some(),
        (Some(_), None) => true,
        (Some(current), Some(handle)) => current != handle.name(),
        (None, None) => false,
    };
    if changed {
        page.background_music = handle_name(music);
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::NewBranch;
    use crate::config::{BookConfig, NameMatching};
    use tracing_test::traced_test;

    fn book_with_branch() -> (Book, PageId, BranchId) {
        let mut book = Book::new();
        let start = book.add_page("Start");
        let branch_id = book
            .add_branch_to_page(
                NewBranch::new(start)
                    .to_page("Forest")
                    .at(Vec2::new(10.0, 10.0))
                    .sized(Vec2::new(50.0, 50.0))
                    .with_image(ImageHandle::new("tree.png"))
                    .with_audio(AudioHandle::new("birds.wav")),
            )
            .id();
        (book, start, branch_id)
    }

    fn edit_of(book: &Book, branch_id: BranchId) -> BranchEdit {
        BranchEdit::from(book.find_branch(branch_id).unwrap())
    }

    #[test]
    fn test_update_renames_page() {
        let (mut book, start, _) = book_with_branch();

        let report = book.update_page(PageEdit::new(start, "Beginning"));

        assert!(report.is_clean());
        assert_eq!(book.find_page_by_id(start).unwrap().name, "Beginning");
    }

    #[test]
    #[traced_test]
    fn test_missing_page_changes_nothing() {
        let (mut book, start, branch_id) = book_with_branch();
        let before = book.clone();
        let missing = PageId::new();

        let mut branch_edit = edit_of(&book, branch_id);
        branch_edit.location = Vec2::new(99.0, 99.0);
        let report = book.update_page(
            PageEdit::new(missing, "Ghost")
                .with_background(Some(ImageHandle::new("ghost.png")))
                .with_branch(branch_edit),
        );

        assert!(!report.success);
        assert_eq!(report.diagnostics, vec![Diagnostic::PageNotFound(missing)]);
        assert!(report.updated_branches.is_empty());
        assert_eq!(book, before);
        assert_eq!(book.find_page_by_id(start).unwrap().name, "Start");
        assert_eq!(
            book.find_branch(branch_id).unwrap().location,
            Vec2::new(10.0, 10.0)
        );
        assert!(logs_contain("page not found"));
    }

    #[test]
    #[traced_test]
    fn test_partial_failure_keeps_going() {
        let (mut book, start, branch_id) = book_with_branch();

        let mut valid = edit_of(&book, branch_id);
        valid.location = Vec2::new(20.0, 30.0);
        let ghost_branch = Branch::new("Nowhere");
        let ghost = BranchEdit::from(&ghost_branch);

        let report = book.update_page(
            PageEdit::new(start, "Start")
                .with_branch(ghost)
                .with_branch(valid),
        );

        assert!(report.success);
        assert!(!report.is_clean());
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::BranchNotFound(ghost_branch.id())]
        );
        assert_eq!(
            report.missing_branches().collect::<Vec<_>>(),
            vec![ghost_branch.id()]
        );
        assert_eq!(report.updated_branches, vec![branch_id]);
        assert_eq!(
            book.find_branch(branch_id).unwrap().location,
            Vec2::new(20.0, 30.0)
        );
        assert!(logs_contain("branch not found"));
    }

    #[test]
    fn test_identical_update_is_noop() {
        let (mut book, start, _) = book_with_branch();
        let page = book.find_page_by_id_mut(start).unwrap();
        page.background = Some("sky.png".into());
        page.background_music = Some("theme.ogg".into());

        let report = book.update_page(
            PageEdit::new(start, "Start")
                .with_background(Some(ImageHandle::new("sky.png")))
                .with_music(Some(AudioHandle::new("theme.ogg"))),
        );

        assert!(report.is_clean());
        assert!(!report.background_changed);
        assert!(!report.background_music_changed);
        let page = book.find_page_by_id(start).unwrap();
        assert_eq!(page.background.as_deref(), Some("sky.png"));
        assert_eq!(page.background_music.as_deref(), Some("theme.ogg"));
    }

    #[test]
    fn test_both_absent_is_noop() {
        let (mut book, start, _) = book_with_branch();

        let report = book.update_page(PageEdit::new(start, "Start"));

        assert!(!report.background_changed);
        assert!(!report.background_music_changed);
    }

    #[test]
    fn test_absent_image_clears_background() {
        let (mut book, start, _) = book_with_branch();
        book.find_page_by_id_mut(start).unwrap().background = Some("sky.png".into());

        let report = book.update_page(PageEdit::new(start, "Start").with_background(None));

        assert!(report.background_changed);
        assert!(book.find_page_by_id(start).unwrap().background.is_none());
    }

    #[test]
    fn test_new_image_replaces_background() {
        let (mut book, start, _) = book_with_branch();
        book.find_page_by_id_mut(start).unwrap().background = Some("sky.png".into());

        let report = book.update_page(
            PageEdit::new(start, "Start").with_background(Some(ImageHandle::new("night.png"))),
        );

        assert!(report.background_changed);
        assert_eq!(
            book.find_page_by_id(start).unwrap().background.as_deref(),
            Some("night.png")
        );
    }

    #[test]
    fn test_music_set_replaced_and_cleared() {
        let (mut book, start, _) = book_with_branch();

        let report = book.update_page(
            PageEdit::new(start, "Start").with_music(Some(AudioHandle::new("calm.ogg"))),
        );
        assert!(report.background_music_changed);
        assert_eq!(
            book.find_page_by_id(start).unwrap().background_music.as_deref(),
            Some("calm.ogg")
        );

        let report = book.update_page(
            PageEdit::new(start, "Start").with_music(Some(AudioHandle::new("storm.ogg"))),
        );
        assert!(report.background_music_changed);
        assert_eq!(
            book.find_page_by_id(start).unwrap().background_music.as_deref(),
            Some("storm.ogg")
        );

        let report = book.update_page(PageEdit::new(start, "Start").with_music(None));
        assert!(report.background_music_changed);
        assert!(book.find_page_by_id(start).unwrap().background_music.is_none());
    }

    #[test]
    fn test_branch_fields_follow_edit() {
        let (mut book, start, branch_id) = book_with_branch();

        let mut edit = edit_of(&book, branch_id);
        edit.location = Vec2::new(1.0, 1.0);
        edit.image_handle = Some(ImageHandle::new("rock.png"));
        edit.audio_handle = None;
        book.update_page(PageEdit::new(start, "Start").with_branch(edit));

        let branch = book.find_branch(branch_id).unwrap();
        assert_eq!(branch.location, Vec2::new(1.0, 1.0));
        assert_eq!(branch.image.as_deref(), Some("rock.png"));
        assert!(branch.audio.is_none());
        assert!(branch.audio_handle.is_none());
    }

    #[test]
    fn test_absent_branch_image_clears_it() {
        let (mut book, start, branch_id) = book_with_branch();

        let mut edit = edit_of(&book, branch_id);
        edit.image_handle = None;
        book.update_page(PageEdit::new(start, "Start").with_branch(edit));

        assert!(book.find_branch(branch_id).unwrap().image.is_none());
    }

    #[test]
    fn test_size_change_reapplies_raw_image_name() {
        let (mut book, start, branch_id) = book_with_branch();

        let mut edit = edit_of(&book, branch_id);
        edit.size = Vec2::new(80.0, 50.0);
        edit.image_handle = Some(ImageHandle::new("new.png"));
        edit.image = Some("raw.png".into());
        book.update_page(PageEdit::new(start, "Start").with_branch(edit));

        let branch = book.find_branch(branch_id).unwrap();
        assert_eq!(branch.image.as_deref(), Some("raw.png"));
        assert_eq!(branch.size, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_same_size_uses_handle_name() {
        let (mut book, start, branch_id) = book_with_branch();

        let mut edit = edit_of(&book, branch_id);
        edit.image_handle = Some(ImageHandle::new("new.png"));
        edit.image = Some("raw.png".into());
        book.update_page(PageEdit::new(start, "Start").with_branch(edit));

        assert_eq!(
            book.find_branch(branch_id).unwrap().image.as_deref(),
            Some("new.png")
        );
    }

    #[test]
    fn test_target_re_resolved_after_rename() {
        let (mut book, start, branch_id) = book_with_branch();
        let forest = book.find_page_by_name("Forest").unwrap().id();

        book.update_page(PageEdit::new(forest, "Dark Woods"));
        let mut edit = edit_of(&book, branch_id);
        edit.next_page_name = "dark woods".into();
        book.update_page(PageEdit::new(start, "Start").with_branch(edit));

        let branch = book.find_branch(branch_id).unwrap();
        assert_eq!(branch.next_page_id, Some(forest));
        assert_eq!(branch.next_page_name, "dark woods");
    }

    #[test]
    fn test_exact_matching_rejects_case_difference() {
        let (mut book, start, branch_id) = book_with_branch();
        book.set_config(BookConfig {
            target_matching: NameMatching::Exact,
            ..BookConfig::default()
        });

        let mut edit = edit_of(&book, branch_id);
        edit.next_page_name = "FOREST".into();
        let report = book.update_page(PageEdit::new(start, "Start").with_branch(edit));

        assert!(report.is_clean());
        assert!(book.find_branch(branch_id).unwrap().next_page_id.is_none());

        let mut edit = edit_of(&book, branch_id);
        edit.next_page_name = "Forest".into();
        book.update_page(PageEdit::new(start, "Start").with_branch(edit));

        let forest = book.find_page_by_name("Forest").unwrap().id();
        assert_eq!(book.find_branch(branch_id).unwrap().next_page_id, Some(forest));
    }

    #[test]
    fn test_edit_built_from_id() {
        let (mut book, start, branch_id) = book_with_branch();

        let mut edit = BranchEdit::new(branch_id);
        edit.location = Vec2::new(2.0, 4.0);
        edit.size = Vec2::new(50.0, 50.0);
        edit.image_handle = Some(ImageHandle::new("gate.png"));
        edit.next_page_name = "forest".into();
        let report = book.update_page(PageEdit::new(start, "Start").with_branch(edit));

        assert_eq!(report.updated_branches, vec![branch_id]);
        let branch = book.find_branch(branch_id).unwrap();
        let forest = book.find_page_by_name("Forest").unwrap().id();
        assert_eq!(branch.location, Vec2::new(2.0, 4.0));
        assert_eq!(branch.image.as_deref(), Some("gate.png"));
        assert!(branch.audio.is_none());
        assert_eq!(branch.next_page_id, Some(forest));
    }

    #[test]
    fn test_unresolvable_target_clears_id() {
        let (mut book, start, branch_id) = book_with_branch();

        let mut edit = edit_of(&book, branch_id);
        edit.next_page_name = "Atlantis".into();
        let report = book.update_page(PageEdit::new(start, "Start").with_branch(edit));

        assert!(report.is_clean());
        assert!(book.find_branch(branch_id).unwrap().next_page_id.is_none());
        assert_eq!(book.page_count(), 2);
    }

    #[test]
    fn test_branch_edit_identity() {
        let (book, _, branch_id) = book_with_branch();
        let mut edit = edit_of(&book, branch_id);
        edit.location = Vec2::new(3.0, 3.0);

        assert_eq!(edit, branch_id);
        assert!(edit.same_entity(book.find_branch(branch_id).unwrap()));
        assert_eq!(edit, edit_of(&book, branch_id));
    }
}
