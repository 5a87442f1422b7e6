//! Branch creation.
//!
//! Adding a branch is a two-step contract: the target name is resolved to an
//! existing page or a new page is created for it, then the branch is built,
//! linked to its source page and stored.

use story_model::{AudioHandle, Branch, ImageHandle, Page, PageId, Vec2};
use tracing::{debug, warn};

use super::Book;

/// Outcome of resolving a target page name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageResolution {
    /// A page with that name already existed.
    Reused(PageId),
    /// No page matched, so one was created.
    Created(PageId),
}

impl PageResolution {
    pub fn page_id(self) -> PageId {
        match self {
            PageResolution::Reused(id) | PageResolution::Created(id) => id,
        }
    }

    pub fn was_created(self) -> bool {
        matches!(self, PageResolution::Created(_))
    }
}

/// Request to add a branch to a page.
#[derive(Debug, Clone)]
pub struct NewBranch {
    /// Page the branch starts from.
    pub source: PageId,
    /// Target page name. Left empty, a default name is generated.
    pub next_page_name: String,
    pub location: Vec2,
    pub size: Vec2,
    pub image: Option<ImageHandle>,
    pub audio: Option<AudioHandle>,
}

impl NewBranch {
    pub fn new(source: PageId) -> Self {
        Self {
            source,
            next_page_name: String::new(),
            location: Vec2::ZERO,
            size: Vec2::ZERO,
            image: None,
            audio: None,
        }
    }

    /// Set the target page name.
    pub fn to_page(mut self, name: impl Into<String>) -> Self {
        self.next_page_name = name.into();
        self
    }

    pub fn at(mut self, location: Vec2) -> Self {
        self.location = location;
        self
    }

    pub fn sized(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_image(mut self, image: ImageHandle) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_audio(mut self, audio: AudioHandle) -> Self {
        self.audio = Some(audio);
        self
    }
}

impl Book {
    /// Find the first page named `name` (ignoring case), or create it.
    ///
    /// An empty name is replaced by the default page name first.
    pub fn resolve_or_create_page(&mut self, name: &str) -> PageResolution {
        let name = if name.is_empty() {
            self.config.default_page_name(self.pages.len())
        } else {
            name.to_string()
        };
        match self.find_page_by_name(&name) {
            Some(page) => PageResolution::Reused(page.id()),
            None => PageResolution::Created(self.push_page(Page::new(name))),
        }
    }

    /// Add a branch to a page and return it.
    ///
    /// # Algorithm
    ///
    /// 1. An empty target name becomes `default_page_prefix` + page count
    /// 2. The target is resolved by name, creating the page if needed
    /// 3. The branch is built from the request and pointed at the target
    /// 4. The branch ID is appended to the source page's branch list
    /// 5. The branch is stored in the book
    ///
    /// An unknown source page does not fail the call: the branch is still
    /// stored, but no page owns it.
    pub fn add_branch_to_page(&mut self, request: NewBranch) -> &Branch {
        let NewBranch {
            source,
            next_page_name,
            location,
            size,
            image,
            audio,
        } = request;

        let next_page_name = if next_page_name.is_empty() {
            self.config.default_page_name(self.pages.len())
        } else {
            next_page_name
        };

        let target = self.resolve_or_create_page(&next_page_name);

        let branch = Branch::new(next_page_name)
            .at(location)
            .sized(size)
            .with_image(image)
            .with_audio(audio)
            .targeting(target.page_id());
        let branch_id = branch.id();

        match self.find_page_by_id_mut(source) {
            Some(page) => page.branch_ids.push(branch_id),
            None => warn!(
                branch_id = %branch_id,
                page_id = %source,
                "source page not found, branch is not owned by any page"
            ),
        }

        debug!(
            branch_id = %branch_id,
            page_id = %source,
            target = %target.page_id(),
            created_target = target.was_created(),
            "branch added"
        );
        self.push_branch(branch)
    }
}
