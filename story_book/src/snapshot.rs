//! Plain-data view of a book for persistence.
//!
//! Only names, IDs and geometry are stored. Asset handles are resolved again
//! by the asset loader after a book is loaded.

use serde::{Deserialize, Serialize};

use story_model::{Branch, Page};

use crate::book::Book;
use crate::config::BookConfig;
use crate::error::Result;

/// Everything a book persists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookSnapshot {
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub branches: Vec<Branch>,
    #[serde(default, deserialize_with = "story_model::empty_as_none")]
    pub background_music: Option<String>,
}

impl From<Book> for BookSnapshot {
    fn from(book: Book) -> Self {
        let (pages, branches, background_music) = book.into_parts();
        Self {
            pages,
            branches,
            background_music,
        }
    }
}

impl From<BookSnapshot> for Book {
    fn from(snapshot: BookSnapshot) -> Self {
        Book::from_parts(
            snapshot.pages,
            snapshot.branches,
            snapshot.background_music,
        )
    }
}

impl Book {
    /// Serialize the book to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a book from JSON with default configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a book from JSON with the given configuration.
    pub fn from_json_with_config(json: &str, config: BookConfig) -> Result<Self> {
        let mut book = Self::from_json(json)?;
        book.set_config(config);
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::{BranchEdit, NewBranch, PageEdit};
    use crate::error::BookError;
    use story_model::{AudioHandle, ImageHandle, Vec2};

    #[test]
    fn test_save_and_load() {
        let mut book = Book::new();
        book.set_background_music(Some("theme.ogg".into()));
        let start = book.add_page("Start");
        let branch_id = book
            .add_branch_to_page(
                NewBranch::new(start)
                    .to_page("End")
                    .at(Vec2::new(4.0, 8.0))
                    .with_image(ImageHandle::new("arrow.png"))
                    .with_audio(AudioHandle::new("step.wav")),
            )
            .id();

        let json = book.to_json().unwrap();
        let loaded = Book::from_json(&json).unwrap();

        assert_eq!(loaded, book);
        assert_eq!(loaded.background_music(), Some("theme.ogg"));
        assert_eq!(loaded.find_page_by_id(start).unwrap().branch_ids, vec![branch_id]);

        let branch = loaded.find_branch(branch_id).unwrap();
        assert_eq!(branch.location, Vec2::new(4.0, 8.0));
        assert_eq!(branch.image.as_deref(), Some("arrow.png"));
        assert_eq!(branch.audio.as_deref(), Some("step.wav"));
        assert!(branch.audio_handle.is_none());
    }

    #[test]
    fn test_loaded_book_is_editable() {
        let mut book = Book::new();
        let start = book.add_page("Start");
        let branch_id = book
            .add_branch_to_page(NewBranch::new(start).to_page("End"))
            .id();

        let mut loaded = Book::from_json(&book.to_json().unwrap()).unwrap();
        let mut edit = BranchEdit::from(loaded.find_branch(branch_id).unwrap());
        edit.location = Vec2::new(7.0, 7.0);
        let report = loaded.update_page(PageEdit::new(start, "Start").with_branch(edit));

        assert!(report.is_clean());
        assert_eq!(
            loaded.find_branch(branch_id).unwrap().location,
            Vec2::new(7.0, 7.0)
        );
    }

    #[test]
    fn test_legacy_empty_strings_load_as_absent() {
        let json = r#"{
            "pages": [
                {
                    "id": "6f1c1d4e-6a8e-4b7f-9a53-2b1f5d0c8e11",
                    "name": "Start",
                    "background": "",
                    "background_music": ""
                }
            ],
            "branches": [],
            "background_music": ""
        }"#;

        let book = Book::from_json(json).unwrap();
        let page = &book.pages()[0];
        assert!(page.background.is_none());
        assert!(page.background_music.is_none());
        assert!(book.background_music().is_none());
    }

    #[test]
    fn test_invalid_json() {
        let err = Book::from_json("{\"pages\": 3}").unwrap_err();
        assert!(matches!(err, BookError::Json(_)));
    }

    #[test]
    fn test_load_with_config() {
        let json = Book::new().to_json().unwrap();
        let config = BookConfig {
            default_page_prefix: "Scene ".into(),
            ..BookConfig::default()
        };

        let mut book = Book::from_json_with_config(&json, config).unwrap();
        let start = book.add_page("Start");
        let branch = book.add_branch_to_page(NewBranch::new(start));
        assert_eq!(branch.next_page_name, "Scene 1");
    }
}
