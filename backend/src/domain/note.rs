//! Note entity and identifier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Minimum title length, in characters.
pub const TITLE_MIN: usize = 3;
/// Maximum title length, in characters.
pub const TITLE_MAX: usize = 100;
/// Minimum content length, in characters.
pub const CONTENT_MIN: usize = 5;
/// Maximum content length, in characters.
pub const CONTENT_MAX: usize = 500;

/// Storage-assigned note identifier.
///
/// # Examples
/// ```
/// use notes_backend::domain::NoteId;
///
/// let id = NoteId::new(42);
/// assert_eq!(id.get(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(i64);

impl NoteId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for NoteId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A short text note.
///
/// `id` is `None` until the note has been persisted. Once assigned it never
/// changes; updates rewrite `title` and `content` in place. Length bounds are
/// enforced at the HTTP boundary, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    id: Option<NoteId>,
    title: String,
    content: String,
}

impl Note {
    /// Build a note that has not been persisted yet.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
        }
    }

    /// Attach a storage identifier.
    #[must_use]
    pub fn with_id(mut self, id: NoteId) -> Self {
        self.id = Some(id);
        self
    }

    /// Drop any identifier so the note is treated as new.
    #[must_use]
    pub fn into_unsaved(mut self) -> Self {
        self.id = None;
        self
    }

    /// Replace title and content, keeping the identifier.
    pub fn rewrite(&mut self, title: impl Into<String>, content: impl Into<String>) {
        self.title = title.into();
        self.content = content.into();
    }

    /// Storage identifier, if persisted.
    #[must_use]
    pub const fn id(&self) -> Option<NoteId> {
        self.id
    }

    /// Note title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Note body text.
    #[must_use]
    pub fn content(&self) -> &str {
        self.content.as_str()
    }
}
