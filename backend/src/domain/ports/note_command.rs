//! Driving port for note mutations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, NoteId};

/// Transfer representation of a note.
///
/// `id` is `None` for notes that were never stored and serializes as
/// `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDto {
    /// Storage identifier; `None` until persisted.
    pub id: Option<NoteId>,
    pub title: String,
    pub content: String,
}

/// Create, update, and delete notes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoteCommand: Send + Sync {
    /// Store a new note unless its title is already taken.
    ///
    /// A taken title (ignoring case) is not an error: the unsaved note is
    /// returned with no identifier.
    async fn create_note(&self, note: NoteDto) -> Result<NoteDto, Error>;

    /// Rewrite the title and content of note `id`.
    async fn update_note(&self, id: NoteId, note: NoteDto) -> Result<NoteDto, Error>;

    /// Remove note `id`.
    async fn delete_note(&self, id: NoteId) -> Result<(), Error>;
}
