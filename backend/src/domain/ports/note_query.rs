//! Driving port for note reads.

use async_trait::async_trait;

use crate::domain::{Error, NoteId};

use super::NoteDto;

/// Read notes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoteQuery: Send + Sync {
    /// Every stored note, in storage order.
    async fn get_all_notes(&self) -> Result<Vec<NoteDto>, Error>;

    /// The note with identifier `id`.
    async fn get_note_by_id(&self, id: NoteId) -> Result<NoteDto, Error>;
}
