//! Conversions between [`Note`] and its transfer form [`NoteDto`].
//!
//! Pure and stateless: no validation happens here.

use super::Note;
use super::ports::NoteDto;

impl From<Note> for NoteDto {
    fn from(value: Note) -> Self {
        Self {
            id: value.id(),
            title: value.title().to_owned(),
            content: value.content().to_owned(),
        }
    }
}

impl From<NoteDto> for Note {
    fn from(value: NoteDto) -> Self {
        let note = Self::new(value.title, value.content);
        match value.id {
            Some(id) => note.with_id(id),
            None => note,
        }
    }
}

/// Map a list of notes, preserving order.
pub fn to_dtos(notes: Vec<Note>) -> Vec<NoteDto> {
    notes.into_iter().map(NoteDto::from).collect()
}

/// Map a list of transfer objects, preserving order.
pub fn to_notes(dtos: Vec<NoteDto>) -> Vec<Note> {
    dtos.into_iter().map(Note::from).collect()
}
