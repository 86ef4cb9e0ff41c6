//! Diesel row structs for the `notes` table.
//!
//! Internal to the persistence layer; the domain only ever sees [`Note`].

use diesel::prelude::*;

use crate::domain::{Note, NoteId};

use super::schema::notes;

/// Row read from `notes`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NoteRow {
    pub id: i64,
    pub title: String,
    pub content: String,
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Self::new(row.title, row.content).with_id(NoteId::new(row.id))
    }
}

/// Insert without an identifier; the sequence assigns one.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notes)]
pub(crate) struct NewNoteRow<'a> {
    pub title: &'a str,
    pub content: &'a str,
}

/// Insert under a known identifier.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notes)]
pub(crate) struct NoteRecordRow<'a> {
    pub id: i64,
    pub title: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = notes)]
pub(crate) struct NoteUpdate<'a> {
    pub title: &'a str,
    pub content: &'a str,
}
