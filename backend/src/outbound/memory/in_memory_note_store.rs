//! In-memory [`NoteStore`] with the same observable rules as the PostgreSQL
//! adapter: ascending identifiers starting at 1, case-insensitive unique
//! titles, and all-or-nothing transactions.
//!
//! Transactions are serialized by an async writer lock and run against a
//! staged copy of the table that replaces the committed table on success.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use tracing::debug;

use crate::domain::ports::{NoteRepository, NoteRepositoryError, NoteStore};
use crate::domain::{Error, Note, NoteId};

#[derive(Debug, Clone, Default)]
struct NoteTable {
    rows: BTreeMap<NoteId, Note>,
    last_id: i64,
}

/// Upper-case one character at a time, as PostgreSQL's `upper()` does.
///
/// Characters whose uppercase form expands (`ß` to `SS`) are kept unchanged.
fn upper_chars(value: &str) -> impl Iterator<Item = char> + '_ {
    value.chars().map(|c| {
        let mut upper = c.to_uppercase();
        match (upper.next(), upper.next()) {
            (Some(single), None) => single,
            _ => c,
        }
    })
}

fn same_title(left: &str, right: &str) -> bool {
    upper_chars(left).eq(upper_chars(right))
}

impl NoteTable {
    fn next_id(&mut self) -> Result<NoteId, NoteRepositoryError> {
        self.last_id = self
            .last_id
            .checked_add(1)
            .ok_or_else(|| NoteRepositoryError::query("note identifiers exhausted"))?;
        Ok(NoteId::new(self.last_id))
    }

    fn save(&mut self, note: &Note) -> Result<Note, NoteRepositoryError> {
        let clash = self
            .rows
            .values()
            .any(|row| row.id() != note.id() && same_title(row.title(), note.title()));
        if clash {
            return Err(NoteRepositoryError::constraint(
                "a note with this title already exists",
            ));
        }

        let id = match note.id() {
            Some(id) => {
                self.last_id = self.last_id.max(id.get());
                id
            }
            None => self.next_id()?,
        };
        let stored = note.clone().with_id(id);
        self.rows.insert(id, stored.clone());
        Ok(stored)
    }
}

#[derive(Debug, Default)]
struct TableView {
    table: Mutex<NoteTable>,
}

impl TableView {
    fn new(table: NoteTable) -> Self {
        Self {
            table: Mutex::new(table),
        }
    }

    fn read<R>(&self, f: impl FnOnce(&NoteTable) -> R) -> R {
        f(&self.table.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn write<R>(&self, f: impl FnOnce(&mut NoteTable) -> R) -> R {
        f(&mut self.table.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn into_table(self) -> NoteTable {
        self.table.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl NoteRepository for TableView {
    async fn find_by_id(&self, id: NoteId) -> Result<Option<Note>, NoteRepositoryError> {
        Ok(self.read(|table| table.rows.get(&id).cloned()))
    }

    async fn find_all(&self) -> Result<Vec<Note>, NoteRepositoryError> {
        Ok(self.read(|table| table.rows.values().cloned().collect()))
    }

    async fn save(&self, note: &Note) -> Result<Note, NoteRepositoryError> {
        self.write(|table| table.save(note))
    }

    async fn delete_by_id(&self, id: NoteId) -> Result<(), NoteRepositoryError> {
        self.write(|table| table.rows.remove(&id));
        Ok(())
    }

    async fn exists_by_id(&self, id: NoteId) -> Result<bool, NoteRepositoryError> {
        Ok(self.read(|table| table.rows.contains_key(&id)))
    }

    async fn exists_by_title_ignore_case(
        &self,
        title: &str,
    ) -> Result<bool, NoteRepositoryError> {
        Ok(self.read(|table| table.rows.values().any(|row| same_title(row.title(), title))))
    }
}

/// Note store kept in process memory.
///
/// Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryNoteStore {
    committed: TableView,
    writer: tokio::sync::Mutex<()>,
}

impl InMemoryNoteStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteStore {
    async fn find_by_id(&self, id: NoteId) -> Result<Option<Note>, NoteRepositoryError> {
        self.committed.find_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<Note>, NoteRepositoryError> {
        self.committed.find_all().await
    }

    async fn save(&self, note: &Note) -> Result<Note, NoteRepositoryError> {
        let _writer = self.writer.lock().await;
        self.committed.save(note).await
    }

    async fn delete_by_id(&self, id: NoteId) -> Result<(), NoteRepositoryError> {
        let _writer = self.writer.lock().await;
        self.committed.delete_by_id(id).await
    }

    async fn exists_by_id(&self, id: NoteId) -> Result<bool, NoteRepositoryError> {
        self.committed.exists_by_id(id).await
    }

    async fn exists_by_title_ignore_case(
        &self,
        title: &str,
    ) -> Result<bool, NoteRepositoryError> {
        self.committed.exists_by_title_ignore_case(title).await
    }
}

#[async_trait]
impl NoteStore for InMemoryNoteStore {
    async fn transaction<T, F>(&self, work: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: for<'t> FnOnce(&'t dyn NoteRepository) -> BoxFuture<'t, Result<T, Error>>
            + Send
            + 'static,
    {
        let _writer = self.writer.lock().await;
        let staged = TableView::new(self.committed.read(Clone::clone));
        let view: &dyn NoteRepository = &staged;
        let outcome = work(view).await;
        match &outcome {
            Ok(_) => {
                let table = staged.into_table();
                self.committed.write(|committed| *committed = table);
            }
            Err(error) => debug!(%error, "in-memory transaction rolled back"),
        }
        outcome
    }
}
