//! Note service implementing the note driving ports.
//!
//! Writes run inside one [`NoteStore::transaction`] each; reads go straight to
//! the repository.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::FutureExt as _;
use tracing::{debug, info, warn};

use crate::domain::note_mapping::to_dtos;
use crate::domain::ports::{NoteCommand, NoteDto, NoteQuery, NoteRepository, NoteStore};
use crate::domain::{Error, Note, NoteId};

fn note_not_found(id: NoteId) -> Error {
    Error::not_found(format!("note with id = {id} not found"))
}

fn title_taken(title: &str) -> Error {
    Error::title_conflict(format!("note with title = {title} already exists"))
}

async fn create_in(repo: &dyn NoteRepository, note: Note) -> Result<NoteDto, Error> {
    if repo.exists_by_title_ignore_case(note.title()).await? {
        info!(title = note.title(), "title already taken, note not stored");
        return Ok(NoteDto::from(note));
    }
    let saved = repo.save(&note).await?;
    Ok(NoteDto::from(saved))
}

async fn update_in(
    repo: &dyn NoteRepository,
    id: NoteId,
    changes: NoteDto,
) -> Result<NoteDto, Error> {
    // The lookup does not exclude note `id`, so resubmitting a note's current
    // title is rejected as a conflict. Probably wrong, but clients may rely on
    // it; change together with the create path.
    if repo.exists_by_title_ignore_case(&changes.title).await? {
        warn!(note_id = %id, title = %changes.title, "update rejected, title already taken");
        return Err(title_taken(&changes.title));
    }
    let Some(mut note) = repo.find_by_id(id).await? else {
        warn!(note_id = %id, "update rejected, note not found");
        return Err(note_not_found(id));
    };
    note.rewrite(changes.title, changes.content);
    let saved = repo.save(&note).await?;
    Ok(NoteDto::from(saved))
}

async fn delete_in(repo: &dyn NoteRepository, id: NoteId) -> Result<(), Error> {
    if !repo.exists_by_id(id).await? {
        warn!(note_id = %id, "delete rejected, note not found");
        return Err(note_not_found(id));
    }
    repo.delete_by_id(id).await?;
    Ok(())
}

/// Note use-cases over any [`NoteStore`].
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use notes_backend::domain::NoteService;
/// use notes_backend::domain::ports::{NoteCommand as _, NoteDto, NoteQuery as _};
/// use notes_backend::outbound::memory::InMemoryNoteStore;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let service = NoteService::new(Arc::new(InMemoryNoteStore::new()));
/// let created = service
///     .create_note(NoteDto { id: None, title: "Shopping".into(), content: "buy milk".into() })
///     .await
///     .expect("create succeeds");
/// let id = created.id.expect("stored note has an id");
/// assert_eq!(service.get_note_by_id(id).await.expect("note exists"), created);
/// # });
/// ```
pub struct NoteService<S> {
    store: Arc<S>,
}

impl<S> NoteService<S> {
    /// Create a service over `store`.
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S> Clone for NoteService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

#[async_trait]
impl<S> NoteCommand for NoteService<S>
where
    S: NoteStore,
{
    async fn create_note(&self, note: NoteDto) -> Result<NoteDto, Error> {
        let note = Note::from(note).into_unsaved();
        info!(title = note.title(), "creating note");
        let created = self
            .store
            .transaction(move |repo| create_in(repo, note).boxed())
            .await?;
        debug!(note_id = ?created.id, "create finished");
        Ok(created)
    }

    async fn update_note(&self, id: NoteId, note: NoteDto) -> Result<NoteDto, Error> {
        info!(note_id = %id, title = %note.title, "updating note");
        let updated = self
            .store
            .transaction(move |repo| update_in(repo, id, note).boxed())
            .await?;
        debug!(note_id = %id, "update finished");
        Ok(updated)
    }

    async fn delete_note(&self, id: NoteId) -> Result<(), Error> {
        info!(note_id = %id, "deleting note");
        self.store
            .transaction(move |repo| delete_in(repo, id).boxed())
            .await?;
        debug!(note_id = %id, "delete finished");
        Ok(())
    }
}

#[async_trait]
impl<S> NoteQuery for NoteService<S>
where
    S: NoteStore,
{
    async fn get_all_notes(&self) -> Result<Vec<NoteDto>, Error> {
        let notes = self.store.find_all().await?;
        debug!(count = notes.len(), "listed notes");
        Ok(to_dtos(notes))
    }

    async fn get_note_by_id(&self, id: NoteId) -> Result<NoteDto, Error> {
        let note = self.store.find_by_id(id).await?.ok_or_else(|| {
            warn!(note_id = %id, "note not found");
            note_not_found(id)
        })?;
        Ok(NoteDto::from(note))
    }
}

#[cfg(test)]
#[path = "note_service_tests.rs"]
mod tests;
