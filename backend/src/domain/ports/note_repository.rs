//! Driven ports for note persistence.
//!
//! [`NoteRepository`] is the storage gateway: plain record access with no
//! business rules. [`NoteStore`] adds an all-or-nothing unit of work so the
//! service can group the reads and writes of one operation.

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use tracing::error;

use crate::domain::{Error, Note, NoteId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by note repository adapters.
    pub enum NoteRepositoryError {
        /// The store could not be reached.
        Connection { message: String } =>
            "note repository connection failed: {message}",
        /// A query or mutation failed during execution.
        Query { message: String } =>
            "note repository query failed: {message}",
        /// A write was rejected by a storage constraint.
        Constraint { message: String } =>
            "note repository constraint violated: {message}",
    }
}

impl From<NoteRepositoryError> for Error {
    fn from(value: NoteRepositoryError) -> Self {
        match value {
            NoteRepositoryError::Connection { message } => {
                error!(%message, "note store unavailable");
                Self::service_unavailable("note storage is unavailable")
            }
            NoteRepositoryError::Query { message } => {
                error!(%message, "note store query failed");
                Self::internal(format!("note repository error: {message}"))
            }
            NoteRepositoryError::Constraint { message } => Self::invalid_request(message),
        }
    }
}

/// Storage gateway for notes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Fetch a note by identifier.
    async fn find_by_id(&self, id: NoteId) -> Result<Option<Note>, NoteRepositoryError>;

    /// Fetch every note, ordered by identifier.
    async fn find_all(&self) -> Result<Vec<Note>, NoteRepositoryError>;

    /// Persist a note and return the stored copy.
    ///
    /// A note without an identifier is inserted and receives one. A note
    /// with an identifier replaces the stored title and content, or is
    /// inserted under that identifier when no such row exists.
    async fn save(&self, note: &Note) -> Result<Note, NoteRepositoryError>;

    /// Remove a note. Removing a missing note is not an error.
    async fn delete_by_id(&self, id: NoteId) -> Result<(), NoteRepositoryError>;

    /// Whether a note with this identifier exists.
    async fn exists_by_id(&self, id: NoteId) -> Result<bool, NoteRepositoryError>;

    /// Whether any note holds `title`, ignoring case.
    async fn exists_by_title_ignore_case(&self, title: &str)
    -> Result<bool, NoteRepositoryError>;
}

/// A note repository that can run work inside one transaction.
///
/// The work closure receives a repository view bound to the transaction.
/// Returning `Ok` commits every write made through that view; returning
/// `Err` rolls all of them back and the error is handed to the caller
/// unchanged. Failures to begin or commit surface as domain errors mapped
/// from [`NoteRepositoryError`].
///
/// # Examples
/// ```
/// use futures_util::FutureExt as _;
/// use notes_backend::domain::ports::{NoteRepository as _, NoteStore};
/// use notes_backend::domain::{Error, Note};
/// use notes_backend::outbound::memory::InMemoryNoteStore;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = InMemoryNoteStore::new();
/// let saved = store
///     .transaction(|repo| {
///         async move { Ok::<_, Error>(repo.save(&Note::new("Shopping", "buy milk")).await?) }
///             .boxed()
///     })
///     .await
///     .expect("transaction commits");
/// assert!(saved.id().is_some());
/// # });
/// ```
#[async_trait]
pub trait NoteStore: NoteRepository {
    /// Run `work` in a transaction.
    async fn transaction<T, F>(&self, work: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: for<'t> FnOnce(&'t dyn NoteRepository) -> BoxFuture<'t, Result<T, Error>>
            + Send
            + 'static;
}
