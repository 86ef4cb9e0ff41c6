//! PostgreSQL-backed `NoteRepository` and `NoteStore` using Diesel.
//!
//! Plain repository calls check out a pooled connection per call. A
//! transaction pins one connection and hands the work closure a repository
//! view bound to it, so every statement in the unit of work shares the
//! same PostgreSQL transaction.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use futures_util::future::BoxFuture;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::ports::{NoteRepository, NoteRepositoryError, NoteStore};
use crate::domain::{Error, Note, NoteId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewNoteRow, NoteRecordRow, NoteRow, NoteUpdate};
use super::pool::DbPool;
use super::schema::notes;

diesel::define_sql_function!(fn upper(x: Text) -> Text);

async fn select_note(
    conn: &mut AsyncPgConnection,
    id: NoteId,
) -> Result<Option<Note>, NoteRepositoryError> {
    notes::table
        .find(id.get())
        .select(NoteRow::as_select())
        .first::<NoteRow>(conn)
        .await
        .optional()
        .map(|row| row.map(Note::from))
        .map_err(map_diesel_error)
}

async fn select_all_notes(conn: &mut AsyncPgConnection) -> Result<Vec<Note>, NoteRepositoryError> {
    let rows: Vec<NoteRow> = notes::table
        .select(NoteRow::as_select())
        .order_by(notes::id.asc())
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    Ok(rows.into_iter().map(Note::from).collect())
}

async fn write_note(
    conn: &mut AsyncPgConnection,
    note: &Note,
) -> Result<Note, NoteRepositoryError> {
    let row = match note.id() {
        None => {
            diesel::insert_into(notes::table)
                .values(&NewNoteRow {
                    title: note.title(),
                    content: note.content(),
                })
                .returning(NoteRow::as_returning())
                .get_result::<NoteRow>(conn)
                .await
        }
        Some(id) => {
            diesel::insert_into(notes::table)
                .values(&NoteRecordRow {
                    id: id.get(),
                    title: note.title(),
                    content: note.content(),
                })
                .on_conflict(notes::id)
                .do_update()
                .set(&NoteUpdate {
                    title: note.title(),
                    content: note.content(),
                })
                .returning(NoteRow::as_returning())
                .get_result::<NoteRow>(conn)
                .await
        }
    }
    .map_err(map_diesel_error)?;
    Ok(Note::from(row))
}

async fn remove_note(conn: &mut AsyncPgConnection, id: NoteId) -> Result<(), NoteRepositoryError> {
    let removed = diesel::delete(notes::table.find(id.get()))
        .execute(conn)
        .await
        .map_err(map_diesel_error)?;
    debug!(note_id = %id, removed, "delete executed");
    Ok(())
}

async fn note_exists(
    conn: &mut AsyncPgConnection,
    id: NoteId,
) -> Result<bool, NoteRepositoryError> {
    diesel::select(exists(notes::table.find(id.get())))
        .get_result::<bool>(conn)
        .await
        .map_err(map_diesel_error)
}

async fn title_exists(
    conn: &mut AsyncPgConnection,
    title: &str,
) -> Result<bool, NoteRepositoryError> {
    diesel::select(exists(
        notes::table.filter(upper(notes::title).eq(upper(title))),
    ))
    .get_result::<bool>(conn)
    .await
    .map_err(map_diesel_error)
}

/// Diesel-backed note repository.
#[derive(Clone)]
pub struct DieselNoteRepository {
    pool: DbPool,
}

impl DieselNoteRepository {
    /// Create a repository over `pool`.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteRepository for DieselNoteRepository {
    async fn find_by_id(&self, id: NoteId) -> Result<Option<Note>, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        select_note(&mut conn, id).await
    }

    async fn find_all(&self) -> Result<Vec<Note>, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        select_all_notes(&mut conn).await
    }

    async fn save(&self, note: &Note) -> Result<Note, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        write_note(&mut conn, note).await
    }

    async fn delete_by_id(&self, id: NoteId) -> Result<(), NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        remove_note(&mut conn, id).await
    }

    async fn exists_by_id(&self, id: NoteId) -> Result<bool, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        note_exists(&mut conn, id).await
    }

    async fn exists_by_title_ignore_case(
        &self,
        title: &str,
    ) -> Result<bool, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        title_exists(&mut conn, title).await
    }
}

/// Repository view over the connection of an open transaction.
struct TransactionNoteRepository<'c> {
    conn: Mutex<&'c mut AsyncPgConnection>,
}

#[async_trait]
impl<'c> NoteRepository for TransactionNoteRepository<'c> {
    async fn find_by_id(&self, id: NoteId) -> Result<Option<Note>, NoteRepositoryError> {
        let mut conn = self.conn.lock().await;
        select_note(&mut conn, id).await
    }

    async fn find_all(&self) -> Result<Vec<Note>, NoteRepositoryError> {
        let mut conn = self.conn.lock().await;
        select_all_notes(&mut conn).await
    }

    async fn save(&self, note: &Note) -> Result<Note, NoteRepositoryError> {
        let mut conn = self.conn.lock().await;
        write_note(&mut conn, note).await
    }

    async fn delete_by_id(&self, id: NoteId) -> Result<(), NoteRepositoryError> {
        let mut conn = self.conn.lock().await;
        remove_note(&mut conn, id).await
    }

    async fn exists_by_id(&self, id: NoteId) -> Result<bool, NoteRepositoryError> {
        let mut conn = self.conn.lock().await;
        note_exists(&mut conn, id).await
    }

    async fn exists_by_title_ignore_case(
        &self,
        title: &str,
    ) -> Result<bool, NoteRepositoryError> {
        let mut conn = self.conn.lock().await;
        title_exists(&mut conn, title).await
    }
}

/// Why a transaction did not commit.
enum TransactionFailure {
    Work(Error),
    Database(diesel::result::Error),
}

impl From<diesel::result::Error> for TransactionFailure {
    fn from(value: diesel::result::Error) -> Self {
        Self::Database(value)
    }
}

impl TransactionFailure {
    fn into_error(self) -> Error {
        match self {
            Self::Work(error) => error,
            Self::Database(error) => Error::from(map_diesel_error(error)),
        }
    }
}

async fn run_transaction<T, F>(conn: &mut AsyncPgConnection, work: F) -> Result<T, Error>
where
    T: Send + 'static,
    F: for<'t> FnOnce(&'t dyn NoteRepository) -> BoxFuture<'t, Result<T, Error>>
        + Send
        + 'static,
{
    conn.transaction(move |conn| {
        async move {
            let scoped = TransactionNoteRepository {
                conn: Mutex::new(conn),
            };
            let view: &dyn NoteRepository = &scoped;
            work(view).await.map_err(TransactionFailure::Work)
        }
        .scope_boxed()
    })
    .await
    .map_err(TransactionFailure::into_error)
}

#[async_trait]
impl NoteStore for DieselNoteRepository {
    async fn transaction<T, F>(&self, work: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: for<'t> FnOnce(&'t dyn NoteRepository) -> BoxFuture<'t, Result<T, Error>>
            + Send
            + 'static,
    {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        run_transaction(&mut conn, work).await
    }
}
