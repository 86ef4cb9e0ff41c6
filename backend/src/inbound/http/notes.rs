//! Note CRUD endpoints.
//!
//! ```text
//! POST   /notes        create, 200 with the stored note (id null on title clash)
//! GET    /notes        list every note
//! GET    /notes/{id}   fetch one note
//! PUT    /notes/{id}   rewrite title and content
//! DELETE /notes/{id}   remove, 200 with an empty body
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::ports::NoteDto;
use crate::domain::{Error, NoteId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::{json_error_handler, path_error_handler};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::note_violations;

/// Request body for create and update.
///
/// Fields are optional so a missing field is reported as a validation
/// failure rather than a malformed body. `id` is accepted and ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRequest {
    #[serde(default)]
    pub id: Option<NoteId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl NoteRequest {
    /// Validate both fields and build the transfer object.
    ///
    /// # Errors
    ///
    /// [`Error::validation`] listing every failing field.
    pub fn into_dto(self) -> Result<NoteDto, Error> {
        let violations = note_violations(self.title.as_deref(), self.content.as_deref());
        if !violations.is_empty() {
            return Err(Error::validation(violations));
        }
        match (self.title, self.content) {
            (Some(title), Some(content)) => Ok(NoteDto {
                id: None,
                title,
                content,
            }),
            _ => Err(Error::invalid_request("title and content are required")),
        }
    }
}

/// Create a note.
#[post("/notes")]
pub async fn create_note(
    state: web::Data<HttpState>,
    payload: web::Json<NoteRequest>,
) -> ApiResult<web::Json<NoteDto>> {
    let note = payload.into_inner().into_dto()?;
    info!(title = %note.title, "create note requested");
    let stored = state.notes.create_note(note).await?;
    info!(note_id = ?stored.id, "create note handled");
    Ok(web::Json(stored))
}

/// List all notes.
#[get("/notes")]
pub async fn list_notes(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<NoteDto>>> {
    info!("list notes requested");
    let notes = state.notes_query.get_all_notes().await?;
    info!(count = notes.len(), "list notes handled");
    Ok(web::Json(notes))
}

/// Fetch one note.
#[get("/notes/{id}")]
pub async fn get_note(
    state: web::Data<HttpState>,
    path: web::Path<NoteId>,
) -> ApiResult<web::Json<NoteDto>> {
    let id = path.into_inner();
    info!(note_id = %id, "get note requested");
    let note = state.notes_query.get_note_by_id(id).await?;
    Ok(web::Json(note))
}

/// Rewrite a note's title and content.
#[put("/notes/{id}")]
pub async fn update_note(
    state: web::Data<HttpState>,
    path: web::Path<NoteId>,
    payload: web::Json<NoteRequest>,
) -> ApiResult<web::Json<NoteDto>> {
    let id = path.into_inner();
    let note = payload.into_inner().into_dto()?;
    info!(note_id = %id, title = %note.title, "update note requested");
    let updated = state.notes.update_note(id, note).await?;
    info!(note_id = %id, "update note handled");
    Ok(web::Json(updated))
}

/// Delete a note.
#[delete("/notes/{id}")]
pub async fn delete_note(
    state: web::Data<HttpState>,
    path: web::Path<NoteId>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    info!(note_id = %id, "delete note requested");
    state.notes.delete_note(id).await?;
    info!(note_id = %id, "delete note handled");
    Ok(HttpResponse::Ok().finish())
}

/// Register the note endpoints and their extractor error handlers.
///
/// ```no_run
/// use std::sync::Arc;
///
/// use actix_web::{web, App};
/// use notes_backend::domain::NoteService;
/// use notes_backend::inbound::http::notes::configure;
/// use notes_backend::inbound::http::state::HttpState;
/// use notes_backend::outbound::memory::InMemoryNoteStore;
///
/// let state = HttpState::from_service(NoteService::new(Arc::new(InMemoryNoteStore::new())));
/// let app = App::new().app_data(web::Data::new(state)).configure(configure);
/// # let _ = app;
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(create_note)
        .service(list_notes)
        .service(get_note)
        .service(update_note)
        .service(delete_note);
}

#[cfg(test)]
#[path = "notes_tests.rs"]
mod tests;
