//! Builds HTTP state from the configured storage backend.

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use notes_backend::domain::NoteService;
use notes_backend::inbound::http::state::HttpState;
use notes_backend::outbound::memory::InMemoryNoteStore;
use notes_backend::outbound::persistence::DieselNoteRepository;

use super::ServerConfig;

/// Wire the note service over PostgreSQL when a pool is configured,
/// otherwise over a process-local store.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => {
            info!("notes stored in PostgreSQL");
            let store = Arc::new(DieselNoteRepository::new(pool.clone()));
            HttpState::from_service(NoteService::new(store))
        }
        None => {
            warn!("no database configured, notes are kept in memory and lost on restart");
            let store = Arc::new(InMemoryNoteStore::new());
            HttpState::from_service(NoteService::new(store))
        }
    };
    web::Data::new(state)
}
