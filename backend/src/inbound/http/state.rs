//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on the driving
//! note ports, so tests can swap in mocks.

use std::sync::Arc;

use crate::domain::ports::{NoteCommand, NoteQuery};

/// Dependency bundle for note handlers.
#[derive(Clone)]
pub struct HttpState {
    pub notes: Arc<dyn NoteCommand>,
    pub notes_query: Arc<dyn NoteQuery>,
}

impl HttpState {
    /// Construct state from separate command and query ports.
    pub fn new(notes: Arc<dyn NoteCommand>, notes_query: Arc<dyn NoteQuery>) -> Self {
        Self { notes, notes_query }
    }

    /// Serve both ports from one implementation.
    pub fn from_service<S>(service: S) -> Self
    where
        S: NoteCommand + NoteQuery + 'static,
    {
        let service = Arc::new(service);
        Self {
            notes: service.clone(),
            notes_query: service,
        }
    }
}
