//! Process-local adapters.
//!
//! Used when no database is configured and as a real store in tests.

mod in_memory_note_store;

pub use in_memory_note_store::InMemoryNoteStore;
