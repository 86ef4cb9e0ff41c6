//! Domain ports for the hexagonal boundary.
//!
//! Driving ports ([`NoteCommand`], [`NoteQuery`]) are what inbound adapters
//! call. Driven ports ([`NoteRepository`], [`NoteStore`]) are what outbound
//! adapters implement.

mod macros;
pub(crate) use macros::define_port_error;

mod note_command;
mod note_query;
mod note_repository;

#[cfg(test)]
pub use note_command::MockNoteCommand;
pub use note_command::{NoteCommand, NoteDto};
#[cfg(test)]
pub use note_query::MockNoteQuery;
pub use note_query::NoteQuery;
#[cfg(test)]
pub use note_repository::MockNoteRepository;
pub use note_repository::{NoteRepository, NoteRepositoryError, NoteStore};
