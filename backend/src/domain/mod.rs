//! Domain types and services.
//!
//! Public surface:
//! - [`Note`] and [`NoteId`]: the persisted entity and its identifier.
//! - [`NoteService`]: note use-cases behind the driving ports in [`ports`].
//! - [`Error`] and [`ErrorCode`]: transport-agnostic failures.
//! - [`TraceId`]: request correlation identifier.

pub mod error;
pub mod note;
pub mod note_mapping;
pub mod note_service;
pub mod ports;
pub mod trace_id;

pub use self::error::{Error, ErrorCode};
pub use self::note::{CONTENT_MAX, CONTENT_MIN, Note, NoteId, TITLE_MAX, TITLE_MIN};
pub use self::note_service::NoteService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
