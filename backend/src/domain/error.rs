//! Domain-level error types.
//!
//! These errors are transport agnostic. The HTTP adapter maps them to status
//! codes and response bodies in `inbound::http::error`.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::TraceId;

/// Stable machine-readable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The request is malformed or breaks a storage constraint.
    InvalidRequest,
    /// One or more request fields failed validation.
    ValidationFailed,
    /// The requested note does not exist.
    NotFound,
    /// Another note already holds the requested title.
    TitleConflict,
    /// The backing store cannot be reached.
    ServiceUnavailable,
    /// An unexpected failure inside the service.
    InternalError,
}

impl ErrorCode {
    const fn fallback_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid request",
            Self::ValidationFailed => "request validation failed",
            Self::NotFound => "not found",
            Self::TitleConflict => "title already exists",
            Self::ServiceUnavailable => "service unavailable",
            Self::InternalError => "internal error",
        }
    }
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` is non-empty once trimmed.
///
/// # Examples
/// ```
/// use notes_backend::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("note with id = 7 not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert!(err.message().contains('7'));
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    code: ErrorCode,
    message: String,
    details: Option<Value>,
    trace_id: Option<String>,
}

impl Error {
    /// Create an error, capturing the trace identifier in scope.
    ///
    /// A blank message is replaced by a generic one for `code`.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            code.fallback_message().to_owned()
        } else {
            message
        };
        Self {
            code,
            message,
            details: None,
            trace_id: current_trace_id(),
        }
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Structured details for adapters.
    #[must_use]
    pub const fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Trace identifier captured at construction.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Attach structured details.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Field-level validation failure.
    ///
    /// `fields` maps each offending field to its message and is kept in the
    /// error details.
    ///
    /// # Examples
    /// ```
    /// use std::collections::BTreeMap;
    ///
    /// use notes_backend::domain::{Error, ErrorCode};
    ///
    /// let fields = BTreeMap::from([("title".to_owned(), "title must not be blank".to_owned())]);
    /// let err = Error::validation(fields);
    /// assert_eq!(err.code(), ErrorCode::ValidationFailed);
    /// assert_eq!(err.field_errors().map(|f| f.len()), Some(1));
    /// ```
    pub fn validation(fields: BTreeMap<String, String>) -> Self {
        let details: Map<String, Value> = fields
            .into_iter()
            .map(|(field, message)| (field, Value::String(message)))
            .collect();
        Self::new(ErrorCode::ValidationFailed, "request validation failed")
            .with_details(Value::Object(details))
    }

    /// Field → message map of a validation failure.
    #[must_use]
    pub fn field_errors(&self) -> Option<&Map<String, Value>> {
        match (self.code, &self.details) {
            (ErrorCode::ValidationFailed, Some(Value::Object(fields))) => Some(fields),
            _ => None,
        }
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::TitleConflict`].
    pub fn title_conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TitleConflict, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

fn current_trace_id() -> Option<String> {
    TraceId::current().map(|id| id.to_string())
}
