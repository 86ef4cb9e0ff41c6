//! Diesel table definitions.
//!
//! Must match `migrations/` exactly.

diesel::table! {
    /// Short text notes.
    ///
    /// A unique index on `upper(title)` backs case-insensitive title
    /// uniqueness.
    notes (id) {
        /// Primary key from a `BIGSERIAL` sequence.
        id -> Int8,
        /// Note title, at most 100 characters.
        title -> Varchar,
        /// Note body, at most 500 characters.
        content -> Varchar,
    }
}
