//! Diesel and pool error mapping for the note repository.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::NoteRepositoryError;

use super::pool::PoolError;

/// Map pool failures to connection errors.
pub(crate) fn map_pool_error(error: PoolError) -> NoteRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            NoteRepositoryError::connection(message)
        }
    }
}

fn constraint_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(name) if name.contains("title") => "a note with this title already exists",
        _ => "note violates a storage constraint",
    }
}

/// Map Diesel failures to repository errors.
///
/// Constraint violations keep a client-safe message; everything else is
/// reduced to a generic description after logging the driver detail.
pub(crate) fn map_diesel_error(error: DieselError) -> NoteRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => debug!(
            ?kind,
            message = info.message(),
            constraint = info.constraint_name(),
            "diesel operation failed"
        ),
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation
            | DatabaseErrorKind::CheckViolation
            | DatabaseErrorKind::NotNullViolation,
            info,
        ) => NoteRepositoryError::constraint(constraint_message(info.constraint_name())),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            NoteRepositoryError::connection("database connection closed")
        }
        DieselError::NotFound => NoteRepositoryError::query("record not found"),
        _ => NoteRepositoryError::query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug)]
    struct StubInfo(Option<&'static str>);

    impl diesel::result::DatabaseErrorInformation for StubInfo {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn details(&self) -> Option<&str> {
            None
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            Some("notes")
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            self.0
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(StubInfo(constraint)))
    }

    #[rstest]
    fn title_index_violation_names_the_title() {
        let mapped = map_diesel_error(database_error(
            DatabaseErrorKind::UniqueViolation,
            Some("notes_title_upper_key"),
        ));
        assert_eq!(
            mapped,
            NoteRepositoryError::constraint("a note with this title already exists")
        );
    }

    #[rstest]
    #[case(DatabaseErrorKind::UniqueViolation)]
    #[case(DatabaseErrorKind::CheckViolation)]
    #[case(DatabaseErrorKind::NotNullViolation)]
    fn other_constraint_violations_stay_generic(#[case] kind: DatabaseErrorKind) {
        let mapped = map_diesel_error(database_error(kind, None));
        assert_eq!(
            mapped,
            NoteRepositoryError::constraint("note violates a storage constraint")
        );
    }

    #[rstest]
    fn closed_connection_maps_to_connection_error() {
        let mapped = map_diesel_error(database_error(DatabaseErrorKind::ClosedConnection, None));
        assert!(matches!(mapped, NoteRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn unexpected_errors_hide_driver_detail() {
        let mapped = map_diesel_error(DieselError::RollbackTransaction);
        assert_eq!(mapped, NoteRepositoryError::query("database error"));
    }

    #[rstest]
    #[case(PoolError::checkout("timed out"))]
    #[case(PoolError::build("bad url"))]
    fn pool_errors_are_connection_errors(#[case] error: PoolError) {
        assert!(matches!(
            map_pool_error(error),
            NoteRepositoryError::Connection { .. }
        ));
    }
}
