//! Error handling for pubsync-store
//!
//! Maps driver errors onto the opaque storage kinds of `ExError`.

use pubsync_core::errors::{ExError, ExErrorKind};
use rusqlite::ErrorCode;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Classify a rusqlite error, keeping the driver message verbatim
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    let kind = match &err {
        rusqlite::Error::QueryReturnedNoRows => ExErrorKind::NotFound,
        rusqlite::Error::SqliteFailure(failure, _) => match failure.code {
            ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked | ErrorCode::CannotOpen => {
                ExErrorKind::Unavailable
            }
            ErrorCode::ConstraintViolation => ExErrorKind::Conflict,
            ErrorCode::OperationInterrupted => ExErrorKind::Cancelled,
            _ => ExErrorKind::Unknown,
        },
        _ => ExErrorKind::Unknown,
    };
    ExError::new(kind)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Unknown)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::Conflict)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// The shared connection's mutex was poisoned by a panicking holder
pub fn connection_poisoned(op: &str) -> ExError {
    ExError::new(ExErrorKind::Unavailable)
        .with_op(op.to_string())
        .with_message("connection lock poisoned")
}

/// Row lookup came back empty
pub fn not_found(op: &str, id: i64) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op(op.to_string())
        .with_entity_id(id)
        .with_message("article not found")
}

/// Row exists but belongs to someone else
pub fn forbidden(op: &str, id: i64, author_id: i64) -> ExError {
    ExError::new(ExErrorKind::Forbidden)
        .with_op(op.to_string())
        .with_entity_id(id)
        .with_author_id(author_id)
        .with_message("article belongs to another author")
}
