//! Shared classification of Diesel and pool failures.
//!
//! Each repository maps a [`Failure`] onto its own port error; this module
//! only decides which kind of failure occurred and logs the driver detail.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Broad class of a persistence failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailureKind {
    Connection,
    /// Unique or primary key violation.
    Conflict,
    /// Check, not-null or foreign key violation.
    Constraint,
    Query,
}

/// A classified failure with a message safe to surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<PoolError> for Failure {
    fn from(error: PoolError) -> Self {
        let message = match error {
            PoolError::Checkout { message } | PoolError::Build { message } => message,
        };
        Self {
            kind: FailureKind::Connection,
            message,
        }
    }
}

impl From<DieselError> for Failure {
    fn from(error: DieselError) -> Self {
        match &error {
            DieselError::DatabaseError(kind, info) => debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            ),
            _ => debug!(
                error_type = %std::any::type_name_of_val(&error),
                error = %error,
                "diesel operation failed"
            ),
        }

        let (kind, message) = match error {
            DieselError::DatabaseError(kind, info) => {
                let message = info
                    .constraint_name()
                    .map_or_else(|| info.message().to_owned(), str::to_owned);
                let kind = match kind {
                    DatabaseErrorKind::ClosedConnection => FailureKind::Connection,
                    DatabaseErrorKind::UniqueViolation => FailureKind::Conflict,
                    DatabaseErrorKind::CheckViolation
                    | DatabaseErrorKind::NotNullViolation
                    | DatabaseErrorKind::ForeignKeyViolation => FailureKind::Constraint,
                    _ => FailureKind::Query,
                };
                (kind, message)
            }
            DieselError::NotFound => (FailureKind::Query, "record not found".to_owned()),
            other => (FailureKind::Query, other.to_string()),
        };
        Self { kind, message }
    }
}
