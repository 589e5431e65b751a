//! Translation of Diesel failures into the domain error taxonomy.
//!
//! Every repository result passes through [`translate`] before it leaves the
//! persistence layer, so callers only ever see [`Error`] codes.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::{DataAccessCode, Error};

/// Statement kind a failure occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOperation {
    /// `INSERT`.
    Insert,
    /// `SELECT`.
    Select,
    /// `UPDATE`.
    Update,
    /// `DELETE`.
    Delete,
}

impl StorageOperation {
    const fn failed_code(self) -> DataAccessCode {
        match self {
            Self::Insert => DataAccessCode::InsertFailed,
            Self::Select => DataAccessCode::SelectFailed,
            Self::Update => DataAccessCode::UpdateFailed,
            Self::Delete => DataAccessCode::DeleteFailed,
        }
    }
}

/// Store failure kinds the translator distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageFailure {
    /// The statement matched no row.
    NoRows,
    /// A unique constraint rejected the row.
    UniqueViolation,
    /// Anything else.
    Other,
}

impl StorageFailure {
    /// Classify a Diesel error.
    pub fn classify(error: &DieselError) -> Self {
        match error {
            DieselError::NotFound => Self::NoRows,
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                Self::UniqueViolation
            }
            _ => Self::Other,
        }
    }
}

/// Map a failure of `operation` to a domain error carrying `message`.
///
/// No-row failures on reads, updates and deletes become `NOT_FOUND`; a unique
/// violation on insert becomes `ALREADY_EXISTS`; every other combination is
/// the operation's `*_FAILED` code. The Diesel error text is kept as detail.
pub fn translate_error(operation: StorageOperation, error: DieselError, message: &str) -> Error {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?operation, ?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(?operation, %error, "diesel operation failed"),
    }

    let detail = error.to_string();
    match (operation, StorageFailure::classify(&error)) {
        (
            StorageOperation::Select | StorageOperation::Update | StorageOperation::Delete,
            StorageFailure::NoRows,
        ) => Error::not_found(message, detail),
        (StorageOperation::Insert, StorageFailure::UniqueViolation) => {
            Error::already_exists(message, detail)
        }
        (operation, _) => Error::data_access(operation.failed_code(), message, detail),
    }
}

/// Pass successes through and translate failures with [`translate_error`].
pub fn translate<T>(
    operation: StorageOperation,
    result: Result<T, DieselError>,
    message: &str,
) -> Result<T, Error> {
    result.map_err(|error| translate_error(operation, error, message))
}
