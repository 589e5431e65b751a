//! Categorised domain errors.
//!
//! Every failure that crosses a port boundary is an [`Error`]: a stable
//! `(category, code)` pair plus human-readable message and detail text.
//! Callers match on the code; message and detail are informational only.
//! Inbound adapters decide how a code is presented (for example, as an HTTP
//! status).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use utoipa::ToSchema;

/// Family an [`ErrorCode`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// Failures meaningful to any caller: bad input, conflicts, absence.
    Generic,
    /// Unclassified storage failures, scoped to the operation that failed.
    DataAccess,
}

/// Codes in the [`ErrorCategory::Generic`] family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenericCode {
    /// Uniqueness conflict.
    AlreadyExists,
    /// Malformed or invalid input.
    InvalidArgument,
    /// Unclassified internal failure.
    Internal,
    /// Referenced entity is absent.
    NotFound,
}

/// Codes in the [`ErrorCategory::DataAccess`] family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataAccessCode {
    /// An insert failed for an unclassified reason.
    InsertFailed,
    /// A select failed for an unclassified reason.
    SelectFailed,
    /// A delete failed for an unclassified reason.
    DeleteFailed,
    /// An update failed for an unclassified reason.
    UpdateFailed,
}

/// Stable error code; the variant fixes the category.
///
/// # Examples
/// ```
/// use payments::domain::{ErrorCategory, ErrorCode, GenericCode};
///
/// let code = ErrorCode::from(GenericCode::NotFound);
/// assert_eq!(code.category(), ErrorCategory::Generic);
/// assert_eq!(code.as_str(), "NOT_FOUND");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A code from the generic family.
    Generic(GenericCode),
    /// A code from the data-access family.
    DataAccess(DataAccessCode),
}

impl ErrorCode {
    /// Category implied by the code.
    #[must_use]
    pub const fn category(self) -> ErrorCategory {
        match self {
            Self::Generic(_) => ErrorCategory::Generic,
            Self::DataAccess(_) => ErrorCategory::DataAccess,
        }
    }

    /// Wire representation of the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Generic(GenericCode::AlreadyExists) => "ALREADY_EXISTS",
            Self::Generic(GenericCode::InvalidArgument) => "INVALID_ARGUMENT",
            Self::Generic(GenericCode::Internal) => "INTERNAL",
            Self::Generic(GenericCode::NotFound) => "NOT_FOUND",
            Self::DataAccess(DataAccessCode::InsertFailed) => "INSERT_FAILED",
            Self::DataAccess(DataAccessCode::SelectFailed) => "SELECT_FAILED",
            Self::DataAccess(DataAccessCode::DeleteFailed) => "DELETE_FAILED",
            Self::DataAccess(DataAccessCode::UpdateFailed) => "UPDATE_FAILED",
        }
    }

    fn parse(category: ErrorCategory, code: &str) -> Option<Self> {
        let parsed = match category {
            ErrorCategory::Generic => Self::Generic(match code {
                "ALREADY_EXISTS" => GenericCode::AlreadyExists,
                "INVALID_ARGUMENT" => GenericCode::InvalidArgument,
                "INTERNAL" => GenericCode::Internal,
                "NOT_FOUND" => GenericCode::NotFound,
                _ => return None,
            }),
            ErrorCategory::DataAccess => Self::DataAccess(match code {
                "INSERT_FAILED" => DataAccessCode::InsertFailed,
                "SELECT_FAILED" => DataAccessCode::SelectFailed,
                "DELETE_FAILED" => DataAccessCode::DeleteFailed,
                "UPDATE_FAILED" => DataAccessCode::UpdateFailed,
                _ => return None,
            }),
        };
        Some(parsed)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<GenericCode> for ErrorCode {
    fn from(code: GenericCode) -> Self {
        Self::Generic(code)
    }
}

impl From<DataAccessCode> for ErrorCode {
    fn from(code: DataAccessCode) -> Self {
        Self::DataAccess(code)
    }
}

/// Value allowed in an error's `extra` map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ExtraValue {
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// Free text.
    Text(String),
}

impl From<bool> for ExtraValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ExtraValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for ExtraValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for ExtraValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ExtraValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Categorised error.
///
/// ## Invariants
/// - The category is derived from the code and can never disagree with it.
/// - Values are immutable once built; the `with_*` builders consume `self`.
///
/// Serialises as `{category, code, message, detail, extra?}`.
///
/// # Examples
/// ```
/// use payments::domain::{Error, ErrorCode, GenericCode};
///
/// let err = Error::not_found("unable to get payment", "no rows");
/// assert_eq!(err.code(), ErrorCode::Generic(GenericCode::NotFound));
/// assert_eq!(err.to_string(), "unable to get payment");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    code: ErrorCode,
    message: String,
    detail: String,
    extra: Option<BTreeMap<String, ExtraValue>>,
}

/// Raised when a serialised error cannot be turned back into an [`Error`].
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ErrorValidationError {
    /// The code is not a member of the stated category.
    #[error("code `{code}` does not belong to category {category:?}")]
    CategoryMismatch {
        /// Category named by the payload.
        category: ErrorCategory,
        /// Code named by the payload.
        code: String,
    },
}

impl Error {
    /// Build an error from any code.
    pub fn new(
        code: impl Into<ErrorCode>,
        message: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            detail: detail.into(),
            extra: None,
        }
    }

    /// Build an error in the generic category.
    pub fn generic(code: GenericCode, message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(code, message, detail)
    }

    /// Build an error in the data-access category.
    pub fn data_access(
        code: DataAccessCode,
        message: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::new(code, message, detail)
    }

    /// Convenience constructor for [`GenericCode::AlreadyExists`].
    pub fn already_exists(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::generic(GenericCode::AlreadyExists, message, detail)
    }

    /// Convenience constructor for [`GenericCode::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::generic(GenericCode::InvalidArgument, message, detail)
    }

    /// Convenience constructor for [`GenericCode::Internal`].
    pub fn internal(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::generic(GenericCode::Internal, message, detail)
    }

    /// Convenience constructor for [`GenericCode::NotFound`].
    pub fn not_found(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::generic(GenericCode::NotFound, message, detail)
    }

    /// Attach one entry to the `extra` map, replacing an existing key.
    ///
    /// # Examples
    /// ```
    /// use payments::domain::{Error, ExtraValue};
    ///
    /// let err = Error::invalid_argument("invalid payment", "bad scheme")
    ///     .with_extra("retryable", false);
    /// let extra = err.extra().expect("extra present");
    /// assert_eq!(extra.get("retryable"), Some(&ExtraValue::Bool(false)));
    /// ```
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<ExtraValue>) -> Self {
        self.extra
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Category of [`Self::code`].
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        self.code.category()
    }

    /// Whether the error carries `code`.
    #[must_use]
    pub fn is(&self, code: impl Into<ErrorCode>) -> bool {
        self.code == code.into()
    }

    /// Short human-readable summary.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Human-readable detail, possibly empty.
    #[must_use]
    pub fn detail(&self) -> &str {
        self.detail.as_str()
    }

    /// Supplementary primitives attached by the producer.
    #[must_use]
    pub const fn extra(&self) -> Option<&BTreeMap<String, ExtraValue>> {
        self.extra.as_ref()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ErrorDto {
    category: ErrorCategory,
    code: String,
    message: String,
    #[serde(default)]
    detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    extra: Option<BTreeMap<String, ExtraValue>>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            category: value.code.category(),
            code: value.code.as_str().to_owned(),
            message: value.message,
            detail: value.detail,
            extra: value.extra,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        let ErrorDto {
            category,
            code,
            message,
            detail,
            extra,
        } = value;

        let Some(parsed) = ErrorCode::parse(category, &code) else {
            return Err(ErrorValidationError::CategoryMismatch { category, code });
        };
        Ok(Self {
            code: parsed,
            message,
            detail,
            extra,
        })
    }
}

#[cfg(test)]
mod tests;
