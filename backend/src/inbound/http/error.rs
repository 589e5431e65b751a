//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while letting Actix handlers turn
//! failures into an `{"errors": [...]}` document and a status code. Storage
//! and internal failures are logged in full and reach clients only as a bare
//! `INTERNAL` entry.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCategory, ErrorCode, GenericCode};
use crate::middleware::RequestId;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_CODE: &str = "INTERNAL";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Generic(GenericCode::AlreadyExists) => StatusCode::CONFLICT,
        ErrorCode::Generic(GenericCode::InvalidArgument) => StatusCode::BAD_REQUEST,
        ErrorCode::Generic(GenericCode::NotFound) => StatusCode::NOT_FOUND,
        ErrorCode::Generic(GenericCode::Internal) | ErrorCode::DataAccess(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn is_redacted(error: &Error) -> bool {
    error.category() == ErrorCategory::DataAccess || error.is(GenericCode::Internal)
}

/// One entry of an error document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorObject {
    /// HTTP status as a string.
    #[schema(example = "404")]
    pub status: String,
    /// Stable machine-readable code.
    #[schema(example = "NOT_FOUND")]
    pub code: String,
    /// Human-readable summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "unable to get payment")]
    pub title: Option<String>,
    /// Human-readable specifics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorDocument {
    /// Reported errors; handlers always report exactly one.
    pub errors: Vec<ErrorObject>,
}

fn error_object(error: &Error, status: StatusCode) -> ErrorObject {
    if is_redacted(error) {
        return ErrorObject {
            status: status.as_u16().to_string(),
            code: REDACTED_CODE.to_owned(),
            title: None,
            detail: None,
        };
    }

    ErrorObject {
        status: status.as_u16().to_string(),
        code: error.code().as_str().to_owned(),
        title: Some(error.message().to_owned()),
        detail: (!error.detail().is_empty()).then(|| error.detail().to_owned()),
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let request_id = RequestId::current().map(|id| id.to_string());
        if is_redacted(self) {
            error!(
                request_id = request_id.as_deref(),
                category = ?self.category(),
                code = self.code().as_str(),
                message = self.message(),
                detail = self.detail(),
                "request failed"
            );
        } else {
            warn!(
                request_id = request_id.as_deref(),
                code = self.code().as_str(),
                message = self.message(),
                detail = self.detail(),
                "request rejected"
            );
        }

        let status = self.status_code();
        HttpResponse::build(status).json(ErrorDocument {
            errors: vec![error_object(self, status)],
        })
    }
}

/// Report unreadable JSON bodies as `INVALID_ARGUMENT`.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_argument("invalid request body", err.to_string()).into()
}
