//! Domain error to GraphQL error translation.

use async_graphql::{Enum, ErrorExtensions, SimpleObject};
use blog_core::BlogServiceError;
use log::error;

const INTERNAL_ERROR_MESSAGE: &str = "internal error";

/// Stable machine-readable failure code.
#[derive(Enum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    PostNotFound,
    ValidationError,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PostNotFound => "POST_NOT_FOUND",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

/// Field-level failure returned inside mutation payloads.
#[derive(SimpleObject, Clone, Debug, PartialEq, Eq)]
pub struct UserError {
    pub code: ErrorCode,
    pub message: String,
    /// Offending input field, when the failure is tied to one.
    pub field: Option<String>,
}

impl UserError {
    pub fn internal() -> Self {
        Self {
            code: ErrorCode::InternalError,
            message: INTERNAL_ERROR_MESSAGE.to_string(),
            field: None,
        }
    }

    /// Converts a service error, logging storage failures. Their details
    /// never reach the client.
    pub fn from_service(operation: &'static str, err: &BlogServiceError) -> Self {
        match err {
            BlogServiceError::PostNotFound(id) => Self {
                code: ErrorCode::PostNotFound,
                message: format!("post {id} not found"),
                field: None,
            },
            BlogServiceError::Validation(validation) => Self {
                code: ErrorCode::ValidationError,
                message: validation.to_string(),
                field: Some(validation.field.to_string()),
            },
            BlogServiceError::Storage(_) | BlogServiceError::InconsistentState(_) => {
                error!(
                    "event={operation} module=graphql status=error error_code={} error={err}",
                    ErrorCode::InternalError.as_str()
                );
                Self::internal()
            }
        }
    }
}

/// Builds the top-level GraphQL error used when a query cannot be served.
///
/// Reads only fail on storage problems, so every failure is reported as
/// `INTERNAL_ERROR` with the cause logged server-side.
pub fn internal_error(
    operation: &'static str,
    err: &dyn std::fmt::Display,
) -> async_graphql::Error {
    error!(
        "event={operation} module=graphql status=error error_code={} error={err}",
        ErrorCode::InternalError.as_str()
    );
    async_graphql::Error::new(INTERNAL_ERROR_MESSAGE)
        .extend_with(|_, ext| ext.set("code", ErrorCode::InternalError.as_str()))
}
