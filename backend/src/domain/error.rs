//! Domain-level error type.
//!
//! Transport agnostic: the HTTP adapter maps these to status codes and JSON
//! bodies. Internal failure detail is logged at the site that maps it into an
//! [`Error`]; the `message` field only ever carries text that is safe to show
//! to a client.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// Authentication failed or is missing.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// The request conflicts with existing state.
    Conflict,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// Error payload returned by domain services and handlers.
///
/// ## Invariants
/// - `message` is non-empty once trimmed.
/// - For [`ErrorCode::InternalError`] the message is a fixed public-safe
///   string; the underlying cause was already logged server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    #[schema(example = "invalid_request")]
    code: ErrorCode,
    #[schema(example = "not allowed to modify")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Create a new error, panicking if the message is blank.
    ///
    /// All call sites pass literal or formatted non-empty messages; a blank
    /// message is a programming error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        assert!(
            !message.trim().is_empty(),
            "error messages must not be blank"
        );
        Self {
            code,
            message,
            details: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable, public-safe message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary structured details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    ///
    /// The message must be a public-safe summary; log the cause before
    /// calling this.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Error::forbidden("not allowed to modify"), ErrorCode::Forbidden)]
    #[case(Error::unauthorized("unauthorized access"), ErrorCode::Unauthorized)]
    #[case(Error::internal("could not save note"), ErrorCode::InternalError)]
    fn constructors_set_code(#[case] err: Error, #[case] expected: ErrorCode) {
        assert_eq!(err.code(), expected);
    }

    #[rstest]
    fn details_round_trip_through_json() {
        let err = Error::invalid_request("name must not be empty")
            .with_details(serde_json::json!({ "field": "name" }));
        let value = serde_json::to_value(&err).expect("serialise error");
        assert_eq!(
            value.get("code").and_then(serde_json::Value::as_str),
            Some("invalid_request")
        );
        assert_eq!(
            value
                .get("details")
                .and_then(|d| d.get("field"))
                .and_then(serde_json::Value::as_str),
            Some("name")
        );
    }
}
