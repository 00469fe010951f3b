//! Error types for the AKASHI API client.
//!
//! # Design
//! Every failure an operation can produce is one `ApiError` variant, ordered
//! by where it happens: parameter validation (before any I/O), the transport,
//! the HTTP status check, the envelope decode, and finally an envelope that
//! decoded cleanly but reported `success: false`.

use crate::endpoint::Resource;
use crate::envelope::ErrorDetail;

/// Errors returned by `KikuClient` operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required request parameter is missing. Raised before any network
    /// activity.
    #[error("{field} must be set")]
    Validation { field: &'static str },

    /// A request parameter is set but cannot be put on the wire. Raised
    /// before any network activity.
    #[error("Marshal error: field: {field}, value: {value}")]
    Encode { field: &'static str, value: String },

    /// The transport collaborator failed to complete the round-trip.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with a status other than 200. The body is not
    /// decoded.
    #[error("Status code={status}")]
    HttpStatus { status: u16 },

    /// The envelope was malformed, or a field had the wrong wire type.
    #[error("Unmarshal error: field: {field}, value: {value}")]
    Decode { field: String, value: String },

    /// The envelope decoded but reported `success: false`. `errors` may be
    /// empty.
    #[error("Requesting {resource} API failed")]
    ApiFailure {
        resource: Resource,
        errors: Vec<ErrorDetail>,
    },
}

impl ApiError {
    pub(crate) fn missing(field: &'static str) -> Self {
        ApiError::Validation { field }
    }

    pub(crate) fn encode(field: &'static str, value: impl Into<String>) -> Self {
        ApiError::Encode {
            field,
            value: value.into(),
        }
    }

    pub(crate) fn decode(field: impl Into<String>, value: impl Into<String>) -> Self {
        ApiError::Decode {
            field: field.into(),
            value: value.into(),
        }
    }

    /// The `errors` array of a failed envelope, empty for any other variant.
    pub fn details(&self) -> &[ErrorDetail] {
        match self {
            ApiError::ApiFailure { errors, .. } => errors,
            _ => &[],
        }
    }
}
