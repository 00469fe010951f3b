//! The `{success, response, errors}` wrapper shared by every endpoint.
//!
//! # Design
//! Decoding happens in two steps. The body is first read into an
//! [`Envelope`] whose `response` stays an untyped JSON value; only when
//! `success` is true is that value materialised into the caller's record.
//! A failed call therefore never hands back a half-populated record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::endpoint::Resource;
use crate::error::ApiError;

/// One entry of the envelope's `errors` array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// A decoded envelope whose payload has not been typed yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub success: bool,
    pub response: Value,
    pub errors: Vec<ErrorDetail>,
}

impl Envelope {
    /// Decode the generic envelope shape. A missing `success` key counts as
    /// `false`; a missing `errors` key is an empty list.
    pub fn from_slice(body: &[u8]) -> Result<Self, ApiError> {
        let root: Value =
            serde_json::from_slice(body).map_err(|e| ApiError::decode("envelope", e.to_string()))?;
        let mut fields = match root {
            Value::Object(fields) => fields,
            other => return Err(ApiError::decode("envelope", json_type(&other))),
        };

        let success = match fields.remove("success") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(flag)) => flag,
            Some(other) => return Err(ApiError::decode("success", json_type(&other))),
        };

        let errors = match fields.remove("errors") {
            None | Some(Value::Null) => Vec::new(),
            Some(raw) => serde_json::from_value(raw)
                .map_err(|e| ApiError::decode("errors", e.to_string()))?,
        };

        Ok(Self {
            success,
            response: fields.remove("response").unwrap_or(Value::Null),
            errors,
        })
    }

    /// Turn the envelope into the typed payload, or into `ApiFailure` when
    /// the API reported `success: false`.
    pub fn into_payload<T: DeserializeOwned>(self, resource: Resource) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::ApiFailure {
                resource,
                errors: self.errors,
            });
        }
        if self.response.is_null() {
            return Err(ApiError::decode("response", "null"));
        }
        serde_path_to_error::deserialize(self.response).map_err(|e| {
            let field = match e.path().to_string().as_str() {
                "." => "response".to_string(),
                path if path.starts_with('[') => format!("response{path}"),
                path => format!("response.{path}"),
            };
            ApiError::decode(field, e.into_inner().to_string())
        })
    }
}

/// Decode `body` straight into the payload of a successful envelope.
pub fn decode<T: DeserializeOwned>(body: &[u8], resource: Resource) -> Result<T, ApiError> {
    Envelope::from_slice(body)?.into_payload(resource)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
