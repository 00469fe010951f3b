//! The contract every API operation's parameter type fulfils.
//!
//! # Design
//! An [`Endpoint`] knows how to check its own required fields and how to turn
//! itself into method, path, query and body. All error conditions live in
//! `validate`; `encode` is infallible and is only called once validation has
//! passed. The associated `Output` type ties each parameter type to the
//! record its response decodes into.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::HttpMethod;

/// Which API resource an operation talks to. Used for failure messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Staff,
    Stamps,
    Stamp,
    TokenReissue,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::Staff => "Staff",
            Resource::Stamps => "Stamps",
            Resource::Stamp => "Stamp",
            Resource::TokenReissue => "Token Reissue",
        })
    }
}

/// The company code and access token every request carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub company_code: String,
    pub token: String,
}

impl Credentials {
    pub fn new(company_code: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            company_code: company_code.into(),
            token: token.into(),
        }
    }

    /// Company code is checked before the token.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.company_code.is_empty() {
            return Err(ApiError::missing("LoginCompanyCode"));
        }
        if self.token.is_empty() {
            return Err(ApiError::missing("Token"));
        }
        Ok(())
    }
}

/// An operation's request, encoded but not yet bound to a base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRequest {
    pub method: HttpMethod,
    pub path: String,
    /// Percent-encoded query string without the leading `?`; empty for writes.
    pub query: String,
    pub body: Option<Value>,
}

impl EncodedRequest {
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }
}

pub trait Endpoint {
    /// The canonical record a successful response decodes into.
    type Output: DeserializeOwned;

    const RESOURCE: Resource;

    /// Report the first missing required field, in a fixed order: company
    /// code, token, date fields, then everything else.
    fn validate(&self) -> Result<(), ApiError>;

    fn encode(&self) -> EncodedRequest;
}
