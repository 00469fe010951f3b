//! Stateless HTTP request builder and response parser for the AKASHI API.
//!
//! # Design
//! `KikuClient` holds only a `base_url` and carries no mutable state between
//! calls. Every operation is split into `build`, which validates the
//! parameters and produces an `HttpRequest`, and `parse`, which checks the
//! status and decodes the envelope of an `HttpResponse`. `call` strings the
//! two together around a caller-supplied [`Transport`].

use tracing::{debug, warn};

use crate::endpoint::Endpoint;
use crate::envelope;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::stamp::{GetStampsParams, PostStampParams, StampList, StampReceipt};
use crate::staff::{GetStaffParams, StaffList};
use crate::token::{ReissuedToken, TokenReissueParams};

/// Production endpoint of the AKASHI cooperation API.
pub const DEFAULT_BASE_URL: &str = "https://atnd.ak4.jp/api/cooperation";

/// Synchronous, stateless client for the AKASHI API.
#[derive(Debug, Clone)]
pub struct KikuClient {
    base_url: String,
}

impl Default for KikuClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl KikuClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Validate `endpoint` and encode it into a request against this
    /// client's base URL. Nothing is encoded when validation fails.
    pub fn build<E: Endpoint>(&self, endpoint: &E) -> Result<HttpRequest, ApiError> {
        endpoint.validate()?;
        let encoded = endpoint.encode();
        let url = format!("{}{}", self.base_url, encoded.path_and_query());

        let (headers, body) = match encoded.body {
            Some(body) => (
                vec![("content-type".to_string(), "application/json".to_string())],
                Some(body.to_string()),
            ),
            None => (Vec::new(), None),
        };

        Ok(HttpRequest {
            method: encoded.method,
            url,
            headers,
            body,
        })
    }

    /// Decode the response to `E`'s request. Any status other than 200 fails
    /// before the body is looked at.
    pub fn parse<E: Endpoint>(&self, response: HttpResponse) -> Result<E::Output, ApiError> {
        check_status(&response)?;
        envelope::decode(&response.body, E::RESOURCE).inspect_err(|err| {
            if let ApiError::ApiFailure { resource, errors } = err {
                warn!(%resource, ?errors, "API reported failure");
            }
        })
    }

    /// Build, send through `transport`, and parse.
    pub fn call<E, T>(&self, transport: &T, endpoint: &E) -> Result<E::Output, ApiError>
    where
        E: Endpoint,
        T: Transport + ?Sized,
    {
        let request = self.build(endpoint)?;
        debug!(method = %request.method, url = %request.url, "sending request");
        let response = transport.send(request)?;
        self.parse::<E>(response)
    }

    pub fn get_staff<T: Transport + ?Sized>(
        &self,
        transport: &T,
        params: &GetStaffParams,
    ) -> Result<StaffList, ApiError> {
        self.call(transport, params)
    }

    pub fn get_stamps<T: Transport + ?Sized>(
        &self,
        transport: &T,
        params: &GetStampsParams,
    ) -> Result<StampList, ApiError> {
        self.call(transport, params)
    }

    pub fn post_stamp<T: Transport + ?Sized>(
        &self,
        transport: &T,
        params: &PostStampParams,
    ) -> Result<StampReceipt, ApiError> {
        self.call(transport, params)
    }

    pub fn reissue_token<T: Transport + ?Sized>(
        &self,
        transport: &T,
        params: &TokenReissueParams,
    ) -> Result<ReissuedToken, ApiError> {
        self.call(transport, params)
    }
}

fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.status == 200 {
        return Ok(());
    }
    warn!(status = response.status, "unexpected status code");
    Err(ApiError::HttpStatus {
        status: response.status,
    })
}
