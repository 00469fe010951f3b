//! Synchronous API client core for the AKASHI attendance service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). A caller-supplied
//! [`Transport`] executes the actual HTTP round-trip, keeping the core
//! deterministic and testable.
//!
//! # Design
//! - `KikuClient` is stateless; it holds only `base_url`.
//! - Each operation's parameters implement [`Endpoint`]: `validate` reports
//!   the first missing field, `encode` produces path, query and JSON body.
//! - Every response shares the `{success, response, errors}` envelope, which
//!   is decoded generically before the payload is typed.
//! - Timestamps use [`WireTime`], which knows both of the API's textual
//!   date formats.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod http;
mod query;
pub mod staff;
pub mod stamp;
pub mod token;
pub mod wire_time;

pub use client::{KikuClient, DEFAULT_BASE_URL};
pub use endpoint::{Credentials, EncodedRequest, Endpoint, Resource};
pub use envelope::{Envelope, ErrorDetail};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use staff::{EmploymentCategory, GetStaffParams, Organization, PermissionGroup, Staff, StaffList};
pub use stamp::{
    GetStampsParams, PostStampParams, Stamp, StampAttribute, StampList, StampReceipt, StampType,
};
pub use token::{ReissuedToken, TokenReissueParams};
pub use wire_time::{WireTime, WireTimeError};
