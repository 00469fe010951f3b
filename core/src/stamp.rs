//! Time stamps: `GET /{company}/stamps[/{staffId}]` and
//! `POST /{company}/stamps`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::endpoint::{Credentials, EncodedRequest, Endpoint, Resource};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::query::Query;
use crate::wire_time::WireTime;

/// Kind of a time stamp. Travels as an integer code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum StampType {
    #[default]
    Unknown,
    GoToWork,
    LeaveWork,
    GoStraight,
    Bounce,
    Break,
    BreakReturn,
    /// A code this client does not know about; kept verbatim.
    Other(i64),
}

impl StampType {
    pub fn code(self) -> i64 {
        match self {
            StampType::Unknown => 0,
            StampType::GoToWork => 11,
            StampType::LeaveWork => 12,
            StampType::GoStraight => 21,
            StampType::Bounce => 22,
            StampType::Break => 31,
            StampType::BreakReturn => 32,
            StampType::Other(code) => code,
        }
    }

    /// The label the AKASHI UI shows; empty for unknown codes.
    pub fn label(self) -> &'static str {
        match self {
            StampType::GoToWork => "出勤",
            StampType::LeaveWork => "退勤",
            StampType::GoStraight => "直行",
            StampType::Bounce => "直帰",
            StampType::Break => "休憩入",
            StampType::BreakReturn => "休憩戻",
            StampType::Unknown | StampType::Other(_) => "",
        }
    }
}

impl From<i64> for StampType {
    fn from(code: i64) -> Self {
        match code {
            0 => StampType::Unknown,
            11 => StampType::GoToWork,
            12 => StampType::LeaveWork,
            21 => StampType::GoStraight,
            22 => StampType::Bounce,
            31 => StampType::Break,
            32 => StampType::BreakReturn,
            other => StampType::Other(other),
        }
    }
}

impl From<StampType> for i64 {
    fn from(kind: StampType) -> Self {
        kind.code()
    }
}

impl fmt::Display for StampType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where and how a stamp was recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StampAttribute {
    pub method: i64,
    pub org_id: i64,
    pub workplace_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub ip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stamp {
    pub stamped_at: Option<WireTime>,
    #[serde(rename = "type")]
    pub stamp_type: StampType,
    /// Local clock of the stamping device.
    pub local_time: Option<WireTime>,
    pub timezone: String,
    pub attributes: StampAttribute,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StampList {
    pub login_company_code: String,
    pub staff_id: i64,
    pub count: i64,
    pub stamps: Vec<Stamp>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetStampsParams {
    pub credentials: Credentials,
    pub start_date: Option<WireTime>,
    pub end_date: Option<WireTime>,
    pub staff_id: Option<i64>,
}

impl GetStampsParams {
    pub fn new(credentials: Credentials, start_date: WireTime, end_date: WireTime) -> Self {
        Self {
            credentials,
            start_date: Some(start_date),
            end_date: Some(end_date),
            staff_id: None,
        }
    }
}

impl Endpoint for GetStampsParams {
    type Output = StampList;

    const RESOURCE: Resource = Resource::Stamps;

    fn validate(&self) -> Result<(), ApiError> {
        self.credentials.validate()?;
        if self.start_date.is_none() {
            return Err(ApiError::missing("StartDate"));
        }
        if self.end_date.is_none() {
            return Err(ApiError::missing("EndDate"));
        }
        Ok(())
    }

    fn encode(&self) -> EncodedRequest {
        let mut path = format!("/{}/stamps", self.credentials.company_code);
        if let Some(staff_id) = self.staff_id {
            path.push_str(&format!("/{staff_id}"));
        }

        let mut query = Query::new();
        query
            .add("token", self.credentials.token.as_str())
            .add_opt("start_date", self.start_date.map(WireTime::to_query_string))
            .add_opt("end_date", self.end_date.map(WireTime::to_query_string));

        EncodedRequest {
            method: HttpMethod::Get,
            path,
            query: query.encode(),
            body: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostStampParams {
    pub credentials: Credentials,
    pub stamp_type: Option<StampType>,
    /// Client-side stamp time, sent as RFC 3339 with its offset. The server
    /// uses its own clock when absent.
    pub stamped_at: Option<OffsetDateTime>,
    pub timezone: Option<String>,
}

impl PostStampParams {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            ..Self::default()
        }
    }
}

impl Endpoint for PostStampParams {
    type Output = StampReceipt;

    const RESOURCE: Resource = Resource::Stamp;

    fn validate(&self) -> Result<(), ApiError> {
        self.credentials.validate()?;
        if let Some(stamped_at) = self.stamped_at {
            stamped_at
                .format(&Rfc3339)
                .map_err(|e| ApiError::encode("StampedAt", e.to_string()))?;
        }
        Ok(())
    }

    fn encode(&self) -> EncodedRequest {
        let mut body = Map::new();
        body.insert("token".to_string(), Value::from(self.credentials.token.as_str()));
        if let Some(kind) = self.stamp_type {
            body.insert("type".to_string(), Value::from(kind.code()));
        }
        if let Some(stamped_at) = self.stamped_at.and_then(|at| at.format(&Rfc3339).ok()) {
            body.insert("stampedAt".to_string(), Value::from(stamped_at));
        }
        if let Some(timezone) = self.timezone.as_deref().filter(|tz| !tz.is_empty()) {
            body.insert("timezone".to_string(), Value::from(timezone));
        }

        EncodedRequest {
            method: HttpMethod::Post,
            path: format!("/{}/stamps", self.credentials.company_code),
            query: String::new(),
            body: Some(Value::Object(body)),
        }
    }
}

/// What the server recorded for a posted stamp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StampReceipt {
    pub login_company_code: String,
    pub staff_id: i64,
    #[serde(rename = "type")]
    pub stamp_type: StampType,
    #[serde(rename = "stampedAt")]
    pub stamped_at: Option<WireTime>,
}
