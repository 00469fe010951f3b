//! Date-time value with the API's two textual encodings.
//!
//! Outbound query parameters carry `YYYYMMDDHHMMSS`; envelope payload fields
//! carry `YYYY/MM/DD HH:MM:SS`. Neither form has an offset, so values are
//! wall-clock times in whatever zone the API account is configured for.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

const QUERY_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year][month][day][hour][minute][second]");
const ENVELOPE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]/[month]/[day] [hour]:[minute]:[second]");

/// A literal that is not a valid wire timestamp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid wire time {literal:?}")]
pub struct WireTimeError {
    pub literal: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WireTime(PrimitiveDateTime);

impl WireTime {
    pub const fn new(datetime: PrimitiveDateTime) -> Self {
        Self(datetime)
    }

    pub const fn datetime(self) -> PrimitiveDateTime {
        self.0
    }

    /// Parse the `YYYY/MM/DD HH:MM:SS` form found in response payloads.
    pub fn parse_envelope(literal: &str) -> Result<Self, WireTimeError> {
        parse(literal, ENVELOPE_FORMAT)
    }

    /// Parse the `YYYYMMDDHHMMSS` form used in query strings.
    pub fn parse_query(literal: &str) -> Result<Self, WireTimeError> {
        parse(literal, QUERY_FORMAT)
    }

    /// Render as `YYYYMMDDHHMMSS`.
    pub fn to_query_string(self) -> String {
        render(self.0, QUERY_FORMAT)
    }

    /// Render as `YYYY/MM/DD HH:MM:SS`.
    pub fn to_envelope_string(self) -> String {
        render(self.0, ENVELOPE_FORMAT)
    }
}

// Both formats only name components a `PrimitiveDateTime` always has, so
// formatting cannot fail.
fn render(datetime: PrimitiveDateTime, format: &[BorrowedFormatItem<'_>]) -> String {
    datetime.format(format).unwrap_or_default()
}

fn parse(literal: &str, format: &[BorrowedFormatItem<'_>]) -> Result<WireTime, WireTimeError> {
    PrimitiveDateTime::parse(literal, format)
        .map(WireTime)
        .map_err(|_| WireTimeError {
            literal: literal.to_string(),
        })
}

impl From<PrimitiveDateTime> for WireTime {
    fn from(datetime: PrimitiveDateTime) -> Self {
        Self(datetime)
    }
}

/// Keeps the wall-clock fields and drops the offset; no conversion happens.
impl From<OffsetDateTime> for WireTime {
    fn from(datetime: OffsetDateTime) -> Self {
        Self(PrimitiveDateTime::new(datetime.date(), datetime.time()))
    }
}

impl fmt::Display for WireTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_envelope_string())
    }
}

impl Serialize for WireTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_envelope_string())
    }
}

impl<'de> Deserialize<'de> for WireTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let literal = String::deserialize(deserializer)?;
        WireTime::parse_envelope(&literal).map_err(de::Error::custom)
    }
}
