//! Server timestamps.
//!
//! The review server reports instants as `YYYY-MM-DD hh:mm:ss.fffffffff` in UTC,
//! with a fractional part of varying length. Comparing those strings directly
//! is wrong as soon as two values carry a different number of fractional
//! digits, so every date is parsed into a [`Timestamp`] on the way in.

use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

const WIRE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A UTC instant, totally ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Parses the server wire format. A `T` separator and RFC 3339 strings are
    /// accepted as well.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timestamp`] if the string matches none of the formats.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, WIRE_FORMAT) {
            return Ok(Self(dt));
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, ISO_FORMAT) {
            return Ok(Self(dt));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(dt.naive_utc()));
        }
        Err(Error::Timestamp(s.to_owned()))
    }

    /// Builds a timestamp from whole seconds since the Unix epoch.
    ///
    /// Returns `None` when `secs` is outside chrono's representable range.
    pub fn from_unix_seconds(secs: i64) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(|dt| Self(dt.naive_utc()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S%.9f"))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
