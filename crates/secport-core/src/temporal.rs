//! # Temporal Types: UTC-Normalized Timestamps
//!
//! Defines `Timestamp`, an owned instant that is always stored in UTC.
//!
//! ## Invariant
//!
//! Every timestamp held by a secret, revision or consumer is a `Timestamp`,
//! so the normalization happens exactly once, at construction. Inputs carrying
//! an offset (`+05:30`, `-04:00`) are accepted and converted; the instant is
//! preserved, only the zone changes.
//!
//! Sub-second precision is kept: a snapshot that is imported and exported
//! again reproduces the same instant, nanoseconds included.

use std::fmt;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// An instant in time, stored in UTC.
///
/// # Construction
///
/// - [`Timestamp::now()`]: current UTC time.
/// - [`Timestamp::from_datetime()`]: from a `DateTime` in any zone.
/// - [`Timestamp::parse()`]: from an RFC 3339 string with any offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current UTC time.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Normalize a `DateTime` in any time zone to UTC.
    pub fn from_datetime<Tz: TimeZone>(dt: DateTime<Tz>) -> Self {
        Self(dt.with_timezone(&Utc))
    }

    /// Parse an RFC 3339 string, converting whatever offset it carries to UTC.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidTimestamp`] if the string is not RFC 3339.
    pub fn parse(s: &str) -> Result<Self, FormatError> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| FormatError::InvalidTimestamp {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_datetime(dt))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as RFC 3339 with a `Z` suffix, keeping only as many
    /// fractional digits as needed.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(dt: DateTime<Tz>) -> Self {
        Self::from_datetime(dt)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike};

    #[test]
    fn test_parse_z_suffix() {
        let ts = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-01-15T12:00:00Z");
    }

    #[test]
    fn test_parse_offset_normalized_to_utc() {
        let ts = Timestamp::parse("2026-01-15T17:30:00+05:30").unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-01-15T12:00:00Z");
    }

    #[test]
    fn test_parse_negative_offset() {
        let ts = Timestamp::parse("2026-01-15T08:00:00-04:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-01-15T12:00:00Z");
    }

    #[test]
    fn test_subseconds_preserved() {
        let ts = Timestamp::parse("2026-01-15T12:00:00.123456789Z").unwrap();
        assert_eq!(ts.as_datetime().nanosecond(), 123_456_789);
        assert_eq!(ts.to_rfc3339(), "2026-01-15T12:00:00.123456789Z");
    }

    #[test]
    fn test_parse_invalid_format() {
        assert!(Timestamp::parse("not-a-date").is_err());
        assert!(Timestamp::parse("2026-01-15").is_err());
        assert!(Timestamp::parse("").is_err());
    }

    #[test]
    fn test_from_fixed_offset_datetime() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = tz.with_ymd_and_hms(2026, 3, 1, 14, 0, 0).unwrap();
        let ts = Timestamp::from(local);
        assert_eq!(ts.to_rfc3339(), "2026-03-01T12:00:00Z");
        assert_eq!(ts, Timestamp::parse("2026-03-01T12:00:00Z").unwrap());
    }

    #[test]
    fn test_display_matches_rfc3339() {
        let ts = Timestamp::parse("2026-06-30T23:59:59Z").unwrap();
        assert_eq!(format!("{ts}"), ts.to_rfc3339());
    }

    #[test]
    fn test_serde_roundtrip() {
        let ts = Timestamp::parse("2026-01-15T12:00:00.5Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, parsed);
    }
}
