//! CF time-axis unit handling.
//!
//! Reanalysis time axes are stored as numeric offsets from an epoch, with a
//! `units` attribute like "hours since 1900-01-01 00:00:00.0" and an optional
//! `calendar` attribute. Only real-calendar variants are accepted; 360-day
//! and no-leap model calendars never occur in the archives this crate reads.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::{ArchiveError, ArchiveResult};

/// A decoded CF time unit: an epoch plus a step length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeUnits {
    epoch: DateTime<Utc>,
    step_seconds: f64,
}

impl TimeUnits {
    /// Parse a CF `units` string, e.g. "hours since 1900-01-01 00:00:00.0".
    pub fn parse(units: &str) -> ArchiveResult<Self> {
        let mut parts = units.splitn(2, " since ");
        let unit = parts
            .next()
            .ok_or_else(|| ArchiveError::InvalidFormat(format!("time units: {units}")))?
            .trim();
        let epoch_str = parts
            .next()
            .ok_or_else(|| ArchiveError::InvalidFormat(format!("time units missing epoch: {units}")))?
            .trim();

        let step_seconds = match unit {
            "seconds" | "second" | "secs" | "sec" | "s" => 1.0,
            "minutes" | "minute" | "mins" | "min" => 60.0,
            "hours" | "hour" | "hrs" | "hr" | "h" => 3600.0,
            "days" | "day" | "d" => 86400.0,
            _ => {
                return Err(ArchiveError::InvalidFormat(format!(
                    "unsupported time unit: {unit}"
                )))
            }
        };

        Ok(Self {
            epoch: parse_epoch(epoch_str)?,
            step_seconds,
        })
    }

    /// Convert a numeric axis value to an absolute timestamp.
    pub fn decode(&self, value: f64) -> DateTime<Utc> {
        self.epoch + Duration::milliseconds((value * self.step_seconds * 1000.0).round() as i64)
    }
}

/// Check a CF `calendar` attribute. A missing attribute defaults to the
/// standard calendar.
pub fn check_calendar(calendar: Option<&str>) -> ArchiveResult<()> {
    match calendar {
        None => Ok(()),
        Some(c) => match c.to_lowercase().as_str() {
            "standard" | "gregorian" | "proleptic_gregorian" => Ok(()),
            other => Err(ArchiveError::InvalidFormat(format!(
                "unsupported calendar: {other}"
            ))),
        },
    }
}

fn parse_epoch(s: &str) -> ArchiveResult<DateTime<Utc>> {
    // Strip a trailing UTC marker if present.
    let s = s.trim_end_matches(" UTC").trim_end_matches('Z').trim();

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }
    if let Ok(nd) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let ndt = nd.and_hms_opt(0, 0, 0).expect("midnight is valid");
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    Err(ArchiveError::InvalidFormat(format!("time epoch: {s}")))
}
