//! Time axis handling for reanalysis archives.

use chrono::{DateTime, Duration, TimeZone, Utc};

/// The bracketing samples of a target instant on an archive time axis.
///
/// `frac` weights the earlier sample; `1 - frac` weights the later one.
/// When the target coincides with a single sample, `before == after` in
/// timestamp and `frac == 1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeBracket {
    /// Positional index of the latest sample at or before the target.
    pub before: usize,
    /// Positional index of the earliest sample at or after the target.
    pub after: usize,
    /// Interpolation weight of the earlier sample, in [0, 1].
    pub frac: f64,
}

/// An ordered sequence of timestamps extracted from an archive's time axis.
///
/// Reanalysis and forecast-cycle axes are not assumed evenly spaced, but
/// they must be non-decreasing: positions in the series double as layer
/// indices into the archive, so reordering here would silently desynchronize
/// bracket lookups from the stored layers. Duplicate timestamps are legal
/// and bracket to the same instant.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    times: Vec<DateTime<Utc>>,
}

impl TimeSeries {
    /// Build a series, rejecting an axis that decreases anywhere.
    pub fn new(times: Vec<DateTime<Utc>>) -> Result<Self, NonMonotonicTimeAxis> {
        if let Some(i) = times.windows(2).position(|w| w[0] > w[1]) {
            return Err(NonMonotonicTimeAxis { position: i + 1 });
        }
        Ok(Self { times })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<DateTime<Utc>> {
        self.times.get(index).copied()
    }

    /// Find the samples bracketing `target`.
    ///
    /// Returns `None` when the target falls before the first or after the
    /// last sample: the instant is out of archive coverage and callers skip
    /// rather than fail.
    pub fn bracket(&self, target: DateTime<Utc>) -> Option<TimeBracket> {
        // Last index with time <= target.
        let before = self.times.partition_point(|&x| x <= target).checked_sub(1)?;
        // First index with time >= target.
        let after = self.times.partition_point(|&x| x < target);
        if after >= self.times.len() {
            return None;
        }

        let before_t = self.times[before];
        let after_t = self.times[after];
        let frac = if before_t == after_t {
            1.0
        } else {
            (after_t - target).num_milliseconds() as f64
                / (after_t - before_t).num_milliseconds() as f64
        };

        Some(TimeBracket {
            before,
            after,
            frac,
        })
    }
}

/// A time axis that decreases somewhere, so its positions cannot be used as
/// archive layer indices.
#[derive(Debug, thiserror::Error)]
#[error("time axis decreases at position {position}")]
pub struct NonMonotonicTimeAxis {
    pub position: usize,
}

/// UTC instant of the local midnight preceding `instant` in a fixed-offset
/// time zone.
///
/// This anchors the 24-hour integration window of the daily-irradiance
/// field: local midnight is found in local time, then converted back to UTC.
pub fn local_midnight_utc(instant: DateTime<Utc>, time_zone_hours: i32) -> DateTime<Utc> {
    let offset = Duration::hours(time_zone_hours as i64);
    let local_date = (instant + offset).date_naive();
    let midnight_local = local_date.and_hms_opt(0, 0, 0).expect("midnight is valid");
    Utc.from_utc_datetime(&midnight_local) - offset
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hourly_axis() -> TimeSeries {
        TimeSeries::new(vec![
            Utc.with_ymd_and_hms(2020, 6, 15, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2020, 6, 15, 1, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2020, 6, 15, 2, 0, 0).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_bracket_exact_match() {
        let axis = hourly_axis();
        let b = axis
            .bracket(Utc.with_ymd_and_hms(2020, 6, 15, 1, 0, 0).unwrap())
            .unwrap();
        assert_eq!(b.before, 1);
        assert_eq!(b.after, 1);
        assert_eq!(b.frac, 1.0);
    }

    #[test]
    fn test_bracket_interior() {
        let axis = hourly_axis();
        let b = axis
            .bracket(Utc.with_ymd_and_hms(2020, 6, 15, 0, 30, 0).unwrap())
            .unwrap();
        assert_eq!(b.before, 0);
        assert_eq!(b.after, 1);
        assert!((b.frac - 0.5).abs() < 1e-12);

        // 00:45 lies three quarters of the way in; the earlier sample keeps
        // a quarter of the weight.
        let b = axis
            .bracket(Utc.with_ymd_and_hms(2020, 6, 15, 0, 45, 0).unwrap())
            .unwrap();
        assert!((b.frac - 0.25).abs() < 1e-12);
        assert!(b.frac > 0.0 && b.frac < 1.0);
    }

    #[test]
    fn test_bracket_out_of_coverage() {
        let axis = hourly_axis();
        assert!(axis
            .bracket(Utc.with_ymd_and_hms(2020, 6, 14, 23, 59, 0).unwrap())
            .is_none());
        assert!(axis
            .bracket(Utc.with_ymd_and_hms(2020, 6, 15, 2, 0, 1).unwrap())
            .is_none());
    }

    #[test]
    fn test_bracket_irregular_axis() {
        // Forecast-cycle gap: 01:00 is missing.
        let axis = TimeSeries::new(vec![
            Utc.with_ymd_and_hms(2020, 6, 15, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2020, 6, 15, 3, 0, 0).unwrap(),
        ])
        .unwrap();
        let b = axis
            .bracket(Utc.with_ymd_and_hms(2020, 6, 15, 1, 0, 0).unwrap())
            .unwrap();
        assert_eq!(b.before, 0);
        assert_eq!(b.after, 1);
        assert!((b.frac - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_bracket_duplicate_timestamps() {
        let t0 = Utc.with_ymd_and_hms(2020, 6, 15, 0, 0, 0).unwrap();
        let axis = TimeSeries::new(vec![t0, t0, t0 + Duration::hours(1)]).unwrap();
        let b = axis.bracket(t0).unwrap();
        assert_eq!(b.frac, 1.0);
        assert_eq!(axis.get(b.before), axis.get(b.after));
    }

    #[test]
    fn test_rejects_decreasing_axis() {
        // Positions double as layer indices; a reordered axis would bracket
        // to the wrong layers, so it must be refused outright.
        let t0 = Utc.with_ymd_and_hms(2020, 6, 15, 0, 0, 0).unwrap();
        let err = TimeSeries::new(vec![
            t0 + Duration::hours(2),
            t0,
            t0 + Duration::hours(1),
        ])
        .unwrap_err();
        assert_eq!(err.position, 1);
    }

    #[test]
    fn test_local_midnight_window() {
        // 2020-06-15 10:00 UTC at UTC+2 is 12:00 local; local midnight is
        // 2020-06-15 00:00 local = 2020-06-14 22:00 UTC.
        let instant = Utc.with_ymd_and_hms(2020, 6, 15, 10, 0, 0).unwrap();
        let midnight = local_midnight_utc(instant, 2);
        assert_eq!(midnight, Utc.with_ymd_and_hms(2020, 6, 14, 22, 0, 0).unwrap());
        assert_eq!(
            midnight + Duration::hours(24),
            Utc.with_ymd_and_hms(2020, 6, 15, 22, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_local_midnight_negative_offset() {
        // 2020-06-15 02:00 UTC at UTC-5 is 21:00 on the 14th local; local
        // midnight of the 14th is 05:00 UTC on the 14th.
        let instant = Utc.with_ymd_and_hms(2020, 6, 15, 2, 0, 0).unwrap();
        let midnight = local_midnight_utc(instant, -5);
        assert_eq!(midnight, Utc.with_ymd_and_hms(2020, 6, 14, 5, 0, 0).unwrap());
    }
}
