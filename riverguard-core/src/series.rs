//! Hourly Resampling of Risk Scores
//!
//! Intermediate, evenly-spaced series used by the forecaster: scores
//! are grouped by calendar hour, averaged within each bucket, and
//! interior empty buckets are filled by linear interpolation. The
//! series is bounded by the observed hour range; it never extrapolates
//! past the first or last observation. Discarded after the trend fit.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

const SECONDS_PER_HOUR: i64 = 3600;

/// One point of the evenly-spaced hourly series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyPoint {
    /// Start of the calendar hour (UTC)
    pub hour: DateTime<Utc>,
    /// Mean (or interpolated) risk for the hour
    pub risk: f64,
}

/// Evenly-spaced (1-hour step) risk series with no gaps
#[derive(Debug, Clone, PartialEq)]
pub struct HourlySeries {
    points: Vec<HourlyPoint>,
}

impl HourlySeries {
    /// Resample timestamped scores onto the hourly grid
    ///
    /// Input order does not matter; bucketing is by calendar hour. An
    /// empty input produces an empty series.
    pub fn resample(scored: &[(DateTime<Utc>, f64)]) -> Self {
        if scored.is_empty() {
            return Self { points: Vec::new() };
        }

        // Bucket by epoch hour: (sum, count) per observed hour.
        let mut buckets: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
        for (ts, score) in scored {
            let hour = ts.timestamp().div_euclid(SECONDS_PER_HOUR);
            let entry = buckets.entry(hour).or_insert((0.0, 0));
            entry.0 += score;
            entry.1 += 1;
        }

        let first_hour = *buckets.keys().next().expect("non-empty buckets");
        let last_hour = *buckets.keys().next_back().expect("non-empty buckets");

        // Contiguous grid from first to last observed hour; empty
        // buckets start as None and are interpolated below.
        let len = (last_hour - first_hour + 1) as usize;
        let mut values: Vec<Option<f64>> = vec![None; len];
        for (hour, (sum, count)) in &buckets {
            values[(hour - first_hour) as usize] = Some(sum / *count as f64);
        }

        interpolate_gaps(&mut values);

        let points = values
            .iter()
            .enumerate()
            .map(|(i, value)| HourlyPoint {
                hour: hour_start(first_hour + i as i64),
                risk: value.expect("all gaps interpolated"),
            })
            .collect();

        Self { points }
    }

    /// Number of hourly points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The hourly points, oldest first
    pub fn points(&self) -> &[HourlyPoint] {
        &self.points
    }

    /// Risk values in hour order
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.risk).collect()
    }

    /// Start of the last observed hour, if the series is non-empty
    pub fn last_hour(&self) -> Option<DateTime<Utc>> {
        self.points.last().map(|p| p.hour)
    }
}

/// Fill interior `None` runs linearly between their known neighbors
///
/// The first and last entries are always known (they correspond to
/// observed hours), so every gap has a neighbor on both sides.
fn interpolate_gaps(values: &mut [Option<f64>]) {
    let mut prev_known = 0;
    for i in 1..values.len() {
        if values[i].is_none() {
            continue;
        }
        let gap = i - prev_known;
        if gap > 1 {
            let start = values[prev_known].expect("known endpoint");
            let end = values[i].expect("known endpoint");
            let step = (end - start) / gap as f64;
            for (offset, slot) in values[prev_known + 1..i].iter_mut().enumerate() {
                *slot = Some(start + step * (offset + 1) as f64);
            }
        }
        prev_known = i;
    }
}

fn hour_start(epoch_hour: i64) -> DateTime<Utc> {
    // Derived from a valid timestamp, so it stays in chrono's range.
    DateTime::<Utc>::from_timestamp(epoch_hour * SECONDS_PER_HOUR, 0)
        .expect("hour derived from a valid timestamp")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, hour, minute, 0).unwrap()
    }

    #[test]
    fn empty_input_empty_series() {
        let series = HourlySeries::resample(&[]);
        assert!(series.is_empty());
        assert_eq!(series.last_hour(), None);
    }

    #[test]
    fn averages_within_hour() {
        let scored = vec![(at(10, 0), 2.0), (at(10, 30), 4.0), (at(11, 15), 8.0)];
        let series = HourlySeries::resample(&scored);
        assert_eq!(series.len(), 2);
        assert_eq!(series.values(), vec![3.0, 8.0]);
        assert_eq!(series.points()[0].hour, at(10, 0));
        assert_eq!(series.last_hour(), Some(at(11, 0)));
    }

    #[test]
    fn interior_gaps_are_interpolated() {
        // Observations at 10:00 and 13:00; 11:00 and 12:00 are filled
        // linearly.
        let scored = vec![(at(10, 5), 1.0), (at(13, 5), 7.0)];
        let series = HourlySeries::resample(&scored);
        assert_eq!(series.len(), 4);
        assert_eq!(series.values(), vec![1.0, 3.0, 5.0, 7.0]);
    }

    #[test]
    fn no_leading_or_trailing_extrapolation() {
        let scored = vec![(at(3, 0), 5.0)];
        let series = HourlySeries::resample(&scored);
        assert_eq!(series.len(), 1);
        assert_eq!(series.points()[0].hour, at(3, 0));
    }

    #[test]
    fn unordered_input_buckets_identically() {
        let ordered = vec![(at(9, 0), 1.0), (at(10, 0), 2.0), (at(11, 0), 3.0)];
        let shuffled = vec![(at(11, 0), 3.0), (at(9, 0), 1.0), (at(10, 0), 2.0)];
        assert_eq!(
            HourlySeries::resample(&ordered),
            HourlySeries::resample(&shuffled)
        );
    }
}
