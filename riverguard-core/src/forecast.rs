//! Near-Term Risk Forecasting
//!
//! ## Overview
//!
//! The forecaster turns a window of readings into a fixed-length hourly
//! projection of pollution risk. It is generic over the index variant
//! ([`crate::index::RiskIndex`]) so the legacy and normalized paths
//! share one implementation.
//!
//! Pipeline per call:
//!
//! 1. Score every reading with the index
//! 2. Resample scores onto the hourly grid ([`crate::series`])
//! 3. If the series is shorter than the variant's minimum, repeat the
//!    most recent single-reading score flat across the horizon and flag
//!    the projection as low confidence
//! 4. Otherwise fit ordinary least squares over the hour index and
//!    extrapolate one point per future hour, clamped to the variant's
//!    range
//!
//! The whole pipeline is a closed-form, deterministic function of its
//! input: no randomness, no state between calls.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_HORIZON_HOURS;
use crate::index::RiskIndex;
use crate::reading::Reading;
use crate::series::HourlySeries;

/// One (future timestamp, risk) pair
///
/// Serializes as `{"ts": "<ISO-8601>", "risk": <float>}`, the shape the
/// request layer returns to dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Forecasted hour (UTC)
    #[serde(rename = "ts")]
    pub timestamp: DateTime<Utc>,
    /// Projected risk at that hour
    pub risk: f64,
}

/// How the projection was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Least-squares trend over the hourly series
    Trend,
    /// Too little data; the last score was repeated flat
    FlatFallback,
}

/// Forecaster output: future points plus a current-state summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// One point per future hour, oldest first
    pub points: Vec<ForecastPoint>,
    /// Mean risk over the input window (current state, not a forecast)
    pub baseline: f64,
    /// Whether the points come from a trend fit or the flat fallback
    pub confidence: Confidence,
}

impl Projection {
    fn empty() -> Self {
        Self {
            points: Vec::new(),
            baseline: 0.0,
            confidence: Confidence::FlatFallback,
        }
    }
}

/// Hourly risk forecaster over one index variant
#[derive(Debug, Clone)]
pub struct Forecaster<I: RiskIndex> {
    index: I,
    horizon_hours: u32,
}

impl<I: RiskIndex> Forecaster<I> {
    /// Forecaster with the default 24-hour horizon
    pub fn new(index: I) -> Self {
        Self {
            index,
            horizon_hours: DEFAULT_HORIZON_HOURS,
        }
    }

    /// Override the horizon; zero is clamped to one hour
    pub fn with_horizon(mut self, horizon_hours: u32) -> Self {
        if horizon_hours == 0 {
            log::warn!("forecast horizon 0 clamped to 1 hour");
        }
        self.horizon_hours = horizon_hours.max(1);
        self
    }

    /// The horizon in effect
    pub fn horizon_hours(&self) -> u32 {
        self.horizon_hours
    }

    /// The index variant in use
    pub fn index(&self) -> &I {
        &self.index
    }

    /// Project risk one point per hour out to the horizon
    ///
    /// An empty window returns an empty projection with baseline 0, not
    /// an error.
    pub fn forecast(&self, readings: &[Reading]) -> Projection {
        if readings.is_empty() {
            return Projection::empty();
        }

        let mut scored: Vec<(DateTime<Utc>, f64)> = readings
            .iter()
            .map(|r| (r.timestamp, self.index.score(r)))
            .collect();
        scored.sort_by_key(|(ts, _)| *ts);

        let series = HourlySeries::resample(&scored);

        if series.len() < self.index.min_trend_points() {
            let (last_ts, last_score) = *scored.last().expect("non-empty window");
            log::debug!(
                "hourly series has {} points (< {}), repeating last score {:.3} flat",
                series.len(),
                self.index.min_trend_points(),
                last_score,
            );
            return self.flat(last_ts, last_score);
        }

        let values = series.values();
        let (slope, intercept) = least_squares(&values);
        let last_idx = (values.len() - 1) as f64;
        let last_hour = series.last_hour().expect("non-empty series");

        let points = (1..=self.horizon_hours)
            .map(|i| {
                let predicted = intercept + slope * (last_idx + i as f64);
                ForecastPoint {
                    timestamp: last_hour + TimeDelta::hours(i as i64),
                    risk: self.index.clamp_risk(predicted),
                }
            })
            .collect();

        let baseline = scored.iter().map(|(_, s)| s).sum::<f64>() / scored.len() as f64;

        Projection {
            points,
            baseline,
            confidence: Confidence::Trend,
        }
    }

    /// Flat low-confidence projection repeating the most recent score
    fn flat(&self, last_ts: DateTime<Utc>, last_score: f64) -> Projection {
        let risk = self.index.clamp_risk(last_score);
        let points = (1..=self.horizon_hours)
            .map(|i| ForecastPoint {
                timestamp: last_ts + TimeDelta::hours(i as i64),
                risk,
            })
            .collect();
        Projection {
            points,
            baseline: risk,
            confidence: Confidence::FlatFallback,
        }
    }
}

/// Closed-form ordinary least squares over sequential indices 0..n
///
/// Returns (slope, intercept). A degenerate denominator (constant x is
/// impossible here, but n == 1 is not) yields a flat line at the mean.
pub(crate) fn least_squares(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    if values.len() < 2 {
        return (0.0, values.first().copied().unwrap_or(0.0));
    }

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return (0.0, sum_y / n);
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    (slope, intercept)
}
