//! Policy Simulation
//!
//! "What-if" projections for pollutant-discharge reduction policies.
//! The simulator scales the five discharge-byproduct channels (BOD,
//! COD, turbidity, ammonia, conductivity) by a uniform factor and
//! re-runs the forecaster on the adjusted copy; it owns no forecasting
//! logic of its own. pH, dissolved oxygen and temperature are left
//! untouched since they are not direct discharge byproducts.
//!
//! The simulator is total: a reduction percentage outside [0, 100] is
//! clamped (with a warning), never rejected.

use serde::{Deserialize, Serialize};

use crate::forecast::{Forecaster, Projection};
use crate::index::{NormalizedIndex, RiskIndex};
use crate::reading::{Channel, Reading};

/// Baseline and reduced projections over the same window and horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    /// Reduction percentage actually applied (after clamping)
    pub reduction_pct: f64,
    /// Projection over the unmodified window
    pub baseline: Projection,
    /// Projection over the reduced window
    pub reduced: Projection,
}

/// Discharge-reduction simulator wrapping a forecaster
#[derive(Debug, Clone)]
pub struct PolicySimulator<I: RiskIndex> {
    forecaster: Forecaster<I>,
}

impl Default for PolicySimulator<NormalizedIndex> {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicySimulator<NormalizedIndex> {
    /// Simulator on the normalized 0-100 index with the default horizon
    pub fn new() -> Self {
        Self {
            forecaster: Forecaster::new(NormalizedIndex::new()),
        }
    }
}

impl<I: RiskIndex> PolicySimulator<I> {
    /// Simulator over an explicitly configured forecaster
    pub fn with_forecaster(forecaster: Forecaster<I>) -> Self {
        Self { forecaster }
    }

    /// The wrapped forecaster
    pub fn forecaster(&self) -> &Forecaster<I> {
        &self.forecaster
    }

    /// Forecast risk after reducing pollutant discharges by `reduction_pct`
    pub fn simulate(&self, readings: &[Reading], reduction_pct: f64) -> Projection {
        let adjusted = scale_pollutants(readings, reduction_factor(reduction_pct));
        self.forecaster.forecast(&adjusted)
    }

    /// Baseline and reduced projections side by side
    ///
    /// Two independent forecaster runs over the same window; each is a
    /// pure function of its input, so no state is shared between them.
    pub fn compare(&self, readings: &[Reading], reduction_pct: f64) -> ScenarioComparison {
        ScenarioComparison {
            reduction_pct: reduction_pct.clamp(0.0, 100.0),
            baseline: self.forecaster.forecast(readings),
            reduced: self.simulate(readings, reduction_pct),
        }
    }
}

/// Multiplier for pollutant channels given a reduction percentage
fn reduction_factor(reduction_pct: f64) -> f64 {
    if !(0.0..=100.0).contains(&reduction_pct) {
        log::warn!("reduction_pct {reduction_pct} outside [0, 100], clamping");
    }
    // NaN falls through clamp to 1.0 (no reduction).
    let factor = 1.0 - reduction_pct / 100.0;
    if factor.is_nan() {
        1.0
    } else {
        factor.clamp(0.0, 1.0)
    }
}

/// Copy of the window with discharge-byproduct channels scaled
fn scale_pollutants(readings: &[Reading], factor: f64) -> Vec<Reading> {
    readings
        .iter()
        .map(|reading| {
            let mut adjusted = *reading;
            for channel in Channel::DISCHARGE_BYPRODUCTS {
                if let Some(value) = adjusted.channel(channel) {
                    adjusted.set_channel(channel, Some(value * factor));
                }
            }
            adjusted
        })
        .collect()
}
