//! Pollution Index Variants
//!
//! ## Overview
//!
//! Two scoring formulas coexist, on purpose. The unnormalized
//! [`PollutionIndex`] is the legacy weighted-deviation sum used on the
//! ingest and forecasting paths; the [`NormalizedIndex`] maps every
//! channel to a [0, 1] badness fraction and produces a 0-100 score, and
//! is the variant the policy simulator runs on. They are kept as named,
//! separately testable types rather than merged.
//!
//! Both are pure functions of the eight channel values: deterministic,
//! side-effect-free, and total over any finite input. Values outside
//! typical physical ranges are not rejected; the normalized variant
//! clamps them at aggregation and the unnormalized variant floors
//! pollutant contributions at zero so the score stays non-negative.
//!
//! The [`RiskIndex`] trait is the seam the forecaster is generic over:
//! it bundles the score function with the variant's clamping rule and
//! its minimum trend length.

use crate::constants::*;
use crate::errors::{RiskError, RiskResult};
use crate::reading::Reading;

/// Scoring seam between an index variant and the forecaster
pub trait RiskIndex {
    /// Scalar pollution-risk score for one reading
    fn score(&self, reading: &Reading) -> f64;

    /// Clamp a (possibly extrapolated) risk value into the variant's range
    fn clamp_risk(&self, risk: f64) -> f64;

    /// Minimum hourly points before a trend fit is trusted
    fn min_trend_points(&self) -> usize;
}

/// Linear weights for the unnormalized index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelWeights {
    /// Weight on |pH - neutral|
    pub ph_deviation: f64,
    /// Weight on max(0, healthy - DO2)
    pub do_deficit: f64,
    /// Weight on BOD
    pub bod: f64,
    /// Weight on COD
    pub cod: f64,
    /// Weight on turbidity
    pub turbidity: f64,
    /// Weight on ammonia
    pub ammonia: f64,
    /// Weight on conductivity
    pub conductivity: f64,
}

impl Default for ChannelWeights {
    fn default() -> Self {
        Self {
            ph_deviation: PH_DEVIATION_WEIGHT,
            do_deficit: DO_DEFICIT_WEIGHT,
            bod: BOD_WEIGHT,
            cod: COD_WEIGHT,
            turbidity: TURBIDITY_WEIGHT,
            ammonia: AMMONIA_WEIGHT,
            conductivity: CONDUCTIVITY_WEIGHT,
        }
    }
}

impl ChannelWeights {
    /// Sum of all weights
    pub fn sum(&self) -> f64 {
        self.ph_deviation
            + self.do_deficit
            + self.bod
            + self.cod
            + self.turbidity
            + self.ammonia
            + self.conductivity
    }

    fn check_finite_non_negative(&self) -> RiskResult<()> {
        let named = [
            (self.ph_deviation, "pH"),
            (self.do_deficit, "DO2"),
            (self.bod, "BOD"),
            (self.cod, "COD"),
            (self.turbidity, "turbidity"),
            (self.ammonia, "ammonia"),
            (self.conductivity, "conductivity"),
        ];
        for (weight, channel) in named {
            if !weight.is_finite() || weight < 0.0 {
                return Err(RiskError::InvalidWeight { channel });
            }
        }
        Ok(())
    }
}

/// Per-channel saturation limits for the normalized index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturationLimits {
    /// pH deviation (units from neutral) treated as fully bad
    pub ph_deviation: f64,
    /// DO2 deficit (mg/L) treated as fully bad
    pub do_deficit: f64,
    /// BOD (mg/L) treated as fully bad
    pub bod: f64,
    /// COD (mg/L) treated as fully bad
    pub cod: f64,
    /// Turbidity (NTU) treated as fully bad
    pub turbidity: f64,
    /// Ammonia (mg/L) treated as fully bad
    pub ammonia: f64,
    /// Conductivity (uS/cm) treated as fully bad
    pub conductivity: f64,
}

impl Default for SaturationLimits {
    fn default() -> Self {
        Self {
            ph_deviation: PH_DEVIATION_SATURATION,
            do_deficit: DO_DEFICIT_SATURATION_MG_L,
            bod: BOD_SATURATION_MG_L,
            cod: COD_SATURATION_MG_L,
            turbidity: TURBIDITY_SATURATION_NTU,
            ammonia: AMMONIA_SATURATION_MG_L,
            conductivity: CONDUCTIVITY_SATURATION_US_CM,
        }
    }
}

/// Unnormalized weighted-deviation score (legacy path)
///
/// Penalizes pH deviation from neutral and the dissolved-oxygen deficit
/// below the healthy ceiling, then adds weighted linear contributions
/// from the five pollutant channels. Pollutant values are floored at
/// zero before weighting, so the score is non-negative for any input
/// and can only decrease when pollutant channels are scaled down.
#[derive(Debug, Clone, Copy)]
pub struct PollutionIndex {
    weights: ChannelWeights,
}

impl Default for PollutionIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl PollutionIndex {
    /// Index with the fixed deployment weights
    pub fn new() -> Self {
        Self {
            weights: ChannelWeights::default(),
        }
    }

    /// Index with custom weights
    pub fn with_weights(weights: ChannelWeights) -> RiskResult<Self> {
        weights.check_finite_non_negative()?;
        Ok(Self { weights })
    }

    /// The weights in effect
    pub fn weights(&self) -> &ChannelWeights {
        &self.weights
    }
}

impl RiskIndex for PollutionIndex {
    fn score(&self, reading: &Reading) -> f64 {
        let w = &self.weights;
        let ph = reading.ph.unwrap_or(NEUTRAL_PH);
        let do2 = reading.do2.unwrap_or(HEALTHY_DISSOLVED_OXYGEN_MG_L);

        let mut score = (ph - NEUTRAL_PH).abs() * w.ph_deviation;
        score += (HEALTHY_DISSOLVED_OXYGEN_MG_L - do2).max(0.0) * w.do_deficit;
        score += reading.bod.unwrap_or(0.0).max(0.0) * w.bod;
        score += reading.cod.unwrap_or(0.0).max(0.0) * w.cod;
        score += reading.turbidity.unwrap_or(0.0).max(0.0) * w.turbidity;
        score += reading.ammonia.unwrap_or(0.0).max(0.0) * w.ammonia;
        score += reading.conductivity.unwrap_or(0.0).max(0.0) * w.conductivity;
        score
    }

    fn clamp_risk(&self, risk: f64) -> f64 {
        risk.max(0.0)
    }

    fn min_trend_points(&self) -> usize {
        MIN_TREND_POINTS
    }
}

/// Normalized 0-100 score (simulation path)
///
/// Each channel is clamped to a [0, 1] badness fraction against its
/// saturation limit, the fractions are combined with convex weights,
/// and the result is scaled to 0-100 and clamped to that range.
#[derive(Debug, Clone, Copy)]
pub struct NormalizedIndex {
    weights: NormalizedWeights,
    saturation: SaturationLimits,
}

/// Convex weights for the normalized index; must sum to 1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedWeights {
    /// Weight on pH badness
    pub ph: f64,
    /// Weight on dissolved-oxygen badness
    pub do2: f64,
    /// Weight on BOD badness
    pub bod: f64,
    /// Weight on COD badness
    pub cod: f64,
    /// Weight on turbidity badness
    pub turbidity: f64,
    /// Weight on ammonia badness
    pub ammonia: f64,
    /// Weight on conductivity badness
    pub conductivity: f64,
}

impl Default for NormalizedWeights {
    fn default() -> Self {
        Self {
            ph: PH_NORMALIZED_WEIGHT,
            do2: DO_NORMALIZED_WEIGHT,
            bod: BOD_NORMALIZED_WEIGHT,
            cod: COD_NORMALIZED_WEIGHT,
            turbidity: TURBIDITY_NORMALIZED_WEIGHT,
            ammonia: AMMONIA_NORMALIZED_WEIGHT,
            conductivity: CONDUCTIVITY_NORMALIZED_WEIGHT,
        }
    }
}

impl NormalizedWeights {
    /// Sum of all weights
    pub fn sum(&self) -> f64 {
        self.ph + self.do2 + self.bod + self.cod + self.turbidity + self.ammonia + self.conductivity
    }
}

impl Default for NormalizedIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl NormalizedIndex {
    /// Index with the fixed deployment weights and saturation limits
    pub fn new() -> Self {
        Self {
            weights: NormalizedWeights::default(),
            saturation: SaturationLimits::default(),
        }
    }

    /// Index with custom convex weights
    pub fn with_weights(weights: NormalizedWeights) -> RiskResult<Self> {
        let sum = weights.sum();
        if !sum.is_finite() || (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(RiskError::NonConvexWeights { sum });
        }
        Ok(Self {
            weights,
            saturation: SaturationLimits::default(),
        })
    }

    /// Badness fraction in [0, 1] for one already-defaulted value
    fn badness(value: f64, saturation: f64) -> f64 {
        (value / saturation).clamp(0.0, 1.0)
    }
}

impl RiskIndex for NormalizedIndex {
    fn score(&self, reading: &Reading) -> f64 {
        let w = &self.weights;
        let s = &self.saturation;
        let ph = reading.ph.unwrap_or(NEUTRAL_PH);
        let do2 = reading.do2.unwrap_or(HEALTHY_DISSOLVED_OXYGEN_MG_L);

        let mut combined = Self::badness((ph - NEUTRAL_PH).abs(), s.ph_deviation) * w.ph;
        combined += Self::badness(
            (HEALTHY_DISSOLVED_OXYGEN_MG_L - do2).max(0.0),
            s.do_deficit,
        ) * w.do2;
        combined += Self::badness(reading.bod.unwrap_or(0.0), s.bod) * w.bod;
        combined += Self::badness(reading.cod.unwrap_or(0.0), s.cod) * w.cod;
        combined += Self::badness(reading.turbidity.unwrap_or(0.0), s.turbidity) * w.turbidity;
        combined += Self::badness(reading.ammonia.unwrap_or(0.0), s.ammonia) * w.ammonia;
        combined +=
            Self::badness(reading.conductivity.unwrap_or(0.0), s.conductivity) * w.conductivity;

        (combined * RISK_SCALE).clamp(0.0, RISK_SCALE)
    }

    fn clamp_risk(&self, risk: f64) -> f64 {
        risk.clamp(0.0, RISK_SCALE)
    }

    fn min_trend_points(&self) -> usize {
        MIN_TREND_POINTS_NORMALIZED
    }
}
