//! Fixed Constants for Water-Quality Risk Scoring
//!
//! All weights and thresholds used by the pollution index and the
//! forecasting pipeline live here as documented constants. They are
//! design choices, not learned parameters, and are wired into explicit
//! configuration structs ([`crate::index::ChannelWeights`],
//! [`crate::index::SaturationLimits`]) rather than read as globals.

// ===== REFERENCE WATER CHEMISTRY =====

/// Neutral pH of pure water.
///
/// The pollution index penalizes deviation from neutral in either
/// direction; river water outside roughly 6.5-8 stresses aquatic life.
pub const NEUTRAL_PH: f64 = 7.0;

/// Dissolved-oxygen ceiling treated as "healthy" (mg/L).
///
/// Saturation at typical river temperatures sits near 8-10 mg/L; the
/// index penalizes the deficit below this ceiling since low oxygen is
/// the primary acute stressor for fish.
pub const HEALTHY_DISSOLVED_OXYGEN_MG_L: f64 = 8.0;

// ===== UNNORMALIZED INDEX WEIGHTS =====
//
// Linear weights for the legacy weighted-deviation score. Unitless
// multipliers chosen so typical clean-river readings score low single
// digits and grossly polluted readings score in the tens.

/// Weight on absolute pH deviation from neutral.
pub const PH_DEVIATION_WEIGHT: f64 = 1.0;

/// Weight on the dissolved-oxygen deficit below the healthy ceiling.
pub const DO_DEFICIT_WEIGHT: f64 = 1.5;

/// Weight on biochemical oxygen demand (mg/L).
pub const BOD_WEIGHT: f64 = 0.2;

/// Weight on chemical oxygen demand (mg/L).
pub const COD_WEIGHT: f64 = 0.1;

/// Weight on turbidity (NTU).
pub const TURBIDITY_WEIGHT: f64 = 0.05;

/// Weight on ammonia (mg/L).
pub const AMMONIA_WEIGHT: f64 = 0.2;

/// Weight on conductivity (uS/cm).
pub const CONDUCTIVITY_WEIGHT: f64 = 0.01;

// ===== NORMALIZED INDEX SATURATION LIMITS =====
//
// Each channel is mapped to a [0, 1] "badness" fraction by dividing by
// its saturation constant and clamping. A channel at or beyond its
// saturation contributes its full weight.

/// pH deviation (units from neutral) at which badness saturates.
pub const PH_DEVIATION_SATURATION: f64 = 3.0;

/// Dissolved-oxygen deficit (mg/L below healthy) at which badness saturates.
pub const DO_DEFICIT_SATURATION_MG_L: f64 = 6.0;

/// BOD (mg/L) at which badness saturates.
pub const BOD_SATURATION_MG_L: f64 = 20.0;

/// COD (mg/L) at which badness saturates.
pub const COD_SATURATION_MG_L: f64 = 200.0;

/// Turbidity (NTU) at which badness saturates.
pub const TURBIDITY_SATURATION_NTU: f64 = 100.0;

/// Ammonia (mg/L) at which badness saturates.
pub const AMMONIA_SATURATION_MG_L: f64 = 10.0;

/// Conductivity (uS/cm) at which badness saturates.
pub const CONDUCTIVITY_SATURATION_US_CM: f64 = 2000.0;

// ===== NORMALIZED INDEX CONVEX WEIGHTS =====
//
// Must sum to 1.0 so the combined badness stays in [0, 1] before
// scaling to the 0-100 range.

/// Convex weight on pH badness.
pub const PH_NORMALIZED_WEIGHT: f64 = 0.15;

/// Convex weight on dissolved-oxygen badness.
pub const DO_NORMALIZED_WEIGHT: f64 = 0.20;

/// Convex weight on BOD badness.
pub const BOD_NORMALIZED_WEIGHT: f64 = 0.20;

/// Convex weight on COD badness.
pub const COD_NORMALIZED_WEIGHT: f64 = 0.15;

/// Convex weight on turbidity badness.
pub const TURBIDITY_NORMALIZED_WEIGHT: f64 = 0.10;

/// Convex weight on ammonia badness.
pub const AMMONIA_NORMALIZED_WEIGHT: f64 = 0.15;

/// Convex weight on conductivity badness.
pub const CONDUCTIVITY_NORMALIZED_WEIGHT: f64 = 0.05;

/// Scale applied to the combined badness fraction.
pub const RISK_SCALE: f64 = 100.0;

/// Tolerance when validating that custom convex weights sum to 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

// ===== FORECASTING =====

/// Default forward horizon, in hours.
pub const DEFAULT_HORIZON_HOURS: u32 = 24;

/// Minimum hourly points required to fit a trend on the legacy index.
pub const MIN_TREND_POINTS: usize = 2;

/// Minimum hourly points required to fit a trend on the normalized index.
///
/// The simulation path demands a longer observed run before trusting a
/// trend line; below this the forecaster falls back to a flat,
/// low-confidence projection.
pub const MIN_TREND_POINTS_NORMALIZED: usize = 6;

// ===== ANOMALY DETECTION =====

/// Default expected fraction of a window treated as outliers.
pub const DEFAULT_CONTAMINATION: f64 = 0.05;
