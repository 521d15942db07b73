//! Core scoring pipeline for RiverGuard
//!
//! Turns windows of river water-quality readings into risk scores,
//! hourly risk series, near-term forecasts, and what-if policy
//! projections. Designed as a pure, synchronous core: callers fetch
//! the reading window, invoke one of the three stages, and persist
//! whatever comes back.
//!
//! Key constraints:
//! - Every operation is total over its documented input shape:
//!   empty windows produce empty (or flat) output, never errors
//! - Deterministic: identical input yields identical output
//! - No I/O, no shared state; concurrent calls need no coordination
//!
//! ```
//! use riverguard_core::{Forecaster, PollutionIndex, Reading, Channel};
//! use chrono::Utc;
//!
//! let reading = Reading::new(1, Utc::now())
//!     .with_channel(Channel::Bod, 5.0)
//!     .with_channel(Channel::DissolvedOxygen, 6.5);
//!
//! let forecaster = Forecaster::new(PollutionIndex::new());
//! let projection = forecaster.forecast(&[reading]);
//! assert_eq!(projection.points.len(), 24);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod constants;
pub mod errors;
pub mod forecast;
pub mod index;
pub mod reading;
pub mod series;
pub mod simulate;

// Public API
pub use errors::{RiskError, RiskResult};
pub use forecast::{Confidence, ForecastPoint, Forecaster, Projection};
pub use index::{
    ChannelWeights, NormalizedIndex, NormalizedWeights, PollutionIndex, RiskIndex,
    SaturationLimits,
};
pub use reading::{Alert, Channel, Reading, ScoredReading, SensorId, Severity};
pub use simulate::{PolicySimulator, ScenarioComparison};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
