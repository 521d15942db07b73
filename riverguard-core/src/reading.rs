//! Reading, Channel and Alert Types
//!
//! ## Overview
//!
//! This module defines the records that flow through the scoring
//! pipeline. A [`Reading`] is one timestamped observation from a single
//! sensor with up to eight optional channel values; the eight channels
//! are fixed for the deployment and enumerated by [`Channel`].
//!
//! ## Design Notes
//!
//! The original ingest layer treated rows as loosely-typed mappings
//! with `get(key, default)` semantics. Here each channel is an explicit
//! `Option<f64>` field and defaulting happens exactly once, at the
//! score-computation boundary ([`Reading::channel_or_default`]):
//!
//! - pH defaults to neutral 7.0
//! - dissolved oxygen defaults to a healthy 8.0
//! - every other missing channel defaults to 0.0
//!
//! No physical range is enforced at this layer. Out-of-range values are
//! valid inputs; flagging them is the anomaly scorer's job, not the
//! record's.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{HEALTHY_DISSOLVED_OXYGEN_MG_L, NEUTRAL_PH};

/// Identifier of the sensor a reading belongs to
pub type SensorId = i64;

/// Message attached to every anomaly alert
pub const ANOMALY_MESSAGE: &str = "Anomalous reading detected";

/// The eight fixed water-quality channels
///
/// Order matters: it is the feature order used by the anomaly scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Channel {
    /// Acidity/alkalinity, unitless
    Ph = 0,
    /// Dissolved oxygen, mg/L
    DissolvedOxygen = 1,
    /// Biochemical oxygen demand, mg/L
    Bod = 2,
    /// Chemical oxygen demand, mg/L
    Cod = 3,
    /// Turbidity, NTU
    Turbidity = 4,
    /// Ammonia, mg/L
    Ammonia = 5,
    /// Water temperature, degrees Celsius
    Temperature = 6,
    /// Electrical conductivity, uS/cm
    Conductivity = 7,
}

impl Channel {
    /// Number of channels
    pub const COUNT: usize = 8;

    /// All channels in feature order
    pub const ALL: [Channel; Channel::COUNT] = [
        Channel::Ph,
        Channel::DissolvedOxygen,
        Channel::Bod,
        Channel::Cod,
        Channel::Turbidity,
        Channel::Ammonia,
        Channel::Temperature,
        Channel::Conductivity,
    ];

    /// Channels scaled by discharge-reduction policies
    ///
    /// pH, dissolved oxygen and temperature are excluded: they are not
    /// direct discharge byproducts.
    pub const DISCHARGE_BYPRODUCTS: [Channel; 5] = [
        Channel::Bod,
        Channel::Cod,
        Channel::Turbidity,
        Channel::Ammonia,
        Channel::Conductivity,
    ];

    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            Channel::Ph => "pH",
            Channel::DissolvedOxygen => "DO2",
            Channel::Bod => "BOD",
            Channel::Cod => "COD",
            Channel::Turbidity => "turbidity",
            Channel::Ammonia => "ammonia",
            Channel::Temperature => "temperature",
            Channel::Conductivity => "conductivity",
        }
    }

    /// Get expected unit of measurement
    pub const fn unit(&self) -> &'static str {
        match self {
            Channel::Ph => "",
            Channel::DissolvedOxygen => "mg/L",
            Channel::Bod => "mg/L",
            Channel::Cod => "mg/L",
            Channel::Turbidity => "NTU",
            Channel::Ammonia => "mg/L",
            Channel::Temperature => "°C",
            Channel::Conductivity => "µS/cm",
        }
    }

    /// Whether a discharge-reduction policy scales this channel
    pub const fn is_discharge_byproduct(&self) -> bool {
        matches!(
            self,
            Channel::Bod
                | Channel::Cod
                | Channel::Turbidity
                | Channel::Ammonia
                | Channel::Conductivity
        )
    }

    /// Default used when the channel is absent at the score boundary
    pub const fn neutral_default(&self) -> f64 {
        match self {
            Channel::Ph => NEUTRAL_PH,
            Channel::DissolvedOxygen => HEALTHY_DISSOLVED_OXYGEN_MG_L,
            _ => 0.0,
        }
    }
}

/// One timestamped observation for a single sensor
///
/// Channel values are optional; a sensor may report any subset on a
/// given tick. Field names on the wire match the upstream ingest
/// payloads (`pH`, `DO2`, `BOD`, `COD`, lowercase for the rest).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Owning sensor
    pub sensor_id: SensorId,
    /// Observation time (timezone-aware)
    pub timestamp: DateTime<Utc>,
    /// Acidity/alkalinity
    #[serde(rename = "pH", default)]
    pub ph: Option<f64>,
    /// Dissolved oxygen (mg/L)
    #[serde(rename = "DO2", default)]
    pub do2: Option<f64>,
    /// Biochemical oxygen demand (mg/L)
    #[serde(rename = "BOD", default)]
    pub bod: Option<f64>,
    /// Chemical oxygen demand (mg/L)
    #[serde(rename = "COD", default)]
    pub cod: Option<f64>,
    /// Turbidity (NTU)
    #[serde(default)]
    pub turbidity: Option<f64>,
    /// Ammonia (mg/L)
    #[serde(default)]
    pub ammonia: Option<f64>,
    /// Water temperature (°C)
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Electrical conductivity (µS/cm)
    #[serde(default)]
    pub conductivity: Option<f64>,
}

impl Reading {
    /// Create a reading with all channels absent
    pub fn new(sensor_id: SensorId, timestamp: DateTime<Utc>) -> Self {
        Self {
            sensor_id,
            timestamp,
            ph: None,
            do2: None,
            bod: None,
            cod: None,
            turbidity: None,
            ammonia: None,
            temperature: None,
            conductivity: None,
        }
    }

    /// Builder-style channel assignment
    pub fn with_channel(mut self, channel: Channel, value: f64) -> Self {
        self.set_channel(channel, Some(value));
        self
    }

    /// Get a channel value, if present
    pub fn channel(&self, channel: Channel) -> Option<f64> {
        match channel {
            Channel::Ph => self.ph,
            Channel::DissolvedOxygen => self.do2,
            Channel::Bod => self.bod,
            Channel::Cod => self.cod,
            Channel::Turbidity => self.turbidity,
            Channel::Ammonia => self.ammonia,
            Channel::Temperature => self.temperature,
            Channel::Conductivity => self.conductivity,
        }
    }

    /// Get a channel value with the per-channel neutral default applied
    pub fn channel_or_default(&self, channel: Channel) -> f64 {
        self.channel(channel).unwrap_or(channel.neutral_default())
    }

    /// Set or clear a channel value
    pub fn set_channel(&mut self, channel: Channel, value: Option<f64>) {
        let slot = match channel {
            Channel::Ph => &mut self.ph,
            Channel::DissolvedOxygen => &mut self.do2,
            Channel::Bod => &mut self.bod,
            Channel::Cod => &mut self.cod,
            Channel::Turbidity => &mut self.turbidity,
            Channel::Ammonia => &mut self.ammonia,
            Channel::Temperature => &mut self.temperature,
            Channel::Conductivity => &mut self.conductivity,
        };
        *slot = value;
    }
}

/// Alert severity tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational
    Low,
    /// Needs attention
    Medium,
    /// Immediate operator action expected
    High,
}

/// Alert raised when the anomaly scorer flags a reading
///
/// Created by the scorer, persisted by the caller, later resolved by an
/// operator action; otherwise immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Sensor the flagged reading came from
    pub sensor_id: SensorId,
    /// Severity tier (fixed at high in the anomaly path)
    pub severity: Severity,
    /// Human-readable description
    pub message: String,
    /// Timestamp of the source reading
    pub timestamp: DateTime<Utc>,
    /// Whether an operator has resolved the alert
    #[serde(default)]
    pub resolved: bool,
}

impl Alert {
    /// Build the fixed-shape alert for an anomalous reading
    pub fn anomaly(sensor_id: SensorId, timestamp: DateTime<Utc>) -> Self {
        Self {
            sensor_id,
            severity: Severity::High,
            message: ANOMALY_MESSAGE.to_string(),
            timestamp,
            resolved: false,
        }
    }

    /// Mark the alert resolved (operator action)
    pub fn resolve(&mut self) {
        self.resolved = true;
    }
}

/// A reading augmented with derived anomaly and risk information
///
/// Computed transiently per request and never persisted as part of the
/// reading itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredReading {
    /// The source reading
    pub reading: Reading,
    /// Whether the anomaly scorer flagged this row
    pub anomalous: bool,
    /// Scalar pollution-risk score
    pub risk: f64,
}
