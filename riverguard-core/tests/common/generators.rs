//! Seeded synthetic reading generators
//!
//! Mirrors the field campaign's telemetry profile: a clean-ish river
//! reach sampled hourly, with optional injected discharge spikes for
//! anomaly scenarios. Everything is seeded so tests are reproducible.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use riverguard_core::{Channel, Reading, SensorId};

/// Fixed start of every generated window
pub fn window_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
}

/// Approximate standard normal via the sum of twelve uniforms
fn randn(rng: &mut StdRng) -> f64 {
    let sum: f64 = (0..12).map(|_| rng.gen::<f64>()).sum();
    sum - 6.0
}

/// One hourly reading with the typical clean-reach profile
pub fn typical_reading(rng: &mut StdRng, sensor_id: SensorId, ts: DateTime<Utc>) -> Reading {
    Reading::new(sensor_id, ts)
        .with_channel(Channel::Ph, 7.0 + randn(rng) * 0.1)
        .with_channel(Channel::DissolvedOxygen, 6.0 + randn(rng) * 0.5)
        .with_channel(Channel::Bod, (5.0 + randn(rng) * 1.5).max(0.0))
        .with_channel(Channel::Cod, (50.0 + randn(rng) * 10.0).max(0.0))
        .with_channel(Channel::Turbidity, (20.0 + randn(rng) * 5.0).max(0.0))
        .with_channel(Channel::Ammonia, (randn(rng) * 0.5).abs())
        .with_channel(Channel::Temperature, 25.0 + randn(rng) * 1.5)
        .with_channel(Channel::Conductivity, 300.0 + randn(rng) * 20.0)
}

/// A window of hourly readings for one sensor
pub fn hourly_window(seed: u64, sensor_id: SensorId, hours: usize) -> Vec<Reading> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = window_start();
    (0..hours)
        .map(|h| typical_reading(&mut rng, sensor_id, start + TimeDelta::hours(h as i64)))
        .collect()
}

/// Turn one reading into a gross discharge event
///
/// Same shape the data simulator injects: BOD and COD multiplied up,
/// pH pushed to an extreme.
pub fn inject_discharge_spike(reading: &mut Reading) {
    if let Some(bod) = reading.channel(Channel::Bod) {
        reading.set_channel(Channel::Bod, Some(bod * 6.0));
    }
    if let Some(cod) = reading.channel(Channel::Cod) {
        reading.set_channel(Channel::Cod, Some(cod * 4.0));
    }
    reading.set_channel(Channel::Ph, Some(10.0));
}
