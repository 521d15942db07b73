//! Property tests for the index variants' totality guarantees

use chrono::{TimeZone, Utc};
use proptest::option;
use proptest::prelude::*;
use riverguard_core::{Channel, NormalizedIndex, PollutionIndex, Reading, RiskIndex};

fn channel_value() -> impl Strategy<Value = Option<f64>> {
    // Finite values far beyond any physical range, negatives included.
    option::of(-1.0e9..1.0e9f64)
}

fn arb_reading() -> impl Strategy<Value = Reading> {
    (
        channel_value(),
        channel_value(),
        channel_value(),
        channel_value(),
        channel_value(),
        channel_value(),
        channel_value(),
        channel_value(),
    )
        .prop_map(|(ph, do2, bod, cod, turbidity, ammonia, temperature, conductivity)| {
            let mut reading =
                Reading::new(1, Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap());
            let values = [
                (Channel::Ph, ph),
                (Channel::DissolvedOxygen, do2),
                (Channel::Bod, bod),
                (Channel::Cod, cod),
                (Channel::Turbidity, turbidity),
                (Channel::Ammonia, ammonia),
                (Channel::Temperature, temperature),
                (Channel::Conductivity, conductivity),
            ];
            for (channel, value) in values {
                reading.set_channel(channel, value);
            }
            reading
        })
}

proptest! {
    #[test]
    fn normalized_score_always_within_0_100(reading in arb_reading()) {
        let score = NormalizedIndex::new().score(&reading);
        prop_assert!((0.0..=100.0).contains(&score));
    }

    #[test]
    fn unnormalized_score_never_negative(reading in arb_reading()) {
        let score = PollutionIndex::new().score(&reading);
        prop_assert!(score >= 0.0);
        prop_assert!(score.is_finite());
    }

    #[test]
    fn scores_are_bit_identical_across_calls(reading in arb_reading()) {
        prop_assert_eq!(
            PollutionIndex::new().score(&reading).to_bits(),
            PollutionIndex::new().score(&reading).to_bits()
        );
        prop_assert_eq!(
            NormalizedIndex::new().score(&reading).to_bits(),
            NormalizedIndex::new().score(&reading).to_bits()
        );
    }

    #[test]
    fn scaling_pollutants_down_never_raises_the_score(
        reading in arb_reading(),
        factor in 0.0..1.0f64,
    ) {
        let index = PollutionIndex::new();
        let mut scaled = reading;
        for channel in Channel::DISCHARGE_BYPRODUCTS {
            if let Some(value) = scaled.channel(channel) {
                scaled.set_channel(channel, Some(value * factor));
            }
        }
        prop_assert!(index.score(&scaled) <= index.score(&reading) + 1e-9);
    }
}
