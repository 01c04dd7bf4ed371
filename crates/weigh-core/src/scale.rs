//! Simulated scale.
//!
//! [`SimulatedScale`] stands in for real weighing hardware: it picks a weight
//! uniformly from a configured range and waits a fixed stabilization period
//! before reporting it.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use time::UtcOffset;
use tracing::debug;

use weigh_types::WeightReading;

use crate::error::{Error, Result};
use crate::traits::ScaleReader;
use crate::util::now_in;

/// A scale that produces pseudo-random weights.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use time::UtcOffset;
/// use weigh_core::{ScaleReader, SimulatedScale};
///
/// #[tokio::main]
/// async fn main() {
///     let scale = SimulatedScale::new(UtcOffset::UTC)
///         .with_stabilization(Duration::ZERO);
///     let reading = scale.read_weight().await.unwrap();
///     assert!((0.1..=5.0).contains(&reading.weight));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedScale {
    min_kg: f64,
    max_kg: f64,
    stabilization: Duration,
    offset: UtcOffset,
}

impl SimulatedScale {
    /// Lightest weight produced by default, in kilograms.
    pub const DEFAULT_MIN_KG: f64 = 0.1;
    /// Heaviest weight produced by default, in kilograms.
    pub const DEFAULT_MAX_KG: f64 = 5.0;
    /// Default time the simulated load takes to stabilize.
    pub const DEFAULT_STABILIZATION: Duration = Duration::from_secs(2);

    /// Create a scale with the default range and stabilization time.
    ///
    /// Readings are timestamped in `offset`.
    pub fn new(offset: UtcOffset) -> Self {
        Self {
            min_kg: Self::DEFAULT_MIN_KG,
            max_kg: Self::DEFAULT_MAX_KG,
            stabilization: Self::DEFAULT_STABILIZATION,
            offset,
        }
    }

    /// Set the weight range in kilograms.
    ///
    /// Fails unless `0 < min_kg <= max_kg` and both are finite.
    pub fn with_range(mut self, min_kg: f64, max_kg: f64) -> Result<Self> {
        if !(min_kg.is_finite() && max_kg.is_finite()) || min_kg <= 0.0 || min_kg > max_kg {
            return Err(Error::InvalidConfig(format!(
                "weight range {min_kg}..={max_kg} kg must be positive and ordered"
            )));
        }
        self.min_kg = min_kg;
        self.max_kg = max_kg;
        Ok(self)
    }

    /// Set the stabilization time.
    pub fn with_stabilization(mut self, stabilization: Duration) -> Self {
        self.stabilization = stabilization;
        self
    }

    /// The configured weight range in kilograms.
    pub fn range(&self) -> (f64, f64) {
        (self.min_kg, self.max_kg)
    }
}

#[async_trait]
impl ScaleReader for SimulatedScale {
    async fn read_weight(&self) -> Result<WeightReading> {
        let initial = rand::rng().random_range(self.min_kg..=self.max_kg);
        debug!("Initial weight: {:.3} kg", initial);

        tokio::time::sleep(self.stabilization).await;

        let reading = WeightReading::new(initial, now_in(self.offset));
        debug!("Stabilized weight: {:.3} kg", reading.weight);
        Ok(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::offset;

    #[test]
    fn test_default_range() {
        let scale = SimulatedScale::new(UtcOffset::UTC);
        assert_eq!(scale.range(), (0.1, 5.0));
    }

    #[test]
    fn test_with_range_rejects_bad_bounds() {
        assert!(SimulatedScale::new(UtcOffset::UTC).with_range(0.0, 1.0).is_err());
        assert!(SimulatedScale::new(UtcOffset::UTC).with_range(2.0, 1.0).is_err());
        assert!(SimulatedScale::new(UtcOffset::UTC).with_range(1.0, f64::INFINITY).is_err());
        assert!(SimulatedScale::new(UtcOffset::UTC).with_range(1.0, 1.0).is_ok());
    }

    #[tokio::test]
    async fn test_reading_within_range_and_rounded() {
        let scale = SimulatedScale::new(offset!(-3)).with_stabilization(Duration::ZERO);
        for _ in 0..50 {
            let reading = scale.read_weight().await.unwrap();
            assert!((0.1..=5.0).contains(&reading.weight));
            assert_eq!(reading.weight, weigh_types::round_weight(reading.weight));
            assert_eq!(reading.timestamp.offset(), offset!(-3));
        }
    }

    #[tokio::test]
    async fn test_fixed_range_is_deterministic() {
        let scale = SimulatedScale::new(UtcOffset::UTC)
            .with_range(1.2346, 1.2346)
            .unwrap()
            .with_stabilization(Duration::ZERO);
        let reading = scale.read_weight().await.unwrap();
        assert_eq!(reading.weight, 1.235);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_stabilization() {
        let scale = SimulatedScale::new(UtcOffset::UTC);
        let started = tokio::time::Instant::now();
        scale.read_weight().await.unwrap();
        assert!(started.elapsed() >= SimulatedScale::DEFAULT_STABILIZATION);
    }
}
