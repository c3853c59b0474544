//! Distribution-backed random source.

use crate::SimulationError;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Exp, Normal};
use sharechain_core::RandomSource;

/// [`RandomSource`] sampling share gaps from an exponential distribution and
/// link latency from a normal distribution.
///
/// Each node gets its own seeded generator, so runs are reproducible and one
/// node's sampling never shifts another's.
#[derive(Debug, Clone)]
pub struct DistributionSource {
    rng: ChaCha8Rng,
    interval: Exp<f64>,
    latency: Normal<f64>,
}

impl DistributionSource {
    /// Create a source.
    ///
    /// `interval_mean` must be positive and finite; `latency_mean` finite;
    /// `latency_std` non-negative and finite. `rand_distr` accepts a negative
    /// standard deviation, so it is checked here.
    pub fn new(
        seed: u64,
        interval_mean: f64,
        latency_mean: f64,
        latency_std: f64,
    ) -> Result<Self, SimulationError> {
        if !(interval_mean.is_finite() && interval_mean > 0.0) {
            return Err(SimulationError::InvalidParameter {
                name: "share interval mean",
                value: interval_mean,
            });
        }
        if !latency_mean.is_finite() {
            return Err(SimulationError::InvalidParameter {
                name: "latency mean",
                value: latency_mean,
            });
        }
        if !(latency_std.is_finite() && latency_std >= 0.0) {
            return Err(SimulationError::InvalidParameter {
                name: "latency standard deviation",
                value: latency_std,
            });
        }

        let interval = Exp::new(1.0 / interval_mean)
            .map_err(|e| SimulationError::Distribution(format!("{:?}", e)))?;
        let latency = Normal::new(latency_mean, latency_std)
            .map_err(|e| SimulationError::Distribution(format!("{:?}", e)))?;

        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            interval,
            latency,
        })
    }
}

impl RandomSource for DistributionSource {
    fn sample_interval(&mut self) -> f64 {
        self.interval.sample(&mut self.rng)
    }

    fn sample_latency(&mut self) -> f64 {
        self.latency.sample(&mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_samples() {
        let mut a = DistributionSource::new(42, 10.0, 0.1, 0.02).unwrap();
        let mut b = DistributionSource::new(42, 10.0, 0.1, 0.02).unwrap();
        for _ in 0..16 {
            assert_eq!(a.sample_interval(), b.sample_interval());
            assert_eq!(a.sample_latency(), b.sample_latency());
        }
    }

    #[test]
    fn test_sample_means_are_close() {
        let mut source = DistributionSource::new(7, 10.0, 0.1, 0.02).unwrap();
        let n = 20_000;
        let intervals: f64 = (0..n).map(|_| source.sample_interval()).sum::<f64>() / n as f64;
        let latencies: f64 = (0..n).map(|_| source.sample_latency()).sum::<f64>() / n as f64;

        assert!((intervals - 10.0).abs() < 0.5, "interval mean {}", intervals);
        assert!((latencies - 0.1).abs() < 0.005, "latency mean {}", latencies);
    }

    #[test]
    fn test_zero_std_is_constant_latency() {
        let mut source = DistributionSource::new(1, 1.0, 0.25, 0.0).unwrap();
        assert_eq!(source.sample_latency(), 0.25);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(matches!(
            DistributionSource::new(1, 0.0, 0.1, 0.02),
            Err(SimulationError::InvalidParameter { .. })
        ));
        assert!(matches!(
            DistributionSource::new(1, -5.0, 0.1, 0.02),
            Err(SimulationError::InvalidParameter { .. })
        ));
        assert!(matches!(
            DistributionSource::new(1, 10.0, f64::NAN, 0.02),
            Err(SimulationError::InvalidParameter { .. })
        ));
        assert!(matches!(
            DistributionSource::new(1, 10.0, 0.1, -1.0),
            Err(SimulationError::InvalidParameter {
                name: "latency standard deviation",
                ..
            })
        ));
        assert!(matches!(
            DistributionSource::new(1, 10.0, 0.1, f64::INFINITY),
            Err(SimulationError::InvalidParameter {
                name: "latency standard deviation",
                ..
            })
        ));
    }
}
