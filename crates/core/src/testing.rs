//! Test doubles.

use crate::RandomSource;

/// A [`RandomSource`] replaying fixed sequences.
///
/// Each sequence is cycled when exhausted, so a single value acts as a
/// constant.
#[derive(Debug, Clone)]
pub struct FixedSource {
    intervals: Vec<f64>,
    latencies: Vec<f64>,
    next_interval: usize,
    next_latency: usize,
}

impl FixedSource {
    /// Create a source replaying the given sequences.
    ///
    /// # Panics
    ///
    /// Panics if either sequence is empty.
    pub fn new(intervals: Vec<f64>, latencies: Vec<f64>) -> Self {
        assert!(!intervals.is_empty(), "intervals must not be empty");
        assert!(!latencies.is_empty(), "latencies must not be empty");
        Self {
            intervals,
            latencies,
            next_interval: 0,
            next_latency: 0,
        }
    }

    /// Create a source returning the same interval and latency every time.
    pub fn constant(interval: f64, latency: f64) -> Self {
        Self::new(vec![interval], vec![latency])
    }
}

impl RandomSource for FixedSource {
    fn sample_interval(&mut self) -> f64 {
        let value = self.intervals[self.next_interval % self.intervals.len()];
        self.next_interval += 1;
        value
    }

    fn sample_latency(&mut self) -> f64 {
        let value = self.latencies[self.next_latency % self.latencies.len()];
        self.next_latency += 1;
        value
    }
}
