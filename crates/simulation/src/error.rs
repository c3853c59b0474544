//! Error types for simulation setup.

use thiserror::Error;

/// Errors building a simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// A numeric parameter is out of range.
    #[error("Invalid {name}: {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// A random distribution could not be built.
    #[error("Invalid distribution: {0}")]
    Distribution(String),
}
