//! Error types for the apc-plant crate.

/// Error type for all fallible operations in the apc-plant crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlantError {
    /// Returned when the measurement-noise standard deviation is negative or not finite.
    #[error("noise standard deviation must be finite and non-negative, got {sd}")]
    InvalidNoise {
        /// The rejected standard deviation.
        sd: f64,
    },

    /// Returned when a setpoint schedule has no steps.
    #[error("setpoint schedule is empty")]
    EmptySchedule,

    /// Returned when schedule ticks are not strictly increasing.
    #[error("setpoint schedule step {index} does not start after the previous step")]
    UnsortedSchedule {
        /// Position of the offending step.
        index: usize,
    },

    /// Returned when a scheduled setpoint is NaN or infinite.
    #[error("setpoint schedule step {index} has a non-finite value")]
    NonFiniteSetpoint {
        /// Position of the offending step.
        index: usize,
    },
}
