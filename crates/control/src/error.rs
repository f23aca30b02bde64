//! Error types for the apc-control crate.

use crate::model::Side;

/// Error type for all fallible operations in the apc-control crate.
///
/// Every variant is a configuration-time precondition violation. The
/// per-tick path (value injection, control law, adaptation) never fails.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ControlError {
    /// Returned when a model has no coefficients on one side.
    #[error("model has no {side} coefficients")]
    EmptyCoefficients {
        /// Which coefficient sequence is empty.
        side: Side,
    },

    /// Returned when a model coefficient is NaN or infinite.
    #[error("{side} coefficient {index} is not finite")]
    NonFiniteCoefficient {
        /// Which coefficient sequence holds the bad value.
        side: Side,
        /// Position of the bad value.
        index: usize,
    },

    /// Returned when the process model's leading input coefficient is zero.
    #[error("process model input coefficient 0 must be non-zero")]
    ZeroLeadingInput,

    /// Returned when the trajectory model reads more outputs than the history keeps.
    #[error("trajectory output order {trajectory} exceeds process output order {process} + 1")]
    TrajectoryOrder {
        /// Output order of the trajectory model.
        trajectory: usize,
        /// Output order of the process model.
        process: usize,
    },

    /// Returned when a swapped-in model does not fit the history sized for the old one.
    #[error("{what} mismatch: expected {expected}, got {got}")]
    ShapeMismatch {
        /// Name of the mismatched dimension.
        what: &'static str,
        /// Dimension the history was sized for.
        expected: usize,
        /// Dimension of the offered model.
        got: usize,
    },

    /// Returned when the prediction horizon is zero.
    #[error("prediction horizon must be at least 1, got {horizon}")]
    InvalidHorizon {
        /// The rejected horizon.
        horizon: usize,
    },

    /// Returned when the folded input gain `h` of the extended law is zero.
    #[error("horizon gain h is zero at horizon {horizon}")]
    ZeroHorizonGain {
        /// Horizon the coefficient tables were built for.
        horizon: usize,
    },

    /// Returned when the basic strategy is given a horizon other than 1.
    #[error("basic strategy requires horizon 1, got {horizon}")]
    BasicHorizon {
        /// The rejected horizon.
        horizon: usize,
    },

    /// Returned when the absolute actuator bounds are inverted or not finite.
    #[error("invalid control limits: min={min}, max={max}")]
    InvalidLimits {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// Returned when a tuning parameter is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },
}
