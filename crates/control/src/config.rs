//! Tuning parameters held by a controller instance.

use crate::action::ActionLimits;
use crate::error::ControlError;

/// Tuning of an adaptive predictive controller.
///
/// Use the builder methods to customise parameters, then hand the value to
/// [`ApController::new()`](crate::ApController::new) or
/// [`ApController::set_config()`](crate::ApController::set_config), both of
/// which validate it.
///
/// # Example
///
/// ```
/// use apc_control::ControllerConfig;
///
/// let config = ControllerConfig::new()
///     .with_horizon(5)
///     .with_limits(-1.0, 1.0)
///     .with_max_increment(0.1);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ControllerConfig {
    horizon: usize,
    min_control: f64,
    max_control: f64,
    max_increment: f64,
    dead_zone: f64,
    adapt_gain: f64,
}

impl ControllerConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `horizon = 1`, limits `[0, 1]`, `max_increment = 0`
    /// (unbounded), `dead_zone = 0`, `adapt_gain = 0.2`.
    pub fn new() -> Self {
        Self {
            horizon: 1,
            min_control: 0.0,
            max_control: 1.0,
            max_increment: 0.0,
            dead_zone: 0.0,
            adapt_gain: 0.2,
        }
    }

    /// Sets the prediction horizon `λ`.
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    /// Sets the absolute actuator bounds.
    pub fn with_limits(mut self, min_control: f64, max_control: f64) -> Self {
        self.min_control = min_control;
        self.max_control = max_control;
        self
    }

    /// Sets the largest allowed change per tick; `0` disables the bound.
    pub fn with_max_increment(mut self, max_increment: f64) -> Self {
        self.max_increment = max_increment;
        self
    }

    /// Sets the adaptation dead-zone on the a-priori error.
    pub fn with_dead_zone(mut self, dead_zone: f64) -> Self {
        self.dead_zone = dead_zone;
        self
    }

    /// Sets the adaptation gain.
    pub fn with_adapt_gain(mut self, adapt_gain: f64) -> Self {
        self.adapt_gain = adapt_gain;
        self
    }

    // --- Accessors ---

    /// Returns the prediction horizon `λ`.
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Returns the lower actuator bound.
    pub fn min_control(&self) -> f64 {
        self.min_control
    }

    /// Returns the upper actuator bound.
    pub fn max_control(&self) -> f64 {
        self.max_control
    }

    /// Returns the per-tick increment bound (`0` = unbounded).
    pub fn max_increment(&self) -> f64 {
        self.max_increment
    }

    /// Returns the adaptation dead-zone.
    pub fn dead_zone(&self) -> f64 {
        self.dead_zone
    }

    /// Returns the adaptation gain.
    pub fn adapt_gain(&self) -> f64 {
        self.adapt_gain
    }

    /// Saturation limits applied by the control law.
    pub fn limits(&self) -> ActionLimits {
        ActionLimits::new(self.min_control, self.max_control, self.max_increment)
    }

    /// Validates this configuration.
    ///
    /// Checks that the horizon is at least 1, the bounds are finite with
    /// `min_control <= max_control`, the increment bound and dead-zone are
    /// finite and non-negative, and the gain is finite and positive.
    pub fn validate(&self) -> Result<(), ControlError> {
        if self.horizon == 0 {
            return Err(ControlError::InvalidHorizon {
                horizon: self.horizon,
            });
        }
        if !self.min_control.is_finite()
            || !self.max_control.is_finite()
            || self.min_control > self.max_control
        {
            return Err(ControlError::InvalidLimits {
                min: self.min_control,
                max: self.max_control,
            });
        }
        Self::validate_non_negative(self.max_increment, "max_increment")?;
        Self::validate_non_negative(self.dead_zone, "dead_zone")?;
        if !self.adapt_gain.is_finite() || self.adapt_gain <= 0.0 {
            return Err(ControlError::InvalidConfig {
                reason: format!(
                    "adapt_gain must be finite and positive, got {}",
                    self.adapt_gain
                ),
            });
        }
        Ok(())
    }

    fn validate_non_negative(value: f64, name: &str) -> Result<(), ControlError> {
        if !value.is_finite() || value < 0.0 {
            return Err(ControlError::InvalidConfig {
                reason: format!("{name} must be finite and non-negative, got {value}"),
            });
        }
        Ok(())
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::new()
    }
}
