//! Piecewise-constant setpoint profiles.

use crate::error::PlantError;

/// A setpoint that steps to a new value at given ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct SetpointSchedule {
    steps: Vec<(usize, f64)>,
}

impl SetpointSchedule {
    /// Builds a schedule from `(tick, value)` steps.
    ///
    /// # Errors
    ///
    /// - [`PlantError::EmptySchedule`] if `steps` is empty.
    /// - [`PlantError::UnsortedSchedule`] if ticks are not strictly increasing.
    /// - [`PlantError::NonFiniteSetpoint`] if any value is NaN or infinite.
    pub fn new(steps: Vec<(usize, f64)>) -> Result<Self, PlantError> {
        if steps.is_empty() {
            return Err(PlantError::EmptySchedule);
        }
        for (index, &(_, value)) in steps.iter().enumerate() {
            if !value.is_finite() {
                return Err(PlantError::NonFiniteSetpoint { index });
            }
        }
        if let Some(index) = steps.windows(2).position(|w| w[1].0 <= w[0].0) {
            return Err(PlantError::UnsortedSchedule { index: index + 1 });
        }
        Ok(Self { steps })
    }

    /// A schedule holding one value forever.
    pub fn constant(value: f64) -> Result<Self, PlantError> {
        Self::new(vec![(0, value)])
    }

    /// Setpoint in force at `tick`.
    ///
    /// Ticks before the first step take the first value.
    pub fn value_at(&self, tick: usize) -> f64 {
        let after = self.steps.partition_point(|&(start, _)| start <= tick);
        self.steps[after.saturating_sub(1)].1
    }

    /// The `(tick, value)` steps.
    pub fn steps(&self) -> &[(usize, f64)] {
        &self.steps
    }
}
