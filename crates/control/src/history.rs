//! Fixed-length sample history shared by the control law and the adaptive mechanism.

use crate::error::ControlError;
use crate::model::LinearModel;

/// Most-recent-first buffers of outputs, inputs and setpoints.
///
/// | Buffer | Length | Slot 0 |
/// |--------|--------|--------|
/// | `outputs` | `na + 1` | latest measured output `y(k)` |
/// | `inputs` | `nb + 1` | action computed this tick, not yet applied |
/// | `setpoints` | trajectory input order | latest setpoint |
///
/// Lengths are fixed at construction from the models the history serves
/// ([`SampleHistory::for_models()`]); [`SampleHistory::advance()`] shifts in
/// place and never allocates.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleHistory {
    outputs: Vec<f64>,
    inputs: Vec<f64>,
    setpoints: Vec<f64>,
}

impl SampleHistory {
    /// Creates a zero-filled history sized for `process` and `trajectory`.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::TrajectoryOrder`] if the trajectory reads more
    /// past outputs than the process history keeps.
    pub fn for_models(
        process: &LinearModel,
        trajectory: &LinearModel,
    ) -> Result<Self, ControlError> {
        if trajectory.output_order() > process.output_order() + 1 {
            return Err(ControlError::TrajectoryOrder {
                trajectory: trajectory.output_order(),
                process: process.output_order(),
            });
        }
        Self::new(
            process.output_order(),
            process.input_order(),
            trajectory.input_order(),
        )
    }

    /// Creates a zero-filled history for a process of orders `(na, nb)` and a
    /// trajectory model with `n_setpoints` input coefficients.
    pub(crate) fn new(na: usize, nb: usize, n_setpoints: usize) -> Result<Self, ControlError> {
        for (order, name) in [
            (na, "output order"),
            (nb, "input order"),
            (n_setpoints, "setpoint count"),
        ] {
            if order == 0 {
                return Err(ControlError::InvalidConfig {
                    reason: format!("{name} must be at least 1"),
                });
            }
        }
        Ok(Self {
            outputs: vec![0.0; na + 1],
            inputs: vec![0.0; nb + 1],
            setpoints: vec![0.0; n_setpoints],
        })
    }

    /// Builds a history from explicit most-recent-first buffers.
    #[cfg(test)]
    pub(crate) fn from_parts(
        outputs: Vec<f64>,
        inputs: Vec<f64>,
        setpoints: Vec<f64>,
    ) -> Result<Self, ControlError> {
        if outputs.len() < 2 || inputs.len() < 2 || setpoints.is_empty() {
            return Err(ControlError::InvalidConfig {
                reason: format!(
                    "history needs at least 2 outputs, 2 inputs and 1 setpoint, got {}, {}, {}",
                    outputs.len(),
                    inputs.len(),
                    setpoints.len()
                ),
            });
        }
        Ok(Self {
            outputs,
            inputs,
            setpoints,
        })
    }

    /// Output history `y[0..=na]`, most recent first.
    pub fn outputs(&self) -> &[f64] {
        &self.outputs
    }

    /// Input history `u[0..=nb]`, most recent first.
    pub fn inputs(&self) -> &[f64] {
        &self.inputs
    }

    /// Setpoint history, most recent first.
    pub fn setpoints(&self) -> &[f64] {
        &self.setpoints
    }

    /// Process output order this history was sized for.
    pub fn output_order(&self) -> usize {
        self.outputs.len() - 1
    }

    /// Process input order this history was sized for.
    pub fn input_order(&self) -> usize {
        self.inputs.len() - 1
    }

    /// Writes the latest measured output into `y[0]`.
    pub fn set_output(&mut self, value: f64) {
        self.outputs[0] = value;
    }

    /// Writes a control action into `u[0]`.
    pub fn set_input(&mut self, value: f64) {
        self.inputs[0] = value;
    }

    /// Writes the latest setpoint into `ySP[0]`.
    pub fn set_setpoint(&mut self, value: f64) {
        self.setpoints[0] = value;
    }

    /// Shifts every buffer one slot towards the past.
    ///
    /// The oldest sample of each buffer is dropped; slot 0 keeps its value
    /// until it is overwritten by the next injection.
    pub fn advance(&mut self) {
        for buf in [&mut self.outputs, &mut self.inputs, &mut self.setpoints] {
            let n = buf.len();
            buf.copy_within(0..n - 1, 1);
        }
    }

    /// Fills every slot with a steady-state operating point.
    pub fn fill(&mut self, output: f64, input: f64, setpoint: f64) {
        self.outputs.fill(output);
        self.inputs.fill(input);
        self.setpoints.fill(setpoint);
    }
}
