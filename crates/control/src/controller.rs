//! The adaptive predictive controller: per-tick API over history, models and tuning.

use tracing::{debug, warn};

use crate::action::{self, PredictiveAction};
use crate::adapt::{self, Adaptation};
use crate::config::ControllerConfig;
use crate::error::ControlError;
use crate::extended::ExtendedCoefficients;
use crate::history::SampleHistory;
use crate::model::LinearModel;

/// Which control law a controller runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlStrategy {
    /// One-step law on the raw model coefficients; horizon fixed at 1.
    Basic,
    /// Horizon-expanded law; coefficient tables follow the process model.
    Extended,
}

/// Summary of one full tick run through [`ApController::step()`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    /// Action to apply to the actuator.
    pub action: f64,
    /// Desired output at the end of the horizon.
    pub desired_output: f64,
    /// Theoretical increment before saturation.
    pub increment: f64,
    /// A-priori prediction error `e_pri` of the process model.
    pub prior_error: f64,
    /// Magnitude of the normalized a-posteriori error.
    pub posterior_error: f64,
    /// Whether the process model was updated this tick.
    pub adapted: bool,
}

#[derive(Clone, Debug)]
enum Law {
    Basic,
    Extended(ExtendedCoefficients),
}

/// Adaptive predictive controller.
///
/// Owns the process model (adapted online), the reference-trajectory model,
/// the sample history sized for both, and the tuning. One tick is:
///
/// ```text
/// advance_history → set_measured_output / set_setpoint → compute_action → adapt
/// ```
///
/// which [`ApController::step()`] runs in one call. Ticks never fail and
/// never allocate; every precondition is checked when the controller is
/// built or reconfigured, and a rejected reconfiguration leaves the
/// controller untouched.
///
/// # Example
///
/// ```
/// use apc_control::{ApController, ControlStrategy, ControllerConfig, LinearModel};
///
/// let process = LinearModel::new(vec![0.9], vec![0.1]).unwrap();
/// let trajectory = LinearModel::new(vec![0.7], vec![0.3]).unwrap();
/// let config = ControllerConfig::new().with_horizon(4);
/// let mut apc =
///     ApController::new(process, trajectory, ControlStrategy::Extended, config).unwrap();
///
/// let tick = apc.step(0.0, 0.5);
/// assert!((0.0..=1.0).contains(&tick.action));
/// ```
#[derive(Clone, Debug)]
pub struct ApController {
    process: LinearModel,
    trajectory: LinearModel,
    config: ControllerConfig,
    history: SampleHistory,
    law: Law,
    desired_output: f64,
    posterior_error: f64,
}

impl ApController {
    /// Builds a controller with a zeroed history.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`ControlError::ZeroLeadingInput`] | `process.input_coeffs()[0] == 0` |
    /// | [`ControlError::TrajectoryOrder`] | trajectory output order > process output order + 1 |
    /// | [`ControlError::BasicHorizon`] | `Basic` strategy with horizon != 1 |
    /// | [`ControlError::ZeroHorizonGain`] | `Extended` strategy whose folded gain `h` is zero |
    /// | any [`ControllerConfig::validate()`] error | invalid tuning |
    pub fn new(
        process: LinearModel,
        trajectory: LinearModel,
        strategy: ControlStrategy,
        config: ControllerConfig,
    ) -> Result<Self, ControlError> {
        config.validate()?;
        check_models(&process, &trajectory)?;
        let law = match strategy {
            ControlStrategy::Basic => {
                if config.horizon() != 1 {
                    return Err(ControlError::BasicHorizon {
                        horizon: config.horizon(),
                    });
                }
                Law::Basic
            }
            ControlStrategy::Extended => {
                Law::Extended(extended_tables(&process, &trajectory, config.horizon())?)
            }
        };
        let history = SampleHistory::for_models(&process, &trajectory)?;
        Ok(Self {
            process,
            trajectory,
            config,
            history,
            law,
            desired_output: 0.0,
            posterior_error: 0.0,
        })
    }

    // --- Per-tick operations ---

    /// Writes the latest measured output into `y[0]`.
    pub fn set_measured_output(&mut self, value: f64) {
        self.history.set_output(value);
    }

    /// Writes the latest setpoint into `ySP[0]`.
    pub fn set_setpoint(&mut self, value: f64) {
        self.history.set_setpoint(value);
    }

    /// Overrides the current action `u[0]`, e.g. while in manual mode.
    pub fn set_manual_action(&mut self, value: f64) {
        self.history.set_input(value);
    }

    /// Shifts the history one period; call once per tick before injecting values.
    pub fn advance_history(&mut self) {
        self.history.advance();
    }

    /// Runs the configured control law and returns the saturated action.
    pub fn compute_action(&mut self) -> f64 {
        self.run_control_law().action
    }

    /// Runs the adaptive mechanism on the process model and returns the
    /// posterior error magnitude.
    pub fn adapt(&mut self) -> f64 {
        self.run_adaptation().posterior_error
    }

    /// Runs one complete tick: advance, inject, control law, adaptation.
    pub fn step(&mut self, measured_output: f64, setpoint: f64) -> Tick {
        self.advance_history();
        self.set_measured_output(measured_output);
        self.set_setpoint(setpoint);
        let prediction = self.run_control_law();
        let adaptation = self.run_adaptation();
        Tick {
            action: prediction.action,
            desired_output: prediction.desired_output,
            increment: prediction.increment,
            prior_error: adaptation.prior_error,
            posterior_error: adaptation.posterior_error,
            adapted: adaptation.applied,
        }
    }

    /// Fills the whole history with a steady operating point.
    ///
    /// Use before the first tick, or when leaving manual mode, so the
    /// increments start from the plant's actual state.
    pub fn prime(&mut self, output: f64, action: f64, setpoint: f64) {
        self.history.fill(output, action, setpoint);
    }

    fn run_control_law(&mut self) -> PredictiveAction {
        let limits = self.config.limits();
        let prediction = match &mut self.law {
            Law::Basic => {
                action::basic_action(&mut self.history, &self.process, &self.trajectory, &limits)
            }
            Law::Extended(coeffs) => action::extended_action(&mut self.history, coeffs, &limits),
        };
        self.desired_output = prediction.desired_output;
        prediction
    }

    fn run_adaptation(&mut self) -> Adaptation {
        let adaptation = adapt::adapt(
            &self.history,
            &mut self.process,
            self.config.dead_zone(),
            self.config.adapt_gain(),
        );
        self.posterior_error = adaptation.posterior_error;
        if !adaptation.applied {
            return adaptation;
        }
        if self.process.input_coeffs()[0] == 0.0 {
            warn!("adaptation drove the leading input coefficient to zero");
        }
        if let Law::Extended(coeffs) = &mut self.law {
            coeffs.compute(&self.process, &self.trajectory);
            if coeffs.h() == 0.0 {
                warn!(horizon = coeffs.horizon(), "adaptation drove the horizon gain to zero");
            }
        }
        adaptation
    }

    // --- Accessors ---

    /// Current action `u[0]`.
    pub fn control_action(&self) -> f64 {
        self.history.inputs()[0]
    }

    /// Latest measured output `y[0]`.
    pub fn measured_output(&self) -> f64 {
        self.history.outputs()[0]
    }

    /// Latest setpoint `ySP[0]`.
    pub fn setpoint(&self) -> f64 {
        self.history.setpoints()[0]
    }

    /// Desired output computed by the last control-law run.
    pub fn desired_output(&self) -> f64 {
        self.desired_output
    }

    /// Posterior error magnitude from the last adaptation.
    pub fn posterior_error(&self) -> f64 {
        self.posterior_error
    }

    /// Prediction horizon `λ`.
    pub fn horizon(&self) -> usize {
        self.config.horizon()
    }

    /// The control law this controller runs.
    pub fn strategy(&self) -> ControlStrategy {
        match self.law {
            Law::Basic => ControlStrategy::Basic,
            Law::Extended(_) => ControlStrategy::Extended,
        }
    }

    /// Current tuning.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Sample history.
    pub fn history(&self) -> &SampleHistory {
        &self.history
    }

    /// Process model as adapted so far.
    pub fn process_model(&self) -> &LinearModel {
        &self.process
    }

    /// Reference-trajectory model.
    pub fn trajectory_model(&self) -> &LinearModel {
        &self.trajectory
    }

    /// Coefficient tables for the current process model.
    ///
    /// Recomputed whenever the process model changes: after every committed
    /// adaptation and on [`ApController::set_process_model()`].
    pub fn extended_coefficients(&self) -> Option<&ExtendedCoefficients> {
        match &self.law {
            Law::Basic => None,
            Law::Extended(coeffs) => Some(coeffs),
        }
    }

    // --- Reconfiguration (between ticks) ---

    /// Replaces the whole tuning.
    ///
    /// A horizon change re-allocates the coefficient tables.
    pub fn set_config(&mut self, config: ControllerConfig) -> Result<(), ControlError> {
        config.validate()?;
        match &mut self.law {
            Law::Basic if config.horizon() != 1 => {
                return Err(ControlError::BasicHorizon {
                    horizon: config.horizon(),
                });
            }
            Law::Extended(coeffs) if coeffs.horizon() != config.horizon() => {
                *coeffs = extended_tables(&self.process, &self.trajectory, config.horizon())?;
                debug!(horizon = config.horizon(), "coefficient tables reallocated");
            }
            _ => {}
        }
        self.config = config;
        Ok(())
    }

    /// Sets the prediction horizon `λ`.
    pub fn set_horizon(&mut self, horizon: usize) -> Result<(), ControlError> {
        self.set_config(self.config.clone().with_horizon(horizon))
    }

    /// Sets both absolute actuator bounds at once.
    pub fn set_output_limits(
        &mut self,
        min_control: f64,
        max_control: f64,
    ) -> Result<(), ControlError> {
        self.set_config(self.config.clone().with_limits(min_control, max_control))
    }

    /// Sets the per-tick increment bound (`0` = unbounded).
    pub fn set_max_increment(&mut self, max_increment: f64) -> Result<(), ControlError> {
        self.set_config(self.config.clone().with_max_increment(max_increment))
    }

    /// Sets the adaptation dead-zone.
    pub fn set_dead_zone(&mut self, dead_zone: f64) -> Result<(), ControlError> {
        self.set_config(self.config.clone().with_dead_zone(dead_zone))
    }

    /// Sets the adaptation gain.
    pub fn set_adapt_gain(&mut self, adapt_gain: f64) -> Result<(), ControlError> {
        self.set_config(self.config.clone().with_adapt_gain(adapt_gain))
    }

    /// Swaps in a different process model of the same orders.
    ///
    /// The coefficient tables are rebuilt for it; a model whose folded gain
    /// `h` is zero at the current horizon is rejected.
    pub fn set_process_model(&mut self, process: LinearModel) -> Result<(), ControlError> {
        check_order("output order", self.history.output_order(), process.output_order())?;
        check_order("input order", self.history.input_order(), process.input_order())?;
        check_models(&process, &self.trajectory)?;
        if let Law::Extended(coeffs) = &mut self.law {
            *coeffs = extended_tables(&process, &self.trajectory, coeffs.horizon())?;
        }
        self.process = process;
        debug!("process model replaced");
        Ok(())
    }

    /// Swaps in a different reference-trajectory model.
    ///
    /// Its input order must equal the setpoint history length; its output
    /// order may change. The coefficient tables are rebuilt for it.
    pub fn set_trajectory_model(&mut self, trajectory: LinearModel) -> Result<(), ControlError> {
        check_order(
            "trajectory input order",
            self.history.setpoints().len(),
            trajectory.input_order(),
        )?;
        check_models(&self.process, &trajectory)?;
        if let Law::Extended(coeffs) = &mut self.law {
            *coeffs = extended_tables(&self.process, &trajectory, coeffs.horizon())?;
        }
        self.trajectory = trajectory;
        debug!("trajectory model replaced");
        Ok(())
    }
}

fn check_models(process: &LinearModel, trajectory: &LinearModel) -> Result<(), ControlError> {
    process.ensure_leading_input()?;
    if trajectory.output_order() > process.output_order() + 1 {
        return Err(ControlError::TrajectoryOrder {
            trajectory: trajectory.output_order(),
            process: process.output_order(),
        });
    }
    Ok(())
}

/// Builds the extended tables and rejects a zero folded gain `h`.
fn extended_tables(
    process: &LinearModel,
    trajectory: &LinearModel,
    horizon: usize,
) -> Result<ExtendedCoefficients, ControlError> {
    let coeffs = ExtendedCoefficients::new(process, trajectory, horizon)?;
    if coeffs.h() == 0.0 {
        return Err(ControlError::ZeroHorizonGain { horizon });
    }
    Ok(coeffs)
}

fn check_order(what: &'static str, expected: usize, got: usize) -> Result<(), ControlError> {
    if expected != got {
        return Err(ControlError::ShapeMismatch {
            what,
            expected,
            got,
        });
    }
    Ok(())
}
