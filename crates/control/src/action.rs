//! Predictive control laws: basic (`λ = 1`) and extended (`λ > 1`).
//!
//! Both laws compute a desired output from the reference-trajectory model,
//! turn the gap between it and the model prediction into a theoretical
//! increment, and saturate the increment and the resulting action.

use crate::extended::ExtendedCoefficients;
use crate::history::SampleHistory;
use crate::model::LinearModel;

/// Saturation applied to every computed action.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActionLimits {
    min_control: f64,
    max_control: f64,
    max_increment: f64,
}

impl ActionLimits {
    /// Creates limits from absolute bounds and an increment bound (`0` = unbounded).
    pub fn new(min_control: f64, max_control: f64, max_increment: f64) -> Self {
        Self {
            min_control,
            max_control,
            max_increment,
        }
    }

    /// Lower actuator bound.
    pub fn min_control(&self) -> f64 {
        self.min_control
    }

    /// Upper actuator bound.
    pub fn max_control(&self) -> f64 {
        self.max_control
    }

    /// Per-tick increment bound.
    pub fn max_increment(&self) -> f64 {
        self.max_increment
    }

    /// Applies `increment` to `previous` under both bounds.
    ///
    /// The increment is clamped first (when bounded); the absolute bounds
    /// are then checked against the resulting action and win over the
    /// increment bound.
    pub fn saturate(&self, previous: f64, increment: f64) -> f64 {
        let bound = self.max_increment;
        let increment = if bound == 0.0 {
            increment
        } else if increment > bound {
            bound
        } else if increment < -bound {
            -bound
        } else {
            increment
        };

        let candidate = previous + increment;
        if candidate < self.min_control {
            self.min_control
        } else if candidate > self.max_control {
            self.max_control
        } else {
            candidate
        }
    }
}

/// Outcome of one control-law evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PredictiveAction {
    /// Saturated action, also written to `u[0]`.
    pub action: f64,
    /// Desired output at the end of the horizon.
    pub desired_output: f64,
    /// Theoretical increment before saturation.
    pub increment: f64,
}

/// Basic strategy (`λ = 1`): uses the one-step model coefficients directly.
///
/// ```text
/// yD   = Σ α_i·y[i] + Σ β_i·ySP[i]
/// incU = (yD - y[0] - Σ a_i·(y[i]-y[i+1]) - Σ_{i≥1} b_i·(u[i]-u[i+1])) / b_0
/// ```
///
/// Writes the saturated action into `u[0]`. The caller guarantees
/// `b_0 != 0` and that `history` was sized for both models.
pub(crate) fn basic_action(
    history: &mut SampleHistory,
    process: &LinearModel,
    trajectory: &LinearModel,
    limits: &ActionLimits,
) -> PredictiveAction {
    let desired_output = trajectory.respond(history.outputs(), history.setpoints());
    let increment = theoretical_increment(
        history,
        desired_output,
        process.output_coeffs(),
        process.input_coeffs(),
        process.input_coeffs()[0],
    );
    commit(history, limits, desired_output, increment)
}

/// Extended strategy: same structure as [`basic_action()`] with the
/// horizon-expanded coefficients.
///
/// ```text
/// yD   = Σ Φ[i][λ-1]·y[i] + Σ_{i≥1} Δ[i][λ-1]·ySP[i] + μ·ySP[0]
/// incU = (yD - y[0] - Σ ni_i·(y[i]-y[i+1]) - Σ_{i≥1} gamma_i·(u[i]-u[i+1])) / h
/// ```
///
/// `coeffs` must have been computed for the current models this tick.
pub(crate) fn extended_action(
    history: &mut SampleHistory,
    coeffs: &ExtendedCoefficients,
    limits: &ActionLimits,
) -> PredictiveAction {
    let last = coeffs.horizon() - 1;
    let y = history.outputs();
    let sp = history.setpoints();

    let trajectory_outputs = coeffs.phi().nrows() - 1;
    let trajectory_inputs = coeffs.delta().nrows() - 1;
    let mut desired_output = 0.0;
    for (i, &yi) in y.iter().enumerate().take(trajectory_outputs) {
        desired_output += coeffs.phi()[[i, last]] * yi;
    }
    for (i, &spi) in sp.iter().enumerate().take(trajectory_inputs).skip(1) {
        desired_output += coeffs.delta()[[i, last]] * spi;
    }
    desired_output += coeffs.mu() * sp[0];

    let increment = theoretical_increment(
        history,
        desired_output,
        coeffs.ni(),
        coeffs.gamma(),
        coeffs.h(),
    );
    commit(history, limits, desired_output, increment)
}

/// Gap between the desired output and the free response, over the divisor.
fn theoretical_increment<'a>(
    history: &SampleHistory,
    desired_output: f64,
    output_weights: impl IntoIterator<Item = &'a f64>,
    input_weights: impl IntoIterator<Item = &'a f64>,
    divisor: f64,
) -> f64 {
    let y = history.outputs();
    let u = history.inputs();

    let mut gap = desired_output - y[0];
    for (i, w) in output_weights.into_iter().enumerate() {
        gap -= w * (y[i] - y[i + 1]);
    }
    for (i, w) in input_weights.into_iter().enumerate().skip(1) {
        gap -= w * (u[i] - u[i + 1]);
    }
    gap / divisor
}

fn commit(
    history: &mut SampleHistory,
    limits: &ActionLimits,
    desired_output: f64,
    increment: f64,
) -> PredictiveAction {
    let action = limits.saturate(history.inputs()[1], increment);
    history.set_input(action);
    PredictiveAction {
        action,
        desired_output,
        increment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn model(a: &[f64], b: &[f64]) -> LinearModel {
        LinearModel::new(a.to_vec(), b.to_vec()).unwrap()
    }

    #[test]
    fn saturate_passes_interior_value() {
        let limits = ActionLimits::new(0.0, 1.0, 0.0);
        assert_eq!(limits.saturate(0.2, 0.3), 0.5);
    }

    #[test]
    fn saturate_absolute_bounds_exact() {
        let limits = ActionLimits::new(0.0, 1.0, 0.0);
        assert_eq!(limits.saturate(0.5, 2.0), 1.0);
        assert_eq!(limits.saturate(0.5, -2.0), 0.0);
    }

    #[test]
    fn saturate_increment_bound_both_signs() {
        let limits = ActionLimits::new(-10.0, 10.0, 0.25);
        assert_eq!(limits.saturate(1.0, 3.0), 1.25);
        assert_eq!(limits.saturate(1.0, -3.0), 0.75);
        assert_eq!(limits.saturate(1.0, 0.1), 1.1);
    }

    #[test]
    fn saturate_absolute_bound_wins_over_increment() {
        // Previous action already above max: increment bound alone would give 1.9.
        let limits = ActionLimits::new(0.0, 1.0, 0.1);
        assert_eq!(limits.saturate(2.0, -5.0), 1.0);
    }

    #[test]
    fn basic_action_writes_head_of_inputs() {
        let process = model(&[0.5], &[2.0]);
        let trajectory = model(&[0.0], &[1.0]);
        let mut history =
            SampleHistory::from_parts(vec![0.0, 0.0], vec![0.0, 0.0], vec![0.4]).unwrap();
        let limits = ActionLimits::new(-1.0, 1.0, 0.0);
        let out = basic_action(&mut history, &process, &trajectory, &limits);
        assert_abs_diff_eq!(out.desired_output, 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(out.increment, 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(out.action, 0.2, epsilon = 1e-12);
        assert_eq!(history.inputs()[0], out.action);
    }

    #[test]
    fn basic_action_subtracts_free_response() {
        // y = [1.0, 0.5], u = [_, 0.2, 0.1]
        // yD = 0.5·1.0 + 0.5·2.0 = 1.5
        // incU = (1.5 - 1.0 - 0.8·0.5 - 0.3·0.1) / 0.6 = 0.07 / 0.6
        let process = model(&[0.8], &[0.6, 0.3]);
        let trajectory = model(&[0.5], &[0.5]);
        let mut history =
            SampleHistory::from_parts(vec![1.0, 0.5], vec![0.0, 0.2, 0.1], vec![2.0]).unwrap();
        let limits = ActionLimits::new(-5.0, 5.0, 0.0);
        let out = basic_action(&mut history, &process, &trajectory, &limits);
        assert_abs_diff_eq!(out.desired_output, 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(out.increment, 0.07 / 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(out.action, 0.2 + 0.07 / 0.6, epsilon = 1e-12);
    }

    #[test]
    fn extended_action_uses_folded_coefficients() {
        let process = model(&[0.5], &[1.0]);
        let trajectory = model(&[0.0], &[1.0]);
        let coeffs = ExtendedCoefficients::new(&process, &trajectory, 3).unwrap();
        let mut history =
            SampleHistory::from_parts(vec![0.0, 0.0], vec![0.0, 0.0], vec![1.0]).unwrap();
        let limits = ActionLimits::new(-10.0, 10.0, 0.0);
        let out = extended_action(&mut history, &coeffs, &limits);
        // Pass-through trajectory: yD = ySP[0] at any horizon; h = 1.75.
        assert_abs_diff_eq!(out.desired_output, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out.action, 1.0 / 1.75, epsilon = 1e-12);
        assert_eq!(history.inputs()[0], out.action);
    }

    #[test]
    fn extended_desired_output_follows_trajectory_horizon() {
        // First-order trajectory yD(k+1) = 0.5·y + 0.5·sp from y = 0, sp = 1:
        // after 3 steps the trajectory reaches 1 - 0.5³.
        let process = model(&[0.5], &[1.0]);
        let trajectory = model(&[0.5], &[0.5]);
        let coeffs = ExtendedCoefficients::new(&process, &trajectory, 3).unwrap();
        let mut history =
            SampleHistory::from_parts(vec![0.0, 0.0], vec![0.0, 0.0], vec![1.0]).unwrap();
        let limits = ActionLimits::new(-10.0, 10.0, 0.0);
        let out = extended_action(&mut history, &coeffs, &limits);
        assert_abs_diff_eq!(out.desired_output, 0.875, epsilon = 1e-12);
    }
}
