//! Worked control-law and adaptation scenarios with known answers.

use apc_control::{ApController, ControlError, ControlStrategy, ControllerConfig, LinearModel};
use approx::assert_abs_diff_eq;

fn process() -> LinearModel {
    LinearModel::new(vec![1.0, -0.5], vec![0.8, 0.1]).unwrap()
}

/// Trajectory that hands the setpoint straight through: yD = ySP[0].
fn pass_through() -> LinearModel {
    LinearModel::new(vec![0.0, 0.0], vec![1.0]).unwrap()
}

fn basic(config: ControllerConfig) -> ApController {
    ApController::new(process(), pass_through(), ControlStrategy::Basic, config).unwrap()
}

#[test]
fn step_to_unit_setpoint_saturates_at_max_control() {
    let mut apc = basic(ControllerConfig::new().with_limits(0.0, 1.0));
    let tick = apc.step(0.0, 1.0);
    assert_abs_diff_eq!(tick.desired_output, 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(tick.increment, 1.25, epsilon = 1e-12);
    assert_eq!(tick.action, 1.0);
    assert_eq!(apc.history().inputs()[0], 1.0);
}

#[test]
fn step_to_unit_setpoint_limited_by_increment_bound() {
    let config = ControllerConfig::new()
        .with_limits(0.0, 1.0)
        .with_max_increment(0.1);
    let mut apc = basic(config);
    let tick = apc.step(0.0, 1.0);
    assert_abs_diff_eq!(tick.increment, 1.25, epsilon = 1e-12);
    assert_abs_diff_eq!(tick.action, 0.1, epsilon = 1e-12);
}

#[test]
fn same_scenarios_through_individual_stages() {
    let mut apc = basic(ControllerConfig::new().with_limits(0.0, 1.0));
    apc.set_setpoint(1.0);
    assert_eq!(apc.compute_action(), 1.0);

    let config = ControllerConfig::new()
        .with_limits(0.0, 1.0)
        .with_max_increment(0.1);
    let mut apc = basic(config);
    apc.set_setpoint(1.0);
    assert_abs_diff_eq!(apc.compute_action(), 0.1, epsilon = 1e-12);
}

#[test]
fn output_holding_trajectory_requests_no_move() {
    // yD = 1.0·y[0] + 0.0·y[1] + 0.0·ySP[0] = 0 from a resting plant.
    let trajectory = LinearModel::new(vec![1.0, 0.0], vec![0.0]).unwrap();
    let config = ControllerConfig::new().with_limits(0.0, 1.0);
    let mut apc = ApController::new(process(), trajectory, ControlStrategy::Basic, config).unwrap();
    let tick = apc.step(0.0, 1.0);
    assert_eq!(tick.desired_output, 0.0);
    assert_eq!(tick.action, 0.0);
}

#[test]
fn small_prior_error_inside_dead_zone() {
    let mut apc = basic(ControllerConfig::new().with_dead_zone(0.05));
    apc.advance_history();
    apc.set_measured_output(0.01);
    let err = apc.adapt();
    assert_abs_diff_eq!(err, 0.01, epsilon = 1e-12);
    assert_eq!(apc.process_model(), &process());
}

#[test]
fn prior_error_outside_dead_zone_moves_model() {
    let mut apc = basic(ControllerConfig::new().with_dead_zone(0.05));
    apc.prime(0.0, 0.5, 0.0);
    let tick = apc.step(0.2, 0.0);
    // Prediction from the primed history: 0.8·0.5 + 0.1·0.5 = 0.45.
    assert_abs_diff_eq!(tick.prior_error, 0.2 - 0.45, epsilon = 1e-12);
    assert!(tick.adapted);
    assert!(tick.posterior_error < tick.prior_error.abs());
    assert_ne!(apc.process_model(), &process());
}

#[test]
fn manual_action_becomes_previous_action() {
    // Manual mode: the operator drives u; the controller only tracks history.
    let config = ControllerConfig::new().with_limits(0.0, 1.0).with_max_increment(0.05);
    let mut apc = basic(config);
    apc.set_manual_action(0.6);
    apc.advance_history();
    apc.set_setpoint(1.0);
    let action = apc.compute_action();
    assert_abs_diff_eq!(action, 0.65, epsilon = 1e-12);
}

#[test]
fn model_with_other_orders_is_refused() {
    let mut apc = basic(ControllerConfig::new().with_limits(0.0, 1.0));
    let longer = LinearModel::new(vec![1.0, -0.5, 0.1], vec![0.8, 0.1]).unwrap();
    assert!(matches!(
        apc.set_process_model(longer),
        Err(ControlError::ShapeMismatch { .. })
    ));
    assert_eq!(apc.process_model(), &process());
    assert_eq!(apc.history().outputs().len(), 3);
    let tick = apc.step(0.0, 1.0);
    assert_eq!(tick.action, 1.0);
}

#[test]
fn zero_horizon_gain_refused_at_construction() {
    // h = b0 + (a0·b0 + b1) = 1 + (0.5 - 1.5) = 0 at horizon 2.
    let process = LinearModel::new(vec![0.5], vec![1.0, -1.5]).unwrap();
    let trajectory = LinearModel::new(vec![0.5], vec![0.5]).unwrap();
    let config = ControllerConfig::new().with_horizon(2);
    let err = ApController::new(
        process.clone(),
        trajectory.clone(),
        ControlStrategy::Extended,
        config,
    )
    .unwrap_err();
    assert_eq!(err, ControlError::ZeroHorizonGain { horizon: 2 });

    let config = ControllerConfig::new().with_horizon(3);
    assert!(ApController::new(process, trajectory, ControlStrategy::Extended, config).is_ok());
}
