//! Randomised checks of the control-law and adaptation invariants.

use apc_control::{ApController, ControlStrategy, ControllerConfig, LinearModel};
use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CASES: usize = 500;

fn rng() -> StdRng {
    StdRng::seed_from_u64(2020)
}

fn random_model(rng: &mut StdRng, na: usize, nb: usize) -> LinearModel {
    let a = (0..na).map(|_| rng.random_range(-0.5..0.5)).collect();
    let b = (0..nb).map(|_| rng.random_range(0.1..1.0)).collect();
    LinearModel::new(a, b).unwrap()
}

/// One past period: measured output, setpoint, applied action.
type Sample = (f64, f64, f64);

/// A process/trajectory pair and enough samples to fill every history buffer.
struct Setup {
    process: LinearModel,
    trajectory: LinearModel,
    samples: Vec<Sample>,
}

impl Setup {
    fn random(rng: &mut StdRng, scale: f64) -> Self {
        let na = rng.random_range(1..5);
        let nb = rng.random_range(1..5);
        let na_traj = rng.random_range(1..=na + 1);
        let nb_traj = rng.random_range(1..4);
        let process = random_model(rng, na, nb);
        let trajectory = random_model(rng, na_traj, nb_traj);
        let depth = (na + 1).max(nb + 1).max(nb_traj);
        let samples = (0..depth)
            .map(|_| {
                (
                    rng.random_range(-scale..scale),
                    rng.random_range(-scale..scale),
                    rng.random_range(-scale..scale),
                )
            })
            .collect();
        Self {
            process,
            trajectory,
            samples,
        }
    }

    fn controller(&self, strategy: ControlStrategy, config: ControllerConfig) -> ApController {
        let mut apc =
            ApController::new(self.process.clone(), self.trajectory.clone(), strategy, config)
                .unwrap();
        for &(output, setpoint, action) in &self.samples {
            apc.advance_history();
            apc.set_measured_output(output);
            apc.set_setpoint(setpoint);
            apc.set_manual_action(action);
        }
        apc
    }
}

fn random_config(rng: &mut StdRng) -> ControllerConfig {
    let min = rng.random_range(-2.0..0.0);
    let max = rng.random_range(0.0..2.0);
    let max_increment = if rng.random_bool(0.5) {
        0.0
    } else {
        rng.random_range(0.01..0.5)
    };
    ControllerConfig::new()
        .with_limits(min, max)
        .with_max_increment(max_increment)
}

#[test]
fn unit_horizon_extended_matches_basic() {
    let mut rng = rng();
    for _ in 0..CASES {
        let setup = Setup::random(&mut rng, 1.0);
        let config = ControllerConfig::new().with_limits(-1e6, 1e6);
        let mut basic = setup.controller(ControlStrategy::Basic, config.clone());
        let mut ext = setup.controller(ControlStrategy::Extended, config);

        let (output, setpoint) = (rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0));
        let b = basic.step(output, setpoint);
        let e = ext.step(output, setpoint);

        assert_abs_diff_eq!(b.desired_output, e.desired_output, epsilon = 1e-12);
        assert_abs_diff_eq!(b.increment, e.increment, epsilon = 1e-9);
        assert_abs_diff_eq!(b.action, e.action, epsilon = 1e-9);
        assert_eq!(basic.history().inputs()[0], b.action);
        assert_eq!(ext.history().inputs()[0], e.action);
    }
}

#[test]
fn action_always_within_absolute_bounds() {
    let mut rng = rng();
    for _ in 0..CASES {
        let setup = Setup::random(&mut rng, 5.0);
        let config = random_config(&mut rng).with_horizon(rng.random_range(1..8));
        let (min, max) = (config.min_control(), config.max_control());
        let mut apc = setup.controller(ControlStrategy::Extended, config);

        let tick = apc.step(rng.random_range(-5.0..5.0), rng.random_range(-5.0..5.0));
        assert!(
            tick.action >= min && tick.action <= max,
            "action {} outside [{min}, {max}]",
            tick.action,
        );
    }
}

#[test]
fn increment_bound_holds_when_previous_action_is_feasible() {
    let mut rng = rng();
    for _ in 0..CASES {
        let setup = Setup::random(&mut rng, 5.0);
        let mut config = random_config(&mut rng);
        if config.max_increment() == 0.0 {
            config = config.with_max_increment(0.1);
        }
        let (min, max, bound) = (
            config.min_control(),
            config.max_control(),
            config.max_increment(),
        );
        let mut apc = setup.controller(ControlStrategy::Basic, config);

        // Put the previous action inside the bounds so the two limits agree.
        apc.set_manual_action(rng.random_range(min..=max));
        let tick = apc.step(rng.random_range(-5.0..5.0), rng.random_range(-5.0..5.0));
        let previous = apc.history().inputs()[1];
        assert!(
            (tick.action - previous).abs() <= bound + 1e-12,
            "moved {} with bound {bound}",
            tick.action - previous,
        );
    }
}

#[test]
fn dead_zone_leaves_model_untouched() {
    let mut rng = rng();
    for _ in 0..CASES {
        let setup = Setup::random(&mut rng, 2.0);
        let mut apc = setup.controller(ControlStrategy::Basic, ControllerConfig::new());
        apc.advance_history();
        apc.set_measured_output(rng.random_range(-2.0..2.0));

        let history = apc.history();
        let y = history.outputs();
        let prior = y[0] - setup.process.respond(&y[1..], &history.inputs()[1..]);
        apc.set_dead_zone(prior.abs() * 1.5 + 1e-9).unwrap();

        apc.adapt();
        assert_eq!(apc.process_model(), &setup.process);
    }
}

#[test]
fn posterior_error_never_exceeds_prior() {
    let mut rng = rng();
    for _ in 0..CASES {
        let setup = Setup::random(&mut rng, 3.0);
        let config = ControllerConfig::new().with_adapt_gain(1.0);
        let mut apc = setup.controller(ControlStrategy::Basic, config);
        let tick = apc.step(rng.random_range(-3.0..3.0), rng.random_range(-3.0..3.0));
        assert!(tick.adapted);
        assert!(tick.posterior_error <= tick.prior_error.abs());
    }
}

#[test]
fn aggregates_match_tables_after_every_tick() {
    let mut rng = rng();
    let setup = Setup::random(&mut rng, 1.0);
    let config = ControllerConfig::new().with_limits(-1.0, 1.0).with_horizon(6);
    let mut apc = setup.controller(ControlStrategy::Extended, config);

    for _ in 0..20 {
        apc.step(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0));
        let model = apc.process_model();
        let coeffs = apc.extended_coefficients().unwrap();
        for i in 0..model.output_order() {
            let sum: f64 = coeffs.e().row(i).iter().sum();
            assert_eq!(coeffs.ni()[i], sum);
        }
        for i in 0..model.input_order() {
            let sum: f64 = coeffs.g().row(i).iter().sum();
            assert_eq!(coeffs.gamma()[i], sum);
        }
        let first_column = coeffs.e().column(0).to_vec();
        assert_eq!(&first_column[..model.output_order()], model.output_coeffs());
        let first_column = coeffs.g().column(0).to_vec();
        assert_eq!(&first_column[..model.input_order()], model.input_coeffs());
    }
}
