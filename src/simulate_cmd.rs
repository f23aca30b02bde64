//! Simulate command: drive an ARX plant with the adaptive predictive controller.

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info, info_span};

use apc_control::{ApController, LinearModel};

use crate::cli::SimulateArgs;
use crate::config::ApcConfig;
use crate::convert;

/// One closed-loop tick as written to the trace.
#[derive(Debug, Serialize)]
pub struct TickRecord {
    pub tick: usize,
    pub setpoint: f64,
    pub measured_output: f64,
    pub action: f64,
    pub desired_output: f64,
    pub posterior_error: f64,
    pub adapted: bool,
}

/// End-of-run figures.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub final_setpoint: f64,
    pub final_output: f64,
    pub tracking_error: f64,
    pub adaptations: usize,
}

/// Full simulation trace.
#[derive(Debug, Serialize)]
pub struct Trace {
    pub seed: Option<u64>,
    pub ticks: usize,
    pub strategy: String,
    pub horizon: usize,
    pub initial_model: LinearModel,
    pub final_model: LinearModel,
    pub summary: Summary,
    pub records: Vec<TickRecord>,
}

/// Run the closed-loop simulation and write the trace.
pub fn run(args: SimulateArgs) -> Result<()> {
    let _cmd = info_span!("simulate").entered();
    // 1. Load project TOML
    let toml_str = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config file: {}", args.config.display()))?;
    let config: ApcConfig = toml::from_str(&toml_str).context("failed to parse TOML config")?;

    // 2. CLI overrides
    let seed = args.seed.or(config.seed);
    let ticks = args.ticks.unwrap_or(config.ticks);
    let output = args.output.or_else(|| config.output.path.clone());

    // 3. Closed loop
    let trace = simulate(&config, ticks, seed)?;
    info!(
        ticks = trace.ticks,
        final_output = trace.summary.final_output,
        tracking_error = trace.summary.tracking_error,
        adaptations = trace.summary.adaptations,
        "simulation complete"
    );

    // 4. Write trace JSON
    match output {
        Some(path) => {
            let json = serde_json::to_string_pretty(&trace).context("failed to serialize trace")?;
            std::fs::write(&path, json)
                .with_context(|| format!("failed to write trace: {}", path.display()))?;
            info!(path = %path.display(), "trace written");
        }
        None => info!("no output path configured, trace not written"),
    }

    Ok(())
}

/// Runs `ticks` closed-loop periods of the scenario in `config`.
///
/// Each tick measures the plant, looks up the scheduled setpoint, runs one
/// controller tick and applies the resulting action to the plant.
#[tracing::instrument(skip(config))]
pub fn simulate(config: &ApcConfig, ticks: usize, seed: Option<u64>) -> Result<Trace> {
    let process = config.model.clone();
    let trajectory = config.trajectory.clone();
    let strategy = convert::parse_strategy(&config.controller.strategy)?;
    let controller_cfg = convert::build_controller_config(&config.controller)?;
    let mut plant = convert::build_plant(&config.plant)?;
    let schedule = convert::build_schedule(&config.setpoints)?;

    let mut apc = ApController::new(process.clone(), trajectory, strategy, controller_cfg)
        .context("failed to build controller")?;
    debug!(?strategy, horizon = apc.horizon(), "controller ready");

    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };

    let mut records = Vec::with_capacity(ticks);
    let mut measured = plant.measure(&mut rng);
    for tick in 0..ticks {
        let setpoint = schedule.value_at(tick);
        let step = apc.step(measured, setpoint);
        records.push(TickRecord {
            tick,
            setpoint,
            measured_output: measured,
            action: step.action,
            desired_output: step.desired_output,
            posterior_error: step.posterior_error,
            adapted: step.adapted,
        });
        measured = plant.step(step.action, &mut rng);
    }

    let final_setpoint = schedule.value_at(ticks.saturating_sub(1));
    let summary = Summary {
        final_setpoint,
        final_output: plant.output(),
        tracking_error: (final_setpoint - plant.output()).abs(),
        adaptations: records.iter().filter(|r| r.adapted).count(),
    };

    Ok(Trace {
        seed,
        ticks,
        strategy: config.controller.strategy.to_lowercase(),
        horizon: apc.horizon(),
        initial_model: process,
        final_model: apc.process_model().clone(),
        summary,
        records,
    })
}
