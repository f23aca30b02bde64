//! Pure conversion functions: TOML config structs -> crate API types.

use anyhow::{Context, Result, bail};

use crate::config::*;

use apc_control::{ControlStrategy, ControllerConfig, LinearModel};
use apc_plant::{ArxPlant, SetpointSchedule};

/// Parses a control strategy name into the corresponding enum variant.
pub fn parse_strategy(s: &str) -> Result<ControlStrategy> {
    match s.to_lowercase().as_str() {
        "basic" => Ok(ControlStrategy::Basic),
        "extended" => Ok(ControlStrategy::Extended),
        other => bail!("unknown control strategy: {other:?}"),
    }
}

/// Builds a [`ControllerConfig`] from the TOML controller section and
/// validates it.
pub fn build_controller_config(controller: &ControllerToml) -> Result<ControllerConfig> {
    let cfg = ControllerConfig::new()
        .with_horizon(controller.horizon)
        .with_limits(controller.min_control, controller.max_control)
        .with_max_increment(controller.max_increment)
        .with_dead_zone(controller.dead_zone)
        .with_adapt_gain(controller.adapt_gain);
    cfg.validate().context("invalid [controller] settings")?;
    Ok(cfg)
}

/// Builds the simulated [`ArxPlant`] from the TOML plant section.
pub fn build_plant(plant: &PlantToml) -> Result<ArxPlant> {
    let model = LinearModel::new(plant.output.clone(), plant.input.clone())
        .context("invalid [plant] coefficients")?;
    let plant_sim = ArxPlant::new(model, plant.noise_sd).context("invalid [plant] settings")?;
    Ok(plant_sim.with_initial_output(plant.initial_output))
}

/// Builds a [`SetpointSchedule`] from the `[[setpoint]]` steps.
///
/// At least one step is required.
pub fn build_schedule(setpoints: &[SetpointToml]) -> Result<SetpointSchedule> {
    if setpoints.is_empty() {
        bail!("no setpoints: add at least one [[setpoint]] table");
    }
    let steps = setpoints.iter().map(|s| (s.at, s.value)).collect();
    SetpointSchedule::new(steps).context("invalid [[setpoint]] schedule")
}
