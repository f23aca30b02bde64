use std::path::PathBuf;

use apc_control::LinearModel;
use serde::Deserialize;

/// Top-level APC simulation configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApcConfig {
    /// Global RNG seed.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Number of control ticks to simulate.
    #[serde(default = "default_ticks")]
    pub ticks: usize,

    /// The simulated process.
    pub plant: PlantToml,

    /// The controller's initial process model.
    pub model: LinearModel,

    /// Reference-trajectory model.
    pub trajectory: LinearModel,

    /// Controller tuning.
    #[serde(default)]
    pub controller: ControllerToml,

    /// Setpoint steps, in tick order.
    #[serde(default, rename = "setpoint")]
    pub setpoints: Vec<SetpointToml>,

    /// Output settings.
    #[serde(default)]
    pub output: OutputToml,
}

fn default_ticks() -> usize {
    200
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlantToml {
    pub output: Vec<f64>,
    pub input: Vec<f64>,
    #[serde(default)]
    pub noise_sd: f64,
    #[serde(default)]
    pub initial_output: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerToml {
    #[serde(default = "default_strategy")]
    pub strategy: String,
    #[serde(default = "default_horizon")]
    pub horizon: usize,
    #[serde(default)]
    pub min_control: f64,
    #[serde(default = "default_max_control")]
    pub max_control: f64,
    #[serde(default)]
    pub max_increment: f64,
    #[serde(default)]
    pub dead_zone: f64,
    #[serde(default = "default_adapt_gain")]
    pub adapt_gain: f64,
}

impl Default for ControllerToml {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            horizon: default_horizon(),
            min_control: 0.0,
            max_control: default_max_control(),
            max_increment: 0.0,
            dead_zone: 0.0,
            adapt_gain: default_adapt_gain(),
        }
    }
}

fn default_strategy() -> String {
    "basic".to_string()
}
fn default_horizon() -> usize {
    1
}
fn default_max_control() -> f64 {
    1.0
}
fn default_adapt_gain() -> f64 {
    0.2
}

/// One setpoint step: `value` holds from tick `at` until the next step.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetpointToml {
    pub at: usize,
    pub value: f64,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct OutputToml {
    pub path: Option<PathBuf>,
}
