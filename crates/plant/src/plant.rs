//! Simulated ARX process.

use apc_control::LinearModel;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::PlantError;

/// A process evolving by a fixed ARX difference equation.
///
/// The plant keeps its own past outputs `y(k-i)` and inputs `u(k-1-i)`;
/// [`ArxPlant::apply()`] feeds one action and advances one period. Noise is
/// added only to measurements, never to the state.
#[derive(Clone, Debug)]
pub struct ArxPlant {
    model: LinearModel,
    outputs: Vec<f64>,
    inputs: Vec<f64>,
    noise: Option<Normal<f64>>,
}

impl ArxPlant {
    /// Creates a plant at rest with measurement noise of standard deviation `noise_sd`.
    ///
    /// # Errors
    ///
    /// Returns [`PlantError::InvalidNoise`] if `noise_sd` is negative or not finite.
    pub fn new(model: LinearModel, noise_sd: f64) -> Result<Self, PlantError> {
        if !noise_sd.is_finite() || noise_sd < 0.0 {
            return Err(PlantError::InvalidNoise { sd: noise_sd });
        }
        let noise = if noise_sd > 0.0 {
            let normal = Normal::new(0.0, noise_sd)
                .map_err(|_| PlantError::InvalidNoise { sd: noise_sd })?;
            Some(normal)
        } else {
            None
        };
        Ok(Self {
            outputs: vec![0.0; model.output_order()],
            inputs: vec![0.0; model.input_order()],
            model,
            noise,
        })
    }

    /// Starts the plant with every past output at `output`.
    pub fn with_initial_output(mut self, output: f64) -> Self {
        self.outputs.fill(output);
        self
    }

    /// True (noise-free) current output `y(k)`.
    pub fn output(&self) -> f64 {
        self.outputs[0]
    }

    /// The difference equation driving this plant.
    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    /// Samples a measurement of the current output.
    pub fn measure<R: Rng>(&self, rng: &mut R) -> f64 {
        match &self.noise {
            Some(normal) => self.output() + normal.sample(rng),
            None => self.output(),
        }
    }

    /// Applies `action` as `u(k)` and advances to `y(k+1)`.
    pub fn apply(&mut self, action: f64) {
        shift_in(&mut self.inputs, action);
        let next = self.model.respond(&self.outputs, &self.inputs);
        shift_in(&mut self.outputs, next);
    }

    /// Applies `action`, then returns a measurement of the new output.
    pub fn step<R: Rng>(&mut self, action: f64, rng: &mut R) -> f64 {
        self.apply(action);
        self.measure(rng)
    }
}

fn shift_in(buf: &mut [f64], value: f64) {
    let n = buf.len();
    buf.copy_within(0..n - 1, 1);
    buf[0] = value;
}
