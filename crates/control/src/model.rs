//! ARX difference-equation model.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ControlError;

/// Selects one of the two coefficient sequences of a [`LinearModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Weights on past outputs (`a1 … a_na`).
    Output,
    /// Weights on past inputs (`b1 … b_nb`).
    Input,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Output => f.write_str("output"),
            Side::Input => f.write_str("input"),
        }
    }
}

/// A discrete ARX model
///
/// ```text
/// y(k) = a1·y(k-1) + … + a_na·y(k-na) + b1·u(k-1) + … + b_nb·u(k-nb)
/// ```
///
/// Both coefficient sequences are non-empty and finite; the orders never
/// change after construction. Serializes as `{ "output": [...], "input": [...] }`
/// and deserializes through [`LinearModel::new()`], so a persisted model is
/// validated on load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawModel", into = "RawModel")]
pub struct LinearModel {
    output: Vec<f64>,
    input: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawModel {
    output: Vec<f64>,
    input: Vec<f64>,
}

impl TryFrom<RawModel> for LinearModel {
    type Error = ControlError;

    fn try_from(raw: RawModel) -> Result<Self, Self::Error> {
        LinearModel::new(raw.output, raw.input)
    }
}

impl From<LinearModel> for RawModel {
    fn from(model: LinearModel) -> Self {
        RawModel {
            output: model.output,
            input: model.input,
        }
    }
}

impl LinearModel {
    /// Creates a model from its output (`a`) and input (`b`) coefficients.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`ControlError::EmptyCoefficients`] | either sequence is empty |
    /// | [`ControlError::NonFiniteCoefficient`] | any coefficient is NaN or infinite |
    ///
    /// # Example
    ///
    /// ```
    /// use apc_control::LinearModel;
    ///
    /// let model = LinearModel::new(vec![1.0, -0.5], vec![0.8, 0.1]).unwrap();
    /// assert_eq!(model.output_order(), 2);
    /// assert_eq!(model.input_coeffs(), &[0.8, 0.1]);
    /// ```
    pub fn new(output: Vec<f64>, input: Vec<f64>) -> Result<Self, ControlError> {
        for (side, coeffs) in [(Side::Output, &output), (Side::Input, &input)] {
            if coeffs.is_empty() {
                return Err(ControlError::EmptyCoefficients { side });
            }
            if let Some(index) = coeffs.iter().position(|c| !c.is_finite()) {
                return Err(ControlError::NonFiniteCoefficient { side, index });
            }
        }
        Ok(Self { output, input })
    }

    /// Returns the output order `na`.
    pub fn output_order(&self) -> usize {
        self.output.len()
    }

    /// Returns the input order `nb`.
    pub fn input_order(&self) -> usize {
        self.input.len()
    }

    /// Returns the output coefficients `a1 … a_na`.
    pub fn output_coeffs(&self) -> &[f64] {
        &self.output
    }

    /// Returns the input coefficients `b1 … b_nb`.
    pub fn input_coeffs(&self) -> &[f64] {
        &self.input
    }

    /// Returns the coefficient sequence on `side`.
    pub fn coeffs(&self, side: Side) -> &[f64] {
        match side {
            Side::Output => &self.output,
            Side::Input => &self.input,
        }
    }

    /// Returns a single coefficient, or `None` past the model order.
    pub fn coeff(&self, side: Side, index: usize) -> Option<f64> {
        self.coeffs(side).get(index).copied()
    }

    /// Evaluates the difference equation for one step.
    ///
    /// `past_outputs[i]` is `y(k-1-i)` and `past_inputs[i]` is `u(k-1-i)`.
    /// Terms beyond the shorter of each pair are dropped.
    pub fn respond(&self, past_outputs: &[f64], past_inputs: &[f64]) -> f64 {
        let ar: f64 = self
            .output
            .iter()
            .zip(past_outputs)
            .map(|(a, y)| a * y)
            .sum();
        let ex: f64 = self
            .input
            .iter()
            .zip(past_inputs)
            .map(|(b, u)| b * u)
            .sum();
        ar + ex
    }

    /// Mutable views of both coefficient sequences, for in-place adaptation.
    pub(crate) fn coeffs_mut(&mut self) -> (&mut [f64], &mut [f64]) {
        (&mut self.output, &mut self.input)
    }

    /// Checks the divisor used by the basic control law.
    pub(crate) fn ensure_leading_input(&self) -> Result<(), ControlError> {
        if self.input[0] == 0.0 {
            return Err(ControlError::ZeroLeadingInput);
        }
        Ok(())
    }
}
