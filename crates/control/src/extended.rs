//! Horizon expansion of the one-step ARX model ("extended coefficients").
//!
//! Substituting the one-step model into its own future prediction `λ - 1`
//! times folds the whole horizon into one coefficient layer per step:
//!
//! ```text
//! E[i][0] = a_i                  E[i][j] = E[0][j-1]·a_i + E[i+1][j-1]
//! G[i][0] = b_i                  G[i][j] = E[0][j-1]·b_i + G[i+1][j-1]
//! ```
//!
//! so that, with future inputs held at zero,
//! `y(k+λ) = Σ E[i][λ-1]·y(k-i) + Σ G[i][λ-1]·u(k-i)`. The trajectory model
//! is expanded the same way into `Φ`/`Δ`. Row `order` of every table is the
//! zero-padding row read by the `i = order - 1` step of the recurrence.

use ndarray::{Array1, Array2, ArrayView1};

use crate::error::ControlError;
use crate::model::LinearModel;

/// Value of every entry in the boundary row one past the model order.
const ZERO_PADDING: f64 = 0.0;

/// Horizon-expanded coefficients of the process and trajectory models.
///
/// Tables have shape `(order + 1, λ)`, including the zero-padding row, and
/// are allocated once per horizon. [`ExtendedCoefficients::compute()`]
/// overwrites every entry from the current models, so no state survives
/// from one tick to the next.
///
/// | Symbol | Accessor | Meaning |
/// |--------|----------|---------|
/// | E | [`e()`](Self::e) | process output table, `(na + 1) × λ` |
/// | G | [`g()`](Self::g) | process input table, `(nb + 1) × λ` |
/// | Φ | [`phi()`](Self::phi) | trajectory output table |
/// | Δ | [`delta()`](Self::delta) | trajectory input table |
/// | h | [`h()`](Self::h) | control-law divisor, `Σ_j G[0][j]` |
/// | μ | [`mu()`](Self::mu) | setpoint feedforward gain, `Σ_j Δ[0][j]` |
/// | ni | [`ni()`](Self::ni) | row sums of `E` |
/// | gamma | [`gamma()`](Self::gamma) | row sums of `G` |
#[derive(Clone, Debug)]
pub struct ExtendedCoefficients {
    horizon: usize,
    e: Array2<f64>,
    g: Array2<f64>,
    phi: Array2<f64>,
    delta: Array2<f64>,
    h: f64,
    mu: f64,
    ni: Array1<f64>,
    gamma: Array1<f64>,
}

impl ExtendedCoefficients {
    /// Allocates tables for the given models and horizon and fills them.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::InvalidHorizon`] if `horizon == 0`.
    ///
    /// # Example
    ///
    /// ```
    /// use apc_control::{ExtendedCoefficients, LinearModel};
    ///
    /// let process = LinearModel::new(vec![0.5], vec![1.0]).unwrap();
    /// let trajectory = LinearModel::new(vec![0.0], vec![1.0]).unwrap();
    /// let coeffs = ExtendedCoefficients::new(&process, &trajectory, 3).unwrap();
    /// assert_eq!(coeffs.e().shape(), &[2, 3]);
    /// // h = 1 + 0.5 + 0.25
    /// assert!((coeffs.h() - 1.75).abs() < 1e-12);
    /// ```
    pub fn new(
        process: &LinearModel,
        trajectory: &LinearModel,
        horizon: usize,
    ) -> Result<Self, ControlError> {
        if horizon == 0 {
            return Err(ControlError::InvalidHorizon { horizon });
        }
        let mut coeffs = Self {
            horizon,
            e: Array2::zeros((process.output_order() + 1, horizon)),
            g: Array2::zeros((process.input_order() + 1, horizon)),
            phi: Array2::zeros((trajectory.output_order() + 1, horizon)),
            delta: Array2::zeros((trajectory.input_order() + 1, horizon)),
            h: 0.0,
            mu: 0.0,
            ni: Array1::zeros(process.output_order()),
            gamma: Array1::zeros(process.input_order()),
        };
        coeffs.compute(process, trajectory);
        Ok(coeffs)
    }

    /// Returns `true` if the allocated tables match the orders of both models.
    pub fn fits(&self, process: &LinearModel, trajectory: &LinearModel) -> bool {
        self.e.nrows() == process.output_order() + 1
            && self.g.nrows() == process.input_order() + 1
            && self.phi.nrows() == trajectory.output_order() + 1
            && self.delta.nrows() == trajectory.input_order() + 1
    }

    /// Recomputes every table and aggregate from the current models, in place.
    ///
    /// Cost is `O(λ·(na + nb + na_traj + nb_traj))` with no allocation.
    ///
    /// # Panics
    ///
    /// Panics if the model orders differ from the ones the tables were
    /// allocated for (see [`ExtendedCoefficients::fits()`]).
    pub fn compute(&mut self, process: &LinearModel, trajectory: &LinearModel) {
        assert!(
            self.fits(process, trajectory),
            "extended coefficient tables do not match the model orders"
        );

        expand(&mut self.e, process.output_coeffs(), None);
        expand(&mut self.g, process.input_coeffs(), Some(self.e.row(0)));
        expand(&mut self.phi, trajectory.output_coeffs(), None);
        expand(&mut self.delta, trajectory.input_coeffs(), Some(self.phi.row(0)));

        self.h = self.g.row(0).iter().sum();
        self.mu = self.delta.row(0).iter().sum();
        row_sums(&self.e, &mut self.ni);
        row_sums(&self.g, &mut self.gamma);
    }

    /// Prediction horizon `λ` the tables were allocated for.
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Process output table `E`, shape `(na + 1, λ)`.
    pub fn e(&self) -> &Array2<f64> {
        &self.e
    }

    /// Process input table `G`, shape `(nb + 1, λ)`.
    pub fn g(&self) -> &Array2<f64> {
        &self.g
    }

    /// Trajectory output table `Φ`.
    pub fn phi(&self) -> &Array2<f64> {
        &self.phi
    }

    /// Trajectory input table `Δ`.
    pub fn delta(&self) -> &Array2<f64> {
        &self.delta
    }

    /// Control-law divisor `h`.
    pub fn h(&self) -> f64 {
        self.h
    }

    /// Feedforward gain `μ` on the current setpoint.
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Horizon-summed output coefficients, length `na`.
    pub fn ni(&self) -> &Array1<f64> {
        &self.ni
    }

    /// Horizon-summed input coefficients, length `nb`.
    pub fn gamma(&self) -> &Array1<f64> {
        &self.gamma
    }
}

/// Entry `[row, col]`, where `row == order` is the zero-padding row.
fn padded(table: &Array2<f64>, order: usize, row: usize, col: usize) -> f64 {
    if row == order {
        ZERO_PADDING
    } else {
        table[[row, col]]
    }
}

/// Fills `table` with the horizon expansion of `coeffs`.
///
/// `lead` is the row whose previous column scales each new layer; `None`
/// means the table leads itself (output side).
fn expand(table: &mut Array2<f64>, coeffs: &[f64], lead: Option<ArrayView1<'_, f64>>) {
    let order = coeffs.len();
    table.row_mut(order).fill(ZERO_PADDING);
    for (i, &c) in coeffs.iter().enumerate() {
        table[[i, 0]] = c;
    }
    for j in 1..table.ncols() {
        let scale = match &lead {
            Some(row) => row[j - 1],
            None => table[[0, j - 1]],
        };
        for (i, &c) in coeffs.iter().enumerate() {
            let value = scale * c + padded(table, order, i + 1, j - 1);
            table[[i, j]] = value;
        }
    }
}

fn row_sums(table: &Array2<f64>, out: &mut Array1<f64>) {
    for (i, sum) in out.iter_mut().enumerate() {
        *sum = table.row(i).iter().sum();
    }
}
