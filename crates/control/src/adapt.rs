//! Online adaptation of the process model (normalized gradient with dead-zone).

use tracing::trace;

use crate::history::SampleHistory;
use crate::model::LinearModel;

/// Outcome of one adaptation step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Adaptation {
    /// A-priori prediction error `e_pri`.
    pub prior_error: f64,
    /// Magnitude of the normalized a-posteriori error, `|e_pri| / (1 + φ²)`.
    pub posterior_error: f64,
    /// Whether the update was committed (`|e_pri| >= dead_zone`).
    pub applied: bool,
}

/// Updates `process` from the latest sample and returns the posterior error.
///
/// The regressor is the previous-period history (`y[1..]`, `u[1..]`), so the
/// sample being explained (`y[0]`) never enters its own estimate:
///
/// ```text
/// φ²     = Σ y[i+1]² + Σ u[i+1]²
/// e_pri  = y[0] - Σ a_i·y[i+1] - Σ b_i·u[i+1]
/// e_post = e_pri / (1 + φ²)
/// a_i   += gain·e_post·y[i+1]       b_i += gain·e_post·u[i+1]
/// ```
///
/// The update is skipped when `|e_pri| < dead_zone`; the posterior error is
/// reported either way.
pub(crate) fn adapt(
    history: &SampleHistory,
    process: &mut LinearModel,
    dead_zone: f64,
    gain: f64,
) -> Adaptation {
    let y = history.outputs();
    let u = history.inputs();
    let (na, nb) = (process.output_order(), process.input_order());

    let energy: f64 = y[1..=na].iter().map(|v| v * v).sum::<f64>()
        + u[1..=nb].iter().map(|v| v * v).sum::<f64>();
    let prior_error = y[0] - process.respond(&y[1..], &u[1..]);
    let posterior = prior_error / (1.0 + energy);

    let applied = prior_error.abs() >= dead_zone;
    if applied {
        let step = gain * posterior;
        let (a, b) = process.coeffs_mut();
        for (ai, &yi) in a.iter_mut().zip(&y[1..]) {
            *ai += step * yi;
        }
        for (bi, &ui) in b.iter_mut().zip(&u[1..]) {
            *bi += step * ui;
        }
    } else {
        trace!(prior_error, dead_zone, "adaptation withheld inside dead-zone");
    }

    Adaptation {
        prior_error,
        posterior_error: posterior.abs(),
        applied,
    }
}
