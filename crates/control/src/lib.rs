//! # apc-control
//!
//! Adaptive predictive control (APC) law with online ARX model adaptation.
//!
//! Once per sampling period the controller turns a measured output and a
//! setpoint into one actuator action, then re-estimates its process model
//! from the realised prediction error.
//!
//! ## Tick Pipeline
//!
//! ```mermaid
//! graph LR
//!     A["advance_history()"] --> B["set_measured_output / set_setpoint"]
//!     B -->|"Basic"| C["basic law"]
//!     B -->|"Extended"| E["extended law"]
//!     C --> F["adapt()"]
//!     E --> F
//!     F -->|"model changed"| D["ExtendedCoefficients::compute()"]
//!     F -->|"next tick"| A
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use apc_control::{ApController, ControlStrategy, ControllerConfig, LinearModel};
//!
//! let process = LinearModel::new(vec![1.0, -0.5], vec![0.8, 0.1])?;
//! let trajectory = LinearModel::new(vec![0.6, 0.0], vec![0.4])?;
//! let config = ControllerConfig::new().with_horizon(3).with_max_increment(0.2);
//! let mut apc = ApController::new(process, trajectory, ControlStrategy::Extended, config)?;
//!
//! let tick = apc.step(0.0, 0.5);
//! assert!(tick.action <= 0.2);
//! # Ok::<(), apc_control::ControlError>(())
//! ```
//!
//! ## Mathematical Glossary
//!
//! | Symbol | Accessor | Meaning |
//! |--------|----------|---------|
//! | a, b | [`LinearModel::output_coeffs()`], [`LinearModel::input_coeffs()`] | process ARX coefficients |
//! | α, β | [`ApController::trajectory_model()`] | reference-trajectory coefficients |
//! | λ | [`ApController::horizon()`] | prediction horizon |
//! | E, G, Φ, Δ | [`ExtendedCoefficients`] | horizon-expanded tables |
//! | yD | [`ApController::desired_output()`] | desired output at the end of the horizon |
//! | e_post | [`ApController::posterior_error()`] | normalized a-posteriori error |

mod action;
mod adapt;
mod config;
mod controller;
mod error;
mod extended;
mod history;
mod model;

pub use action::ActionLimits;
pub use config::ControllerConfig;
pub use controller::{ApController, ControlStrategy, Tick};
pub use error::ControlError;
pub use extended::ExtendedCoefficients;
pub use history::SampleHistory;
pub use model::{LinearModel, Side};
