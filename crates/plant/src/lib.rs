//! # apc-plant
//!
//! Stand-ins for the physical world around an adaptive predictive
//! controller: a simulated ARX process with optional Gaussian measurement
//! noise, and a piecewise-constant setpoint schedule.
//!
//! ## Closed Loop
//!
//! ```mermaid
//! graph LR
//!     S["SetpointSchedule::value_at(k)"] --> C["ApController::step()"]
//!     P["ArxPlant::measure()"] --> C
//!     C -->|"action"| A["ArxPlant::apply()"]
//!     A --> P
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use apc_control::LinearModel;
//! use apc_plant::{ArxPlant, SetpointSchedule};
//! use rand::SeedableRng;
//!
//! let model = LinearModel::new(vec![0.9], vec![0.1]).unwrap();
//! let mut plant = ArxPlant::new(model, 0.0).unwrap();
//! let schedule = SetpointSchedule::new(vec![(0, 0.5), (100, 0.8)]).unwrap();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//!
//! plant.apply(1.0);
//! assert!((plant.measure(&mut rng) - 0.1).abs() < 1e-12);
//! assert_eq!(schedule.value_at(150), 0.8);
//! ```

mod error;
mod plant;
mod schedule;

pub use error::PlantError;
pub use plant::ArxPlant;
pub use schedule::SetpointSchedule;
