//! Bounded particle swarm optimization with a pluggable objective.
//!
//! ```
//! use pitswarm::{optimize, NoopObserver, RunConfig};
//!
//! let config = RunConfig::new(2, 0.0, 1.0).with_max_iterations(50).with_seed(7);
//! let ore_value = |x: &[f64]| -> f64 { -((x[0] - 0.3).powi(2) + (x[1] - 0.6).powi(2)) };
//! let result = optimize(config, &ore_value, &mut NoopObserver).unwrap();
//! assert_eq!(result.iterations_run, 50);
//! ```

mod model;
mod optimization;
#[cfg(feature = "python")]
mod python;

pub use model::*;
pub use optimization::*;
