pub mod callback;
pub mod problem;
pub mod solvers;

pub use callback::{
    CancellationToken, ChannelObserver, HistoryObserver, NoopObserver, ProgressObserver,
    TracingObserver,
};
pub use problem::{ArgminCost, Fallible, Objective};
pub use solvers::{Particle, ParticleOptimizer, Solver, Swarm};

use crate::model::{OptimizationResult, Result, RunConfig};

/// Validate `config`, run a particle swarm to termination and return the result.
pub fn optimize(
    config: RunConfig,
    objective: &dyn Objective,
    observer: &mut dyn ProgressObserver,
) -> Result<OptimizationResult> {
    ParticleOptimizer::new(config)?.solve(objective, observer)
}
