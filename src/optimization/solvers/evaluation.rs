use crate::model::{Evaluation, Result, SwarmError};
use crate::optimization::problem::Objective;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Runs one batch of fitness evaluations per iteration.
///
/// Both variants return only after every position has been scored, in
/// particle order, so callers never see a partially evaluated population.
pub(crate) enum Evaluator {
    Sequential,
    Parallel(ThreadPool),
}

impl Evaluator {
    pub(crate) fn new(mode: Evaluation) -> Result<Self> {
        match mode {
            Evaluation::Sequential => Ok(Self::Sequential),
            Evaluation::Parallel { workers } => {
                let threads = workers.unwrap_or_else(num_cpus::get);
                let pool = ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("pitswarm-eval-{}", i))
                    .build()
                    .map_err(|e| SwarmError::WorkerPool(e.to_string()))?;
                Ok(Self::Parallel(pool))
            }
        }
    }

    pub(crate) fn workers(&self) -> usize {
        match self {
            Self::Sequential => 1,
            Self::Parallel(pool) => pool.current_num_threads(),
        }
    }

    /// Score every position. The sequential path stops at the first failure;
    /// the parallel path reports the failure with the lowest particle index.
    pub(crate) fn evaluate(
        &self,
        objective: &dyn Objective,
        iteration: usize,
        positions: &[Vec<f64>],
    ) -> Result<Vec<f64>> {
        match self {
            Self::Sequential => positions
                .iter()
                .enumerate()
                .map(|(p, position)| checked_fitness(objective, iteration, p, position))
                .collect(),
            Self::Parallel(pool) => {
                let scored: Vec<Result<f64>> = pool.install(|| {
                    positions
                        .par_iter()
                        .enumerate()
                        .map(|(p, position)| checked_fitness(objective, iteration, p, position))
                        .collect()
                });
                scored.into_iter().collect()
            }
        }
    }
}

fn checked_fitness(
    objective: &dyn Objective,
    iteration: usize,
    particle: usize,
    position: &[f64],
) -> Result<f64> {
    match objective.evaluate(position) {
        Ok(fitness) if fitness.is_finite() => Ok(fitness),
        Ok(fitness) => Err(SwarmError::ObjectiveEvaluation {
            iteration,
            particle,
            reason: format!("non-finite fitness {}", fitness),
        }),
        Err(reason) => Err(SwarmError::ObjectiveEvaluation {
            iteration,
            particle,
            reason,
        }),
    }
}
