use crate::model::{OptimizationResult, Result};
use crate::optimization::callback::ProgressObserver;
use crate::optimization::problem::Objective;

/// Solver interface - takes an objective and an observer
///
/// Implementations maximise the objective, call `observer.on_iteration`
/// once per completed iteration and honour `observer.should_stop()` at
/// iteration boundaries.
pub trait Solver {
    fn name(&self) -> &str;

    /// Run to termination, reporting progress through the observer
    fn solve(
        &mut self,
        objective: &dyn Objective,
        observer: &mut dyn ProgressObserver,
    ) -> Result<OptimizationResult>;
}
