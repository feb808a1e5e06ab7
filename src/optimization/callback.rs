use crate::model::{IterationStatus, OptimizationResult};
use crossbeam::channel::{self, Receiver, Sender};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Observer interface for optimization progress
pub trait ProgressObserver {
    /// Called once per completed iteration with the current global best
    fn on_iteration(&mut self, status: &IterationStatus);

    /// Checked at iteration boundaries; returning true cancels the run
    fn should_stop(&self) -> bool {
        false
    }

    /// Called once with the final result of a successful run
    fn on_finish(&mut self, _result: &OptimizationResult) {}
}

impl<F> ProgressObserver for F
where
    F: FnMut(&IterationStatus),
{
    fn on_iteration(&mut self, status: &IterationStatus) {
        self(status)
    }
}

/// Ignores all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_iteration(&mut self, _status: &IterationStatus) {}
}

/// Emits progress as `tracing` events.
///
/// Every `log_every`-th iteration is logged at info level, the rest at debug.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    label: String,
    log_every: usize,
}

impl TracingObserver {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            log_every: 1,
        }
    }

    pub fn with_log_every(mut self, every: usize) -> Self {
        self.log_every = every.max(1);
        self
    }
}

impl ProgressObserver for TracingObserver {
    fn on_iteration(&mut self, status: &IterationStatus) {
        if status.iteration % self.log_every == 0 {
            tracing::info!(
                run = %self.label,
                iteration = status.iteration,
                best_fitness = status.best_fitness,
                "swarm iteration completed"
            );
        } else {
            tracing::debug!(
                run = %self.label,
                iteration = status.iteration,
                best_fitness = status.best_fitness,
                "swarm iteration completed"
            );
        }
    }

    fn on_finish(&mut self, result: &OptimizationResult) {
        tracing::info!(
            run = %self.label,
            reason = %result.termination_reason,
            iterations = result.iterations_run,
            evaluations = result.evaluations,
            best_fitness = result.best_fitness,
            best_position = ?result.best_position,
            "optimization finished"
        );
    }
}

/// Records every status, optionally cancelling after a number of iterations.
#[derive(Debug, Default, Clone)]
pub struct HistoryObserver {
    history: Vec<IterationStatus>,
    stop_after: Option<usize>,
    finished: Option<OptimizationResult>,
}

impl HistoryObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation once `iterations` statuses have been recorded.
    pub fn with_stop_after(mut self, iterations: usize) -> Self {
        self.stop_after = Some(iterations);
        self
    }

    pub fn history(&self) -> &[IterationStatus] {
        &self.history
    }

    pub fn finished(&self) -> Option<&OptimizationResult> {
        self.finished.as_ref()
    }
}

impl ProgressObserver for HistoryObserver {
    fn on_iteration(&mut self, status: &IterationStatus) {
        self.history.push(*status);
    }

    fn should_stop(&self) -> bool {
        self.stop_after
            .is_some_and(|limit| self.history.len() >= limit)
    }

    fn on_finish(&mut self, result: &OptimizationResult) {
        self.finished = Some(result.clone());
    }
}

/// Forwards statuses to another thread over a crossbeam channel.
///
/// A dropped receiver is not an error; statuses are then discarded.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: Sender<IterationStatus>,
}

impl ChannelObserver {
    pub fn new(tx: Sender<IterationStatus>) -> Self {
        Self { tx }
    }

    /// Unbounded channel pair.
    pub fn unbounded() -> (Self, Receiver<IterationStatus>) {
        let (tx, rx) = channel::unbounded();
        (Self::new(tx), rx)
    }
}

impl ProgressObserver for ChannelObserver {
    fn on_iteration(&mut self, status: &IterationStatus) {
        if self.tx.send(*status).is_err() {
            tracing::trace!(iteration = status.iteration, "progress receiver dropped");
        }
    }
}

/// Shared flag for cancelling a run from another thread.
///
/// Only consulted between iterations; an iteration in flight always completes.
#[derive(Debug, Default, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
