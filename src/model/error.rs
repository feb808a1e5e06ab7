use thiserror::Error;

pub type Result<T> = std::result::Result<T, SwarmError>;

/// Failures surfaced by the optimizer.
///
/// Early termination (convergence, cancellation) is not an error; it is
/// reported through [`TerminationReason`](super::types::TerminationReason).
#[derive(Debug, Error)]
pub enum SwarmError {
    /// Rejected before any iteration runs.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The objective failed or produced a non-finite fitness. The run is aborted.
    #[error("objective evaluation failed at iteration {iteration} for particle {particle}: {reason}")]
    ObjectiveEvaluation {
        iteration: usize,
        particle: usize,
        reason: String,
    },

    #[error("failed to build evaluation worker pool: {0}")]
    WorkerPool(String),

    #[error("failed to parse run configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl SwarmError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_))
    }

    pub fn is_objective_evaluation(&self) -> bool {
        matches!(self, Self::ObjectiveEvaluation { .. })
    }
}
