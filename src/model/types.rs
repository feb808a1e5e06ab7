use super::error::{Result, SwarmError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// ===== ENUMS =====

/// How particle velocities are recomputed each iteration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateRule {
    /// Inertia plus cognitive pull toward the personal best and social pull
    /// toward the global best.
    #[default]
    Canonical,
    /// Uniform random perturbation of `velocity_scale` times the range, with
    /// no attraction terms.
    RandomWalk,
}

/// Where fitness evaluations run within one iteration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Evaluation {
    #[default]
    Sequential,
    /// Dedicated worker pool; `None` sizes it to the logical CPU count.
    Parallel { workers: Option<usize> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    MaxIterationsReached,
    Converged,
    Cancelled,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MaxIterationsReached => "max_iterations_reached",
            Self::Converged => "converged",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

// ===== RUN CONFIGURATION =====

/// Parameters of a single optimization run.
///
/// Built with [`RunConfig::new`] and the `with_*` methods, or deserialized
/// from JSON. Optional knobs fall back to their defaults when omitted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub population_size: usize,
    /// Taken from `bounds.len()` when omitted from JSON.
    pub dimensions: usize,
    /// `(lower, upper)` for each dimension.
    pub bounds: Vec<(f64, f64)>,
    pub max_iterations: usize,
    /// Velocity limit as a fraction of each dimension's range.
    pub velocity_scale: f64,
    /// Stop after this many consecutive iterations without improvement.
    pub patience: Option<usize>,
    /// Improvements no larger than this do not reset the patience window.
    pub tolerance: f64,
    pub inertia: f64,   // w
    pub cognitive: f64, // c1
    pub social: f64,    // c2
    pub update_rule: UpdateRule,
    pub evaluation: Evaluation,
    pub seed: Option<u64>,
    /// Checked at iteration boundaries only.
    pub time_limit: Option<Duration>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            dimensions: 0,
            bounds: Vec::new(),
            max_iterations: 100,
            velocity_scale: 0.2,
            patience: None,
            tolerance: 0.0,
            inertia: 0.7,
            cognitive: 1.5,
            social: 1.5,
            update_rule: UpdateRule::Canonical,
            evaluation: Evaluation::Sequential,
            seed: None,
            time_limit: None,
        }
    }
}

impl RunConfig {
    /// Uniform bounds `[lower, upper]` on every dimension.
    pub fn new(dimensions: usize, lower: f64, upper: f64) -> Self {
        Self {
            dimensions,
            bounds: vec![(lower, upper); dimensions],
            ..Self::default()
        }
    }

    /// Per-dimension bounds with the swarm size scaled to the problem:
    /// 10-30 particles depending on dimensionality.
    pub fn for_bounds(bounds: Vec<(f64, f64)>) -> Self {
        let n = bounds.len();
        Self {
            population_size: suggested_population_size(n),
            dimensions: n,
            bounds,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        if config.dimensions == 0 {
            config.dimensions = config.bounds.len();
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Replaces the bounds and the dimensionality together.
    pub fn with_bounds(mut self, bounds: Vec<(f64, f64)>) -> Self {
        self.dimensions = bounds.len();
        self.bounds = bounds;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_velocity_scale(mut self, scale: f64) -> Self {
        self.velocity_scale = scale;
        self
    }

    pub fn with_patience(mut self, patience: usize) -> Self {
        self.patience = Some(patience);
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Configure PSO parameters (defaults: w=0.7, c1=1.5, c2=1.5)
    pub fn with_pso_params(mut self, inertia: f64, cognitive: f64, social: f64) -> Self {
        self.inertia = inertia;
        self.cognitive = cognitive;
        self.social = social;
        self
    }

    pub fn with_update_rule(mut self, rule: UpdateRule) -> Self {
        self.update_rule = rule;
        self
    }

    pub fn with_evaluation(mut self, evaluation: Evaluation) -> Self {
        self.evaluation = evaluation;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Width of each dimension's search interval.
    pub fn ranges(&self) -> Vec<f64> {
        self.bounds.iter().map(|&(min, max)| max - min).collect()
    }
}

/// Swarm size heuristic: 10 particles plus 3 per dimension, capped at 30.
pub fn suggested_population_size(dimensions: usize) -> usize {
    (10 + dimensions * 3).min(30)
}

// ===== RUN OUTPUT =====

/// Progress record handed to observers after each completed iteration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IterationStatus {
    /// 1-based index of the iteration that just finished.
    pub iteration: usize,
    pub best_fitness: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub best_position: Vec<f64>,
    pub best_fitness: f64,
    pub iterations_run: usize,
    pub termination_reason: TerminationReason,
    /// Global-best fitness after each completed iteration.
    pub history: Vec<f64>,
    /// Objective calls, including the initial population.
    pub evaluations: usize,
}

impl OptimizationResult {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(SwarmError::from)
    }

    pub fn converged(&self) -> bool {
        self.termination_reason == TerminationReason::Converged
    }
}
