use crate::model::{IterationStatus, OptimizationResult, RunConfig, SwarmError, UpdateRule};
use crate::optimization::{Objective, ParticleOptimizer, ProgressObserver, TracingObserver};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

/// Python callable used as the fitness function.
struct PyObjective(PyObject);

impl Objective for PyObjective {
    fn evaluate(&self, position: &[f64]) -> Result<f64, String> {
        Python::with_gil(|py| {
            self.0
                .call1(py, (position.to_vec(),))
                .and_then(|value| value.extract::<f64>(py))
                .map_err(|e| e.to_string())
        })
    }
}

/// Stops the run at the next iteration boundary after Ctrl+C.
struct InterruptObserver {
    logger: Option<TracingObserver>,
    interrupted: bool,
}

impl ProgressObserver for InterruptObserver {
    fn on_iteration(&mut self, status: &IterationStatus) {
        if let Some(logger) = self.logger.as_mut() {
            logger.on_iteration(status);
        }
        self.interrupted = Python::with_gil(|py| py.check_signals().is_err());
    }

    fn should_stop(&self) -> bool {
        self.interrupted
    }

    fn on_finish(&mut self, result: &OptimizationResult) {
        if let Some(logger) = self.logger.as_mut() {
            logger.on_finish(result);
        }
    }
}

#[pyclass(name = "OptimizationResult")]
#[derive(Clone, Debug)]
pub struct PyOptimizationResult {
    #[pyo3(get)]
    pub best_position: Vec<f64>,
    #[pyo3(get)]
    pub best_fitness: f64,
    #[pyo3(get)]
    pub iterations_run: usize,
    #[pyo3(get)]
    pub termination_reason: String,
    #[pyo3(get)]
    pub history: Vec<f64>,
    #[pyo3(get)]
    pub evaluations: usize,
}

#[pymethods]
impl PyOptimizationResult {
    fn __repr__(&self) -> String {
        format!(
            "OptimizationResult(best_fitness={:.6e}, iterations_run={}, termination_reason='{}')",
            self.best_fitness, self.iterations_run, self.termination_reason
        )
    }
}

impl From<OptimizationResult> for PyOptimizationResult {
    fn from(result: OptimizationResult) -> Self {
        Self {
            best_position: result.best_position,
            best_fitness: result.best_fitness,
            iterations_run: result.iterations_run,
            termination_reason: result.termination_reason.to_string(),
            history: result.history,
            evaluations: result.evaluations,
        }
    }
}

/// Maximise `objective` over `bounds` with a particle swarm.
///
/// Evaluation stays on the calling thread; the objective holds the GIL.
#[pyfunction]
#[pyo3(signature = (objective, bounds, population_size=None, max_iterations=100, velocity_scale=0.2, patience=None, tolerance=0.0, seed=None, random_walk=false, verbose=false))]
#[allow(clippy::too_many_arguments)]
fn optimize(
    objective: PyObject,
    bounds: Vec<(f64, f64)>,
    population_size: Option<usize>,
    max_iterations: usize,
    velocity_scale: f64,
    patience: Option<usize>,
    tolerance: f64,
    seed: Option<u64>,
    random_walk: bool,
    verbose: bool,
) -> PyResult<PyOptimizationResult> {
    let mut config = RunConfig::for_bounds(bounds)
        .with_max_iterations(max_iterations)
        .with_velocity_scale(velocity_scale)
        .with_tolerance(tolerance);
    if let Some(size) = population_size {
        config = config.with_population_size(size);
    }
    if let Some(patience) = patience {
        config = config.with_patience(patience);
    }
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    if random_walk {
        config = config.with_update_rule(UpdateRule::RandomWalk);
    }

    let mut pso = ParticleOptimizer::new(config).map_err(to_py_err)?;
    let mut observer = InterruptObserver {
        logger: verbose.then(|| TracingObserver::new("python")),
        interrupted: false,
    };

    let result = pso
        .run(&PyObjective(objective), &mut observer)
        .map_err(to_py_err)?;
    Ok(result.into())
}

fn to_py_err(err: SwarmError) -> PyErr {
    match err {
        SwarmError::ObjectiveEvaluation { .. } => PyRuntimeError::new_err(err.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

#[pymodule]
fn pitswarm(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyOptimizationResult>()?;
    m.add_function(wrap_pyfunction!(optimize, m)?)?;
    Ok(())
}
