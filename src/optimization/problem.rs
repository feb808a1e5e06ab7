use argmin::core::CostFunction;

/// Black-box fitness function maximised by the solvers.
///
/// Evaluation may be expensive and may run on worker threads, hence the
/// `Send + Sync` bound. Returning `Err` or a non-finite value aborts the run.
///
/// Plain closures implement this trait directly:
///
/// ```
/// use pitswarm::Objective;
///
/// let target = |x: &[f64]| -> f64 { -(x[0] - 0.5).abs() };
/// assert_eq!(target.evaluate(&[0.5]), Ok(0.0));
/// ```
pub trait Objective: Send + Sync {
    fn evaluate(&self, position: &[f64]) -> Result<f64, String>;
}

impl<F> Objective for F
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn evaluate(&self, position: &[f64]) -> Result<f64, String> {
        Ok(self(position))
    }
}

/// Objective backed by a closure that can fail.
pub struct Fallible<F>(pub F);

impl<F> Objective for Fallible<F>
where
    F: Fn(&[f64]) -> Result<f64, String> + Send + Sync,
{
    fn evaluate(&self, position: &[f64]) -> Result<f64, String> {
        (self.0)(position)
    }
}

/// Adapts an argmin cost function (minimised) into a fitness (maximised) by
/// negating the cost.
pub struct ArgminCost<P>(pub P);

impl<P> Objective for ArgminCost<P>
where
    P: CostFunction<Param = Vec<f64>, Output = f64> + Send + Sync,
{
    fn evaluate(&self, position: &[f64]) -> Result<f64, String> {
        let params = position.to_vec();
        self.0
            .cost(&params)
            .map(|cost| -cost)
            .map_err(|e| e.to_string())
    }
}
