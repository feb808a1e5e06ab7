use super::error::{Result, SwarmError};
use super::types::{Evaluation, RunConfig};

/// Check per-dimension bounds
///
/// Every bound must be finite with `lower < upper` and a finite width, and
/// there must be exactly one bound per dimension.
pub fn validate_bounds(bounds: &[(f64, f64)], dimensions: usize) -> Result<()> {
    if bounds.len() != dimensions {
        return Err(SwarmError::invalid(format!(
            "expected {} bounds, got {}",
            dimensions,
            bounds.len()
        )));
    }

    for (i, &(min, max)) in bounds.iter().enumerate() {
        if !min.is_finite() || !max.is_finite() {
            return Err(SwarmError::invalid(format!(
                "bound {} is not finite: [{}, {}]",
                i, min, max
            )));
        }
        if min >= max {
            return Err(SwarmError::invalid(format!(
                "bound {} has lower >= upper: [{}, {}]",
                i, min, max
            )));
        }
        if !(max - min).is_finite() {
            return Err(SwarmError::invalid(format!(
                "bound {} is too wide: [{}, {}]",
                i, min, max
            )));
        }
    }

    Ok(())
}

/// Validate a run configuration
///
/// Runs before any particle is created, so a rejected configuration never
/// triggers an objective evaluation.
pub fn validate_config(config: &RunConfig) -> Result<()> {
    if config.population_size < 1 {
        return Err(SwarmError::invalid("population size must be at least 1"));
    }
    if config.dimensions < 1 {
        return Err(SwarmError::invalid("dimensionality must be at least 1"));
    }
    if config.max_iterations < 1 {
        return Err(SwarmError::invalid("max iterations must be at least 1"));
    }

    validate_bounds(&config.bounds, config.dimensions)?;

    if !config.velocity_scale.is_finite() || config.velocity_scale <= 0.0 {
        return Err(SwarmError::invalid(format!(
            "velocity scale must be positive, got {}",
            config.velocity_scale
        )));
    }
    if let Some(i) = config
        .ranges()
        .iter()
        .position(|range| !(config.velocity_scale * range).is_finite())
    {
        return Err(SwarmError::invalid(format!(
            "velocity limit overflows on dimension {} (scale {})",
            i, config.velocity_scale
        )));
    }
    if !config.tolerance.is_finite() || config.tolerance < 0.0 {
        return Err(SwarmError::invalid(format!(
            "tolerance must be non-negative, got {}",
            config.tolerance
        )));
    }
    if config.patience == Some(0) {
        return Err(SwarmError::invalid("patience must be at least 1 when set"));
    }

    for (name, value) in [
        ("inertia", config.inertia),
        ("cognitive", config.cognitive),
        ("social", config.social),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(SwarmError::invalid(format!(
                "{} coefficient must be finite and non-negative, got {}",
                name, value
            )));
        }
    }

    if let Evaluation::Parallel { workers: Some(0) } = config.evaluation {
        return Err(SwarmError::invalid("parallel evaluation needs at least 1 worker"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RunConfig {
        RunConfig::new(2, 0.0, 1.0)
    }

    fn rejected(config: RunConfig) -> String {
        match validate_config(&config) {
            Err(SwarmError::InvalidConfiguration(msg)) => msg,
            other => panic!("expected InvalidConfiguration, got {:?}", other),
        }
    }

    #[test]
    fn accepts_defaults() {
        assert!(validate_config(&valid()).is_ok());
    }

    #[test]
    fn rejects_empty_population() {
        assert!(rejected(valid().with_population_size(0)).contains("population"));
    }

    #[test]
    fn rejects_zero_dimensions() {
        assert!(rejected(RunConfig::new(0, 0.0, 1.0)).contains("dimensionality"));
    }

    #[test]
    fn rejects_zero_iterations() {
        assert!(rejected(valid().with_max_iterations(0)).contains("iterations"));
    }

    #[test]
    fn rejects_inverted_or_degenerate_bounds() {
        let inverted = valid().with_bounds(vec![(0.0, 1.0), (2.0, 1.0)]);
        assert!(rejected(inverted).contains("bound 1"));

        let degenerate = valid().with_bounds(vec![(0.5, 0.5)]);
        assert!(rejected(degenerate).contains("lower >= upper"));
    }

    #[test]
    fn rejects_bound_count_mismatch() {
        let mut config = valid();
        config.dimensions = 3;
        assert!(rejected(config).contains("expected 3 bounds"));
    }

    #[test]
    fn rejects_non_finite_bounds() {
        let config = valid().with_bounds(vec![(f64::NEG_INFINITY, 1.0)]);
        assert!(rejected(config).contains("not finite"));
    }

    #[test]
    fn rejects_bounds_whose_width_overflows() {
        let config = RunConfig::new(1, -1e308, 1e308);
        assert!(rejected(config).contains("too wide"));
    }

    #[test]
    fn rejects_velocity_limit_overflow() {
        let config = RunConfig::new(1, 0.0, 10.0).with_velocity_scale(1e308);
        assert!(rejected(config).contains("velocity limit"));

        // wide but representable bounds still pass with a sane scale
        assert!(validate_config(&RunConfig::new(1, -1e300, 1e300)).is_ok());
    }

    #[test]
    fn rejects_bad_knobs() {
        rejected(valid().with_velocity_scale(0.0));
        rejected(valid().with_velocity_scale(f64::NAN));
        rejected(valid().with_tolerance(-1e-3));
        rejected(valid().with_patience(0));
        rejected(valid().with_pso_params(-0.1, 1.5, 1.5));
        rejected(valid().with_evaluation(Evaluation::Parallel { workers: Some(0) }));
    }
}
