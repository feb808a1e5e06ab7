//! Property-based tests for the swarm optimizer
//!
//! These check the run invariants for arbitrary bounds, swarm shapes and
//! objectives: positions and velocities stay within their limits, and
//! neither personal nor global bests ever regress.

use pitswarm::*;
use proptest::prelude::*;

/// Smooth but multi-modal objective built from random coefficients.
fn wavy(weights: Vec<f64>, freqs: Vec<f64>) -> impl Fn(&[f64]) -> f64 + Send + Sync {
    move |x: &[f64]| -> f64 {
        x.iter()
            .enumerate()
            .map(|(i, xi)| {
                let w = weights[i % weights.len()];
                let f = freqs[i % freqs.len()];
                w * (f * xi).sin() - 0.01 * xi * xi
            })
            .sum()
    }
}

fn bounds_strategy() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((-100.0_f64..100.0, 0.1_f64..50.0), 1..5)
        .prop_map(|raw| raw.into_iter().map(|(lo, width)| (lo, lo + width)).collect())
}

fn rule_strategy() -> impl Strategy<Value = UpdateRule> {
    prop_oneof![Just(UpdateRule::Canonical), Just(UpdateRule::RandomWalk)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn positions_stay_within_bounds(
        bounds in bounds_strategy(),
        population in 1_usize..16,
        iterations in 1_usize..25,
        scale in 0.01_f64..1.5,
        rule in rule_strategy(),
        weights in prop::collection::vec(-5.0_f64..5.0, 1..4),
        freqs in prop::collection::vec(0.1_f64..3.0, 1..4),
        seed in any::<u64>(),
    ) {
        let config = RunConfig::for_bounds(bounds.clone())
            .with_population_size(population)
            .with_max_iterations(iterations)
            .with_velocity_scale(scale)
            .with_update_rule(rule)
            .with_seed(seed);
        let objective = wavy(weights, freqs);
        let mut pso = ParticleOptimizer::new(config).unwrap();
        let mut swarm = pso.initialize(&objective).unwrap();

        for _ in 0..iterations {
            pso.step(&mut swarm, &objective).unwrap();
            for particle in swarm.particles() {
                for (x, &(lo, hi)) in particle.position().iter().zip(&bounds) {
                    prop_assert!(*x >= lo && *x <= hi, "{} escaped [{}, {}]", x, lo, hi);
                }
                for (v, &(lo, hi)) in particle.velocity().iter().zip(&bounds) {
                    let v_max = scale * (hi - lo);
                    prop_assert!(v.abs() <= v_max, "|{}| exceeds velocity limit {}", v, v_max);
                }
            }
        }
    }

    #[test]
    fn bests_never_regress(
        bounds in bounds_strategy(),
        population in 1_usize..16,
        iterations in 1_usize..25,
        rule in rule_strategy(),
        weights in prop::collection::vec(-5.0_f64..5.0, 1..4),
        freqs in prop::collection::vec(0.1_f64..3.0, 1..4),
        seed in any::<u64>(),
    ) {
        let config = RunConfig::for_bounds(bounds)
            .with_population_size(population)
            .with_max_iterations(iterations)
            .with_update_rule(rule)
            .with_seed(seed);
        let objective = wavy(weights, freqs);
        let mut pso = ParticleOptimizer::new(config).unwrap();
        let mut swarm = pso.initialize(&objective).unwrap();

        for _ in 0..iterations {
            let global_before = swarm.best_fitness();
            let personal_before: Vec<f64> =
                swarm.particles().iter().map(Particle::best_fitness).collect();

            let improvement = pso.step(&mut swarm, &objective).unwrap();

            prop_assert!(improvement >= 0.0);
            prop_assert!(swarm.best_fitness() >= global_before);
            for (p, before) in swarm.particles().iter().zip(&personal_before) {
                prop_assert!(p.best_fitness() >= *before);
                prop_assert!(p.best_fitness() >= p.fitness());
            }

            let top_personal = swarm
                .particles()
                .iter()
                .map(Particle::best_fitness)
                .fold(f64::NEG_INFINITY, f64::max);
            prop_assert_eq!(swarm.best_fitness(), top_personal);
        }
    }

    #[test]
    fn run_history_is_monotone(
        bounds in bounds_strategy(),
        population in 1_usize..12,
        iterations in 1_usize..40,
        patience in prop::option::of(1_usize..8),
        weights in prop::collection::vec(-5.0_f64..5.0, 1..4),
        freqs in prop::collection::vec(0.1_f64..3.0, 1..4),
        seed in any::<u64>(),
    ) {
        let mut config = RunConfig::for_bounds(bounds)
            .with_population_size(population)
            .with_max_iterations(iterations)
            .with_seed(seed);
        config.patience = patience;

        let result = optimize(config, &wavy(weights, freqs), &mut NoopObserver).unwrap();

        prop_assert_eq!(result.history.len(), result.iterations_run);
        prop_assert!(result.iterations_run <= iterations);
        prop_assert!(result.history.windows(2).all(|w| w[1] >= w[0]));
        prop_assert_eq!(result.history.last().copied(), Some(result.best_fitness));
        prop_assert_eq!(result.evaluations, population * (result.iterations_run + 1));
        if result.termination_reason == TerminationReason::MaxIterationsReached {
            prop_assert_eq!(result.iterations_run, iterations);
        }
    }
}
