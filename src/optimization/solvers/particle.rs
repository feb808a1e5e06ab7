use super::evaluation::Evaluator;
use super::traits::Solver;
use crate::model::{
    validate_config, IterationStatus, OptimizationResult, Result, RunConfig, SwarmError,
    TerminationReason, UpdateRule,
};
use crate::optimization::callback::{CancellationToken, ProgressObserver};
use crate::optimization::problem::Objective;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

/// One candidate solution and its memory of the best place it has been.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    position: Vec<f64>,
    velocity: Vec<f64>,
    fitness: f64,
    best_position: Vec<f64>,
    best_fitness: f64,
}

impl Particle {
    fn new(position: Vec<f64>, velocity: Vec<f64>, fitness: f64) -> Self {
        Self {
            best_position: position.clone(),
            best_fitness: fitness,
            position,
            velocity,
            fitness,
        }
    }

    pub fn position(&self) -> &[f64] {
        &self.position
    }

    pub fn velocity(&self) -> &[f64] {
        &self.velocity
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn best_position(&self) -> &[f64] {
        &self.best_position
    }

    pub fn best_fitness(&self) -> f64 {
        self.best_fitness
    }
}

/// Population state for one run.
#[derive(Debug, Clone)]
pub struct Swarm {
    particles: Vec<Particle>,
    best_position: Vec<f64>,
    best_fitness: f64,
    iteration: usize,
    evaluations: usize,
}

impl Swarm {
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn best_position(&self) -> &[f64] {
        &self.best_position
    }

    pub fn best_fitness(&self) -> f64 {
        self.best_fitness
    }

    /// Completed iterations; 0 right after initialization.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }
}

/// Index of the highest fitness; the lowest index wins ties.
fn best_index(fitness: &[f64]) -> usize {
    let mut best = 0;
    for (i, &f) in fitness.iter().enumerate().skip(1) {
        if f > fitness[best] {
            best = i;
        }
    }
    best
}

/// Particle Swarm Optimization over a bounded box, maximising fitness
pub struct ParticleOptimizer {
    config: RunConfig,
    ranges: Vec<f64>,
    rng: StdRng,
    evaluator: Evaluator,
    cancellation: Option<CancellationToken>,
}

impl ParticleOptimizer {
    /// Validates the configuration and prepares the RNG and evaluator.
    pub fn new(config: RunConfig) -> Result<Self> {
        validate_config(&config)?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let evaluator = Evaluator::new(config.evaluation)?;

        Ok(Self {
            ranges: config.ranges(),
            config,
            rng,
            evaluator,
            cancellation: None,
        })
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Sample the initial population and score it.
    ///
    /// The global best is the fittest initial particle, not a fixed index.
    pub fn initialize(&mut self, objective: &dyn Objective) -> Result<Swarm> {
        let n = self.config.dimensions;
        let mut positions = Vec::with_capacity(self.config.population_size);
        let mut velocities = Vec::with_capacity(self.config.population_size);

        for _ in 0..self.config.population_size {
            let mut position = vec![0.0; n];
            let mut velocity = vec![0.0; n];
            for i in 0..n {
                let (min, max) = self.config.bounds[i];
                position[i] = self.rng.gen_range(min..=max);

                let half = 0.5 * self.config.velocity_scale * self.ranges[i];
                velocity[i] = self.rng.gen_range(-half..=half);
            }
            positions.push(position);
            velocities.push(velocity);
        }

        let fitness = self.evaluator.evaluate(objective, 0, &positions)?;
        let best = best_index(&fitness);

        let particles: Vec<Particle> = positions
            .into_iter()
            .zip(velocities)
            .zip(fitness.iter().copied())
            .map(|((position, velocity), f)| Particle::new(position, velocity, f))
            .collect();

        tracing::debug!(
            population = particles.len(),
            dimensions = n,
            workers = self.evaluator.workers(),
            rule = ?self.config.update_rule,
            best_fitness = fitness[best],
            "swarm initialized"
        );

        Ok(Swarm {
            best_position: particles[best].position.clone(),
            best_fitness: fitness[best],
            evaluations: particles.len(),
            particles,
            iteration: 0,
        })
    }

    /// Advance the swarm by one iteration.
    ///
    /// Moves every particle against the previous global best, scores the
    /// whole population, then updates personal and global bests on strict
    /// improvement only. Returns how much the global best improved (0 when it
    /// did not change). On error the swarm is left as it was.
    pub fn step(&mut self, swarm: &mut Swarm, objective: &dyn Objective) -> Result<f64> {
        self.check_shape(swarm)?;

        let iteration = swarm.iteration + 1;
        let global_best = swarm.best_position.clone();

        let mut velocities = Vec::with_capacity(swarm.particles.len());
        let mut positions = Vec::with_capacity(swarm.particles.len());
        for particle in &swarm.particles {
            let velocity = self.next_velocity(particle, &global_best);
            let position = self.next_position(&particle.position, &velocity);
            velocities.push(velocity);
            positions.push(position);
        }

        let fitness = self.evaluator.evaluate(objective, iteration, &positions)?;

        for (((particle, position), velocity), &f) in swarm
            .particles
            .iter_mut()
            .zip(positions)
            .zip(velocities)
            .zip(&fitness)
        {
            particle.position = position;
            particle.velocity = velocity;
            particle.fitness = f;

            if f > particle.best_fitness {
                particle.best_fitness = f;
                particle.best_position.copy_from_slice(&particle.position);
            }
        }

        let candidate = best_index(&fitness);
        let previous = swarm.best_fitness;
        if fitness[candidate] > previous {
            swarm.best_fitness = fitness[candidate];
            swarm
                .best_position
                .copy_from_slice(&swarm.particles[candidate].position);
        }

        swarm.iteration = iteration;
        swarm.evaluations += fitness.len();

        Ok(swarm.best_fitness - previous)
    }

    /// Initialize a swarm and iterate until a termination criterion is met.
    pub fn run(
        &mut self,
        objective: &dyn Objective,
        observer: &mut dyn ProgressObserver,
    ) -> Result<OptimizationResult> {
        let started = Instant::now();
        let mut swarm = self.initialize(objective)?;
        let mut history = Vec::with_capacity(self.config.max_iterations.min(1024));
        let mut stagnation = 0;

        let reason = loop {
            if self.cancel_requested(observer, started) {
                break TerminationReason::Cancelled;
            }

            let improvement = match self.step(&mut swarm, objective) {
                Ok(improvement) => improvement,
                Err(e) => {
                    tracing::warn!(iteration = swarm.iteration + 1, error = %e, "run aborted");
                    return Err(e);
                }
            };

            history.push(swarm.best_fitness);
            observer.on_iteration(&IterationStatus {
                iteration: swarm.iteration,
                best_fitness: swarm.best_fitness,
            });

            if improvement > self.config.tolerance {
                stagnation = 0;
            } else {
                stagnation += 1;
            }

            if self.config.patience.is_some_and(|p| stagnation >= p) {
                break TerminationReason::Converged;
            }
            if swarm.iteration >= self.config.max_iterations {
                break TerminationReason::MaxIterationsReached;
            }
        };

        tracing::debug!(
            %reason,
            iterations = swarm.iteration,
            evaluations = swarm.evaluations,
            best_fitness = swarm.best_fitness,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "swarm run finished"
        );

        let result = OptimizationResult {
            best_position: swarm.best_position,
            best_fitness: swarm.best_fitness,
            iterations_run: swarm.iteration,
            termination_reason: reason,
            history,
            evaluations: swarm.evaluations,
        };
        observer.on_finish(&result);
        Ok(result)
    }

    fn cancel_requested(&self, observer: &dyn ProgressObserver, started: Instant) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
            || observer.should_stop()
            || self
                .config
                .time_limit
                .is_some_and(|limit| started.elapsed() >= limit)
    }

    fn check_shape(&self, swarm: &Swarm) -> Result<()> {
        let dims_match = swarm
            .particles
            .iter()
            .all(|p| p.position.len() == self.config.dimensions);
        if swarm.particles.len() != self.config.population_size || !dims_match {
            return Err(SwarmError::invalid(format!(
                "swarm shape does not match configuration ({} particles x {} dimensions)",
                self.config.population_size, self.config.dimensions
            )));
        }
        Ok(())
    }

    fn next_velocity(&mut self, particle: &Particle, global_best: &[f64]) -> Vec<f64> {
        let scale = self.config.velocity_scale;
        let mut velocity = Vec::with_capacity(particle.velocity.len());

        for i in 0..particle.velocity.len() {
            let v_max = self.ranges[i] * scale;
            let v = match self.config.update_rule {
                UpdateRule::Canonical => {
                    let r1 = self.rng.gen_range(0.0..1.0);
                    let r2 = self.rng.gen_range(0.0..1.0);
                    self.config.inertia * particle.velocity[i]
                        + self.config.cognitive * r1 * (particle.best_position[i] - particle.position[i])
                        + self.config.social * r2 * (global_best[i] - particle.position[i])
                }
                UpdateRule::RandomWalk => v_max * (self.rng.gen_range(0.0..1.0) - 0.5),
            };
            velocity.push(v.clamp(-v_max, v_max));
        }

        velocity
    }

    #[inline]
    fn next_position(&self, position: &[f64], velocity: &[f64]) -> Vec<f64> {
        position
            .iter()
            .zip(velocity)
            .zip(&self.config.bounds)
            .map(|((x, v), &(min, max))| (x + v).clamp(min, max))
            .collect()
    }
}

impl Solver for ParticleOptimizer {
    fn name(&self) -> &str {
        "PSO"
    }

    fn solve(
        &mut self,
        objective: &dyn Objective,
        observer: &mut dyn ProgressObserver,
    ) -> Result<OptimizationResult> {
        self.run(objective, observer)
    }
}
