use nalgebra::DVector;
use rand::{Rng, rngs::StdRng};
use rand_core::SeedableRng;

use crate::{prelude::*, swarm::objective::evaluate};

/// Independent random streams, one per particle, derived from a single master seed.
///
/// Particle `i` always draws from stream `i`, first for its spawn position and velocity and then
/// for the two coefficients of every step. Draws therefore do not depend on the order in which
/// particles are processed, which keeps parallel generations reproducible.
pub struct RngStreams {
    streams: Vec<StdRng>,
}

impl RngStreams {
    pub fn new(seed: Option<u64>, population: usize) -> Self {
        let mut master = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let streams = (0..population)
            .map(|_| StdRng::from_rng(&mut master))
            .collect();
        Self { streams }
    }

    pub(crate) fn streams_mut(&mut self) -> &mut [StdRng] {
        &mut self.streams
    }
}

/// All mutable state of one optimization run. Owned by the run loop and handed to each step.
#[derive(Debug, Clone, PartialEq)]
pub struct SwarmState {
    pub particles: Vec<Particle>,
    pub global_best: BestRecord,
    /// Objective evaluations performed so far in this run.
    pub evaluations: usize,
}

impl SwarmState {
    /// Spawns `config.population` particles around `initial_params`.
    ///
    /// Positions are drawn from `[0, 1)` per dimension, or placed inside `config.bounds`
    /// according to `config.spawn_policy`. Velocities are drawn from
    /// `[-limit / 2, limit / 2)` when a velocity limit is set and `[-0.5, 0.5)` otherwise.
    /// The global best starts at `initial_params`; nothing is evaluated here.
    pub fn spawn(config: &SwarmConfig, initial_params: DVector<f64>, rngs: &mut RngStreams) -> Self {
        let dim = initial_params.len();
        let seed_value = match config.best_seed {
            BestSeed::Zero => 0.0,
            BestSeed::Unevaluated | BestSeed::Evaluate => f64::NEG_INFINITY,
        };

        let particles = rngs
            .streams_mut()
            .iter_mut()
            .map(|rng| {
                let position = DVector::from_iterator(
                    dim,
                    (0..dim).map(|d| {
                        let u: f64 = rng.random();
                        match &config.bounds {
                            Some(bounds) => config.spawn_policy.place(bounds, d, u),
                            None => u,
                        }
                    }),
                );
                let velocity = DVector::from_iterator(
                    dim,
                    (0..dim).map(|_| {
                        let u: f64 = rng.random();
                        match config.velocity_limit {
                            Some(v_max) => u * v_max - v_max / 2.0,
                            None => u - 0.5,
                        }
                    }),
                );
                Particle::new(position, velocity, seed_value)
            })
            .collect();

        SwarmState {
            particles,
            global_best: BestRecord::new(initial_params, seed_value),
            evaluations: 0,
        }
    }

    /// Replaces the placeholder best values with real evaluations: the global best from the
    /// caller's initial vector, each personal best from the particle's spawn position. Spawn
    /// positions that beat the initial vector take over the global best, lowest index first.
    pub fn evaluate_seeds<O: Objective>(&mut self, objective: &O) -> Result<(), SwarmError> {
        let initial_value = evaluate(
            objective,
            &self.global_best.position,
            EvalLocation::InitialParams,
        )?;
        self.evaluations += 1;
        self.global_best.value = initial_value;

        for (i, particle) in self.particles.iter_mut().enumerate() {
            let value = evaluate(
                objective,
                &particle.position,
                EvalLocation::Spawn { particle: i },
            )?;
            self.evaluations += 1;
            particle.best = BestRecord::new(particle.position.clone(), value);
            self.global_best.offer(&particle.position, value);
        }
        Ok(())
    }

    pub fn population(&self) -> usize {
        self.particles.len()
    }

    pub fn dim(&self) -> usize {
        self.global_best.position.len()
    }
}
