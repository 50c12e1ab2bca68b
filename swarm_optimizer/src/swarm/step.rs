use nalgebra::DVector;
use rand::{Rng, rngs::StdRng};
use rayon::prelude::*;

use crate::{prelude::*, swarm::objective::evaluate};

/// Everything a single iteration needs besides the swarm itself.
#[derive(Debug, Clone, Copy)]
pub struct StepParams<'a> {
    pub inertia: f64,
    pub cognitive_weight: f64,
    pub social_weight: f64,
    pub bounds: Option<&'a Bounds>,
    pub velocity_limit: Option<f64>,
    pub boundary_policy: BoundaryPolicy,
}

impl<'a> StepParams<'a> {
    pub fn new(config: &'a SwarmConfig, inertia: f64) -> Self {
        Self {
            inertia,
            cognitive_weight: config.cognitive_weight,
            social_weight: config.social_weight,
            bounds: config.bounds.as_ref(),
            velocity_limit: config.velocity_limit,
            boundary_policy: config.boundary_policy,
        }
    }
}

/// Moves one particle: velocity update toward its own best and `guide`, velocity cap, position
/// update, then boundary handling.
fn move_particle(
    particle: &mut Particle,
    rng: &mut StdRng,
    guide: &DVector<f64>,
    params: &StepParams<'_>,
    location: EvalLocation,
) -> Result<(), SwarmError> {
    let r1 = 2.0 * rng.random::<f64>();
    let r2 = 2.0 * rng.random::<f64>();

    let cognitive = (&particle.best.position - &particle.position) * (params.cognitive_weight * r1);
    let social = (guide - &particle.position) * (params.social_weight * r2);
    particle.velocity = &particle.velocity * params.inertia + cognitive + social;

    if !particle.velocity.iter().all(|v| v.is_finite()) {
        return Err(SwarmError::NonFinite {
            quantity: NonFiniteQuantity::Velocity,
            location,
        });
    }

    if let Some(v_max) = params.velocity_limit {
        // norm taken relative to the largest component so huge finite velocities can't overflow it
        let largest = particle.velocity.amax();
        if largest > 0.0 {
            let relative_norm = (&particle.velocity / largest).norm();
            if relative_norm > v_max / largest {
                particle.velocity.unscale_mut(largest);
                particle.velocity.unscale_mut(relative_norm);
                particle.velocity.scale_mut(v_max);
            }
        }
    }

    particle.position += &particle.velocity;

    if !particle.position.iter().all(|x| x.is_finite()) {
        return Err(SwarmError::NonFinite {
            quantity: NonFiniteQuantity::Position,
            location,
        });
    }

    if let Some(bounds) = params.bounds {
        bounds.enforce(
            &mut particle.position,
            &mut particle.velocity,
            params.boundary_policy,
        );
    }
    Ok(())
}

/// Moves a particle, evaluates it at its new position and updates its personal best.
///
/// Returns the objective value so the caller can decide about the global best.
fn advance<O: Objective + ?Sized>(
    particle: &mut Particle,
    rng: &mut StdRng,
    guide: &DVector<f64>,
    objective: &O,
    params: &StepParams<'_>,
    location: EvalLocation,
) -> Result<f64, SwarmError> {
    move_particle(particle, rng, guide, params, location)?;
    let value = evaluate(objective, &particle.position, location)?;
    particle.best.offer(&particle.position, value);
    Ok(value)
}

/// One iteration where each particle sees global-best updates made by the particles before it.
///
/// Returns whether the global best improved.
pub fn step_sequential<O: Objective + ?Sized>(
    state: &mut SwarmState,
    rngs: &mut RngStreams,
    objective: &O,
    params: &StepParams<'_>,
    iteration: usize,
) -> Result<bool, SwarmError> {
    let SwarmState {
        particles,
        global_best,
        evaluations,
    } = state;

    let mut improved = false;
    for (i, (particle, rng)) in particles
        .iter_mut()
        .zip(rngs.streams_mut().iter_mut())
        .enumerate()
    {
        let location = EvalLocation::Step {
            iteration,
            particle: i,
        };
        let value = advance(
            particle,
            rng,
            &global_best.position,
            objective,
            params,
            location,
        )?;
        *evaluations += 1;
        improved |= global_best.offer(&particle.position, value);
    }
    Ok(improved)
}

/// One iteration against a snapshot of the global best taken at its start.
pub fn step_generational<O: Objective + ?Sized>(
    state: &mut SwarmState,
    rngs: &mut RngStreams,
    objective: &O,
    params: &StepParams<'_>,
    iteration: usize,
) -> Result<bool, SwarmError> {
    let guide = state.global_best.position.clone();
    let values = state
        .particles
        .iter_mut()
        .zip(rngs.streams_mut().iter_mut())
        .enumerate()
        .map(|(i, (particle, rng))| {
            let location = EvalLocation::Step {
                iteration,
                particle: i,
            };
            advance(particle, rng, &guide, objective, params, location)
        })
        .collect::<Result<Vec<f64>, SwarmError>>()?;

    Ok(reduce_generation(state, values))
}

/// Same as [`step_generational`], with particles evaluated on the rayon thread pool.
///
/// Produces bit-identical state to the serial version for the same streams.
pub fn step_parallel<O: Objective + Sync + ?Sized>(
    state: &mut SwarmState,
    rngs: &mut RngStreams,
    objective: &O,
    params: &StepParams<'_>,
    iteration: usize,
) -> Result<bool, SwarmError> {
    let guide = state.global_best.position.clone();
    let results: Vec<Result<f64, SwarmError>> = state
        .particles
        .par_iter_mut()
        .zip(rngs.streams_mut().par_iter_mut())
        .enumerate()
        .map(|(i, (particle, rng))| {
            let location = EvalLocation::Step {
                iteration,
                particle: i,
            };
            advance(particle, rng, &guide, objective, params, location)
        })
        .collect();

    // first failure in particle order, independent of thread scheduling
    let values = results.into_iter().collect::<Result<Vec<f64>, SwarmError>>()?;

    Ok(reduce_generation(state, values))
}

/// Folds a generation's values into the global best in particle order.
fn reduce_generation(state: &mut SwarmState, values: Vec<f64>) -> bool {
    state.evaluations += values.len();

    let mut improved = false;
    for (particle, value) in state.particles.iter().zip(values) {
        improved |= state.global_best.offer(&particle.position, value);
    }
    improved
}
