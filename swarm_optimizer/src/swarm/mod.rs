use argmin::core::observers::ObserverMode;
use nalgebra::DVector;
use tracing::{debug, info};

use crate::{prelude::*, swarm::observer::should_observe};

pub mod bounds;
pub mod config;
pub mod inertia;
pub mod objective;
pub mod observer;
pub mod particle;
pub mod report;
pub mod state;
pub mod step;

#[cfg(test)]
mod tests;

/// Particle swarm optimizer that maximizes a black-box objective.
///
/// Each call to [`SwarmOptimizer::optimize`] builds a fresh swarm from the configuration, runs it
/// for `config.iterations` iterations and discards it. Nothing carries over between calls except
/// the configuration and attached observers.
pub struct SwarmOptimizer {
    config: SwarmConfig,
    observers: Vec<(Box<dyn SwarmObserver>, ObserverMode)>,
}

impl SwarmOptimizer {
    pub fn new(config: SwarmConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    /// Attaches an observer. `mode` decides which iterations it sees (`Every(n)` counts from
    /// iteration 0, `NewBest` fires on iterations that improved the global best).
    pub fn add_observer<O: SwarmObserver + 'static>(mut self, observer: O, mode: ObserverMode) -> Self {
        self.observers.push((Box::new(observer), mode));
        self
    }

    /// Runs the swarm on the calling thread under `config.update_policy`.
    ///
    /// `initial_params` fixes the dimensionality and seeds the global best position. Any
    /// objective error aborts the run and is returned as is, with no partial result.
    pub fn optimize<O: Objective>(
        &mut self,
        objective: &O,
        initial_params: &[f64],
    ) -> Result<OptimizationReport, SwarmError> {
        let policy = self.config.update_policy;
        self.run(objective, initial_params, |state, rngs, params, iteration| {
            match policy {
                UpdatePolicy::Sequential => {
                    step_sequential(state, rngs, objective, params, iteration)
                }
                UpdatePolicy::Generational => {
                    step_generational(state, rngs, objective, params, iteration)
                }
            }
        })
    }

    /// Runs the swarm with each generation evaluated on the rayon thread pool.
    ///
    /// Always uses [`UpdatePolicy::Generational`], whatever the configuration says, and returns
    /// the same report as a serial generational run with the same seed.
    pub fn optimize_par<O: Objective + Sync>(
        &mut self,
        objective: &O,
        initial_params: &[f64],
    ) -> Result<OptimizationReport, SwarmError> {
        self.run(objective, initial_params, |state, rngs, params, iteration| {
            step_parallel(state, rngs, objective, params, iteration)
        })
    }

    fn run<O, F>(
        &mut self,
        objective: &O,
        initial_params: &[f64],
        mut step: F,
    ) -> Result<OptimizationReport, SwarmError>
    where
        O: Objective,
        F: FnMut(&mut SwarmState, &mut RngStreams, &StepParams<'_>, usize) -> Result<bool, SwarmError>,
    {
        let config = self.config.clone();
        config.validate(initial_params.len())?;

        info!(
            objective = %tynm::type_name::<O>(),
            population = config.population,
            iterations = config.iterations,
            dim = initial_params.len(),
            "starting particle swarm"
        );

        let schedule =
            InertiaSchedule::linear(config.inertia_start, config.inertia_end, config.iterations);
        let mut rngs = RngStreams::new(config.seed, config.population);
        let mut state = SwarmState::spawn(
            &config,
            DVector::from_column_slice(initial_params),
            &mut rngs,
        );

        if config.best_seed == BestSeed::Evaluate {
            state.evaluate_seeds(objective)?;
        }
        self.notify_init(&state)?;

        for (iteration, &inertia) in schedule.as_slice().iter().enumerate() {
            let params = StepParams::new(&config, inertia);
            let improved = step(&mut state, &mut rngs, &params, iteration)?;

            debug!(
                iteration,
                inertia = params.inertia,
                best_value = state.global_best.value,
                improved,
                "swarm iteration"
            );

            self.notify_iter(&IterationSnapshot {
                iteration,
                inertia: params.inertia,
                improved,
                state: &state,
            })?;
        }

        let report = OptimizationReport::from_state(state, config.iterations);
        report.log_summary();
        Ok(report)
    }

    fn notify_init(&mut self, state: &SwarmState) -> Result<(), SwarmError> {
        for (observer, mode) in self.observers.iter_mut() {
            if !matches!(mode, ObserverMode::Never) {
                observer.observe_init(state).map_err(SwarmError::Observer)?;
            }
        }
        Ok(())
    }

    fn notify_iter(&mut self, snapshot: &IterationSnapshot<'_>) -> Result<(), SwarmError> {
        for (observer, mode) in self.observers.iter_mut() {
            if should_observe(mode, snapshot) {
                observer.observe_iter(snapshot).map_err(SwarmError::Observer)?;
            }
        }
        Ok(())
    }
}
