use nalgebra::DVector;

use crate::prelude::*;

/// Outcome of a swarm run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationReport {
    /// Best parameter vector found (argmax).
    pub best_position: DVector<f64>,
    /// Objective value at `best_position`.
    pub best_value: f64,
    /// Objective evaluations performed, including any seed evaluations.
    pub evaluations: usize,
    pub iterations: usize,
    pub population: usize,
}

impl OptimizationReport {
    pub(crate) fn from_state(state: SwarmState, iterations: usize) -> Self {
        let population = state.population();
        Self {
            best_position: state.global_best.position,
            best_value: state.global_best.value,
            evaluations: state.evaluations,
            iterations,
            population,
        }
    }

    pub fn best_params(&self) -> &[f64] {
        self.best_position.as_slice()
    }

    pub fn into_best_params(self) -> Vec<f64> {
        self.best_position.iter().copied().collect()
    }

    pub fn log_summary(&self) {
        tracing::info!(
            evaluations = self.evaluations,
            iterations = self.iterations,
            population = self.population,
            "Best value of {:.3} found at: {:?}",
            self.best_value,
            self.best_position.as_slice()
        );
    }
}
