use std::{cell::RefCell, rc::Rc};

use anyhow::Error;
use argmin::core::observers::ObserverMode;

use crate::prelude::*;

/// View of the run handed to observers after each iteration.
pub struct IterationSnapshot<'a> {
    pub iteration: usize,
    pub inertia: f64,
    /// Whether the global best improved during this iteration.
    pub improved: bool,
    pub state: &'a SwarmState,
}

/// Hook into a swarm run. Returning an error aborts the run.
pub trait SwarmObserver {
    fn observe_init(&mut self, _state: &SwarmState) -> Result<(), Error> {
        Ok(())
    }

    fn observe_iter(&mut self, snapshot: &IterationSnapshot<'_>) -> Result<(), Error>;
}

/// Decides whether an observer attached with `mode` sees the given iteration.
pub(crate) fn should_observe(mode: &ObserverMode, snapshot: &IterationSnapshot<'_>) -> bool {
    match mode {
        ObserverMode::Never => false,
        ObserverMode::Always => true,
        ObserverMode::Every(n) => *n > 0 && (snapshot.iteration as u64) % n == 0,
        ObserverMode::NewBest => snapshot.improved,
    }
}

/// Records the global best value at every observed iteration.
///
/// Clones share the same history, so keep one clone and hand the other to the optimizer.
#[derive(Clone, Default)]
pub struct CostHistory {
    best_values: Rc<RefCell<Vec<f64>>>,
}

impl CostHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn best_values(&self) -> Vec<f64> {
        self.best_values.borrow().clone()
    }
}

impl SwarmObserver for CostHistory {
    fn observe_iter(&mut self, snapshot: &IterationSnapshot<'_>) -> Result<(), Error> {
        self.best_values
            .borrow_mut()
            .push(snapshot.state.global_best.value);
        Ok(())
    }
}

/// Keeps a full copy of the swarm after every observed iteration. Meant for tests and
/// post-mortems on small swarms.
#[derive(Clone, Default)]
pub struct StateRecorder {
    initial: Rc<RefCell<Option<SwarmState>>>,
    history: Rc<RefCell<Vec<SwarmState>>>,
}

impl StateRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial(&self) -> Option<SwarmState> {
        self.initial.borrow().clone()
    }

    pub fn history(&self) -> Vec<SwarmState> {
        self.history.borrow().clone()
    }
}

impl SwarmObserver for StateRecorder {
    fn observe_init(&mut self, state: &SwarmState) -> Result<(), Error> {
        *self.initial.borrow_mut() = Some(state.clone());
        Ok(())
    }

    fn observe_iter(&mut self, snapshot: &IterationSnapshot<'_>) -> Result<(), Error> {
        self.history.borrow_mut().push(snapshot.state.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::DVector;
    use test_case::test_case;

    use super::*;

    fn empty_state() -> SwarmState {
        SwarmState {
            particles: Vec::new(),
            global_best: BestRecord::new(DVector::zeros(1), 1.0),
            evaluations: 0,
        }
    }

    #[test_case(ObserverMode::Never, 4, true, false)]
    #[test_case(ObserverMode::Always, 3, false, true)]
    #[test_case(ObserverMode::Every(2), 4, false, true)]
    #[test_case(ObserverMode::Every(2), 3, true, false)]
    #[test_case(ObserverMode::Every(0), 0, true, false)]
    #[test_case(ObserverMode::NewBest, 3, true, true)]
    #[test_case(ObserverMode::NewBest, 3, false, false)]
    fn observer_mode_filter(mode: ObserverMode, iteration: usize, improved: bool, expected: bool) {
        let state = empty_state();
        let snapshot = IterationSnapshot {
            iteration,
            inertia: 0.5,
            improved,
            state: &state,
        };
        assert_eq!(should_observe(&mode, &snapshot), expected);
    }

    #[test]
    fn history_is_shared_between_clones() {
        let history = CostHistory::new();
        let mut handle = history.clone();
        let state = empty_state();
        let snapshot = IterationSnapshot {
            iteration: 0,
            inertia: 0.9,
            improved: false,
            state: &state,
        };
        handle.observe_iter(&snapshot).unwrap();
        handle.observe_iter(&snapshot).unwrap();
        assert_eq!(history.best_values(), vec![1.0, 1.0]);
    }
}
