use argmin::core::observers::ObserverMode;
use nalgebra::DVector;
use proptest::prelude::*;

use crate::prelude::*;

/// Bumpy objective with many local maxima, so particles keep moving and hitting the walls.
fn rastrigin_like(x: &DVector<f64>) -> f64 {
    -x.iter()
        .map(|&xi| xi * xi - 3.0 * (2.0 * std::f64::consts::PI * xi).cos())
        .sum::<f64>()
}

fn boundary_policy() -> impl Strategy<Value = BoundaryPolicy> {
    prop_oneof![
        Just(BoundaryPolicy::ReflectLastDimension),
        Just(BoundaryPolicy::ReflectViolated),
    ]
}

fn best_seed() -> impl Strategy<Value = BestSeed> {
    prop_oneof![
        Just(BestSeed::Zero),
        Just(BestSeed::Unevaluated),
        Just(BestSeed::Evaluate),
    ]
}

fn update_policy() -> impl Strategy<Value = UpdatePolicy> {
    prop_oneof![
        Just(UpdatePolicy::Sequential),
        Just(UpdatePolicy::Generational),
    ]
}

prop_compose! {
    fn bounded_config()(
        seed in any::<u64>(),
        population in 1_usize..12,
        iterations in 1_usize..15,
        dim in 1_usize..4,
        half_width in 0.5_f64..6.0,
        velocity_limit in prop::option::of(0.05_f64..3.0),
        boundary in boundary_policy(),
        seed_policy in best_seed(),
        update in update_policy(),
    ) -> (SwarmConfig, usize) {
        let mut cfg = SwarmConfig::new(population, iterations)
            .with_seed(seed)
            .with_bounds(Bounds::uniform(dim, -half_width, half_width))
            .with_boundary_policy(boundary)
            .with_best_seed(seed_policy)
            .with_update_policy(update)
            .with_weights(1.5, 1.5);
        cfg.velocity_limit = velocity_limit;
        (cfg, dim)
    }
}

fn record(cfg: SwarmConfig, dim: usize) -> (OptimizationReport, Option<SwarmState>, Vec<SwarmState>) {
    let recorder = StateRecorder::new();
    let report = SwarmOptimizer::new(cfg)
        .add_observer(recorder.clone(), ObserverMode::Always)
        .optimize(&ObjectiveFn::new(rastrigin_like), &vec![0.1; dim])
        .unwrap();
    (report, recorder.initial(), recorder.history())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Property: the global best value never decreases from one iteration to the next
    #[test]
    fn prop_global_best_is_monotone((cfg, dim) in bounded_config()) {
        let (report, initial, history) = record(cfg, dim);
        let mut prev = initial.unwrap().global_best.value;
        for state in &history {
            prop_assert!(state.global_best.value >= prev);
            prev = state.global_best.value;
        }
        prop_assert_eq!(report.best_value, prev);
    }

    /// Property: every particle's personal best value is non-decreasing
    #[test]
    fn prop_personal_best_is_monotone((cfg, dim) in bounded_config()) {
        let (_report, initial, history) = record(cfg, dim);
        let mut prev: Vec<f64> = initial.unwrap().particles.iter().map(|p| p.best.value).collect();
        for state in &history {
            for (p, before) in state.particles.iter().zip(prev.iter_mut()) {
                prop_assert!(p.best.value >= *before);
                *before = p.best.value;
            }
        }
    }

    /// Property: a recorded best value is what the objective returns at the recorded position
    #[test]
    fn prop_best_values_match_positions((cfg, dim) in bounded_config()) {
        let (report, _initial, history) = record(cfg, dim);
        let last = history.last().unwrap();
        for p in &last.particles {
            if p.best.value.is_finite() && p.best.value != 0.0 {
                prop_assert_eq!(p.best.value, rastrigin_like(&p.best.position));
            }
        }
        if report.best_value != 0.0 {
            prop_assert_eq!(report.best_value, rastrigin_like(&report.best_position));
        }
    }

    /// Property: positions stay inside the bounds after every step
    #[test]
    fn prop_positions_respect_bounds((cfg, dim) in bounded_config()) {
        let bounds = cfg.bounds.clone().unwrap();
        let (_report, _initial, history) = record(cfg, dim);
        for state in &history {
            for p in &state.particles {
                prop_assert!(bounds.contains(&p.position), "escaped: {:?}", p.position);
            }
        }
    }

    /// Property: velocity norms never exceed the configured limit after a step
    #[test]
    fn prop_velocity_respects_limit((cfg, dim) in bounded_config()) {
        prop_assume!(cfg.velocity_limit.is_some());
        let limit = cfg.velocity_limit.unwrap();
        let (_report, _initial, history) = record(cfg, dim);
        for state in &history {
            for p in &state.particles {
                prop_assert!(p.velocity.norm() <= limit * (1.0 + 1e-12));
            }
        }
    }

    /// Property: evaluation count grows by exactly one generation per iteration
    #[test]
    fn prop_evaluation_count((cfg, dim) in bounded_config()) {
        let population = cfg.population;
        let iterations = cfg.iterations;
        let seed_evals = if cfg.best_seed == BestSeed::Evaluate { population + 1 } else { 0 };
        let (report, _initial, history) = record(cfg, dim);
        for (i, state) in history.iter().enumerate() {
            prop_assert_eq!(state.evaluations, seed_evals + population * (i + 1));
        }
        prop_assert_eq!(report.evaluations, seed_evals + population * iterations);
    }

    /// Property: identical configuration and seed reproduce the run exactly
    #[test]
    fn prop_runs_are_reproducible((cfg, dim) in bounded_config()) {
        let (report_a, _, history_a) = record(cfg.clone(), dim);
        let (report_b, _, history_b) = record(cfg, dim);
        prop_assert_eq!(report_a, report_b);
        prop_assert_eq!(history_a, history_b);
    }
}
