use argmin::core::observers::ObserverMode;
use nalgebra::DVector;
use swarm_optimizer::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod objectives;

use objectives::{SampledBowl, bowl, peak_at_three};

const SEED: u64 = 2024;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 1. one-dimensional peak, reference settings
    let cfg = SwarmConfig::new(20, 50).with_seed(SEED);
    let history = CostHistory::new();
    let report = SwarmOptimizer::new(cfg)
        .add_observer(history.clone(), ObserverMode::Always)
        .optimize(&ObjectiveFn::new(peak_at_three), &[0.0])?;
    info!(
        "peak_at_three: x = {:.4}, best value per iteration: {:?}",
        report.best_position[0],
        history
            .best_values()
            .iter()
            .map(|v| format!("{v:.3e}"))
            .collect::<Vec<String>>()
    );

    // 2. bounded bowl, generations evaluated in parallel
    let center = DVector::from_vec(vec![1.0, -2.0, 0.5]);
    let cfg = SwarmConfig::new(40, 120)
        .with_seed(SEED)
        .with_bounds(Bounds::uniform(3, -5.0, 5.0))
        .with_spawn_policy(SpawnPolicy::WithinBounds)
        .with_velocity_limit(1.0)
        .with_boundary_policy(BoundaryPolicy::ReflectViolated);
    let report = SwarmOptimizer::new(cfg).optimize_par(&bowl(center.clone()), &[0.0, 0.0, 0.0])?;
    info!(
        "bowl: distance to optimum = {:.3e}",
        (&report.best_position - &center).norm()
    );

    // 3. noisy sampled objective, bounds in the shape of QAOA angles (gamma, beta)
    let center = DVector::from_vec(vec![0.8, 0.4]);
    let sampled = SampledBowl::new(center.clone(), 256, 0.05, SEED)?;
    let cfg = SwarmConfig::new(20, 40)
        .with_seed(SEED)
        .with_bounds(Bounds::from_pairs(&[
            (0.0, 2.0 * std::f64::consts::PI),
            (0.0, std::f64::consts::PI),
        ]))
        .with_best_seed(BestSeed::Evaluate);
    let report = SwarmOptimizer::new(cfg).optimize(&sampled, &[0.5, 0.5])?;
    info!(
        evaluations = report.evaluations,
        "sampled bowl: found {:?}, true optimum {:?}",
        report.best_params(),
        center.as_slice()
    );

    Ok(())
}
