use std::cell::RefCell;

use anyhow::anyhow;
use nalgebra::DVector;
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};
use swarm_optimizer::prelude::*;

/// Single peak at `x[0] = 3`.
pub fn peak_at_three(x: &DVector<f64>) -> f64 {
    -(x[0] - 3.0).powi(2)
}

/// Smooth bowl with its maximum at `center`.
pub fn bowl(center: DVector<f64>) -> ObjectiveFn<impl Fn(&DVector<f64>) -> f64> {
    ObjectiveFn::new(move |x: &DVector<f64>| -(x - &center).norm_squared())
}

/// A sampled estimate of a bowl, the way a shot-based expectation value is noisy around its
/// true value. Each evaluation averages `shots` noisy samples.
pub struct SampledBowl {
    center: DVector<f64>,
    shots: usize,
    noise: Normal<f64>,
    rng: RefCell<StdRng>,
}

impl SampledBowl {
    pub fn new(center: DVector<f64>, shots: usize, sigma: f64, seed: u64) -> anyhow::Result<Self> {
        if shots == 0 {
            return Err(anyhow!("a sampled objective needs at least one shot"));
        }
        Ok(Self {
            center,
            shots,
            noise: Normal::new(0.0, sigma)?,
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        })
    }
}

impl argmin::core::CostFunction for SampledBowl {
    type Param = DVector<f64>;
    type Output = f64;

    fn cost(&self, p: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        if p.len() != self.center.len() {
            anyhow::bail!(
                "Parameter vector length ({}) did not match objective dimension ({})",
                p.len(),
                self.center.len()
            );
        }
        let exact = -(p - &self.center).norm_squared();
        let mut rng = self.rng.borrow_mut();
        let noise_sum: f64 = (0..self.shots).map(|_| self.noise.sample(&mut *rng)).sum();
        Ok(exact + noise_sum / self.shots as f64)
    }
}
