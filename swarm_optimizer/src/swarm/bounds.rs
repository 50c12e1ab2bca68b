use nalgebra::DVector;

use crate::prelude::*;

/// Per-dimension `[min, max]` box constraining particle positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    lower: DVector<f64>,
    upper: DVector<f64>,
}

impl Bounds {
    /// Builds bounds from separate lower and upper vectors. Shape and ordering are checked by
    /// `SwarmConfig::validate`, where the dimensionality of the run is known.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Self {
        Self {
            lower: DVector::from_vec(lower),
            upper: DVector::from_vec(upper),
        }
    }

    /// Builds bounds from `(min, max)` pairs, one per dimension.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        let lower = pairs.iter().map(|(l, _u)| *l).collect();
        let upper = pairs.iter().map(|(_l, u)| *u).collect();
        Self::new(lower, upper)
    }

    /// The same `[min, max]` for every one of `dim` dimensions.
    pub fn uniform(dim: usize, min: f64, max: f64) -> Self {
        Self::new(vec![min; dim], vec![max; dim])
    }

    pub fn contains(&self, position: &DVector<f64>) -> bool {
        position
            .iter()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .all(|(&p, (&l, &u))| l <= p && p <= u)
    }

    pub(crate) fn validate(&self, expected_dim: usize) -> Result<(), ConfigError> {
        if self.lower.len() != self.upper.len() || self.lower.len() != expected_dim {
            return Err(ConfigError::BoundsDimensionMismatch {
                expected: expected_dim,
                got: self.lower.len().min(self.upper.len()),
            });
        }
        for (dim, (&min, &max)) in self.lower.iter().zip(self.upper.iter()).enumerate() {
            // written so that NaN bounds also fail
            if !(min.is_finite() && max.is_finite() && min <= max) {
                return Err(ConfigError::InvertedBounds { dim, min, max });
            }
        }
        Ok(())
    }

    /// Clamps `position` into the box and applies `policy` to `velocity` if anything was clamped.
    ///
    /// Returns whether any dimension violated its bounds.
    pub fn enforce(
        &self,
        position: &mut DVector<f64>,
        velocity: &mut DVector<f64>,
        policy: BoundaryPolicy,
    ) -> bool {
        let mut violated = false;
        for j in 0..position.len() {
            let clamped = if position[j] > self.upper[j] {
                position[j] = self.upper[j];
                true
            } else if position[j] < self.lower[j] {
                position[j] = self.lower[j];
                true
            } else {
                false
            };

            if clamped {
                violated = true;
                if policy == BoundaryPolicy::ReflectViolated {
                    velocity[j] = -velocity[j];
                }
            }
        }

        if violated && policy == BoundaryPolicy::ReflectLastDimension {
            if let Some(last) = velocity.len().checked_sub(1) {
                velocity[last] = -velocity[last];
            }
        }
        violated
    }
}

/// What happens to a particle's velocity when its position had to be clamped.
///
/// The position is always clamped to the violated bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// Invert only the last velocity component, whichever dimension was violated.
    #[default]
    ReflectLastDimension,
    /// Invert the velocity component of every violated dimension.
    ReflectViolated,
}

/// Region from which initial particle positions are drawn when bounds are configured.
///
/// Without bounds, positions are always drawn from `[0, 1)` per dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpawnPolicy {
    /// `U[0, 1) * max` per dimension. Ignores the lower bound, so spawn positions can lie below it
    /// until the first step clamps them.
    #[default]
    UpperScaled,
    /// `min + U[0, 1) * (max - min)` per dimension.
    WithinBounds,
}

impl SpawnPolicy {
    /// Maps a unit draw `u` in `[0, 1)` onto dimension `dim` of `bounds`.
    pub(crate) fn place(self, bounds: &Bounds, dim: usize, u: f64) -> f64 {
        match self {
            SpawnPolicy::UpperScaled => u * bounds.upper[dim],
            SpawnPolicy::WithinBounds => {
                let (lower, upper) = (bounds.lower[dim], bounds.upper[dim]);
                // convex combination, since `upper - lower` can overflow for finite bounds
                (lower * (1.0 - u) + upper * u).max(lower).min(upper)
            }
        }
    }
}
