use crate::prelude::*;

/// How personal and global best values are seeded before the first iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BestSeed {
    /// Best values start at 0, which acts as a floor: an objective that is negative everywhere
    /// never updates a best record.
    Zero,
    /// Best values start at negative infinity, so the first evaluation always becomes the record.
    /// The global best position is the caller's initial vector until then.
    #[default]
    Unevaluated,
    /// Evaluate the caller's initial vector and every spawn position before the first iteration.
    /// Costs `population + 1` extra evaluations.
    Evaluate,
}

/// When the global best written by one particle becomes visible to the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdatePolicy {
    /// Particles are stepped in index order, each one reading the global best as left by the
    /// particles before it in the same iteration.
    #[default]
    Sequential,
    /// All particles read the global best as it was at the start of the iteration. The new global
    /// best is reduced in index order once every particle has been evaluated.
    Generational,
}

/// Configuration for one swarm run.
#[derive(Clone, Debug)]
pub struct SwarmConfig {
    /// Number of particles.
    pub population: usize,
    /// Number of iterations. Each iteration evaluates the objective once per particle.
    pub iterations: usize,

    /// Inertia at the first iteration.
    pub inertia_start: f64,
    /// Inertia at the last iteration. The schedule is linear in between.
    pub inertia_end: f64,

    /// Pull toward each particle's own best position (C1).
    pub cognitive_weight: f64,
    /// Pull toward the swarm's best position (C2).
    pub social_weight: f64,

    /// Optional box constraint on positions.
    pub bounds: Option<Bounds>,
    /// Optional cap on the Euclidean norm of each particle's velocity.
    pub velocity_limit: Option<f64>,
    /// Seed for the random streams. `None` seeds from the thread RNG.
    pub seed: Option<u64>,

    pub boundary_policy: BoundaryPolicy,
    pub spawn_policy: SpawnPolicy,
    pub best_seed: BestSeed,
    pub update_policy: UpdatePolicy,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            population: 20,
            iterations: 50,
            inertia_start: 0.9,
            inertia_end: 0.4,
            cognitive_weight: 1.0,
            social_weight: 1.0,
            bounds: None,
            velocity_limit: None,
            seed: None,
            boundary_policy: BoundaryPolicy::default(),
            spawn_policy: SpawnPolicy::default(),
            best_seed: BestSeed::default(),
            update_policy: UpdatePolicy::default(),
        }
    }
}

impl SwarmConfig {
    pub fn new(population: usize, iterations: usize) -> Self {
        Self {
            population,
            iterations,
            ..Self::default()
        }
    }

    pub fn with_inertia(mut self, start: f64, end: f64) -> Self {
        self.inertia_start = start;
        self.inertia_end = end;
        self
    }

    pub fn with_weights(mut self, cognitive: f64, social: f64) -> Self {
        self.cognitive_weight = cognitive;
        self.social_weight = social;
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_velocity_limit(mut self, limit: f64) -> Self {
        self.velocity_limit = Some(limit);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_boundary_policy(mut self, policy: BoundaryPolicy) -> Self {
        self.boundary_policy = policy;
        self
    }

    pub fn with_spawn_policy(mut self, policy: SpawnPolicy) -> Self {
        self.spawn_policy = policy;
        self
    }

    pub fn with_best_seed(mut self, seed: BestSeed) -> Self {
        self.best_seed = seed;
        self
    }

    pub fn with_update_policy(mut self, policy: UpdatePolicy) -> Self {
        self.update_policy = policy;
        self
    }

    /// Checks the configuration against a run over `dim` parameters.
    pub fn validate(&self, dim: usize) -> Result<(), ConfigError> {
        if dim == 0 {
            return Err(ConfigError::EmptyParameterVector);
        }
        if self.population == 0 {
            return Err(ConfigError::ZeroPopulation);
        }
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }

        for (name, value) in [
            ("inertia_start", self.inertia_start),
            ("inertia_end", self.inertia_end),
            ("cognitive_weight", self.cognitive_weight),
            ("social_weight", self.social_weight),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteSetting { name, value });
            }
        }

        if let Some(limit) = self.velocity_limit {
            if !(limit.is_finite() && limit > 0.0) {
                return Err(ConfigError::NonPositiveVelocityLimit(limit));
            }
        }

        if let Some(bounds) = &self.bounds {
            bounds.validate(dim)?;
        }
        Ok(())
    }
}
