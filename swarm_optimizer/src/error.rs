use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Initial parameter vector is empty; the swarm needs at least one dimension")]
    EmptyParameterVector,

    #[error("Population size must be at least 1")]
    ZeroPopulation,

    #[error("Iteration count must be at least 1")]
    ZeroIterations,

    #[error("Bounds cover {got} dimensions but the initial parameter vector has {expected}")]
    BoundsDimensionMismatch { expected: usize, got: usize },

    #[error("Bounds for dimension {dim} are inverted or non-finite: [{min}, {max}]")]
    InvertedBounds { dim: usize, min: f64, max: f64 },

    #[error("Setting `{name}` must be finite, got {value}")]
    NonFiniteSetting { name: &'static str, value: f64 },

    #[error("Velocity limit must be positive and finite, got {0}")]
    NonPositiveVelocityLimit(f64),
}

#[derive(Error, Debug)]
pub enum SwarmError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Objective failed at {location}: {source}")]
    Objective {
        location: EvalLocation,
        source: argmin::core::Error,
    },

    #[error("Non-finite {quantity} at {location}")]
    NonFinite {
        quantity: NonFiniteQuantity,
        location: EvalLocation,
    },

    #[error("Observer error: {0}")]
    Observer(anyhow::Error),
}

/// Which piece of particle state went non-finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonFiniteQuantity {
    Velocity,
    Position,
    ObjectiveValue,
}

impl std::fmt::Display for NonFiniteQuantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NonFiniteQuantity::Velocity => "velocity",
            NonFiniteQuantity::Position => "position",
            NonFiniteQuantity::ObjectiveValue => "objective value",
        };
        f.write_str(name)
    }
}

/// Where in a run an objective evaluation (or state update) happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalLocation {
    /// Evaluation of the caller's initial parameter vector before the first iteration.
    InitialParams,
    /// Evaluation of a particle's spawn position before the first iteration.
    Spawn { particle: usize },
    /// Regular update step.
    Step { iteration: usize, particle: usize },
}

impl std::fmt::Display for EvalLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalLocation::InitialParams => write!(f, "initial parameters"),
            EvalLocation::Spawn { particle } => write!(f, "spawn position of particle {particle}"),
            EvalLocation::Step {
                iteration,
                particle,
            } => write!(f, "particle {particle}, iteration {iteration}"),
        }
    }
}
