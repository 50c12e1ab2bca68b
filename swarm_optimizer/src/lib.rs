pub mod error;
pub mod swarm;

pub mod prelude {
    pub use crate::{
        error::*,
        swarm::{
            SwarmOptimizer,
            bounds::*,
            config::*,
            inertia::*,
            objective::*,
            observer::*,
            particle::*,
            report::*,
            state::*,
            step::*,
        },
    };

    pub use nalgebra;
}

pub use swarm::SwarmOptimizer;
