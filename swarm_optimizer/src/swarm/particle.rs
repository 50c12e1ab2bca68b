use nalgebra::DVector;

/// A position together with the objective value recorded there.
#[derive(Debug, Clone, PartialEq)]
pub struct BestRecord {
    pub position: DVector<f64>,
    pub value: f64,
}

impl BestRecord {
    pub fn new(position: DVector<f64>, value: f64) -> Self {
        Self { position, value }
    }

    /// Replaces the record if `value` is strictly greater. Ties keep the existing record.
    pub fn offer(&mut self, position: &DVector<f64>, value: f64) -> bool {
        if value > self.value {
            self.value = value;
            self.position.copy_from(position);
            true
        } else {
            false
        }
    }
}

/// One swarm member.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: DVector<f64>,
    pub velocity: DVector<f64>,
    pub best: BestRecord,
}

impl Particle {
    /// A particle whose personal best starts at its spawn position with value `seed_value`.
    pub fn new(position: DVector<f64>, velocity: DVector<f64>, seed_value: f64) -> Self {
        Particle {
            best: BestRecord::new(position.clone(), seed_value),
            position,
            velocity,
        }
    }
}
