/// Per-iteration inertia weights, linearly interpolated from `start` to `end` with both
/// endpoints included.
#[derive(Debug, Clone, PartialEq)]
pub struct InertiaSchedule {
    weights: Vec<f64>,
}

impl InertiaSchedule {
    pub fn linear(start: f64, end: f64, iterations: usize) -> Self {
        let weights = match iterations {
            0 => Vec::new(),
            1 => vec![start],
            n => {
                let step = (end - start) / (n - 1) as f64;
                let mut w: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
                // pin the last point so rounding in `step` can't leave it off `end`
                w[n - 1] = end;
                w
            }
        };
        Self { weights }
    }

    /// Inertia for iteration `iter`, or `None` past the end of the schedule.
    pub fn get(&self, iter: usize) -> Option<f64> {
        self.weights.get(iter).copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }
}
