use fastrand::Rng;

/// Cumulative share of the expectation vector, ending at (about) 1.
#[derive(Debug, Clone)]
pub struct RouletteWheel {
    slots: Vec<f64>,
}

impl RouletteWheel {
    pub fn new(expectation: &[f64], parent_size: usize) -> Self {
        let scale = if parent_size > 0 {
            1.0 / parent_size as f64
        } else {
            0.0
        };
        let mut acc = 0.0;
        let slots = expectation
            .iter()
            .map(|e| {
                acc += e;
                acc * scale
            })
            .collect();
        Self { slots }
    }

    pub fn slots(&self) -> &[f64] {
        &self.slots
    }

    /// First slot whose cumulative share exceeds `r`. Rounding can leave the
    /// last slot just under 1; such draws land on the last index.
    pub fn index_for(&self, r: f64) -> usize {
        let idx = self.slots.partition_point(|&w| w <= r);
        idx.min(self.slots.len().saturating_sub(1))
    }

    pub fn spin(&self, rng: &mut Rng) -> usize {
        self.index_for(rng.f64())
    }
}

/// Draws `parent_size` population indices from the expectation vector and
/// shuffles them, so pairing for crossover is independent of draw order.
pub fn select_parents(expectation: &[f64], parent_size: usize, rng: &mut Rng) -> Vec<usize> {
    if expectation.is_empty() {
        return Vec::new();
    }

    let wheel = RouletteWheel::new(expectation, parent_size);
    let mut parents: Vec<usize> = (0..parent_size).map(|_| wheel.spin(rng)).collect();
    rng.shuffle(&mut parents);
    parents
}
