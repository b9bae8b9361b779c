/// Indices ordered by ascending fitness. The sort is stable, so equal
/// values keep their population order.
pub fn rank_order(fitness: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fitness.len()).collect();
    order.sort_by(|&a, &b| fitness[a].total_cmp(&fitness[b]));
    order
}

/// Rank-based expectation values.
///
/// The genome at rank `r` (1 = best) gets raw weight `1/√r`; the weights are
/// then scaled to sum to `parent_size`. Only the order of `fitness` matters,
/// never the magnitudes.
pub fn rank_scaling(fitness: &[f64], parent_size: usize) -> Vec<f64> {
    let mut expectation = vec![0.0; fitness.len()];
    for (rank0, &idx) in rank_order(fitness).iter().enumerate() {
        expectation[idx] = 1.0 / ((rank0 + 1) as f64).sqrt();
    }

    let total: f64 = expectation.iter().sum();
    if total > 0.0 {
        let factor = parent_size as f64 / total;
        for e in &mut expectation {
            *e *= factor;
        }
    }
    expectation
}
