use crate::genome::Genome;
use crate::population::Population;
use fastrand::Rng;

/// Intermediate recombination with one blend factor per child:
/// `child = p1 + s * (p2 - p1)` where `s = ratio * U(0, 1)`.
pub fn crossover_blend(p1: &Genome, p2: &Genome, ratio: f64, rng: &mut Rng) -> Genome {
    let scale = ratio * rng.f64();
    p1.blend(p2, scale)
}

/// One child per consecutive pair of `parents`; a trailing odd index is ignored.
pub fn crossover_children(
    population: &Population,
    parents: &[usize],
    ratio: f64,
    rng: &mut Rng,
) -> Vec<Genome> {
    let genomes = population.genomes();
    parents
        .chunks_exact(2)
        .map(|pair| crossover_blend(&genomes[pair[0]], &genomes[pair[1]], ratio, rng))
        .collect()
}
