use crate::error::NestResult;
use crate::genome::Genome;
use crate::population::Population;
use crate::workspace::Workspace;
use fastrand::Rng;

/// One mutated child per parent index, each resampled independently.
pub fn mutation_children(
    population: &Population,
    parents: &[usize],
    rate: f64,
    ws: &Workspace,
    rng: &mut Rng,
) -> NestResult<Vec<Genome>> {
    let genomes = population.genomes();
    parents
        .iter()
        .map(|&p| genomes[p].mutate(rate, ws, rng))
        .collect()
}
