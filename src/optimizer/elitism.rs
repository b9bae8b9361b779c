use crate::error::NestResult;
use crate::genome::Genome;
use crate::population::Population;

/// The `elite_size` best genomes, best first, copied with their cached fitness.
pub fn select_elite(population: &Population, elite_size: usize) -> NestResult<Vec<Genome>> {
    let ranked = population.ranked_indices()?;
    Ok(ranked
        .into_iter()
        .take(elite_size)
        .map(|i| population.genomes()[i].clone())
        .collect())
}
