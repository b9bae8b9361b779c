use crate::error::{NestError, NestResult};
use crate::genome::Genome;
use crate::optimizer::scaling;
use crate::scorer::Objective;
use crate::workspace::Workspace;
use fastrand::Rng;
use rayon::prelude::*;

/// The genomes of one generation, in a fixed order.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    genomes: Vec<Genome>,
}

impl Population {
    pub fn random(
        size: usize,
        piece_count: usize,
        ws: &Workspace,
        rng: &mut Rng,
    ) -> NestResult<Self> {
        let genomes = (0..size)
            .map(|_| Genome::from_random(piece_count, ws, rng))
            .collect::<NestResult<Vec<_>>>()?;
        Self::from_genomes(genomes)
    }

    /// Wraps existing genomes; all must describe the same number of pieces.
    pub fn from_genomes(genomes: Vec<Genome>) -> NestResult<Self> {
        let Some(first) = genomes.first() else {
            return Err(NestError::InvalidConfiguration(
                "a population needs at least one genome".into(),
            ));
        };
        let len = first.len();
        if let Some(bad) = genomes.iter().position(|g| g.len() != len) {
            return Err(NestError::InvalidConfiguration(format!(
                "genome {} has length {}, expected {}",
                bad,
                genomes[bad].len(),
                len
            )));
        }
        Ok(Self { genomes })
    }

    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    pub fn genome_len(&self) -> usize {
        self.genomes[0].len()
    }

    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    /// Fitness of every genome, in population order. Genomes that already
    /// carry a value (carried-over elites) keep it.
    pub fn evaluate<S: Objective + ?Sized>(&mut self, objective: &S) -> Vec<f64> {
        self.genomes
            .par_iter_mut()
            .map(|g| match g.fitness() {
                Ok(f) => f,
                Err(_) => g.evaluate(objective),
            })
            .collect()
    }

    pub fn fitness_values(&self) -> NestResult<Vec<f64>> {
        self.genomes.iter().map(Genome::fitness).collect()
    }

    /// Indices sorted best first; ties keep population order.
    pub fn ranked_indices(&self) -> NestResult<Vec<usize>> {
        Ok(scaling::rank_order(&self.fitness_values()?))
    }

    /// Rank-based expectation values summing to `parent_size`.
    pub fn scale_fitness(&self, parent_size: usize) -> NestResult<Vec<f64>> {
        Ok(scaling::rank_scaling(&self.fitness_values()?, parent_size))
    }

    /// Index and fitness of the best genome, lowest index on ties.
    pub fn best(&self) -> NestResult<(usize, f64)> {
        let fitness = self.fitness_values()?;
        let idx = scaling::rank_order(&fitness)[0];
        Ok((idx, fitness[idx]))
    }

    pub fn mean_fitness(&self) -> NestResult<f64> {
        let fitness = self.fitness_values()?;
        Ok(fitness.iter().sum::<f64>() / fitness.len() as f64)
    }
}
