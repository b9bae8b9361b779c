use crate::config::{EvolutionConfig, OffspringSizes};
use crate::error::{NestError, NestResult};
use crate::genome::Genome;
use crate::geometry::PieceSet;
use crate::optimizer::crossover::crossover_children;
use crate::optimizer::elitism::select_elite;
use crate::optimizer::mutation::mutation_children;
use crate::optimizer::selection::select_parents;
use crate::population::Population;
use crate::scorer::{Objective, Scorer};
use crate::workspace::Workspace;
use fastrand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, info};
use typed_builder::TypedBuilder;

/// Summary of one evaluated generation, before it is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub generation: usize,
    pub best_index: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
}

/// Receives a report after every generation. The run always completes its
/// generation budget; callbacks only observe.
pub trait ProgressCallback: Send + Sync {
    fn on_generation(&self, report: &GenerationReport);
}

pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_generation(&self, _report: &GenerationReport) {}
}

impl<T: ProgressCallback + ?Sized> ProgressCallback for &T {
    fn on_generation(&self, report: &GenerationReport) {
        (**self).on_generation(report)
    }
}

impl<A: ProgressCallback, B: ProgressCallback> ProgressCallback for (A, B) {
    fn on_generation(&self, report: &GenerationReport) {
        self.0.on_generation(report);
        self.1.on_generation(report);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvolutionState {
    Initialized,
    /// `generation` generations have been completed.
    Evolving { generation: usize },
    Terminated,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResult {
    pub best_index: usize,
    pub fitness: f64,
    pub genome: Genome,
    pub generations: usize,
}

impl OptimizationResult {
    /// SHA-256 over the bit patterns of the best genes, hex encoded.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for g in self.genome.genes() {
            hasher.update(g.to_bits().to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

#[derive(TypedBuilder)]
pub struct OptimizerParams {
    #[builder(default)]
    pub config: EvolutionConfig,
    pub workspace: Workspace,
    /// Required unless `pieces` is given.
    #[builder(default, setter(strip_option))]
    pub piece_count: Option<usize>,
    /// Outlines for the overlap-aware objective.
    #[builder(default, setter(strip_option))]
    pub pieces: Option<Arc<PieceSet>>,
    /// Fixed RNG seed; `None` draws one from the OS.
    #[builder(default)]
    pub seed: Option<u64>,
    /// Genomes placed at the front of the first population; the rest is random.
    #[builder(default)]
    pub initial_genomes: Vec<Genome>,
}

impl OptimizerParams {
    pub fn build_optimizer(self) -> NestResult<Optimizer<Scorer>> {
        let piece_count = match (self.piece_count, &self.pieces) {
            (Some(n), Some(p)) if n != p.len() => {
                return Err(NestError::InvalidConfiguration(format!(
                    "piece_count {} does not match the {} outlines given",
                    n,
                    p.len()
                )))
            }
            (_, Some(p)) => p.len(),
            (Some(n), None) => n,
            (None, None) => {
                return Err(NestError::InvalidConfiguration(
                    "either piece_count or pieces must be set".into(),
                ))
            }
        };

        let scorer = Scorer::from_config(&self.config, self.pieces, self.workspace)?;
        let rng = match self.seed {
            Some(s) => Rng::with_seed(s),
            None => Rng::new(),
        };

        Optimizer::seeded(
            self.config,
            self.workspace,
            piece_count,
            scorer,
            rng,
            self.initial_genomes,
        )
    }
}

/// The generational loop.
pub struct Optimizer<S = Scorer> {
    config: EvolutionConfig,
    sizes: OffspringSizes,
    workspace: Workspace,
    objective: S,
    population: Population,
    rng: Rng,
    state: EvolutionState,
}

impl<S: Objective> Optimizer<S> {
    pub fn new(
        config: EvolutionConfig,
        workspace: Workspace,
        piece_count: usize,
        objective: S,
        rng: Rng,
    ) -> NestResult<Self> {
        Self::seeded(config, workspace, piece_count, objective, rng, Vec::new())
    }

    pub fn seeded(
        config: EvolutionConfig,
        workspace: Workspace,
        piece_count: usize,
        objective: S,
        mut rng: Rng,
        initial_genomes: Vec<Genome>,
    ) -> NestResult<Self> {
        let sizes = config.offspring_sizes()?;
        if let Some(bound) = objective.piece_count() {
            if bound != piece_count {
                return Err(NestError::InvalidConfiguration(format!(
                    "objective scores {} pieces but the optimizer places {}",
                    bound, piece_count
                )));
            }
        }

        let mut genomes = Vec::with_capacity(config.population_size);
        for (i, g) in initial_genomes
            .into_iter()
            .take(config.population_size)
            .enumerate()
        {
            if g.piece_count() != piece_count {
                return Err(NestError::InvalidConfiguration(format!(
                    "initial genome {} places {} pieces, expected {}",
                    i,
                    g.piece_count(),
                    piece_count
                )));
            }
            genomes.push(g);
        }
        while genomes.len() < config.population_size {
            genomes.push(Genome::from_random(piece_count, &workspace, &mut rng)?);
        }
        let population = Population::from_genomes(genomes)?;

        info!(
            "Optimizer ready: {} pieces, population {}, {} generations \
             ({} elite, {} crossover, {} mutation)",
            piece_count,
            config.population_size,
            config.generations,
            sizes.elite,
            sizes.crossover,
            sizes.mutation
        );

        Ok(Self {
            config,
            sizes,
            workspace,
            objective,
            population,
            rng,
            state: EvolutionState::Initialized,
        })
    }

    pub fn state(&self) -> EvolutionState {
        self.state
    }

    pub fn sizes(&self) -> OffspringSizes {
        self.sizes
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn objective(&self) -> &S {
        &self.objective
    }

    /// Runs one generation: evaluate, scale, select, breed, replace.
    /// Returns `None` once the generation budget is spent.
    pub fn step(&mut self) -> NestResult<Option<GenerationReport>> {
        let generation = match self.state {
            EvolutionState::Initialized => 0,
            EvolutionState::Evolving { generation } => generation,
            EvolutionState::Terminated => return Ok(None),
        };

        self.population.evaluate(&self.objective);
        let (best_index, best_fitness) = self.population.best()?;
        let mean_fitness = self.population.mean_fitness()?;

        let expectation = self.population.scale_fitness(self.sizes.parent)?;
        let parents = select_parents(&expectation, self.sizes.parent, &mut self.rng);
        let (cross_parents, mutate_parents) = parents.split_at(2 * self.sizes.crossover);

        let mut next = select_elite(&self.population, self.sizes.elite)?;
        next.extend(crossover_children(
            &self.population,
            cross_parents,
            self.config.crossover_ratio,
            &mut self.rng,
        ));
        next.extend(mutation_children(
            &self.population,
            mutate_parents,
            self.config.mutation_rate,
            &self.workspace,
            &mut self.rng,
        )?);
        debug_assert_eq!(next.len(), self.config.population_size);

        self.population = Population::from_genomes(next)?;

        let done = generation + 1;
        self.state = if done >= self.config.generations {
            EvolutionState::Terminated
        } else {
            EvolutionState::Evolving { generation: done }
        };

        debug!(
            "Gen {:5} | Best: {:.2} (#{}) | Mean: {:.2}",
            generation, best_fitness, best_index, mean_fitness
        );

        Ok(Some(GenerationReport {
            generation,
            best_index,
            best_fitness,
            mean_fitness,
        }))
    }

    /// Drives the loop to termination and returns the best genome of the
    /// final population.
    pub fn run<CB: ProgressCallback>(&mut self, callback: CB) -> NestResult<OptimizationResult> {
        while let Some(report) = self.step()? {
            callback.on_generation(&report);
        }

        let result = self.best()?;
        info!(
            "Run finished after {} generations: best fitness {:.2} at index {}",
            result.generations, result.fitness, result.best_index
        );
        Ok(result)
    }

    /// Best genome of the current population, evaluating it first if needed.
    pub fn best(&mut self) -> NestResult<OptimizationResult> {
        self.population.evaluate(&self.objective);
        let (best_index, fitness) = self.population.best()?;

        let generations = match self.state {
            EvolutionState::Initialized => 0,
            EvolutionState::Evolving { generation } => generation,
            EvolutionState::Terminated => self.config.generations,
        };

        Ok(OptimizationResult {
            best_index,
            fitness,
            genome: self.population.genomes()[best_index].clone(),
            generations,
        })
    }
}
