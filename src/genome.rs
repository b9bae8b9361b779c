use crate::error::{NestError, NestResult};
use crate::scorer::Objective;
use crate::workspace::Workspace;
use fastrand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One candidate placement: an `(x, y)` pair per pattern piece, flattened as
/// `[x0, y0, x1, y1, ...]`, plus the fitness of exactly those genes.
///
/// The gene vector is never modified after construction. Operators return
/// new genomes, which start unevaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGenome")]
pub struct Genome {
    genes: Vec<f64>,
    #[serde(skip)]
    fitness: Option<f64>,
}

#[derive(Deserialize)]
struct RawGenome {
    genes: Vec<f64>,
}

impl TryFrom<RawGenome> for Genome {
    type Error = NestError;

    fn try_from(raw: RawGenome) -> NestResult<Self> {
        Genome::from_vector(raw.genes)
    }
}

impl Genome {
    /// Samples every piece uniformly over the workspace rectangle.
    pub fn from_random(piece_count: usize, ws: &Workspace, rng: &mut Rng) -> NestResult<Self> {
        check_length(2 * piece_count)?;

        let mut genes = Vec::with_capacity(2 * piece_count);
        for _ in 0..piece_count {
            genes.push(ws.sample_x(rng));
            genes.push(ws.sample_y(rng));
        }
        Ok(Self::unevaluated(genes))
    }

    pub fn from_vector(genes: Vec<f64>) -> NestResult<Self> {
        check_length(genes.len())?;
        if genes.iter().any(|g| !g.is_finite()) {
            return Err(NestError::InvalidConfiguration(
                "genome contains a non-finite coordinate".into(),
            ));
        }
        Ok(Self::unevaluated(genes))
    }

    fn unevaluated(genes: Vec<f64>) -> Self {
        Self {
            genes,
            fitness: None,
        }
    }

    pub fn genes(&self) -> &[f64] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn piece_count(&self) -> usize {
        self.genes.len() / 2
    }

    /// Placement of piece `i`.
    pub fn placement(&self, i: usize) -> (f64, f64) {
        (self.genes[2 * i], self.genes[2 * i + 1])
    }

    pub fn placements(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.genes.chunks_exact(2).map(|xy| (xy[0], xy[1]))
    }

    /// Computes, caches and returns the objective value.
    pub fn evaluate<S: Objective + ?Sized>(&mut self, objective: &S) -> f64 {
        let f = objective.evaluate(&self.genes);
        self.fitness = Some(f);
        f
    }

    /// The cached fitness; an error if [`Genome::evaluate`] has not run.
    pub fn fitness(&self) -> NestResult<f64> {
        self.fitness.ok_or(NestError::UninitializedGenome)
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Resamples each gene with probability `rate`, drawing replacements from a
    /// fresh random genome of the same size. The receiver is left untouched.
    pub fn mutate(&self, rate: f64, ws: &Workspace, rng: &mut Rng) -> NestResult<Genome> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(NestError::InvalidConfiguration(format!(
                "mutation rate must lie in [0, 1], got {}",
                rate
            )));
        }

        let donor = Genome::from_random(self.piece_count(), ws, rng)?;
        let genes = self
            .genes
            .iter()
            .zip(donor.genes)
            .map(|(&own, fresh)| if rng.f64() < rate { fresh } else { own })
            .collect();

        Ok(Self::unevaluated(genes))
    }

    /// The point `scale` of the way from `self` towards `other`.
    pub fn blend(&self, other: &Genome, scale: f64) -> Genome {
        debug_assert_eq!(self.len(), other.len());
        let genes = self
            .genes
            .iter()
            .zip(&other.genes)
            .map(|(&a, &b)| a + scale * (b - a))
            .collect();
        Self::unevaluated(genes)
    }
}

fn check_length(len: usize) -> NestResult<()> {
    if len == 0 || len % 2 != 0 {
        return Err(NestError::InvalidConfiguration(format!(
            "genome length must be a positive even number, got {}",
            len
        )));
    }
    Ok(())
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Genome with design vector: {:?}", self.genes)
    }
}
