pub mod area;
pub mod penalty;

pub use self::area::{bounding_box_area, BoundingBoxArea};
pub use self::penalty::{PenalizedArea, ViolationReport, Violations};

use crate::config::EvolutionConfig;
use crate::error::{NestError, NestResult};
use crate::geometry::{PieceSet, PolygonOracle};
use crate::workspace::Workspace;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum_macros::{Display, EnumIter, EnumString};

/// A minimisation objective over a flat `[x0, y0, x1, y1, ...]` placement.
pub trait Objective: Send + Sync {
    fn evaluate(&self, genes: &[f64]) -> f64;

    /// Number of pieces the objective is bound to, if it is bound to any.
    fn piece_count(&self) -> Option<usize> {
        None
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FitnessMode {
    /// Area of the box spanning all reference points.
    BoundingBox,
    /// Bounding-box area plus overlap and workspace-boundary penalties.
    OverlapAware,
}

/// The objectives the optimizer ships with.
#[derive(Debug, Clone)]
pub enum Scorer {
    BoundingBox(BoundingBoxArea),
    OverlapAware(PenalizedArea<PolygonOracle>),
}

impl Scorer {
    pub fn from_config(
        config: &EvolutionConfig,
        pieces: Option<Arc<PieceSet>>,
        workspace: Workspace,
    ) -> NestResult<Self> {
        match config.fitness_mode {
            FitnessMode::BoundingBox => Ok(Scorer::BoundingBox(BoundingBoxArea)),
            FitnessMode::OverlapAware => {
                let pieces = pieces.ok_or_else(|| {
                    NestError::InvalidConfiguration(
                        "overlap_aware fitness needs the piece outlines".into(),
                    )
                })?;
                Ok(Scorer::OverlapAware(PenalizedArea::new(
                    pieces,
                    workspace,
                    config.overlap_penalty,
                    config.boundary_penalty,
                    PolygonOracle,
                )))
            }
        }
    }

    pub fn mode(&self) -> FitnessMode {
        match self {
            Scorer::BoundingBox(_) => FitnessMode::BoundingBox,
            Scorer::OverlapAware(_) => FitnessMode::OverlapAware,
        }
    }
}

impl Objective for Scorer {
    #[inline(always)]
    fn evaluate(&self, genes: &[f64]) -> f64 {
        match self {
            Scorer::BoundingBox(o) => o.evaluate(genes),
            Scorer::OverlapAware(o) => o.evaluate(genes),
        }
    }

    fn piece_count(&self) -> Option<usize> {
        match self {
            Scorer::BoundingBox(o) => o.piece_count(),
            Scorer::OverlapAware(o) => o.piece_count(),
        }
    }
}
