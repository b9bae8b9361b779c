use super::{bounding_box_area, Objective};
use crate::geometry::{overlapping_pairs, OverlapOracle, PieceSet, Polygon};
use crate::workspace::Workspace;
use serde::Serialize;
use std::sync::Arc;

/// Feasibility breakdown for one placement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Violations {
    pub overlapping_pairs: usize,
    pub out_of_bounds: usize,
}

impl Violations {
    pub fn is_feasible(&self) -> bool {
        self.overlapping_pairs == 0 && self.out_of_bounds == 0
    }
}

/// Indices of the pieces behind each violation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViolationReport {
    /// Pairs `(i, j)`, `i < j`, whose outlines overlap.
    pub overlapping: Vec<(usize, usize)>,
    pub out_of_bounds: Vec<usize>,
}

impl ViolationReport {
    pub fn inspect<O: OverlapOracle + ?Sized>(
        placed: &[Polygon],
        workspace: &Workspace,
        oracle: &O,
    ) -> Self {
        let out_of_bounds = placed
            .iter()
            .enumerate()
            .filter(|(_, p)| oracle.exceeds_workspace(p, workspace))
            .map(|(i, _)| i)
            .collect();

        Self {
            overlapping: overlapping_pairs(placed, oracle),
            out_of_bounds,
        }
    }

    pub fn counts(&self) -> Violations {
        Violations {
            overlapping_pairs: self.overlapping.len(),
            out_of_bounds: self.out_of_bounds.len(),
        }
    }
}

/// Bounding-box area plus one workspace area per weighted violation.
///
/// Sampled, blended and resampled reference points stay inside the workspace
/// rectangle, so for those the bounding-box term is at most the workspace
/// area. Only when both weights are at least 1.0 does every such feasible
/// placement score below every infeasible one. Smaller weights let a compact
/// infeasible placement beat a sprawling feasible one.
#[derive(Debug, Clone)]
pub struct PenalizedArea<O> {
    pieces: Arc<PieceSet>,
    workspace: Workspace,
    overlap_penalty: f64,
    boundary_penalty: f64,
    oracle: O,
}

impl<O: OverlapOracle> PenalizedArea<O> {
    pub fn new(
        pieces: Arc<PieceSet>,
        workspace: Workspace,
        overlap_penalty: f64,
        boundary_penalty: f64,
        oracle: O,
    ) -> Self {
        Self {
            pieces,
            workspace,
            overlap_penalty,
            boundary_penalty,
            oracle,
        }
    }

    pub fn pieces(&self) -> &PieceSet {
        &self.pieces
    }

    pub fn report(&self, genes: &[f64]) -> ViolationReport {
        ViolationReport::inspect(&self.pieces.place(genes), &self.workspace, &self.oracle)
    }

    pub fn violations(&self, genes: &[f64]) -> Violations {
        self.report(genes).counts()
    }

    pub fn penalty(&self, v: &Violations) -> f64 {
        self.workspace.area()
            * (self.overlap_penalty * v.overlapping_pairs as f64
                + self.boundary_penalty * v.out_of_bounds as f64)
    }
}

impl<O: OverlapOracle> Objective for PenalizedArea<O> {
    fn evaluate(&self, genes: &[f64]) -> f64 {
        let v = self.violations(genes);
        bounding_box_area(genes) + self.penalty(&v)
    }

    fn piece_count(&self) -> Option<usize> {
        Some(self.pieces.len())
    }
}
