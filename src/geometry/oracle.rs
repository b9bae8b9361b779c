use super::{Point, Polygon};
use crate::workspace::Workspace;

/// Answers the two feasibility questions the overlap-aware objective asks
/// about placed outlines.
pub trait OverlapOracle: Send + Sync {
    fn overlaps(&self, a: &Polygon, b: &Polygon) -> bool;
    fn exceeds_workspace(&self, polygon: &Polygon, workspace: &Workspace) -> bool;
}

/// Plain vertex/edge tests on simple polygons.
///
/// Two outlines overlap when their boundaries touch or cross, or when one
/// lies entirely inside the other. An outline exceeds the workspace when any
/// vertex falls outside the rectangle widened by the workspace tolerance.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolygonOracle;

impl OverlapOracle for PolygonOracle {
    fn overlaps(&self, a: &Polygon, b: &Polygon) -> bool {
        if !a.bounds().intersects(&b.bounds()) {
            return false;
        }

        for (p1, p2) in a.edges() {
            for (q1, q2) in b.edges() {
                if segments_intersect(p1, p2, q1, q2) {
                    return true;
                }
            }
        }

        // No boundary contact: either disjoint or nested.
        point_in_polygon(a.points()[0], b.points()) || point_in_polygon(b.points()[0], a.points())
    }

    fn exceeds_workspace(&self, polygon: &Polygon, workspace: &Workspace) -> bool {
        polygon.points().iter().any(|p| !workspace.admits(p.x, p.y))
    }
}

/// All index pairs `(i, j)`, `i < j`, whose placed outlines overlap.
pub fn overlapping_pairs<O: OverlapOracle + ?Sized>(
    placed: &[Polygon],
    oracle: &O,
) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..placed.len() {
        for j in (i + 1)..placed.len() {
            if oracle.overlaps(&placed[i], &placed[j]) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

#[inline(always)]
fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

#[inline(always)]
fn on_segment(p: Point, q: Point, r: Point) -> bool {
    r.x >= p.x.min(q.x) && r.x <= p.x.max(q.x) && r.y >= p.y.min(q.y) && r.y <= p.y.max(q.y)
}

/// Closed-segment intersection; touching endpoints count.
pub fn segments_intersect(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    let d1 = cross(q1, q2, p1);
    let d2 = cross(q1, q2, p2);
    let d3 = cross(p1, p2, q1);
    let d4 = cross(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}

/// Even-odd ray casting.
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
    let n = polygon.len();
    let mut inside = false;

    let mut j = n - 1;
    for i in 0..n {
        let pi = polygon[i];
        let pj = polygon[j];
        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}
