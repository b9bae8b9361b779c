pub mod oracle;

use crate::error::{NestError, NestResult};
use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use self::oracle::{overlapping_pairs, OverlapOracle, PolygonOracle};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// Axis-aligned bounds `(min, max)` of a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

/// A closed pattern-piece outline plus the reference point a genome places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPolygon")]
pub struct Polygon {
    points: Vec<Point>,
    reference: Point,
}

#[derive(Deserialize)]
struct RawPolygon {
    points: Vec<Point>,
    reference: Point,
}

impl TryFrom<RawPolygon> for Polygon {
    type Error = NestError;

    fn try_from(raw: RawPolygon) -> NestResult<Self> {
        Polygon::with_reference(raw.points, raw.reference)
    }
}

impl Polygon {
    /// Builds an outline whose reference point is the vertex centroid.
    /// A repeated closing vertex is dropped.
    pub fn new(points: Vec<Point>) -> NestResult<Self> {
        let points = Self::normalize(points)?;
        let reference = vertex_centroid(&points);
        Ok(Self { points, reference })
    }

    pub fn with_reference(points: Vec<Point>, reference: Point) -> NestResult<Self> {
        let points = Self::normalize(points)?;
        if !reference.x.is_finite() || !reference.y.is_finite() {
            return Err(NestError::Geometry("reference point is not finite".into()));
        }
        Ok(Self { points, reference })
    }

    fn normalize(mut points: Vec<Point>) -> NestResult<Vec<Point>> {
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < 3 {
            return Err(NestError::Geometry(format!(
                "an outline needs at least 3 distinct vertices, got {}",
                points.len()
            )));
        }
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(NestError::Geometry("outline contains a non-finite vertex".into()));
        }
        Ok(points)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn reference(&self) -> Point {
        self.reference
    }

    /// Copy of the outline moved so its reference point sits at `(x, y)`.
    pub fn translated_to(&self, x: f64, y: f64) -> Polygon {
        let dx = x - self.reference.x;
        let dy = y - self.reference.y;
        Polygon {
            points: self
                .points
                .iter()
                .map(|p| Point::new(p.x + dx, p.y + dy))
                .collect(),
            reference: Point::new(x, y),
        }
    }

    pub fn bounds(&self) -> Bounds {
        let (min_x, max_x) = min_max(self.points.iter().map(|p| p.x));
        let (min_y, max_y) = min_max(self.points.iter().map(|p| p.y));
        Bounds {
            min: Point::new(min_x, min_y),
            max: Point::new(max_x, max_y),
        }
    }

    /// Closed edge iterator, last vertex back to the first.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points
            .iter()
            .copied()
            .circular_tuple_windows::<(Point, Point)>()
    }
}

/// `(min, max)` of a sequence, `(0, 0)` when empty.
pub fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    match values.minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::NoElements => (0.0, 0.0),
        MinMaxResult::OneElement(v) => (v, v),
        MinMaxResult::MinMax(lo, hi) => (lo, hi),
    }
}

fn vertex_centroid(points: &[Point]) -> Point {
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    #[serde(default)]
    pub name: String,
    pub points: Vec<Point>,
    #[serde(default)]
    pub reference: Option<Point>,
}

/// File shape for a set of pattern pieces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PieceDefinition {
    pub pieces: Vec<Piece>,
}

/// The fixed, ordered outlines a genome assigns placements to.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceSet {
    names: Vec<String>,
    outlines: Vec<Polygon>,
}

impl PieceSet {
    pub fn new(outlines: Vec<Polygon>) -> NestResult<Self> {
        if outlines.is_empty() {
            return Err(NestError::InvalidConfiguration(
                "at least one pattern piece is required".into(),
            ));
        }
        let names = (0..outlines.len()).map(|i| format!("piece_{}", i)).collect();
        Ok(Self { names, outlines })
    }

    pub fn from_definition(def: PieceDefinition) -> NestResult<Self> {
        let mut names = Vec::with_capacity(def.pieces.len());
        let mut outlines = Vec::with_capacity(def.pieces.len());

        for (i, piece) in def.pieces.into_iter().enumerate() {
            let outline = match piece.reference {
                Some(r) => Polygon::with_reference(piece.points, r),
                None => Polygon::new(piece.points),
            }
            .map_err(|e| NestError::Geometry(format!("piece {}: {}", i, e)))?;

            names.push(if piece.name.is_empty() {
                format!("piece_{}", i)
            } else {
                piece.name
            });
            outlines.push(outline);
        }

        let mut set = Self::new(outlines)?;
        set.names = names;
        Ok(set)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> NestResult<Self> {
        let content = fs::read_to_string(path)?;
        let def: PieceDefinition = serde_json::from_str(&content)?;
        Self::from_definition(def)
    }

    pub fn len(&self) -> usize {
        self.outlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outlines.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn outlines(&self) -> &[Polygon] {
        &self.outlines
    }

    /// The reference points as a flat `[x0, y0, x1, y1, ...]` vector.
    pub fn reference_genes(&self) -> Vec<f64> {
        self.outlines
            .iter()
            .flat_map(|o| {
                let r = o.reference();
                [r.x, r.y]
            })
            .collect()
    }

    /// Outlines moved to the coordinate pairs in `genes`.
    pub fn place(&self, genes: &[f64]) -> Vec<Polygon> {
        self.outlines
            .iter()
            .zip(genes.chunks_exact(2))
            .map(|(outline, xy)| outline.translated_to(xy[0], xy[1]))
            .collect()
    }
}
