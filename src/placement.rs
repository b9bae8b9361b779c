use crate::error::{NestError, NestResult};
use crate::genome::Genome;
use crate::geometry::PieceSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedPiece {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

/// A named placement as written by `search --output` and read by `check`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    pub pieces: Vec<PlacedPiece>,
}

impl PlacementFile {
    pub fn from_genome(pieces: &PieceSet, genome: &Genome) -> Self {
        let placed = pieces
            .names()
            .iter()
            .zip(genome.placements())
            .map(|(name, (x, y))| PlacedPiece {
                name: name.clone(),
                x,
                y,
            })
            .collect();

        Self {
            fitness: genome.fitness().ok(),
            fingerprint: None,
            pieces: placed,
        }
    }

    pub fn with_fingerprint(mut self, fingerprint: String) -> Self {
        self.fingerprint = Some(fingerprint);
        self
    }

    /// Genes in piece-set order. Entries are matched to pieces by position;
    /// names are only checked when both sides carry one.
    pub fn to_genome(&self, pieces: &PieceSet) -> NestResult<Genome> {
        if self.pieces.len() != pieces.len() {
            return Err(NestError::InvalidConfiguration(format!(
                "placement lists {} pieces, the piece file has {}",
                self.pieces.len(),
                pieces.len()
            )));
        }

        for (placed, name) in self.pieces.iter().zip(pieces.names()) {
            if !placed.name.is_empty() && placed.name != *name {
                return Err(NestError::InvalidConfiguration(format!(
                    "placement entry '{}' does not match piece '{}'",
                    placed.name, name
                )));
            }
        }

        Genome::from_vector(self.pieces.iter().flat_map(|p| [p.x, p.y]).collect())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> NestResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> NestResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Polygon};
    use tempfile::tempdir;

    fn triangle() -> Polygon {
        Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(0.0, 3.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_file_round_trip_restores_genes() {
        let pieces = PieceSet::new(vec![triangle(), triangle()]).unwrap();
        let genome = Genome::from_vector(vec![10.0, 20.0, 30.0, 40.0]).unwrap();
        let file = PlacementFile::from_genome(&pieces, &genome).with_fingerprint("ab".into());

        let dir = tempdir().unwrap();
        let path = dir.path().join("placement.json");
        file.save_to_file(&path).unwrap();

        let loaded = PlacementFile::load_from_file(&path).unwrap();
        assert_eq!(loaded, file);
        assert_eq!(loaded.pieces[1].name, "piece_1");
        assert_eq!(loaded.to_genome(&pieces).unwrap().genes(), genome.genes());
    }

    #[test]
    fn test_mismatched_placement_rejected() {
        let pieces = PieceSet::new(vec![triangle()]).unwrap();
        let two = PlacementFile {
            fitness: None,
            fingerprint: None,
            pieces: vec![
                PlacedPiece {
                    name: String::new(),
                    x: 0.0,
                    y: 0.0,
                },
                PlacedPiece {
                    name: String::new(),
                    x: 1.0,
                    y: 1.0,
                },
            ],
        };
        assert!(two.to_genome(&pieces).is_err());

        let renamed = PlacementFile {
            fitness: None,
            fingerprint: None,
            pieces: vec![PlacedPiece {
                name: "sleeve".into(),
                x: 0.0,
                y: 0.0,
            }],
        };
        assert!(renamed.to_genome(&pieces).is_err());
    }
}
