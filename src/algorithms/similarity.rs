use crate::algorithms::ranker::descending;
use crate::error::{RecommendError, Result};
use ndarray::{Array2, ArrayView1};
use std::path::Path;

/// Square restaurant-to-restaurant similarity matrix indexed by catalog
/// row position. Read-only once loaded.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    scores: Array2<f32>,
}

impl SimilarityMatrix {
    pub fn new(scores: Array2<f32>) -> Result<Self> {
        let (rows, cols) = scores.dim();
        if rows != cols {
            return Err(RecommendError::DimensionMismatch {
                expected: rows,
                actual: cols,
            });
        }
        Ok(Self { scores })
    }

    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let side = rows.len();
        let mut flat = Vec::with_capacity(side * side);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != side {
                return Err(RecommendError::InvalidArtifact(format!(
                    "similarity row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    side
                )));
            }
            flat.extend(row);
        }

        let scores = Array2::from_shape_vec((side, side), flat)
            .map_err(|e| RecommendError::InvalidArtifact(e.to_string()))?;
        Self::new(scores)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let rows: Vec<Vec<f32>> = serde_json::from_reader(std::io::BufReader::new(file))?;
        let matrix = Self::from_rows(rows)?;
        tracing::info!(
            "Loaded {}x{} similarity matrix from {}",
            matrix.len(),
            matrix.len(),
            path.as_ref().display()
        );
        Ok(matrix)
    }

    pub fn len(&self) -> usize {
        self.scores.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn row(&self, position: usize) -> Option<ArrayView1<'_, f32>> {
        (position < self.len()).then(|| self.scores.row(position))
    }

    /// Returns up to `k` `(position, score)` pairs from `position`'s row,
    /// highest similarity first, never including `position` itself.
    ///
    /// Equal scores keep ascending position order.
    pub fn nearest_neighbors(&self, position: usize, k: usize) -> Result<Vec<(usize, f32)>> {
        let row = self.row(position).ok_or_else(|| {
            RecommendError::not_found(format!("similarity row {}", position))
        })?;

        let mut distances: Vec<(usize, f32)> = row.iter().copied().enumerate().collect();
        distances.sort_by(|a, b| descending(a.1, b.1));

        Ok(distances
            .into_iter()
            .filter(|(i, _)| *i != position)
            .take(k)
            .collect())
    }
}
