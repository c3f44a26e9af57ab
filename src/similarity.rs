//! Pairwise cosine similarity between the rows of an interaction
//! matrix.
use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;

use matrix::InteractionMatrix;

/// A square, symmetric matrix of pairwise similarities, indexed by the
/// row ids of the interaction matrix it was computed from.
///
/// Entries lie in `[0, 1]` for nonnegative inputs. The diagonal is
/// exactly `1.0` for rows with at least one nonzero entry and `0.0`
/// for all-zero rows, per the zero-norm rule of [`cosine_similarity`].
#[derive(Clone, Debug, PartialEq)]
pub struct SimilarityMatrix {
    ids: Vec<usize>,
    values: Array2<f32>,
}

impl SimilarityMatrix {
    /// The entity ids indexing both axes.
    pub fn ids(&self) -> &[usize] {
        &self.ids
    }

    /// Position of `id` in the index, if present.
    pub fn index(&self, id: usize) -> Option<usize> {
        self.ids.binary_search(&id).ok()
    }

    /// The similarity between two entities, if both are indexed.
    pub fn get(&self, id_a: usize, id_b: usize) -> Option<f32> {
        let a = self.index(id_a)?;
        let b = self.index(id_b)?;

        Some(self.values[[a, b]])
    }

    /// View of the similarity row at position `idx`.
    pub fn row(&self, idx: usize) -> ArrayView1<f32> {
        self.values.row(idx)
    }

    /// The underlying dense array.
    pub fn values(&self) -> &Array2<f32> {
        &self.values
    }

    /// Number of entities indexed.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True if no entities are indexed.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Check the symmetry invariant over every entry pair.
    pub fn is_symmetric(&self) -> bool {
        let n = self.ids.len();

        iproduct!(0..n, 0..n).all(|(i, j)| self.values[[i, j]] == self.values[[j, i]])
    }
}

/// Compute the symmetric cosine similarity matrix over the rows of an
/// interaction matrix.
///
/// `sim(a, b) = dot(a, b) / (||a|| * ||b||)`, with one exception: if
/// either row has zero norm (the entity has no recorded interactions),
/// the similarity is defined as `0.0` for every pair involving it,
/// including its own diagonal entry. No entry is ever NaN.
///
/// The upper triangle is computed once and mirrored, so the result is
/// symmetric by construction rather than by rounding luck.
pub fn cosine_similarity(matrix: &InteractionMatrix) -> SimilarityMatrix {
    let (num_rows, _) = matrix.shape();

    let norms: Vec<f32> = (0..num_rows)
        .map(|idx| matrix.row(idx).dot(&matrix.row(idx)).sqrt())
        .collect();

    let triangles: Vec<Vec<f32>> = (0..num_rows)
        .into_par_iter()
        .map(|i| {
            (i..num_rows)
                .map(|j| {
                    if norms[i] == 0.0 || norms[j] == 0.0 {
                        0.0
                    } else if i == j {
                        1.0
                    } else {
                        matrix.row(i).dot(&matrix.row(j)) / (norms[i] * norms[j])
                    }
                })
                .collect()
        })
        .collect();

    let mut values = Array2::<f32>::zeros((num_rows, num_rows));

    for (i, triangle) in triangles.iter().enumerate() {
        for (offset, &similarity) in triangle.iter().enumerate() {
            let j = i + offset;

            values[[i, j]] = similarity;
            values[[j, i]] = similarity;
        }
    }

    SimilarityMatrix {
        ids: matrix.row_ids().to_vec(),
        values: values,
    }
}
