//! Dense interaction matrices built from rating data.
//!
//! An [`InteractionMatrix`] is the pivoted form of a rating collection:
//! one row per entity, one column per counterpart, and the
//! (mean-aggregated) score in each observed cell. Missing cells hold
//! `0.0`. Because valid scores live on a 1-5 scale, the zero sentinel
//! never collides with a real rating; this is the representation of
//! missingness used throughout the crate.
use ndarray::{Array2, ArrayView1};

use data::Ratings;
use {ItemId, UserId};

/// Policy for collapsing duplicate (row, column) observations into a
/// single cell value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aggregation {
    /// Arithmetic mean of the duplicate scores.
    Mean,
}

/// Orientation of an interaction matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// Rows are users, columns are items.
    UserItem,
    /// Rows are items, columns are users.
    ItemUser,
}

/// A dense entity-by-counterpart matrix of aggregated scores.
///
/// Row and column id sets are the sorted, deduplicated ids observed in
/// the source ratings for the respective key role; they are not drawn
/// from any fixed universe. Construction is deterministic: the same
/// rating multiset produces the same matrix regardless of input order.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionMatrix {
    row_ids: Vec<usize>,
    col_ids: Vec<usize>,
    values: Array2<f32>,
}

impl InteractionMatrix {
    /// Pivot a rating collection into a dense matrix.
    ///
    /// Duplicate (row, column) pairs are collapsed according to
    /// `aggregation`; pairs never observed together are filled with the
    /// `0.0` sentinel. An empty rating collection produces an empty
    /// (zero-row) matrix.
    pub fn from_ratings(
        ratings: &Ratings,
        orientation: Orientation,
        aggregation: Aggregation,
    ) -> Self {
        let (row_ids, col_ids) = match orientation {
            Orientation::UserItem => (ratings.user_ids(), ratings.item_ids()),
            Orientation::ItemUser => (ratings.item_ids(), ratings.user_ids()),
        };

        let mut sums = Array2::<f32>::zeros((row_ids.len(), col_ids.len()));
        let mut counts = Array2::<f32>::zeros((row_ids.len(), col_ids.len()));

        for rating in ratings.data() {
            let (row_id, col_id) = match orientation {
                Orientation::UserItem => (rating.user_id(), rating.item_id()),
                Orientation::ItemUser => (rating.item_id(), rating.user_id()),
            };

            // Ids come from this very collection, so the lookups
            // cannot fail.
            let row = row_ids.binary_search(&row_id).unwrap();
            let col = col_ids.binary_search(&col_id).unwrap();

            sums[[row, col]] += f32::from(rating.score());
            counts[[row, col]] += 1.0;
        }

        let values = match aggregation {
            Aggregation::Mean => {
                let mut values = sums;

                for (value, &count) in values.iter_mut().zip(counts.iter()) {
                    if count > 0.0 {
                        *value /= count;
                    }
                }

                values
            }
        };

        InteractionMatrix {
            row_ids: row_ids,
            col_ids: col_ids,
            values: values,
        }
    }

    /// The sorted row ids.
    pub fn row_ids(&self) -> &[usize] {
        &self.row_ids
    }

    /// The sorted column ids.
    pub fn col_ids(&self) -> &[usize] {
        &self.col_ids
    }

    /// Position of `id` in the row index, if present.
    pub fn row_index(&self, id: usize) -> Option<usize> {
        self.row_ids.binary_search(&id).ok()
    }

    /// Position of `id` in the column index, if present.
    pub fn col_index(&self, id: usize) -> Option<usize> {
        self.col_ids.binary_search(&id).ok()
    }

    /// View of the row at position `idx`.
    pub fn row(&self, idx: usize) -> ArrayView1<f32> {
        self.values.row(idx)
    }

    /// The cell value for an (id, id) pair, if both ids are indexed.
    pub fn value(&self, row_id: usize, col_id: usize) -> Option<f32> {
        let row = self.row_index(row_id)?;
        let col = self.col_index(col_id)?;

        Some(self.values[[row, col]])
    }

    /// The underlying dense array.
    pub fn values(&self) -> &Array2<f32> {
        &self.values
    }

    /// (rows, columns) of the matrix.
    pub fn shape(&self) -> (usize, usize) {
        (self.row_ids.len(), self.col_ids.len())
    }

    /// True if the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_ids.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn from_dense(row_ids: Vec<usize>, col_ids: Vec<usize>, values: Array2<f32>) -> Self {
        InteractionMatrix {
            row_ids: row_ids,
            col_ids: col_ids,
            values: values,
        }
    }
}

/// Convenience constructor for the user-item orientation with mean
/// aggregation.
pub fn user_item_matrix(ratings: &Ratings) -> InteractionMatrix {
    InteractionMatrix::from_ratings(ratings, Orientation::UserItem, Aggregation::Mean)
}

/// Convenience constructor for the item-user orientation with mean
/// aggregation.
pub fn item_user_matrix(ratings: &Ratings) -> InteractionMatrix {
    InteractionMatrix::from_ratings(ratings, Orientation::ItemUser, Aggregation::Mean)
}
