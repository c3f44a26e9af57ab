//! Item-based collaborative filtering.
//!
//! Accumulates, for every candidate item, the similarity to each item
//! the target user has rated, weighted by that rating. Pure additive
//! accumulation: no normalisation, and an item's own self-term is
//! included before rated items are filtered out of the candidates.
use matrix::InteractionMatrix;
use similarity::SimilarityMatrix;
use {RecommendationError, ScoredItem, UserId};

/// Recommend up to `top_n` items for `user_id` from the item-user
/// matrix and the item-item similarity matrix.
pub fn recommend(
    item_matrix: &InteractionMatrix,
    item_similarity: &SimilarityMatrix,
    user_id: UserId,
    top_n: usize,
) -> Result<Vec<ScoredItem>, RecommendationError> {
    let user_col = item_matrix
        .col_index(user_id)
        .ok_or_else(|| RecommendationError::EntityNotFound(user_id))?;

    let (num_items, _) = item_matrix.shape();

    let rated: Vec<usize> = (0..num_items)
        .filter(|&row| item_matrix.row(row)[user_col] != 0.0)
        .collect();

    if rated.is_empty() {
        return Err(RecommendationError::NoRecommendations);
    }

    let mut scores = vec![0.0; num_items];

    for &rated_row in &rated {
        let rating = item_matrix.row(rated_row)[user_col];
        let similarities = item_similarity.row(rated_row);

        for (score, &similarity) in scores.iter_mut().zip(similarities.iter()) {
            *score += similarity * rating;
        }
    }

    let candidates: Vec<ScoredItem> = item_matrix
        .row_ids()
        .iter()
        .enumerate()
        .filter(|&(row, _)| !rated.contains(&row))
        .map(|(row, &item_id)| ScoredItem {
            item_id: item_id,
            score: scores[row],
        })
        .collect();

    if candidates.is_empty() {
        return Err(RecommendationError::NoRecommendations);
    }

    Ok(super::rank(candidates, top_n))
}
