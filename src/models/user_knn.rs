//! User-based collaborative filtering.
//!
//! Scores each unseen item by the similarity-weighted mean of the
//! ratings all other users gave it, normalised by the sum of the
//! similarity weights.
use matrix::InteractionMatrix;
use similarity::SimilarityMatrix;
use {RecommendationError, ScoredItem, UserId};

/// Recommend up to `top_n` unseen items for `user_id`.
///
/// The weighted score of an item sums over every other user, not just
/// a top-k neighbourhood. When all similarities to the target are zero
/// the normaliser vanishes and every score is defined as `0.0`; the
/// candidates are then ranked purely by the id tie-break.
pub fn recommend(
    user_matrix: &InteractionMatrix,
    user_similarity: &SimilarityMatrix,
    user_id: UserId,
    top_n: usize,
) -> Result<Vec<ScoredItem>, RecommendationError> {
    let target = user_matrix
        .row_index(user_id)
        .ok_or_else(|| RecommendationError::EntityNotFound(user_id))?;

    let similarities = user_similarity.row(target);
    let target_ratings = user_matrix.row(target);

    // Self-similarity is dropped from the weights.
    let similarity_sum: f32 = similarities
        .iter()
        .enumerate()
        .filter(|&(other, _)| other != target)
        .map(|(_, &similarity)| similarity)
        .sum();

    let (num_users, _) = user_matrix.shape();

    let candidates: Vec<ScoredItem> = user_matrix
        .col_ids()
        .iter()
        .enumerate()
        .filter(|&(col, _)| target_ratings[col] == 0.0)
        .map(|(col, &item_id)| {
            let score = if similarity_sum == 0.0 {
                0.0
            } else {
                let weighted: f32 = (0..num_users)
                    .filter(|&other| other != target)
                    .map(|other| similarities[other] * user_matrix.row(other)[col])
                    .sum();

                weighted / similarity_sum
            };

            ScoredItem {
                item_id: item_id,
                score: score,
            }
        })
        .collect();

    if candidates.is_empty() {
        return Err(RecommendationError::NoRecommendations);
    }

    Ok(super::rank(candidates, top_n))
}

#[cfg(test)]
mod tests {

    use super::*;
    use data::{Rating, Ratings};
    use matrix::user_item_matrix;
    use similarity::cosine_similarity;

    fn scenario() -> (InteractionMatrix, SimilarityMatrix) {
        let matrix = user_item_matrix(&Ratings::from(vec![
            Rating::new(1, 1, 5, 0),
            Rating::new(1, 2, 3, 1),
            Rating::new(2, 1, 4, 2),
            Rating::new(2, 4, 5, 3),
            Rating::new(3, 3, 5, 4),
            Rating::new(3, 4, 4, 5),
        ]));
        let similarity = cosine_similarity(&matrix);

        (matrix, similarity)
    }

    #[test]
    fn scenario_top_recommendation() {
        let (matrix, similarity) = scenario();

        let recommendations = recommend(&matrix, &similarity, 1, 1).unwrap();

        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].item_id, 4);
        assert!((recommendations[0].score - 5.0).abs() < 1e-4);
    }

    #[test]
    fn seen_items_are_never_recommended() {
        let (matrix, similarity) = scenario();

        for &user_id in matrix.row_ids() {
            let recommendations = recommend(&matrix, &similarity, user_id, 10).unwrap();

            for scored in &recommendations {
                assert_eq!(matrix.value(user_id, scored.item_id), Some(0.0));
            }
        }
    }

    #[test]
    fn at_most_top_n_results() {
        let (matrix, similarity) = scenario();

        assert_eq!(recommend(&matrix, &similarity, 1, 1).unwrap().len(), 1);
        // User 1 has two unseen items; asking for more returns both.
        assert_eq!(recommend(&matrix, &similarity, 1, 10).unwrap().len(), 2);
    }

    #[test]
    fn unknown_user_is_entity_not_found() {
        let (matrix, similarity) = scenario();

        assert_eq!(
            recommend(&matrix, &similarity, 99, 5).err(),
            Some(RecommendationError::EntityNotFound(99))
        );
    }

    #[test]
    fn fully_rated_user_has_no_recommendations() {
        let matrix = user_item_matrix(&Ratings::from(vec![
            Rating::new(1, 1, 5, 0),
            Rating::new(1, 2, 3, 1),
            Rating::new(2, 1, 4, 2),
            Rating::new(2, 2, 5, 3),
        ]));
        let similarity = cosine_similarity(&matrix);

        assert_eq!(
            recommend(&matrix, &similarity, 1, 5).err(),
            Some(RecommendationError::NoRecommendations)
        );
    }

    #[test]
    fn orthogonal_users_score_zero_with_id_tie_break() {
        // Users 1 and 2 share no rated items, so all similarities to
        // user 1 are zero and the normaliser vanishes.
        let matrix = user_item_matrix(&Ratings::from(vec![
            Rating::new(1, 1, 5, 0),
            Rating::new(2, 2, 4, 1),
            Rating::new(2, 3, 2, 2),
        ]));
        let similarity = cosine_similarity(&matrix);

        let recommendations = recommend(&matrix, &similarity, 1, 5).unwrap();

        assert_eq!(recommendations.len(), 2);
        assert_eq!(recommendations[0].item_id, 2);
        assert_eq!(recommendations[1].item_id, 3);
        assert!(recommendations.iter().all(|scored| scored.score == 0.0));
    }
}
