//! Evaluation of recommendation quality on held-out ratings.
use std::collections::HashSet;

use rayon::prelude::*;

use data::Ratings;
use {ItemId, RankingModel, UserId};

/// Minimum held-out score for an item to count as relevant.
const RELEVANCE_THRESHOLD: u8 = 4;

/// Compute precision@k for a single user against held-out test
/// ratings.
///
/// Relevant items are those the user scored at least 4 in the test
/// set. Returns `None` when the metric is undefined: the user has no
/// test ratings, the model does not know them, or there was nothing to
/// recommend. The denominator is always the requested `k`, even if
/// fewer than `k` recommendations come back; `k` must be positive
/// (callers validate their inputs before evaluating).
pub fn precision_at_k<T: RankingModel>(
    model: &T,
    test: &Ratings,
    user_id: UserId,
    k: usize,
) -> Option<f32> {
    if !test.contains_user(user_id) {
        return None;
    }

    let recommendations = match model.recommend(user_id, k) {
        Ok(recommendations) => recommendations,
        Err(_) => return None,
    };

    if recommendations.is_empty() {
        return None;
    }

    let relevant: HashSet<ItemId> = test
        .data()
        .iter()
        .filter(|rating| {
            rating.user_id() == user_id && rating.score() >= RELEVANCE_THRESHOLD
        })
        .map(|rating| rating.item_id())
        .collect();

    let hits = recommendations
        .iter()
        .filter(|scored| relevant.contains(&scored.item_id))
        .count();

    Some(hits as f32 / k as f32)
}

/// Mean precision@k over every distinct user in the test set.
///
/// Users for whom the metric is undefined are skipped; returns `None`
/// if it is undefined for all of them.
pub fn mean_precision_at_k<T: RankingModel + Sync>(
    model: &T,
    test: &Ratings,
    k: usize,
) -> Option<f32> {
    let precisions: Vec<f32> = test
        .user_ids()
        .par_iter()
        .filter_map(|&user_id| precision_at_k(model, test, user_id, k))
        .collect();

    if precisions.is_empty() {
        None
    } else {
        Some(precisions.iter().sum::<f32>() / precisions.len() as f32)
    }
}

#[cfg(test)]
mod tests {

    use std::sync::Arc;

    use super::*;
    use data::{Rating, Ratings};
    use models::{Mode, Recommender, Snapshot};
    use {RecommendationError, ScoredItem};

    struct Fixed(Vec<ScoredItem>);

    impl RankingModel for Fixed {
        fn recommend(
            &self,
            _user_id: UserId,
            top_n: usize,
        ) -> Result<Vec<ScoredItem>, RecommendationError> {
            let mut recommendations = self.0.clone();
            recommendations.truncate(top_n);

            Ok(recommendations)
        }
    }

    fn scored(item_id: ItemId, score: f32) -> ScoredItem {
        ScoredItem {
            item_id: item_id,
            score: score,
        }
    }

    #[test]
    fn absent_when_user_has_no_test_ratings() {
        let model = Fixed(vec![scored(4, 1.0)]);
        let test = Ratings::from(vec![Rating::new(1, 4, 5, 0)]);

        assert_eq!(precision_at_k(&model, &test, 2, 5), None);
    }

    #[test]
    fn denominator_is_the_requested_k() {
        // Relevant set {4}; two recommendations for k = 5 still divide
        // by 5.
        let model = Fixed(vec![scored(4, 1.0), scored(3, 0.5)]);
        let test = Ratings::from(vec![
            Rating::new(1, 4, 5, 0),
            Rating::new(1, 7, 2, 1),
        ]);

        assert_eq!(precision_at_k(&model, &test, 1, 5), Some(0.2));
    }

    #[test]
    fn low_scored_test_items_are_not_relevant() {
        let model = Fixed(vec![scored(7, 1.0)]);
        let test = Ratings::from(vec![Rating::new(1, 7, 2, 0)]);

        assert_eq!(precision_at_k(&model, &test, 1, 1), Some(0.0));
    }

    #[test]
    fn precision_is_bounded() {
        let model = Fixed(vec![scored(4, 1.0), scored(5, 0.9)]);
        let test = Ratings::from(vec![
            Rating::new(1, 4, 5, 0),
            Rating::new(1, 5, 4, 1),
        ]);

        let precision = precision_at_k(&model, &test, 1, 2).unwrap();

        assert!(precision >= 0.0 && precision <= 1.0);
        assert_eq!(precision, 1.0);
    }

    #[test]
    fn end_to_end_with_a_user_based_model() {
        let train = Ratings::from(vec![
            Rating::new(1, 1, 5, 0),
            Rating::new(1, 2, 3, 1),
            Rating::new(2, 1, 4, 2),
            Rating::new(2, 4, 5, 3),
            Rating::new(3, 3, 5, 4),
            Rating::new(3, 4, 4, 5),
        ]);
        let test = Ratings::from(vec![Rating::new(1, 4, 5, 6)]);

        let model = Recommender::new(Mode::User, Arc::new(Snapshot::build(&train))).unwrap();

        // Item 4 is both the top recommendation and the only relevant
        // test item.
        assert_eq!(precision_at_k(&model, &test, 1, 1), Some(1.0));
        assert_eq!(mean_precision_at_k(&model, &test, 1), Some(1.0));
    }

    #[test]
    fn mean_precision_skips_undefined_users() {
        let model = Fixed(vec![]);
        let test = Ratings::from(vec![Rating::new(1, 4, 5, 0)]);

        // The model returns nothing, so no user has a defined metric.
        assert_eq!(mean_precision_at_k(&model, &test, 5), None);
    }
}
