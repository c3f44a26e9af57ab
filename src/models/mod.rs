//! Neighbourhood recommendation models.
pub mod item_knn;
pub mod user_knn;

use std::sync::{Arc, RwLock};

use data::Ratings;
use matrix::{Aggregation, InteractionMatrix, Orientation};
use similarity::{cosine_similarity, SimilarityMatrix};
use {ConstructionError, RankingModel, RecommendationError, ScoredItem, UserId};

/// Filtering mode of a [`Recommender`].
///
/// The enum is exhaustive, so a misconfigured mode is unrepresentable;
/// there is no "invalid mode" error to handle at call time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// User-based collaborative filtering: score items by the ratings
    /// of similar users.
    User,
    /// Item-based collaborative filtering: score items by their
    /// similarity to the items the user has already rated.
    Item,
}

/// An immutable bundle of the matrices a serving session needs.
///
/// A snapshot is built once from a fixed training set and never
/// mutated; it can be shared behind an `Arc` and read from any number
/// of threads without locking. Incorporating new ratings means
/// building a brand-new snapshot and swapping it in (see [`Serving`]).
#[derive(Clone, Debug)]
pub struct Snapshot {
    user_matrix: InteractionMatrix,
    user_similarity: SimilarityMatrix,
    item_matrix: Option<InteractionMatrix>,
    item_similarity: Option<SimilarityMatrix>,
}

impl Snapshot {
    /// Build a snapshot carrying both the user side and the item side,
    /// with mean aggregation of duplicate ratings.
    pub fn build(ratings: &Ratings) -> Self {
        SnapshotBuilder::new().build(ratings)
    }

    /// The user-item matrix.
    pub fn user_matrix(&self) -> &InteractionMatrix {
        &self.user_matrix
    }

    /// The user-user similarity matrix.
    pub fn user_similarity(&self) -> &SimilarityMatrix {
        &self.user_similarity
    }

    /// The item-user matrix, if the item side was built.
    pub fn item_matrix(&self) -> Option<&InteractionMatrix> {
        self.item_matrix.as_ref()
    }

    /// The item-item similarity matrix, if the item side was built.
    pub fn item_similarity(&self) -> Option<&SimilarityMatrix> {
        self.item_similarity.as_ref()
    }
}

/// Configures and builds [`Snapshot`]s.
#[derive(Clone, Debug)]
pub struct SnapshotBuilder {
    aggregation: Aggregation,
    with_item_side: bool,
}

impl SnapshotBuilder {
    /// Build new snapshot settings: mean aggregation, item side
    /// included.
    pub fn new() -> Self {
        SnapshotBuilder {
            aggregation: Aggregation::Mean,
            with_item_side: true,
        }
    }

    /// Set the duplicate-rating aggregation policy.
    pub fn aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Set whether the item-user matrix and item similarity matrix are
    /// built. Skipping them roughly halves build time but restricts
    /// the snapshot to user-based recommenders.
    pub fn with_item_side(mut self, with_item_side: bool) -> Self {
        self.with_item_side = with_item_side;
        self
    }

    /// Build a snapshot from the given training ratings.
    ///
    /// Both orientations are pivoted independently from the same
    /// rating stream, so the duplicate-aggregation policy applies
    /// identically to each.
    pub fn build(&self, ratings: &Ratings) -> Snapshot {
        let user_matrix =
            InteractionMatrix::from_ratings(ratings, Orientation::UserItem, self.aggregation);
        let user_similarity = cosine_similarity(&user_matrix);

        let (item_matrix, item_similarity) = if self.with_item_side {
            let item_matrix =
                InteractionMatrix::from_ratings(ratings, Orientation::ItemUser, self.aggregation);
            let item_similarity = cosine_similarity(&item_matrix);

            (Some(item_matrix), Some(item_similarity))
        } else {
            (None, None)
        };

        Snapshot {
            user_matrix: user_matrix,
            user_similarity: user_similarity,
            item_matrix: item_matrix,
            item_similarity: item_similarity,
        }
    }
}

/// A collaborative filtering recommender reading from an immutable
/// snapshot.
#[derive(Clone, Debug)]
pub struct Recommender {
    mode: Mode,
    snapshot: Arc<Snapshot>,
}

impl Recommender {
    /// Build a recommender over `snapshot` in the given mode.
    ///
    /// Fails with [`ConstructionError::MissingAuxiliaryData`] if item
    /// mode is requested but the snapshot was built without its item
    /// side; this is checked here, once, rather than on every call.
    pub fn new(mode: Mode, snapshot: Arc<Snapshot>) -> Result<Self, ConstructionError> {
        if mode == Mode::Item
            && (snapshot.item_matrix().is_none() || snapshot.item_similarity().is_none())
        {
            return Err(ConstructionError::MissingAuxiliaryData);
        }

        Ok(Recommender {
            mode: mode,
            snapshot: snapshot,
        })
    }

    /// The filtering mode of this recommender.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The snapshot this recommender reads from.
    pub fn snapshot(&self) -> &Arc<Snapshot> {
        &self.snapshot
    }
}

impl RankingModel for Recommender {
    fn recommend(
        &self,
        user_id: UserId,
        top_n: usize,
    ) -> Result<Vec<ScoredItem>, RecommendationError> {
        match self.mode {
            Mode::User => user_knn::recommend(
                &self.snapshot.user_matrix,
                &self.snapshot.user_similarity,
                user_id,
                top_n,
            ),
            // Presence of the item side is guaranteed by `new`.
            Mode::Item => item_knn::recommend(
                self.snapshot.item_matrix.as_ref().unwrap(),
                self.snapshot.item_similarity.as_ref().unwrap(),
                user_id,
                top_n,
            ),
        }
    }
}

/// Handle for the build, serve, rebuild-and-swap lifecycle.
///
/// Readers take a cheap `Arc` clone of the active snapshot and keep
/// using it for as long as they like; `swap` atomically replaces the
/// active reference without disturbing reads already in flight.
#[derive(Debug)]
pub struct Serving {
    active: RwLock<Arc<Snapshot>>,
}

impl Serving {
    /// Start serving the given snapshot.
    pub fn new(snapshot: Snapshot) -> Self {
        Serving {
            active: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// The currently active snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.active
            .read()
            .expect("snapshot lock poisoned")
            .clone()
    }

    /// Replace the active snapshot.
    pub fn swap(&self, snapshot: Snapshot) {
        *self.active.write().expect("snapshot lock poisoned") = Arc::new(snapshot);
    }
}

/// Sort scored candidates into their final presentation order:
/// descending by score, ties broken by ascending item id, truncated to
/// `top_n`.
fn rank(mut candidates: Vec<ScoredItem>, top_n: usize) -> Vec<ScoredItem> {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(::std::cmp::Ordering::Equal)
            .then(a.item_id.cmp(&b.item_id))
    });
    candidates.truncate(top_n);

    candidates
}
