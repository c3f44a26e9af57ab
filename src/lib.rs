#![deny(missing_docs)]
//! # cfrec
//!
//! `cfrec` implements neighbourhood-based collaborative filtering over
//! explicit ratings: given a matrix of user-item ratings, it recommends
//! the items a user is most likely to enjoy, either from the ratings of
//! similar users (user-based mode) or from the similarity between the
//! items themselves (item-based mode).
//!
//! All model state is built once from a training set of ratings into an
//! immutable [`models::Snapshot`] which any number of threads can query
//! concurrently; rebuilding on new data means building a fresh snapshot
//! and swapping it in via [`models::Serving`].
//!
//! ## Example
//! ```rust
//! # extern crate cfrec;
//! use std::sync::Arc;
//!
//! use cfrec::data::{Rating, Ratings};
//! use cfrec::models::{Mode, Recommender, Snapshot};
//! use cfrec::RankingModel;
//!
//! let ratings = Ratings::from(vec![
//!     Rating::new(1, 1, 5, 0),
//!     Rating::new(1, 2, 3, 1),
//!     Rating::new(2, 1, 4, 2),
//!     Rating::new(2, 4, 5, 3),
//!     Rating::new(3, 3, 5, 4),
//!     Rating::new(3, 4, 4, 5),
//! ]);
//!
//! let snapshot = Arc::new(Snapshot::build(&ratings));
//! let model = Recommender::new(Mode::User, snapshot).unwrap();
//!
//! let recommendations = model.recommend(1, 1).unwrap();
//! assert_eq!(recommendations[0].item_id, 4);
//! ```
#[macro_use]
extern crate serde_derive;

#[macro_use]
extern crate itertools;

#[cfg(feature = "default")]
extern crate csv;
#[macro_use]
extern crate failure;
extern crate ndarray;
extern crate rand;
extern crate rayon;
extern crate serde;
extern crate siphasher;

#[cfg(feature = "default")]
extern crate reqwest;

pub mod data;
#[cfg(feature = "default")]
pub mod datasets;
pub mod evaluation;
pub mod matrix;
pub mod models;
pub mod similarity;

/// Alias for user ids.
pub type UserId = usize;
/// Alias for item ids.
pub type ItemId = usize;
/// Alias for timestamps.
pub type Timestamp = usize;

/// A recommended item together with its predicted score.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoredItem {
    /// Id of the recommended item.
    pub item_id: ItemId,
    /// Similarity-weighted score; higher means more strongly recommended.
    pub score: f32,
}

/// Recoverable recommendation outcomes.
///
/// Both variants are expected results the caller must branch on, not
/// crate misuse: unknown entities and fully-filtered candidate sets
/// occur with perfectly well-formed inputs.
#[derive(Clone, Debug, Fail, PartialEq)]
pub enum RecommendationError {
    /// The requested entity does not appear in the training data.
    #[fail(display = "entity {} is not present in the training data", _0)]
    EntityNotFound(usize),
    /// Every candidate was filtered out, or the target has nothing to
    /// score with; there is nothing left to recommend.
    #[fail(display = "no candidate items remain to be recommended")]
    NoRecommendations,
}

/// Contract violations detected when building a model.
///
/// Unlike [`RecommendationError`], these indicate a misconfigured
/// caller and abort construction.
#[derive(Clone, Debug, Fail, PartialEq)]
pub enum ConstructionError {
    /// Item-based mode requires a snapshot that carries the item-user
    /// matrix and the item similarity matrix.
    #[fail(display = "item-based mode requires an item-user matrix and item similarity matrix")]
    MissingAuxiliaryData,
}

/// Trait describing models that can produce ranked top-N
/// recommendations for a user.
pub trait RankingModel {
    /// Return up to `top_n` items the user has not yet rated, in
    /// descending order of predicted score (ties broken by ascending
    /// item id).
    fn recommend(
        &self,
        user_id: UserId,
        top_n: usize,
    ) -> Result<Vec<ScoredItem>, RecommendationError>;
}
