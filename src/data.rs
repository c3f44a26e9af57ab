//! Rating records and train/test splitting utilities.
use std::hash::Hasher;

use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use siphasher::sip::SipHasher;

use super::{ItemId, Timestamp, UserId};

/// A single explicit rating of an item by a user.
///
/// Scores live on a 1-5 scale; `0` is never a valid score (it is the
/// missing-cell sentinel of [`matrix::InteractionMatrix`]). The
/// timestamp is carried through from the raw data but ignored by the
/// models.
///
/// [`matrix::InteractionMatrix`]: ../matrix/struct.InteractionMatrix.html
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Rating {
    user_id: UserId,
    item_id: ItemId,
    score: u8,
    timestamp: Timestamp,
}

impl Rating {
    /// Build a new rating.
    pub fn new(user_id: UserId, item_id: ItemId, score: u8, timestamp: Timestamp) -> Self {
        debug_assert!(score >= 1 && score <= 5);

        Rating {
            user_id: user_id,
            item_id: item_id,
            score: score,
            timestamp: timestamp,
        }
    }

    /// The id of the rating user.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// The id of the rated item.
    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    /// The score, in `[1, 5]`.
    pub fn score(&self) -> u8 {
        self.score
    }

    /// Seconds-since-epoch timestamp of the rating event.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

/// Randomly split ratings into training and test sets.
pub fn train_test_split<R: Rng>(
    ratings: &mut Ratings,
    rng: &mut R,
    test_fraction: f32,
) -> (Ratings, Ratings) {
    ratings.shuffle(rng);

    let (test, train) = ratings.split_at((test_fraction * ratings.len() as f32) as usize);

    (train, test)
}

/// Split ratings into training and test sets so that each user's
/// ratings land wholly in one of the two sets.
pub fn user_based_split<R: Rng>(
    ratings: &mut Ratings,
    rng: &mut R,
    test_fraction: f32,
) -> (Ratings, Ratings) {
    let denominator = 100_000;
    let train_cutoff = (test_fraction * denominator as f32) as u64;

    let range = Uniform::new(0, ::std::u64::MAX);
    let (key_0, key_1) = (range.sample(rng), range.sample(rng));

    let is_train = |x: &Rating| {
        let mut hasher = SipHasher::new_with_keys(key_0, key_1);
        hasher.write_usize(x.user_id());
        hasher.finish() % denominator > train_cutoff
    };

    ratings.split_by(is_train)
}

/// A collection of ratings.
#[derive(Clone, Debug)]
pub struct Ratings {
    ratings: Vec<Rating>,
}

impl Ratings {
    /// Build an empty collection.
    pub fn new() -> Self {
        Ratings {
            ratings: Vec::new(),
        }
    }

    /// The contained ratings.
    pub fn data(&self) -> &[Rating] {
        &self.ratings
    }

    /// Number of ratings in the collection.
    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    /// True if the collection holds no ratings.
    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Add a rating.
    pub fn push(&mut self, rating: Rating) {
        self.ratings.push(rating);
    }

    /// Shuffle the ratings in place.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        rng.shuffle(&mut self.ratings);
    }

    /// Split into two collections at the given index.
    pub fn split_at(&self, idx: usize) -> (Self, Self) {
        let head = Ratings {
            ratings: self.ratings[..idx].to_owned(),
        };
        let tail = Ratings {
            ratings: self.ratings[idx..].to_owned(),
        };

        (head, tail)
    }

    /// Split into ratings accepted and rejected by the predicate.
    pub fn split_by<F: Fn(&Rating) -> bool>(&self, func: F) -> (Self, Self) {
        let head = Ratings {
            ratings: self.ratings.iter().filter(|x| func(x)).cloned().collect(),
        };
        let tail = Ratings {
            ratings: self.ratings.iter().filter(|x| !func(x)).cloned().collect(),
        };

        (head, tail)
    }

    /// The sorted, deduplicated set of user ids occurring in the
    /// collection.
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.ratings.iter().map(|x| x.user_id()).collect();
        ids.sort();
        ids.dedup();

        ids
    }

    /// The sorted, deduplicated set of item ids occurring in the
    /// collection.
    pub fn item_ids(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self.ratings.iter().map(|x| x.item_id()).collect();
        ids.sort();
        ids.dedup();

        ids
    }

    /// True if any rating in the collection was made by `user_id`.
    pub fn contains_user(&self, user_id: UserId) -> bool {
        self.ratings.iter().any(|x| x.user_id() == user_id)
    }
}

impl From<Vec<Rating>> for Ratings {
    fn from(data: Vec<Rating>) -> Ratings {
        Ratings { ratings: data }
    }
}

#[cfg(test)]
mod tests {

    use rand::{SeedableRng, XorShiftRng};

    use super::*;

    fn sample_ratings() -> Ratings {
        Ratings::from(
            (0..100)
                .map(|idx| Rating::new(idx % 10, idx % 7, (idx % 5 + 1) as u8, idx))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn split_at_preserves_all_ratings() {
        let ratings = sample_ratings();
        let (head, tail) = ratings.split_at(30);

        assert_eq!(head.len(), 30);
        assert_eq!(tail.len(), 70);
        assert_eq!(head.data(), &ratings.data()[..30]);
        assert_eq!(tail.data(), &ratings.data()[30..]);
    }

    #[test]
    fn user_based_split_partitions_users() {
        let mut ratings = sample_ratings();
        let mut rng = XorShiftRng::from_seed([42; 16]);

        let (train, test) = user_based_split(&mut ratings, &mut rng, 0.5);

        assert_eq!(train.len() + test.len(), 100);

        for user_id in train.user_ids() {
            assert!(!test.contains_user(user_id));
        }
    }

    #[test]
    fn id_sets_are_sorted_and_distinct() {
        let ratings = sample_ratings();

        assert_eq!(ratings.user_ids(), (0..10).collect::<Vec<_>>());
        assert_eq!(ratings.item_ids(), (0..7).collect::<Vec<_>>());
    }
}
