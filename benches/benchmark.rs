#[macro_use]
extern crate criterion;

extern crate cfrec;
extern crate rand;

use criterion::Criterion;
use rand::{Rng, SeedableRng, XorShiftRng};

use cfrec::data::{Rating, Ratings};
use cfrec::matrix::user_item_matrix;
use cfrec::models::{Mode, Recommender, Snapshot};
use cfrec::similarity::cosine_similarity;
use cfrec::RankingModel;

use std::sync::Arc;

fn synthetic_ratings(num_users: usize, num_items: usize, num_ratings: usize) -> Ratings {
    let mut rng = XorShiftRng::from_seed([17; 16]);

    Ratings::from(
        (0..num_ratings)
            .map(|idx| {
                Rating::new(
                    rng.gen_range(0, num_users),
                    rng.gen_range(0, num_items),
                    rng.gen_range(1, 6),
                    idx,
                )
            })
            .collect::<Vec<_>>(),
    )
}

fn bench_similarity(c: &mut Criterion) {
    c.bench_function("cosine_similarity", |b| {
        let matrix = user_item_matrix(&synthetic_ratings(200, 500, 10_000));

        b.iter(|| cosine_similarity(&matrix))
    });
}

fn bench_recommend(c: &mut Criterion) {
    c.bench_function("recommend_user", |b| {
        let snapshot = Arc::new(Snapshot::build(&synthetic_ratings(200, 500, 10_000)));
        let model = Recommender::new(Mode::User, snapshot).unwrap();

        b.iter(|| model.recommend(0, 10).unwrap())
    });
}

criterion_group!{
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_similarity, bench_recommend
}
criterion_main!(benches);
