use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use riverguard_ml::{ForestConfig, IsolationForest, Sample, NUM_FEATURES};

fn samples(n: usize) -> Vec<Sample> {
    let mut rng = StdRng::seed_from_u64(17);
    (0..n)
        .map(|_| {
            let mut features = [0.0; NUM_FEATURES];
            for f in &mut features {
                *f = rng.gen_range(0.0..100.0);
            }
            Sample::new(features)
        })
        .collect()
}

fn bench_fit(c: &mut Criterion) {
    let window = samples(512);
    c.bench_function("forest_fit_512", |b| {
        b.iter(|| {
            let mut forest = IsolationForest::new(ForestConfig::default());
            forest.fit(black_box(&window)).unwrap();
            forest
        })
    });
}

fn bench_score(c: &mut Criterion) {
    let window = samples(512);
    let mut forest = IsolationForest::new(ForestConfig::default());
    forest.fit(&window).unwrap();

    c.bench_function("forest_score_512", |b| {
        b.iter(|| forest.score_all(black_box(&window)))
    });
}

criterion_group!(benches, bench_fit, bench_score);
criterion_main!(benches);
