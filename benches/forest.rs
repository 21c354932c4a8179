use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;
use nutriml::balance::Smote;
use nutriml::dataset::InMemoryDataset;
use nutriml::model::{Classifier, InferenceModel, RandomForest, RandomForestParams};

/// Two noisy classes over 12 features, 1 in 10 rows in the minority.
fn survey_like(n: usize) -> InMemoryDataset {
    let n_features = 12;
    let mut rows = Vec::with_capacity(n * n_features);
    let mut y = Vec::with_capacity(n);
    for i in 0..n {
        let class = usize::from(i % 10 == 0);
        for j in 0..n_features {
            let noise = ((i * 31 + j * 17) % 13) as f64 / 13.0;
            rows.push(class as f64 * 1.5 + noise + j as f64 * 0.1);
        }
        y.push(class);
    }
    InMemoryDataset::new(Array2::from_shape_vec((n, n_features), rows).unwrap(), y).unwrap()
}

fn bench_forest_fit(c: &mut Criterion) {
    for size in [100, 500, 2000].iter() {
        let data = survey_like(*size);
        c.bench_with_input(BenchmarkId::new("forest_fit", size), &data, |b, data| {
            let forest = RandomForest::new(RandomForestParams::default());
            b.iter(|| black_box(forest.fit(black_box(data), 2).unwrap()));
        });
    }
}

fn bench_forest_predict(c: &mut Criterion) {
    for size in [100, 500, 2000].iter() {
        let data = survey_like(*size);
        let fitted = RandomForest::new(RandomForestParams::default())
            .fit(&data, 2)
            .unwrap();
        c.bench_with_input(BenchmarkId::new("forest_predict", size), &data, |b, data| {
            b.iter(|| black_box(fitted.predict_batch(black_box(data.x()))));
        });
    }
}

fn bench_smote(c: &mut Criterion) {
    for size in [100, 500, 2000].iter() {
        let data = survey_like(*size);
        c.bench_with_input(BenchmarkId::new("smote", size), &data, |b, data| {
            let smote = Smote::new();
            b.iter(|| black_box(smote.fit_resample(black_box(data), 2).unwrap()));
        });
    }
}

criterion_group!(benches, bench_forest_fit, bench_forest_predict, bench_smote);
criterion_main!(benches);
