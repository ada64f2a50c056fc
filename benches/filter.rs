use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};

use hcommander::prelude::*;

const LABELS: &[&str] = &[
    "Translate", "Rotate", "Scale", "Uniform Scale", "Pivot Translate", "Pivot Rotate", "Shear", "Look At",
    "Volume Merge", "Attribute Wrangle", "Point Velocity", "Group Expression",
];

fn index(n: usize) -> CandidateIndex {
    let items = (0..n).map(|i| {
        let label = LABELS[i % LABELS.len()];
        let name: String = label
            .split(' ')
            .filter_map(|w| w.chars().next())
            .collect::<String>()
            .to_lowercase();
        let candidate = ParmCandidate::tuple(format!("{name}{i}"), label, NamingScheme::Xyzw, 3);
        Arc::new(Candidate::from(candidate)) as Arc<dyn PaletteItem>
    });
    CandidateIndex::build(items)
}

fn criterion_benchmark(c: &mut Criterion) {
    let small = index(300);
    let large = index(20_000);
    let rank_builder = RankBuilder::default();

    c.bench_function("build_index", |b| b.iter(|| index(300)));
    c.bench_function("filter_rank_small", |b| {
        b.iter(|| PaletteEngine::builder().query("ptx").build().run(&small, &rank_builder))
    });
    c.bench_function("filter_rank_large", |b| {
        b.iter(|| PaletteEngine::builder().query("ptx").build().run(&large, &rank_builder))
    });
    c.bench_function("filter_rejects", |b| {
        b.iter(|| PaletteEngine::builder().query("qqq").build().filter(&large))
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = criterion_benchmark
);
criterion_main!(benches);
