use criterion::{criterion_group, criterion_main, Criterion};

use test_fixtures::{gaussian_blobs, BlobSpec};
use topiary_core::config::Linkage;
use topiary_hierarchy::{medoid_vectors, Dendrogram, TopicTree};

fn bench_dendrogram_200_medoids(c: &mut Criterion) {
    let sizes = vec![5; 200];
    let corpus = gaussian_blobs(&BlobSpec::new(&sizes, 0).with_dimension(64));
    let medoids = medoid_vectors(&corpus.embeddings, &corpus.truth);

    c.bench_function("dendrogram_200_medoids_average", |b| {
        b.iter(|| Dendrogram::from_medoids(&medoids, Linkage::Average).unwrap());
    });

    let dendrogram = Dendrogram::from_medoids(&medoids, Linkage::Average).unwrap();
    c.bench_function("cut_table_and_tree_200_leaves", |b| {
        b.iter(|| {
            let table = dendrogram.cut_table(&dendrogram.auto_thresholds(8));
            TopicTree::from_cut_table(&table, &Default::default()).unwrap()
        });
    });
}

criterion_group!(benches, bench_dendrogram_200_medoids);
criterion_main!(benches);
