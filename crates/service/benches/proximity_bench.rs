use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use service::proximity::{GeoPoint, NearbyQuery, ProximityEngine};

#[derive(Clone)]
struct Candidate {
    id: usize,
    at: Option<GeoPoint>,
}

/// Points spread over roughly a 1x1 degree box around Jakarta, every tenth
/// one without a location.
fn candidates(n: usize) -> Vec<Candidate> {
    (0..n)
        .map(|i| {
            let lat = -6.7 + (i % 100) as f64 * 0.01;
            let lon = 106.3 + (i / 100 % 100) as f64 * 0.01;
            Candidate { id: i, at: (i % 10 != 0).then(|| GeoPoint::new(lat, lon)) }
        })
        .collect()
}

fn bench_find_nearby(c: &mut Criterion) {
    let engine = ProximityEngine::default();
    let query = NearbyQuery::new(GeoPoint::new(-6.1751, 106.8650), 10.0).unwrap();
    let mut group = c.benchmark_group("find_nearby");
    for n in [100usize, 1_000, 10_000] {
        let pool = candidates(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &pool, |b, pool| {
            b.iter(|| {
                let hits = engine.find_nearby(&query, pool.clone(), |c| c.at);
                black_box(hits.first().map(|h| h.item.id));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_find_nearby);
criterion_main!(benches);
