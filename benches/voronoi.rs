use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use tessella::voronoi::VoronoiMap;
use tessella::{Point, Rect};

fn random_sites(n: usize, seed: u64) -> Vec<Point> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| Point::new(rng.gen::<f64>() * 1000., rng.gen::<f64>() * 1000.))
        .collect()
}

fn bench_voronoi(c: &mut Criterion) {
    let clip = Rect::new(Point::new(0., 0.), Point::new(1000., 1000.));
    let mut group = c.benchmark_group("voronoi");
    for n in [10, 100, 1000] {
        let sites = random_sites(n, 0x5EED + n as u64);
        group.bench_with_input(BenchmarkId::new("find_all", n), &sites, |b, sites| {
            b.iter(|| VoronoiMap::find_all(sites, clip).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("delaunay", n), &sites, |b, sites| {
            b.iter(|| VoronoiMap::find_delaunay(sites).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_voronoi);
criterion_main!(benches);
