// crates/worldmap-core/benches/benchmarks.rs
use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::json;
use std::hint::black_box;
use worldmap_core::catalog::RegionIndex;
use worldmap_core::{Dataset, GeoFeature, SelectionResolver};

fn feature(i: usize) -> GeoFeature {
    let x = (i % 36) as f64 * 10.0 - 180.0;
    let y = (i % 18) as f64 * 10.0 - 90.0;
    let value = json!({
        "type": "Feature",
        "properties": { "name": format!("Région {i}"), "ISO_A3": "-99", "iso_a2": "zz" },
        "geometry": {
            "type": "Polygon",
            "coordinates": [[[x, y], [x + 9.0, y], [x + 9.0, y + 9.0], [x, y + 9.0], [x, y]]]
        }
    });
    serde_json::from_value(value).expect("valid feature")
}

fn bench_resolver(c: &mut Criterion) {
    let dataset = Dataset::new((0..250).map(feature).collect());
    let resolver = SelectionResolver::default();

    c.bench_function("resolve 250 features", |b| {
        b.iter(|| {
            for f in dataset.features() {
                black_box(resolver.resolve(black_box(f)));
            }
        })
    });

    let index = RegionIndex::build(&dataset, &resolver);
    c.bench_function("region index search (folded)", |b| {
        b.iter(|| black_box(index.search(black_box("region 12"))))
    });
}

criterion_group!(benches, bench_resolver);
criterion_main!(benches);
