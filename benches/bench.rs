// Criterion benchmarks for the Gida discovery engine

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gida_engine::core::{
    cluster::{cluster_listings, ClusterOptions},
    distance::{DistanceMetric, Haversine, Planar},
    filters::{apply_filters, FilterContext},
};
use gida_engine::models::{
    BoundingBox, FilterSpec, GeoPoint, Listing, PriceRange, PropertyType, RoomFilter,
};

fn create_listing(id: usize, lon: f64, lat: f64) -> Listing {
    Listing {
        id: id.to_string(),
        title: format!("Listing {}", id),
        price_minor: 40_000_000 + (id as i64 % 20) * 10_000_000,
        location: GeoPoint {
            longitude: lon,
            latitude: lat,
        },
        property_type: if id % 3 == 0 {
            PropertyType::Apartments
        } else {
            PropertyType::Residential
        },
        bedrooms: Some(1 + (id % 5) as u8),
        bathrooms: Some(1 + (id % 3) as u8),
        area_label: "150m²".to_string(),
        amenities: vec!["Security".to_string(), "Parking".to_string()],
        furnished: id % 2 == 0,
        year_built: Some(2000 + (id % 25) as i32),
        floor_level: Some((id % 8) as u8),
        pets_allowed: Some(id % 4 == 0),
        growth_pct_per_year: if id % 3 == 0 { Some(4.5) } else { None },
        investment_score: Some((id % 10) as f64),
        date_added: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
    }
}

fn create_listings(count: usize) -> Vec<Listing> {
    (0..count)
        .map(|i| {
            let lon = 7.40 + (i as f64 * 0.0007) % 0.3;
            let lat = 8.95 + (i as f64 * 0.0009) % 0.25;
            create_listing(i, lon, lat)
        })
        .collect()
}

fn bench_distance_metrics(c: &mut Criterion) {
    let a = GeoPoint {
        longitude: 7.491,
        latitude: 9.082,
    };
    let b = GeoPoint {
        longitude: 7.526,
        latitude: 9.045,
    };

    c.bench_function("planar_distance", |bencher| {
        bencher.iter(|| Planar.distance(black_box(&a), black_box(&b)));
    });

    c.bench_function("haversine_distance", |bencher| {
        bencher.iter(|| Haversine.distance(black_box(&a), black_box(&b)));
    });
}

fn bench_filter_pipeline(c: &mut Criterion) {
    let listings = create_listings(500);
    let spec = FilterSpec {
        property_types: vec![PropertyType::Apartments],
        price_range: PriceRange {
            min: Some(60_000_000),
            max: Some(180_000_000),
        },
        bedrooms: RoomFilter::AtLeast(2),
        amenities: vec!["Security".to_string()],
        ..FilterSpec::default()
    };
    let ctx = FilterContext::new(2026);

    c.bench_function("filter_pipeline_500_listings", |bencher| {
        bencher.iter(|| apply_filters(black_box(&listings), black_box(&spec), &ctx));
    });
}

fn bench_clustering(c: &mut Criterion) {
    let viewport = BoundingBox::new(7.35, 8.90, 7.75, 9.25);
    let opts = ClusterOptions::default();

    let mut group = c.benchmark_group("clustering");

    for point_count in [100, 500, 1000].iter() {
        let listings = create_listings(*point_count);

        group.bench_with_input(
            BenchmarkId::new("cluster_listings", point_count),
            point_count,
            |bencher, _| {
                bencher.iter(|| {
                    cluster_listings(
                        black_box(&listings),
                        black_box(&viewport),
                        black_box(12),
                        &opts,
                    )
                });
            },
        );
    }

    group.finish();
}

fn bench_zoom_sweep(c: &mut Criterion) {
    let listings = create_listings(500);
    let viewport = BoundingBox::new(7.35, 8.90, 7.75, 9.25);
    let opts = ClusterOptions::default();

    c.bench_function("cluster_zoom_sweep_500", |bencher| {
        bencher.iter(|| {
            for zoom in [8u8, 10, 12, 14, 16] {
                black_box(cluster_listings(&listings, &viewport, zoom, &opts));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_distance_metrics,
    bench_filter_pipeline,
    bench_clustering,
    bench_zoom_sweep
);

criterion_main!(benches);
