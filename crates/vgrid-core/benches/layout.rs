//! Benchmarks for grid layout and collection loading.
//!
//! Run with: cargo bench -p vgrid-core
//! Results are saved to target/criterion/

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use std::rc::Rc;
use vgrid_core::config::Settings;
use vgrid_core::host::{AppDirectory, Favorites, HiddenAppsPolicy};
use vgrid_core::layout::GridLayoutEngine;
use vgrid_core::usage::UsageTracker;
use vgrid_core::{AppCollectionView, AppInfo, AppSorting, FavoritesSorting, Size};

const NAMES: [&str; 12] = [
    "Firefox",
    "files",
    "Terminal",
    "calculator",
    "GIMP",
    "Inkscape",
    "blender",
    "Text Editor",
    "settings",
    "Steam",
    "vlc",
    "Thunderbird",
];

fn generate_apps(count: usize) -> Vec<AppInfo> {
    (0..count)
        .map(|i| {
            let name = NAMES[i % NAMES.len()];
            AppInfo::new(format!("{}-{i}.desktop", name.to_lowercase()), format!("{name} {i}"))
        })
        .collect()
}

fn bench_allocate_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_allocate");
    let engine = GridLayoutEngine::new(8, 24.0);

    for size in &[50, 500, 5000] {
        let children = vec![Size::new(96.0, 96.0); *size];
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| engine.allocate(black_box(&children)));
        });
    }
    group.finish();
}

fn bench_preferred_size(c: &mut Criterion) {
    let engine = GridLayoutEngine::new(6, 16.0);
    let children = vec![Size::new(80.0, 96.0); 1000];

    c.bench_function("grid_preferred_1000", |b| {
        b.iter(|| engine.geometry(black_box(&children)));
    });
}

fn bench_collection_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("collection_load");

    let tracker = UsageTracker::new();
    for (i, app) in generate_apps(1000).iter().enumerate().step_by(3) {
        for _ in 0..(i % 7) {
            tracker.record_launch_at(&app.id, 1_700_000_000_000);
        }
    }
    let usage = Rc::new(tracker);

    let cases = [
        ("alphabetical", AppSorting::Alphabetical, FavoritesSorting::Alphabetical),
        ("usage", AppSorting::Usage, FavoritesSorting::Usage),
        ("dash", AppSorting::Alphabetical, FavoritesSorting::Dash),
    ];

    for (name, app_sorting, favorites_sorting) in cases {
        let apps = generate_apps(1000);
        let favorites: Vec<String> = apps.iter().step_by(40).map(|a| a.id.clone()).collect();
        let view = AppCollectionView::new(
            Rc::new(AppDirectory::new(apps)),
            Rc::new(Favorites::new(favorites)),
            Rc::new(HiddenAppsPolicy::default()),
            usage.clone(),
        );
        let settings = Settings {
            favorites_section: true,
            app_sorting,
            favorites_sorting,
            ..Settings::default()
        };

        group.bench_with_input(BenchmarkId::new("sort", name), &settings, |b, s| {
            b.iter(|| view.load(black_box(s)));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_allocate_scaling,
    bench_preferred_size,
    bench_collection_load
);
criterion_main!(benches);
