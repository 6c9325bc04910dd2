use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use folio::canvas::{CanvasTransform, Point};
use folio::graph::{EventInput, GraphStore};
use folio::recommend::{all_similarities, recommendations_for};
use rand::rngs::StdRng;
use rand::SeedableRng;

const TAG_POOL: [&str; 12] = [
    "#ai", "#python", "#rust", "#web", "#design", "#sql", "#ml", "#cloud", "#devops", "#ux", "#mobile", "#data",
];
const ERROR_POOL: [&str; 4] = ["#late", "#poor_docs", "#no_tests", "#scope_creep"];

fn build_store(size: usize) -> GraphStore {
    let mut store = GraphStore::with_center();
    let canvas = CanvasTransform::default();
    let mut rng = StdRng::seed_from_u64(42);

    for i in 0..size {
        let tags = format!("{} {}", TAG_POOL[i % TAG_POOL.len()], TAG_POOL[(i * 7 + 3) % TAG_POOL.len()]);
        let input = EventInput::new(format!("Event{}", i))
            .with_tags(tags.as_str())
            .with_errors(ERROR_POOL[i % ERROR_POOL.len()])
            .with_budget((i as i64 % 50) * 1000)
            .with_participants(1 + i as i64 % 40)
            .with_date(format!("2024-{:02}-{:02}", 1 + i % 12, 1 + i % 28));
        store
            .add_event_placed(&input, &canvas, &mut rng)
            .expect("unique ids");
    }
    store
}

/// Benchmark connection derivation over the visible set
fn bench_derive_connections(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_connections");

    for size in [50, 200, 500].iter() {
        let store = build_store(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let connections = store.derive_connections();
                criterion::black_box(connections.len());
            });
        });
    }
    group.finish();
}

/// Benchmark a full frame after a structural change
fn bench_flush_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("flush_frame");

    for size in [50, 200, 500].iter() {
        let mut store = build_store(*size);
        store.flush_frame();
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                store.clear_filter();
                let update = store.flush_frame();
                criterion::black_box(update.map(|u| u.geometry.len()));
            });
        });
    }
    group.finish();
}

/// Benchmark ranking against one target
fn bench_recommendations(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommendations");

    for size in [100, 1000].iter() {
        let store = build_store(*size);
        let target = store.events().next().cloned().expect("non-empty store");
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let ranked = recommendations_for(&target, store.events(), Some(5));
                criterion::black_box(ranked.len());
            });
        });
    }
    group.finish();
}

fn bench_all_similarities(c: &mut Criterion) {
    let store = build_store(200);
    c.bench_function("all_similarities_200", |b| {
        b.iter(|| {
            let pairs = all_similarities(store.events());
            criterion::black_box(pairs.len());
        });
    });
}

/// Benchmark pan + anchored wheel zoom
fn bench_canvas_zoom(c: &mut Criterion) {
    c.bench_function("canvas_wheel_zoom", |b| {
        let mut canvas = CanvasTransform::default();
        let anchor = Point::new(400.0, 300.0);
        let mut delta = 1.0;
        b.iter(|| {
            canvas.wheel(anchor, delta);
            delta = -delta;
            criterion::black_box(canvas.screen_to_world(anchor));
        });
    });
}

criterion_group!(
    benches,
    bench_derive_connections,
    bench_flush_frame,
    bench_recommendations,
    bench_all_similarities,
    bench_canvas_zoom
);
criterion_main!(benches);
