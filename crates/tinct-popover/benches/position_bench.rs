//! Benchmarks for placement search and full repositioning.
//!
//! Run with: cargo bench -p tinct-popover

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tinct_harness::{FakeDom, Scene};
use tinct_popover::{
    Alignment, OVERFLOW_GAP, Placement, PopoverConfig, PopoverEvent, PositionRequest, Rect, Side,
    compute_position,
};

// =============================================================================
// Test Data
// =============================================================================

const VIEWPORT: Rect = Rect::new(0.0, 0.0, 1000.0, 800.0);

/// Anchor positions exercising first-choice, flipped and exhausted searches.
fn cases() -> [(&'static str, Rect, Rect); 3] {
    [
        (
            "first_fit",
            Rect::new(10.0, 10.0, 20.0, 20.0),
            Rect::from_size(100.0, 50.0),
        ),
        (
            "flipped",
            Rect::new(10.0, 780.0, 20.0, 10.0),
            Rect::from_size(100.0, 50.0),
        ),
        (
            "no_room",
            Rect::new(400.0, 300.0, 20.0, 20.0),
            Rect::from_size(1200.0, 900.0),
        ),
    ]
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_compute_position(c: &mut Criterion) {
    let mut group = c.benchmark_group("position/compute");
    let request = PositionRequest::new(Placement::new(Side::Bottom, Alignment::Center), 8.0);

    for (name, anchor, floating) in cases() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &anchor, |b, anchor| {
            b.iter(|| {
                black_box(compute_position(
                    black_box(anchor),
                    black_box(&floating),
                    &VIEWPORT,
                    &request,
                    OVERFLOW_GAP,
                ))
            });
        });
    }

    group.finish();
}

fn bench_scroll_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("popover/scroll");

    for depth in [0usize, 4, 16] {
        let dom = FakeDom::new(1000.0, 800.0);
        let mut parent = dom.body();
        for _ in 0..depth {
            parent = dom.scroller(parent, Rect::new(0.0, 0.0, 600.0, 600.0));
        }
        let mut scene = Scene::with_dom(dom.clone());
        scene.anchor = dom.element(parent, Rect::new(10.0, 10.0, 20.0, 20.0));
        scene.controller.set_open(true);
        let mut popover = scene.popover(&PopoverConfig::default());
        popover.attach();

        group.bench_with_input(BenchmarkId::new("ancestors", depth), &depth, |b, _| {
            b.iter(|| black_box(popover.handle_event(PopoverEvent::Scroll)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compute_position, bench_scroll_update);
criterion_main!(benches);
