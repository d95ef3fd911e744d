use connector_router::{Connector, Rect, RoutingConfig, Shape, route_diagram};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// Lattice of shapes with neighbour connectors plus periodic diagonal links,
/// which force detours and crossings once the lattice is dense enough.
fn grid_diagram(cols: usize, rows: usize) -> (Vec<Shape>, Vec<Connector>) {
    let mut shapes = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            shapes.push(Shape::new(
                format!("n{row}_{col}"),
                Rect::new(col as f32 * 130.0, row as f32 * 100.0, 60.0, 30.0),
                if (row + col) % 3 == 0 { "valve" } else { "pipe" },
            ));
        }
    }
    let mut connectors = Vec::new();
    for row in 0..rows {
        for col in 0..cols.saturating_sub(1) {
            connectors.push(Connector::new(
                format!("h{row}_{col}"),
                format!("n{row}_{col}"),
                format!("n{row}_{}", col + 1),
            ));
        }
    }
    for row in 0..rows.saturating_sub(1) {
        for col in (0..cols.saturating_sub(1)).step_by(3) {
            connectors.push(Connector::new(
                format!("d{row}_{col}"),
                format!("n{row}_{col}"),
                format!("n{}_{}", row + 1, col + 1),
            ));
        }
    }
    (shapes, connectors)
}

fn bench_route_diagram(c: &mut Criterion) {
    let mut group = c.benchmark_group("route_diagram");
    for (label, cols, rows) in [("small", 4usize, 3usize), ("medium", 8, 6), ("large", 16, 10)] {
        let (shapes, connectors) = grid_diagram(cols, rows);
        let config = RoutingConfig::default();
        group.bench_with_input(BenchmarkId::new("batch", label), &(), |b, _| {
            b.iter(|| {
                route_diagram(black_box(&shapes), black_box(&connectors), &config).unwrap()
            })
        });
    }
    group.finish();
}

fn bench_crossing_optimizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("crossing_optimizer");
    let (shapes, connectors) = grid_diagram(8, 6);
    for optimize in [false, true] {
        let config = RoutingConfig {
            optimize_crossings: optimize,
            ..RoutingConfig::default()
        };
        let label = if optimize { "on" } else { "off" };
        group.bench_with_input(BenchmarkId::new("medium", label), &(), |b, _| {
            b.iter(|| {
                route_diagram(black_box(&shapes), black_box(&connectors), &config).unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_route_diagram, bench_crossing_optimizer);
criterion_main!(benches);
