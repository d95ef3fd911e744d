//! Crossing minimization across a batch of routes. Routes are processed in
//! connector order: earlier routes keep their geometry, later ones adapt by
//! shifting their orthogonal mid-line. Obstacle avoidance always takes
//! precedence — an unremovable crossing is left in place.

use crate::config::{RoutingConfig, StrategyKind};
use crate::error::Error;
use crate::geometry::{EPS, Point, compress_polyline, segments_intersect};
use crate::index::ObstacleIndex;
use crate::log::debug;
use crate::model::{Connector, Shape};

use super::{Route, orthogonal, select_strategy};

pub(crate) fn optimize(
    results: &mut [Result<Route, Error>],
    connectors: &[Connector],
    shapes: &[Shape],
    index: &ObstacleIndex,
    config: &RoutingConfig,
) {
    let flatten_steps = config.curve.flatten_steps;
    let mut polys: Vec<Option<Vec<Point>>> = results
        .iter()
        .map(|result| result.as_ref().ok().map(|r| r.polyline(flatten_steps)))
        .collect();

    for j in 0..results.len() {
        let Some(poly) = polys[j].as_ref() else {
            continue;
        };
        // Only adapt routes that cross an already-settled (earlier) route.
        let crosses_earlier = polys[..j]
            .iter()
            .flatten()
            .any(|other| crossings_between(poly, other) > 0);
        if !crosses_earlier {
            continue;
        }

        let Ok(route) = &results[j] else { continue };
        let connector = &connectors[j];
        let Some(from) = shapes.iter().find(|s| s.id == connector.from) else {
            continue;
        };
        let Some(to) = shapes.iter().find(|s| s.id == connector.to) else {
            continue;
        };
        let Ok(kind) = select_strategy(config, from, to) else {
            continue;
        };
        if kind != StrategyKind::Orthogonal {
            continue;
        }
        let start = route.start();
        let end = route.end();
        // Aligned connectors have no mid-line to shift.
        if (start.x - end.x).abs() <= EPS || (start.y - end.y).abs() <= EPS {
            continue;
        }

        let exclude = (from.id.as_str(), to.id.as_str());
        let current = total_crossings(j, poly, &polys);
        let mut best: Option<(Vec<Point>, usize)> = None;
        for attempt in 1..=config.optimizer.max_shift_attempts {
            let delta = attempt as f32 * config.optimizer.shift_step;
            for sign in [1.0f32, -1.0] {
                let candidate = compress_polyline(&orthogonal::z_path(start, end, sign * delta));
                if candidate.len() < 2 || !index.path_is_clear(&candidate, exclude) {
                    continue;
                }
                let crossings = total_crossings(j, &candidate, &polys);
                let improves = match &best {
                    Some((_, best_crossings)) => crossings < *best_crossings,
                    None => crossings < current,
                };
                if improves {
                    best = Some((candidate, crossings));
                }
            }
        }
        if let Some((candidate, crossings)) = best {
            debug!(
                connector = %connector.id,
                before = current,
                after = crossings,
                "shifted mid-line to reduce crossings"
            );
            results[j] = Ok(Route::from_polyline(&candidate));
            polys[j] = Some(candidate);
        }
    }

    for j in 0..results.len() {
        let Some(poly) = polys[j].as_ref() else {
            continue;
        };
        let count = total_crossings(j, poly, &polys);
        if let Ok(route) = &mut results[j] {
            route.crossings = count;
        }
    }
}

fn total_crossings(skip: usize, poly: &[Point], polys: &[Option<Vec<Point>>]) -> usize {
    let own_box = bounding_box(poly);
    polys
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != skip)
        .filter_map(|(_, other)| other.as_ref())
        .filter(|other| boxes_overlap(own_box, bounding_box(other)))
        .map(|other| crossings_between(poly, other))
        .sum()
}

fn bounding_box(points: &[Point]) -> (Point, Point) {
    let mut min = Point::new(f32::MAX, f32::MAX);
    let mut max = Point::new(f32::MIN, f32::MIN);
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    (min, max)
}

fn boxes_overlap(a: (Point, Point), b: (Point, Point)) -> bool {
    a.0.x <= b.1.x + EPS && b.0.x <= a.1.x + EPS && a.0.y <= b.1.y + EPS && b.0.y <= a.1.y + EPS
}

/// Segment-pair intersections between two polylines. Pairs sharing an
/// endpoint are skipped: two connectors attached to the same shape touch at
/// the anchor, which is not a crossing.
fn crossings_between(a: &[Point], b: &[Point]) -> usize {
    let mut count = 0usize;
    for sa in a.windows(2) {
        for sb in b.windows(2) {
            let shares_endpoint = sa[0].approx_eq(sb[0])
                || sa[0].approx_eq(sb[1])
                || sa[1].approx_eq(sb[0])
                || sa[1].approx_eq(sb[1]);
            if shares_endpoint {
                continue;
            }
            if segments_intersect(sa[0], sa[1], sb[0], sb[1]) {
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::route::route_diagram;

    fn shape(id: &str, x: f32, y: f32) -> Shape {
        Shape::new(id, Rect::new(x, y, 40.0, 20.0), "rectangle")
    }

    /// Two diagonal connectors routed through the same mid-line row: the
    /// later one can drop its mid-line below the shared row and clear every
    /// crossing.
    fn crossing_diagram() -> (Vec<Shape>, Vec<Connector>) {
        let shapes = vec![
            shape("a", 0.0, 0.0),
            shape("b", 300.0, 200.0),
            shape("c", 60.0, 0.0),
            shape("d", 360.0, 200.0),
        ];
        let connectors = vec![
            Connector::new("c1", "a", "b"),
            Connector::new("c2", "c", "d"),
        ];
        (shapes, connectors)
    }

    #[test]
    fn optimizer_strictly_reduces_crossings() {
        let (shapes, connectors) = crossing_diagram();

        let plain = RoutingConfig::default();
        let unoptimized = route_diagram(&shapes, &connectors, &plain).unwrap();
        let polys: Vec<Option<Vec<Point>>> = unoptimized
            .iter()
            .map(|r| r.as_ref().ok().map(|route| route.polyline(16)))
            .collect();
        let before: usize = polys
            .iter()
            .enumerate()
            .filter_map(|(idx, p)| p.as_ref().map(|p| total_crossings(idx, p, &polys)))
            .sum();
        assert!(before > 0, "fixture routes must cross before optimization");

        let optimized_config = RoutingConfig {
            optimize_crossings: true,
            ..RoutingConfig::default()
        };
        let optimized = route_diagram(&shapes, &connectors, &optimized_config).unwrap();
        let after: usize = optimized
            .iter()
            .map(|r| r.as_ref().map(|route| route.crossings).unwrap_or(0))
            .sum();
        assert!(after < before, "expected fewer crossings, had {before}, got {after}");

        // Every optimized route must stay obstacle-free.
        let index = ObstacleIndex::build(&shapes, optimized_config.padding);
        for (result, connector) in optimized.iter().zip(&connectors) {
            let route = result.as_ref().unwrap();
            let poly = route.polyline(16);
            assert!(
                index.path_is_clear(&poly, (connector.from.as_str(), connector.to.as_str())),
                "optimized route {} collides",
                connector.id
            );
        }
    }

    #[test]
    fn optimizer_fills_crossing_counts_even_without_shifts() {
        // Perpendicular straight connectors that genuinely must cross.
        let shapes = vec![
            Shape::new("l", Rect::new(0.0, 90.0, 20.0, 20.0), "rectangle"),
            Shape::new("r", Rect::new(380.0, 90.0, 20.0, 20.0), "rectangle"),
            Shape::new("t", Rect::new(190.0, 0.0, 20.0, 20.0), "rectangle"),
            Shape::new("b", Rect::new(190.0, 380.0, 20.0, 20.0), "rectangle"),
        ];
        let connectors = vec![
            Connector::new("h", "l", "r"),
            Connector::new("v", "t", "b"),
        ];
        let config = RoutingConfig {
            optimize_crossings: true,
            padding: 0.0,
            ..RoutingConfig::default()
        };
        let results = route_diagram(&shapes, &connectors, &config).unwrap();
        let h = results[0].as_ref().unwrap();
        let v = results[1].as_ref().unwrap();
        assert_eq!(h.crossings, 1);
        assert_eq!(v.crossings, 1);
    }

    #[test]
    fn crossings_between_skips_shared_anchor_touches() {
        let a = vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)];
        let b = vec![Point::new(100.0, 0.0), Point::new(100.0, 100.0)];
        assert_eq!(crossings_between(&a, &b), 0);
        let c = vec![Point::new(50.0, -50.0), Point::new(50.0, 50.0)];
        assert_eq!(crossings_between(&a, &c), 1);
    }
}
