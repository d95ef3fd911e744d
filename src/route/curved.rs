//! Curved routing: one cubic segment whose control points sit perpendicular
//! to the start-end axis. Collision testing runs against the flattened
//! polyline, which is sufficient for clearance checks but not an exact
//! curve/rectangle intersection.

use crate::error::RoutingError;
use crate::geometry::Point;

use super::{RouteContext, Segment};

/// Control points at 1/3 and 2/3 along the chord, both offset perpendicular
/// by `factor` times the chord length.
pub(crate) fn control_points(start: Point, end: Point, factor: f32) -> (Point, Point) {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len <= 0.0 {
        return (start, end);
    }
    let perp_x = -dy / len * factor * len;
    let perp_y = dx / len * factor * len;
    let c1 = Point::new(start.x + dx / 3.0 + perp_x, start.y + dy / 3.0 + perp_y);
    let c2 = Point::new(start.x + dx * 2.0 / 3.0 + perp_x, start.y + dy * 2.0 / 3.0 + perp_y);
    (c1, c2)
}

/// Sample the cubic at `steps` intervals. Always includes both endpoints.
pub(crate) fn flatten_cubic(
    start: Point,
    c1: Point,
    c2: Point,
    end: Point,
    steps: usize,
) -> Vec<Point> {
    let steps = steps.max(2);
    let mut points = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let u = 1.0 - t;
        let b0 = u * u * u;
        let b1 = 3.0 * u * u * t;
        let b2 = 3.0 * u * t * t;
        let b3 = t * t * t;
        points.push(Point::new(
            b0 * start.x + b1 * c1.x + b2 * c2.x + b3 * end.x,
            b0 * start.y + b1 * c1.y + b2 * c2.y + b3 * end.y,
        ));
    }
    points
}

pub(crate) fn route(ctx: &RouteContext<'_>) -> Result<Segment, RoutingError> {
    let curve = &ctx.config.curve;
    let (c1, c2) = control_points(ctx.start, ctx.end, curve.control_factor);
    let approx = flatten_cubic(ctx.start, c1, c2, ctx.end, curve.flatten_steps);
    if let Some(obs) = ctx.index.first_hit_on_path(&approx, ctx.exclude) {
        return Err(RoutingError::Blocked {
            obstacle: obs.id.clone(),
        });
    }
    Ok(Segment::curved(ctx.start, ctx.end, c1, c2))
}
