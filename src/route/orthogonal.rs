//! Orthogonal (axis-aligned) routing: a direct two-bend Z first, then a
//! bounded staircase detour search around the nearest blocking obstacle.

use crate::error::RoutingError;
use crate::geometry::{EPS, Point, bend_count, compress_polyline, polyline_length};
use crate::index::Obstacle;
use crate::log::debug;

use super::RouteContext;

/// Two-bend Z through the horizontal mid-line, optionally shifted by
/// `offset`. The crossing optimizer shifts routes through this same form so
/// optimized routes stay valid orthogonal paths.
pub(crate) fn z_path(start: Point, end: Point, offset: f32) -> Vec<Point> {
    let mid_y = (start.y + end.y) / 2.0 + offset;
    vec![
        start,
        Point::new(start.x, mid_y),
        Point::new(end.x, mid_y),
        end,
    ]
}

/// Vertical-first staircase: follow the mid-line until `jog_x`, then run
/// vertically to the end row. One bend more than the Z.
fn vertical_staircase(start: Point, end: Point, mid_y: f32, jog_x: f32) -> Vec<Point> {
    vec![
        start,
        Point::new(start.x, mid_y),
        Point::new(jog_x, mid_y),
        Point::new(jog_x, end.y),
        end,
    ]
}

/// Horizontal-first mirror of [`vertical_staircase`], jogging in y.
fn horizontal_staircase(start: Point, end: Point, mid_x: f32, jog_y: f32) -> Vec<Point> {
    vec![
        start,
        Point::new(mid_x, start.y),
        Point::new(mid_x, jog_y),
        Point::new(end.x, jog_y),
        end,
    ]
}

pub(crate) fn route(ctx: &RouteContext<'_>) -> Result<Vec<Point>, RoutingError> {
    let start = ctx.start;
    let end = ctx.end;

    // Aligned endpoints collapse the Z to a single axis-aligned segment.
    if (start.x - end.x).abs() <= EPS || (start.y - end.y).abs() <= EPS {
        if ctx
            .index
            .first_hit_on_segment(start, end, ctx.exclude)
            .is_none()
        {
            return Ok(vec![start, end]);
        }
    } else {
        let z = z_path(start, end, 0.0);
        if ctx.index.path_is_clear(&z, ctx.exclude) {
            return Ok(compress_polyline(&z));
        }
    }

    detour(ctx)
}

/// The obstacle blocking the direct candidate whose center lies closest to
/// the connector midpoint; id breaks distance ties so the search order never
/// depends on shape-set ordering.
fn nearest_blocker<'a>(ctx: &'a RouteContext<'_>) -> Option<&'a Obstacle> {
    let z = z_path(ctx.start, ctx.end, 0.0);
    let mid = Point::new(
        (ctx.start.x + ctx.end.x) / 2.0,
        (ctx.start.y + ctx.end.y) / 2.0,
    );
    let mut best: Option<(&Obstacle, f32)> = None;
    for obs in ctx.index.obstacles() {
        if obs.id == ctx.exclude.0 || obs.id == ctx.exclude.1 {
            continue;
        }
        let hit = z
            .windows(2)
            .any(|pair| crate::geometry::segment_intersects_rect(pair[0], pair[1], &obs.bounds));
        if !hit {
            continue;
        }
        let dist = obs.bounds.center().distance(mid);
        match best {
            Some((prev, prev_dist))
                if dist > prev_dist || (dist == prev_dist && obs.id >= prev.id) => {}
            _ => best = Some((obs, dist)),
        }
    }
    best.map(|(obs, _)| obs)
}

/// Staircase detour search. Each attempt widens the jog offset by one step;
/// per attempt the jog is tried on the side facing away from the blocker
/// first, then the near side, in both staircase orientations. Axis-aligned
/// connectors get U-shaped candidates instead, since both staircases
/// degenerate there. Among obstacle-free candidates: fewest bends, then
/// shortest, then generation order.
fn detour(ctx: &RouteContext<'_>) -> Result<Vec<Point>, RoutingError> {
    let start = ctx.start;
    let end = ctx.end;
    let cfg = &ctx.config.detour;
    let no_path = || RoutingError::NoPath {
        from_x: start.x,
        from_y: start.y,
        to_x: end.x,
        to_y: end.y,
        attempts: cfg.max_attempts,
    };
    let Some(blocker) = nearest_blocker(ctx) else {
        return Err(no_path());
    };
    debug!(
        obstacle = %blocker.id,
        "direct orthogonal candidate blocked, entering detour search"
    );

    let aligned_x = (start.x - end.x).abs() <= EPS;
    let aligned_y = (start.y - end.y).abs() <= EPS;
    let mid_x = (start.x + end.x) / 2.0;
    let mid_y = (start.y + end.y) / 2.0;
    let center = blocker.bounds.center();
    let jog_left_first = center.x >= mid_x;
    let jog_up_first = center.y >= mid_y;
    let bounds = blocker.bounds;

    let mut best: Option<(Vec<Point>, usize, f32)> = None;
    for attempt in 1..=cfg.max_attempts {
        let delta = attempt as f32 * cfg.step;
        let jog_xs = if jog_left_first {
            [bounds.left() - delta, bounds.right() + delta]
        } else {
            [bounds.right() + delta, bounds.left() - delta]
        };
        let jog_ys = if jog_up_first {
            [bounds.top() - delta, bounds.bottom() + delta]
        } else {
            [bounds.bottom() + delta, bounds.top() - delta]
        };
        let mut candidates: Vec<Vec<Point>> = Vec::with_capacity(4);
        if aligned_y {
            for jy in jog_ys {
                candidates.push(vec![
                    start,
                    Point::new(start.x, jy),
                    Point::new(end.x, jy),
                    end,
                ]);
            }
        }
        if aligned_x {
            for jx in jog_xs {
                candidates.push(vec![
                    start,
                    Point::new(jx, start.y),
                    Point::new(jx, end.y),
                    end,
                ]);
            }
        }
        if !aligned_x && !aligned_y {
            candidates.push(vertical_staircase(start, end, mid_y, jog_xs[0]));
            candidates.push(horizontal_staircase(start, end, mid_x, jog_ys[0]));
            candidates.push(vertical_staircase(start, end, mid_y, jog_xs[1]));
            candidates.push(horizontal_staircase(start, end, mid_x, jog_ys[1]));
        }
        for candidate in candidates {
            if !candidate.iter().all(|p| p.x.is_finite() && p.y.is_finite()) {
                continue;
            }
            let compressed = compress_polyline(&candidate);
            if compressed.len() < 2 || !ctx.index.path_is_clear(&compressed, ctx.exclude) {
                continue;
            }
            let bends = bend_count(&compressed);
            let length = polyline_length(&compressed);
            let better = match &best {
                Some((_, best_bends, best_len)) => {
                    bends < *best_bends || (bends == *best_bends && length < *best_len)
                }
                None => true,
            };
            if better {
                best = Some((compressed, bends, length));
            }
        }
    }

    best.map(|(points, _, _)| points).ok_or_else(no_path)
}
