//! Route computation: output geometry types, strategy selection, and the
//! per-connector / per-diagram entry points.

pub(crate) mod curved;
mod optimizer;
pub(crate) mod orthogonal;
pub(crate) mod straight;

use serde::{Deserialize, Serialize};

use crate::config::{OverridePrecedence, RoutingConfig, StrategyKind};
use crate::error::{ConfigurationError, Error, ValidationError};
use crate::geometry::{Point, Rect, compress_polyline, polyline_length};
use crate::index::ObstacleIndex;
use crate::log::debug;
use crate::model::{Connector, Shape};

/// Sample count used when approximating a curved segment's length.
const CURVE_LENGTH_STEPS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Straight,
    Curved,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
    pub kind: SegmentKind,
    /// Cubic control points, present iff `kind` is `Curved`.
    pub control: Option<(Point, Point)>,
}

impl Segment {
    pub fn straight(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            kind: SegmentKind::Straight,
            control: None,
        }
    }

    pub fn curved(start: Point, end: Point, c1: Point, c2: Point) -> Self {
        Self {
            start,
            end,
            kind: SegmentKind::Curved,
            control: Some((c1, c2)),
        }
    }

    pub fn length(&self) -> f32 {
        match (self.kind, self.control) {
            (SegmentKind::Curved, Some((c1, c2))) => polyline_length(&curved::flatten_cubic(
                self.start,
                c1,
                c2,
                self.end,
                CURVE_LENGTH_STEPS,
            )),
            _ => self.start.distance(self.end),
        }
    }
}

/// A computed connector path. Immutable output: the first segment starts at
/// the requested start point, the last ends at the requested end point, and
/// no segment has zero length. `crossings` is filled by the optimizer and
/// stays 0 otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub segments: Vec<Segment>,
    pub total_length: f32,
    pub crossings: usize,
}

impl Route {
    fn from_segments(segments: Vec<Segment>) -> Self {
        let total_length = segments.iter().map(Segment::length).sum();
        Self {
            segments,
            total_length,
            crossings: 0,
        }
    }

    /// Build a straight-segment route from an orthogonal polyline. Collapses
    /// repeated points so the zero-length-segment invariant holds.
    pub(crate) fn from_polyline(points: &[Point]) -> Self {
        let compressed = compress_polyline(points);
        let segments = compressed
            .windows(2)
            .map(|pair| Segment::straight(pair[0], pair[1]))
            .collect();
        Self::from_segments(segments)
    }

    pub fn start(&self) -> Point {
        self.segments[0].start
    }

    pub fn end(&self) -> Point {
        self.segments[self.segments.len() - 1].end
    }

    /// Polyline approximation for crossing tests; curved segments are
    /// flattened at `flatten_steps`.
    pub fn polyline(&self, flatten_steps: usize) -> Vec<Point> {
        let mut points = Vec::with_capacity(self.segments.len() + 1);
        for (idx, segment) in self.segments.iter().enumerate() {
            match (segment.kind, segment.control) {
                (SegmentKind::Curved, Some((c1, c2))) => {
                    let sampled =
                        curved::flatten_cubic(segment.start, c1, c2, segment.end, flatten_steps);
                    let skip = if idx == 0 { 0 } else { 1 };
                    points.extend(sampled.into_iter().skip(skip));
                }
                _ => {
                    if idx == 0 {
                        points.push(segment.start);
                    }
                    points.push(segment.end);
                }
            }
        }
        points
    }
}

/// Everything a strategy needs for one connector: endpoints, the immutable
/// obstacle snapshot, the pair of shape ids the route may touch, and config.
pub(crate) struct RouteContext<'a> {
    pub start: Point,
    pub end: Point,
    pub index: &'a ObstacleIndex,
    pub exclude: (&'a str, &'a str),
    pub config: &'a RoutingConfig,
}

/// Resolve the strategy for a connector. Starts from the default tag, then
/// applies the shape-type overrides in precedence order — with the default
/// `EndWins` policy the end shape's override is applied last and wins when
/// both endpoints carry one. Every tag consulted along the way must parse;
/// an unknown tag is a configuration error, never a silent fallback.
pub fn select_strategy(
    config: &RoutingConfig,
    start_shape: &Shape,
    end_shape: &Shape,
) -> Result<StrategyKind, ConfigurationError> {
    let mut kind = StrategyKind::from_tag(&config.default_strategy)?;
    let (first, second) = match config.override_precedence {
        OverridePrecedence::EndWins => (&start_shape.shape_type, &end_shape.shape_type),
        OverridePrecedence::StartWins => (&end_shape.shape_type, &start_shape.shape_type),
    };
    if let Some(tag) = config.shape_type_overrides.get(first) {
        kind = StrategyKind::from_tag(tag)?;
    }
    if let Some(tag) = config.shape_type_overrides.get(second) {
        kind = StrategyKind::from_tag(tag)?;
    }
    Ok(kind)
}

/// Route endpoints on the facing sides of the two bounding boxes: the
/// dominant center-to-center axis picks the side pair, anchored at side
/// midpoints.
pub fn anchor_points(from: &Rect, to: &Rect) -> (Point, Point) {
    let fc = from.center();
    let tc = to.center();
    let dx = tc.x - fc.x;
    let dy = tc.y - fc.y;
    if dx.abs() >= dy.abs() {
        if dx >= 0.0 {
            (Point::new(from.right(), fc.y), Point::new(to.left(), tc.y))
        } else {
            (Point::new(from.left(), fc.y), Point::new(to.right(), tc.y))
        }
    } else if dy >= 0.0 {
        (Point::new(fc.x, from.bottom()), Point::new(tc.x, to.top()))
    } else {
        (Point::new(fc.x, from.top()), Point::new(tc.x, to.bottom()))
    }
}

/// Compute one route between two points with an already-resolved strategy.
/// The exclusion pair names the shapes the route is allowed to touch.
pub fn route_between(
    start: Point,
    end: Point,
    kind: StrategyKind,
    index: &ObstacleIndex,
    exclude: (&str, &str),
    config: &RoutingConfig,
) -> Result<Route, Error> {
    if start.approx_eq(end) {
        return Err(ValidationError::CoincidentEndpoints {
            x: start.x,
            y: start.y,
        }
        .into());
    }
    let ctx = RouteContext {
        start,
        end,
        index,
        exclude,
        config,
    };
    let route = match kind {
        StrategyKind::Orthogonal => Route::from_polyline(&orthogonal::route(&ctx)?),
        StrategyKind::Straight => Route::from_segments(vec![straight::route(&ctx)?]),
        StrategyKind::Curved => Route::from_segments(vec![curved::route(&ctx)?]),
    };
    Ok(route)
}

fn find_shape<'a>(
    shapes: &'a [Shape],
    connector: &Connector,
    id: &str,
) -> Result<&'a Shape, ValidationError> {
    shapes
        .iter()
        .find(|shape| shape.id == id)
        .ok_or_else(|| ValidationError::UnknownShape {
            connector: connector.id.clone(),
            shape: id.to_string(),
        })
}

fn route_one(
    shapes: &[Shape],
    connector: &Connector,
    index: &ObstacleIndex,
    config: &RoutingConfig,
) -> Result<Route, Error> {
    let from = find_shape(shapes, connector, &connector.from)?;
    let to = find_shape(shapes, connector, &connector.to)?;
    from.validate()?;
    to.validate()?;
    let kind = select_strategy(config, from, to)?;
    let (start, end) = anchor_points(&from.bounds, &to.bounds);
    debug!(
        connector = %connector.id,
        strategy = kind.as_tag(),
        "routing connector"
    );
    route_between(start, end, kind, index, (&from.id, &to.id), config)
}

/// Route a single connector against the full shape set.
pub fn route_connector(
    shapes: &[Shape],
    connector: &Connector,
    config: &RoutingConfig,
) -> Result<Route, Error> {
    config.validate()?;
    let index = ObstacleIndex::build(shapes, config.padding);
    route_one(shapes, connector, &index, config)
}

/// Route every connector of a diagram. The configuration is validated before
/// any geometry work; a single connector's failure never aborts the batch,
/// so the result carries one entry per connector in input order. When
/// `optimize_crossings` is set the crossing optimizer post-processes the
/// successful routes and fills their crossing counts.
pub fn route_diagram(
    shapes: &[Shape],
    connectors: &[Connector],
    config: &RoutingConfig,
) -> Result<Vec<Result<Route, Error>>, Error> {
    config.validate()?;
    let index = ObstacleIndex::build(shapes, config.padding);
    let mut results: Vec<Result<Route, Error>> = connectors
        .iter()
        .map(|connector| route_one(shapes, connector, &index, config))
        .collect();
    if config.optimize_crossings {
        optimizer::optimize(&mut results, connectors, shapes, &index, config);
    }
    Ok(results)
}
