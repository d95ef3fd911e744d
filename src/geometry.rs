use serde::{Deserialize, Serialize};

/// Tolerance for treating coordinates as equal or collinear.
pub(crate) const EPS: f32 = 1e-4;
/// Looser tolerance used by the orientation tests, matching the scale of
/// accumulated f32 error in cross products.
const ORIENT_EPS: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub(crate) fn approx_eq(&self, other: Point) -> bool {
        (self.x - other.x).abs() <= EPS && (self.y - other.y).abs() <= EPS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Grow the rect by `padding` on every side. Negative padding shrinks.
    pub fn expand(&self, padding: f32) -> Rect {
        Rect::new(
            self.x - padding,
            self.y - padding,
            self.width + padding * 2.0,
            self.height + padding * 2.0,
        )
    }

    pub fn intersects(&self, other: &Rect, padding: f32) -> bool {
        let a = self.expand(padding);
        a.x <= other.right() && other.x <= a.right() && a.y <= other.bottom() && other.y <= a.bottom()
    }

    /// Zero or negative extent, or non-finite coordinates. Such bounds cannot
    /// anchor a connector.
    pub fn is_degenerate(&self) -> bool {
        !(self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

pub fn segments_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    fn orient(a: Point, b: Point, c: Point) -> f32 {
        (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
    }
    fn on_segment(a: Point, b: Point, c: Point) -> bool {
        let min_x = a.x.min(b.x);
        let max_x = a.x.max(b.x);
        let min_y = a.y.min(b.y);
        let max_y = a.y.max(b.y);
        c.x >= min_x - ORIENT_EPS
            && c.x <= max_x + ORIENT_EPS
            && c.y >= min_y - ORIENT_EPS
            && c.y <= max_y + ORIENT_EPS
    }
    let o1 = orient(a, b, c);
    let o2 = orient(a, b, d);
    let o3 = orient(c, d, a);
    let o4 = orient(c, d, b);
    if (o1 > 0.0 && o2 < 0.0 || o1 < 0.0 && o2 > 0.0)
        && (o3 > 0.0 && o4 < 0.0 || o3 < 0.0 && o4 > 0.0)
    {
        return true;
    }
    if o1.abs() <= ORIENT_EPS && on_segment(a, b, c) {
        return true;
    }
    if o2.abs() <= ORIENT_EPS && on_segment(a, b, d) {
        return true;
    }
    if o3.abs() <= ORIENT_EPS && on_segment(c, d, a) {
        return true;
    }
    if o4.abs() <= ORIENT_EPS && on_segment(c, d, b) {
        return true;
    }
    false
}

pub fn segment_intersects_rect(a: Point, b: Point, rect: &Rect) -> bool {
    let min_x = a.x.min(b.x);
    let max_x = a.x.max(b.x);
    let min_y = a.y.min(b.y);
    let max_y = a.y.max(b.y);
    if max_x < rect.x || min_x > rect.right() || max_y < rect.y || min_y > rect.bottom() {
        return false;
    }
    if rect.contains(a) || rect.contains(b) {
        return true;
    }
    let corners = [
        Point::new(rect.x, rect.y),
        Point::new(rect.right(), rect.y),
        Point::new(rect.right(), rect.bottom()),
        Point::new(rect.x, rect.bottom()),
    ];
    let edges = [
        (corners[0], corners[1]),
        (corners[1], corners[2]),
        (corners[2], corners[3]),
        (corners[3], corners[0]),
    ];
    for (c, d) in edges {
        if segments_intersect(a, b, c, d) {
            return true;
        }
    }
    false
}

pub fn polyline_length(points: &[Point]) -> f32 {
    let mut length = 0.0;
    for pair in points.windows(2) {
        length += pair[0].distance(pair[1]);
    }
    length
}

pub fn bend_count(points: &[Point]) -> usize {
    if points.len() < 3 {
        return 0;
    }
    let mut bends = 0usize;
    for idx in 1..points.len() - 1 {
        let p0 = points[idx - 1];
        let p1 = points[idx];
        let p2 = points[idx + 1];
        let dx1 = p1.x - p0.x;
        let dy1 = p1.y - p0.y;
        let dx2 = p2.x - p1.x;
        let dy2 = p2.y - p1.y;
        if (dx1.abs() <= EPS && dy1.abs() <= EPS) || (dx2.abs() <= EPS && dy2.abs() <= EPS) {
            continue;
        }
        let cross = dx1 * dy2 - dy1 * dx2;
        if cross.abs() > EPS {
            bends += 1;
        }
    }
    bends
}

/// Drop repeated points and interior points collinear with both neighbours
/// along an axis. Keeps the first and last point untouched.
pub fn compress_polyline(points: &[Point]) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    out.push(points[0]);
    for idx in 1..points.len() - 1 {
        let prev = out[out.len() - 1];
        let curr = points[idx];
        if curr.approx_eq(prev) {
            continue;
        }
        let next = points[idx + 1];
        let dx1 = curr.x - prev.x;
        let dy1 = curr.y - prev.y;
        let dx2 = next.x - curr.x;
        let dy2 = next.y - curr.y;
        if (dx1.abs() <= EPS && dx2.abs() <= EPS) || (dy1.abs() <= EPS && dy2.abs() <= EPS) {
            continue;
        }
        out.push(curr);
    }
    let last = points[points.len() - 1];
    if !last.approx_eq(out[out.len() - 1]) {
        out.push(last);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_segments_intersect() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 10.0);
        let c = Point::new(0.0, 10.0);
        let d = Point::new(10.0, 0.0);
        assert!(segments_intersect(a, b, c, d));
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        let c = Point::new(0.0, 5.0);
        let d = Point::new(10.0, 5.0);
        assert!(!segments_intersect(a, b, c, d));
    }

    #[test]
    fn touching_endpoint_counts_as_intersection() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        let c = Point::new(10.0, 0.0);
        let d = Point::new(10.0, 10.0);
        assert!(segments_intersect(a, b, c, d));
    }

    #[test]
    fn segment_through_rect_hits() {
        let rect = Rect::new(50.0, 50.0, 100.0, 100.0);
        assert!(segment_intersects_rect(
            Point::new(0.0, 100.0),
            Point::new(200.0, 100.0),
            &rect
        ));
        assert!(!segment_intersects_rect(
            Point::new(0.0, 40.0),
            Point::new(200.0, 40.0),
            &rect
        ));
    }

    #[test]
    fn segment_fully_inside_rect_hits() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(segment_intersects_rect(
            Point::new(10.0, 10.0),
            Point::new(20.0, 20.0),
            &rect
        ));
    }

    #[test]
    fn expand_grows_every_side() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        let padded = rect.expand(5.0);
        assert_eq!(padded.x, 5.0);
        assert_eq!(padded.y, 5.0);
        assert_eq!(padded.right(), 35.0);
        assert_eq!(padded.bottom(), 35.0);
    }

    #[test]
    fn rect_intersects_with_padding() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(15.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b, 0.0));
        assert!(a.intersects(&b, 5.0));
    }

    #[test]
    fn degenerate_bounds_detected() {
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_degenerate());
        assert!(Rect::new(0.0, 0.0, 10.0, -1.0).is_degenerate());
        assert!(Rect::new(f32::NAN, 0.0, 10.0, 10.0).is_degenerate());
        assert!(!Rect::new(0.0, 0.0, 10.0, 10.0).is_degenerate());
    }

    #[test]
    fn bend_count_tracks_turns() {
        let straight = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 0.0),
        ];
        let orth = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(20.0, 10.0),
        ];
        assert_eq!(bend_count(&straight), 0);
        assert_eq!(bend_count(&orth), 2);
    }

    #[test]
    fn compress_drops_collinear_and_duplicate_points() {
        let path = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 50.0),
            Point::new(0.0, 50.0),
            Point::new(0.0, 100.0),
            Point::new(200.0, 100.0),
            Point::new(200.0, 200.0),
        ];
        let out = compress_polyline(&path);
        assert_eq!(
            out,
            vec![
                Point::new(0.0, 0.0),
                Point::new(0.0, 100.0),
                Point::new(200.0, 100.0),
                Point::new(200.0, 200.0),
            ]
        );
    }
}
