use std::collections::BTreeSet;

use crate::geometry::{Point, Rect, segment_intersects_rect};
use crate::model::Shape;

/// Obstacle counts below this use a plain sweep; the grid only pays off once
/// the per-query candidate set shrinks meaningfully.
const GRID_BUILD_THRESHOLD: usize = 32;
/// Hard cap on grid size so sparse, far-flung diagrams fall back to the sweep.
const GRID_MAX_CELLS: usize = 250_000;
/// Lower clamp for the derived cell size.
const GRID_CELL_MIN: f32 = 8.0;

/// One padded obstacle. `bounds` already includes the configured padding, so
/// every intersection query is a plain rect test.
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: String,
    pub bounds: Rect,
}

/// Read-only spatial snapshot of a diagram's shapes, built once per routing
/// batch. Queries take the ids of the two connected shapes so a route may
/// legally touch its own endpoints.
#[derive(Debug, Clone)]
pub struct ObstacleIndex {
    obstacles: Vec<Obstacle>,
    grid: Option<Grid>,
}

#[derive(Debug, Clone)]
struct Grid {
    cell: f32,
    min_x: f32,
    min_y: f32,
    cols: i32,
    rows: i32,
    cell_obstacles: Vec<Vec<usize>>,
}

impl Grid {
    fn new(obstacles: &[Obstacle], cell: f32) -> Option<Self> {
        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        for obs in obstacles {
            min_x = min_x.min(obs.bounds.x);
            min_y = min_y.min(obs.bounds.y);
            max_x = max_x.max(obs.bounds.right());
            max_y = max_y.max(obs.bounds.bottom());
        }
        if min_x == f32::MAX {
            return None;
        }
        let cell = cell.max(GRID_CELL_MIN);
        let cols = ((max_x - min_x) / cell).ceil() as i32 + 1;
        let rows = ((max_y - min_y) / cell).ceil() as i32 + 1;
        if cols <= 1 || rows <= 1 {
            return None;
        }
        let total_cells = (cols as usize).saturating_mul(rows as usize);
        if total_cells > GRID_MAX_CELLS {
            return None;
        }
        let mut cell_obstacles = vec![Vec::new(); total_cells];
        for (idx, obs) in obstacles.iter().enumerate() {
            let start_x = ((obs.bounds.x - min_x) / cell).floor().max(0.0) as i32;
            let end_x = ((obs.bounds.right() - min_x) / cell)
                .floor()
                .min((cols - 1) as f32) as i32;
            let start_y = ((obs.bounds.y - min_y) / cell).floor().max(0.0) as i32;
            let end_y = ((obs.bounds.bottom() - min_y) / cell)
                .floor()
                .min((rows - 1) as f32) as i32;
            for iy in start_y..=end_y {
                for ix in start_x..=end_x {
                    cell_obstacles[(iy * cols + ix) as usize].push(idx);
                }
            }
        }
        Some(Self {
            cell,
            min_x,
            min_y,
            cols,
            rows,
            cell_obstacles,
        })
    }

    /// Obstacle indices in every cell the bounding box touches, sorted so
    /// query results stay deterministic.
    fn candidates_in_box(&self, min: Point, max: Point) -> Vec<usize> {
        let start_x = (((min.x - self.min_x) / self.cell).floor() as i32).clamp(0, self.cols - 1);
        let end_x = (((max.x - self.min_x) / self.cell).floor() as i32).clamp(0, self.cols - 1);
        let start_y = (((min.y - self.min_y) / self.cell).floor() as i32).clamp(0, self.rows - 1);
        let end_y = (((max.y - self.min_y) / self.cell).floor() as i32).clamp(0, self.rows - 1);
        if max.x < self.min_x
            || min.x > self.min_x + self.cols as f32 * self.cell
            || max.y < self.min_y
            || min.y > self.min_y + self.rows as f32 * self.cell
        {
            return Vec::new();
        }
        let mut set = BTreeSet::new();
        for iy in start_y..=end_y {
            for ix in start_x..=end_x {
                for &idx in &self.cell_obstacles[(iy * self.cols + ix) as usize] {
                    set.insert(idx);
                }
            }
        }
        set.into_iter().collect()
    }
}

impl ObstacleIndex {
    /// Snapshot the shape set, expanding every bounding box by `padding`.
    pub fn build(shapes: &[Shape], padding: f32) -> Self {
        let obstacles: Vec<Obstacle> = shapes
            .iter()
            .map(|shape| Obstacle {
                id: shape.id.clone(),
                bounds: shape.bounds.expand(padding),
            })
            .collect();
        let grid = if obstacles.len() >= GRID_BUILD_THRESHOLD {
            let mean_extent = obstacles
                .iter()
                .map(|o| (o.bounds.width + o.bounds.height) / 2.0)
                .sum::<f32>()
                / obstacles.len() as f32;
            Grid::new(&obstacles, mean_extent * 0.5)
        } else {
            None
        };
        Self { obstacles, grid }
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// First obstacle the segment hits, skipping the excluded pair. "First"
    /// means lowest build index, which keeps detour decisions deterministic.
    pub fn first_hit_on_segment(
        &self,
        a: Point,
        b: Point,
        exclude: (&str, &str),
    ) -> Option<&Obstacle> {
        let min = Point::new(a.x.min(b.x), a.y.min(b.y));
        let max = Point::new(a.x.max(b.x), a.y.max(b.y));
        match &self.grid {
            Some(grid) => {
                for idx in grid.candidates_in_box(min, max) {
                    let obs = &self.obstacles[idx];
                    if obs.id == exclude.0 || obs.id == exclude.1 {
                        continue;
                    }
                    if segment_intersects_rect(a, b, &obs.bounds) {
                        return Some(obs);
                    }
                }
                None
            }
            None => self.obstacles.iter().find(|obs| {
                obs.id != exclude.0
                    && obs.id != exclude.1
                    && segment_intersects_rect(a, b, &obs.bounds)
            }),
        }
    }

    /// First obstacle any polyline segment hits, scanning segments in order.
    pub fn first_hit_on_path(&self, points: &[Point], exclude: (&str, &str)) -> Option<&Obstacle> {
        for pair in points.windows(2) {
            if let Some(obs) = self.first_hit_on_segment(pair[0], pair[1], exclude) {
                return Some(obs);
            }
        }
        None
    }

    pub fn path_is_clear(&self, points: &[Point], exclude: (&str, &str)) -> bool {
        self.first_hit_on_path(points, exclude).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn shape(id: &str, x: f32, y: f32, w: f32, h: f32) -> Shape {
        Shape::new(id, Rect::new(x, y, w, h), "rectangle")
    }

    #[test]
    fn padded_obstacle_blocks_nearby_segment() {
        let shapes = vec![shape("a", 50.0, 50.0, 100.0, 100.0)];
        let index = ObstacleIndex::build(&shapes, 10.0);
        // y=45 misses the raw rect but sits inside the 10-unit padding.
        let hit = index.first_hit_on_segment(
            Point::new(0.0, 45.0),
            Point::new(200.0, 45.0),
            ("x", "y"),
        );
        assert!(hit.is_some());
    }

    #[test]
    fn excluded_shapes_are_transparent() {
        let shapes = vec![shape("a", 50.0, 50.0, 100.0, 100.0)];
        let index = ObstacleIndex::build(&shapes, 0.0);
        let hit = index.first_hit_on_segment(
            Point::new(0.0, 100.0),
            Point::new(200.0, 100.0),
            ("a", "b"),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn first_hit_reports_lowest_index() {
        let shapes = vec![
            shape("a", 40.0, 90.0, 20.0, 20.0),
            shape("b", 100.0, 90.0, 20.0, 20.0),
        ];
        let index = ObstacleIndex::build(&shapes, 0.0);
        let hit = index
            .first_hit_on_segment(Point::new(0.0, 100.0), Point::new(200.0, 100.0), ("x", "y"))
            .unwrap();
        assert_eq!(hit.id, "a");
    }

    #[test]
    fn grid_and_sweep_agree() {
        // Enough shapes to trip the grid threshold, laid out on a lattice.
        let mut shapes = Vec::new();
        for row in 0..8 {
            for col in 0..8 {
                shapes.push(shape(
                    &format!("s{row}_{col}"),
                    col as f32 * 60.0,
                    row as f32 * 60.0,
                    30.0,
                    30.0,
                ));
            }
        }
        let gridded = ObstacleIndex::build(&shapes, 2.0);
        assert!(gridded.grid.is_some());
        let sweep = ObstacleIndex {
            obstacles: gridded.obstacles.clone(),
            grid: None,
        };
        let probes = [
            (Point::new(-10.0, 15.0), Point::new(500.0, 15.0)),
            (Point::new(45.0, -10.0), Point::new(45.0, 500.0)),
            (Point::new(31.0, 31.0), Point::new(59.0, 59.0)),
            (Point::new(-20.0, -20.0), Point::new(-5.0, 480.0)),
        ];
        for (a, b) in probes {
            let lhs = gridded
                .first_hit_on_segment(a, b, ("none", "none"))
                .map(|o| o.id.clone());
            let rhs = sweep
                .first_hit_on_segment(a, b, ("none", "none"))
                .map(|o| o.id.clone());
            assert_eq!(lhs, rhs, "probe ({a:?}, {b:?})");
        }
    }
}
