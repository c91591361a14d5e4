//! Wall segment lookup.
//!
//! A wall segment is one edge of a wall-bearing [`Shape`]. Doors bind to
//! segments by `(owner id, edge index)` and look them up again on every use.

use crate::entities::{EntityId, Shape, VertexEntity};
use crate::geometry::{project_onto_segment, segment_angle, unit_direction};
use kurbo::{Point, Vec2};

/// One edge of a wall-bearing shape, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSegment {
    pub owner_id: EntityId,
    pub edge_index: usize,
    pub start: Point,
    pub end: Point,
}

impl WallSegment {
    pub fn length(&self) -> f64 {
        (self.end - self.start).hypot()
    }

    /// Unit vector from start to end, `None` for a zero-length edge.
    pub fn direction(&self) -> Option<Vec2> {
        unit_direction(self.start, self.end)
    }

    /// Direction of the segment in degrees.
    pub fn angle(&self) -> f64 {
        segment_angle(self.start, self.end)
    }

    /// Closest point on the segment to `point`.
    pub fn project(&self, point: Point) -> Point {
        project_onto_segment(point, self.start, self.end).0
    }

    /// Point on the segment closest to `point`, pulled inwards so a door of
    /// `width` centred there stays on the segment. Segments shorter than the
    /// door centre it on their midpoint.
    pub fn fit_position(&self, point: Point, width: f64) -> Point {
        let length = self.length();
        let Some(dir) = self.direction() else {
            return self.start;
        };
        if width >= length {
            return self.start.midpoint(self.end);
        }
        let along = (point - self.start).dot(dir).clamp(width / 2.0, length - width / 2.0);
        self.start + dir * along
    }
}

/// A wall segment found near a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallHit {
    pub segment: WallSegment,
    /// Projection of the query point onto the segment.
    pub position: Point,
    /// Distance from the query point to the segment.
    pub distance: f64,
}

/// Look up edge `edge_index` of shape `owner_id`, if it still exists.
pub fn wall_segment(shapes: &[Shape], owner_id: EntityId, edge_index: usize) -> Option<WallSegment> {
    let owner = shapes.iter().find(|s| s.id() == owner_id)?;
    if !owner.layer.is_wall_bearing() {
        return None;
    }
    let (start, end) = owner.edge(edge_index)?;
    Some(WallSegment {
        owner_id,
        edge_index,
        start,
        end,
    })
}

/// Every non-degenerate edge of every well-formed wall-bearing shape.
pub fn wall_segments(shapes: &[Shape]) -> impl Iterator<Item = WallSegment> + '_ {
    shapes
        .iter()
        .filter(|s| s.layer.is_wall_bearing() && s.is_well_formed())
        .flat_map(|shape| {
            let outline = shape.outline();
            let id = shape.id();
            (0..shape.edge_count()).filter_map(move |i| {
                let start = outline[i];
                let end = outline[(i + 1) % outline.len()];
                let segment = WallSegment {
                    owner_id: id,
                    edge_index: i,
                    start,
                    end,
                };
                segment.direction().map(|_| segment)
            })
        })
}

/// Nearest wall segment within `threshold` of `point`.
///
/// Ties keep the segment found first, i.e. the lower-z shape and lower edge
/// index.
pub fn find_nearest_wall_segment(shapes: &[Shape], point: Point, threshold: f64) -> Option<WallHit> {
    find_wall_for_width(shapes, point, threshold, 0.0)
}

/// Like [`find_nearest_wall_segment`], skipping segments shorter than
/// `min_length`.
pub fn find_wall_for_width(shapes: &[Shape], point: Point, threshold: f64, min_length: f64) -> Option<WallHit> {
    let mut best: Option<WallHit> = None;
    for segment in wall_segments(shapes) {
        let position = segment.project(point);
        let distance = (point - position).hypot();
        if distance > threshold || segment.length() < min_length {
            continue;
        }
        if best.is_none_or(|b| distance < b.distance) {
            best = Some(WallHit {
                segment,
                position,
                distance,
            });
        }
    }
    best
}
