//! Doors bound to wall segments.

use super::{EntityId, Shape};
use crate::error::{EditorError, EditorResult};
use crate::geometry::{normalize_degrees, point_to_segment_dist, rotate_vec};
use crate::walls::{WallHit, WallSegment, wall_segment};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Single or double leaf door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DoorKind {
    #[default]
    Single,
    Double,
}

impl DoorKind {
    /// Width of a newly placed door (ft).
    pub fn default_width(self) -> f64 {
        match self {
            DoorKind::Single => 3.0,
            DoorKind::Double => 6.0,
        }
    }
}

/// A door sitting on one edge of a wall-bearing shape.
///
/// The wall is a weak reference: `(wall_owner_id, wall_edge_index)` is looked
/// up again on every use and may be gone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub(crate) id: EntityId,
    pub kind: DoorKind,
    /// Centre of the door on the wall segment.
    pub position: Point,
    /// Opening width (ft).
    pub width: f64,
    pub wall_owner_id: EntityId,
    pub wall_edge_index: usize,
    /// Rotation in degrees; follows the wall unless `free_rotate`.
    pub rotation: f64,
    #[serde(default)]
    pub free_rotate: bool,
}

impl Door {
    /// Smallest width a resize may produce (ft).
    pub const MIN_WIDTH: f64 = 2.0;

    /// Create a door of the kind's default width on the wall found by a
    /// nearest-segment search. The width is cut down to the segment length,
    /// so callers pick segments at least [`Door::MIN_WIDTH`] long.
    pub fn on_wall(kind: DoorKind, hit: &WallHit) -> Self {
        let segment = &hit.segment;
        let width = kind.default_width().min(segment.length());
        Self {
            id: Uuid::new_v4(),
            kind,
            position: segment.fit_position(hit.position, width),
            width,
            wall_owner_id: segment.owner_id,
            wall_edge_index: segment.edge_index,
            rotation: segment.angle(),
            free_rotate: false,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Move the door onto another segment near `point`, keeping its width.
    pub fn bind_to(&mut self, segment: &WallSegment, point: Point) {
        self.width = self.width.min(segment.length());
        self.position = segment.fit_position(point, self.width);
        self.wall_owner_id = segment.owner_id;
        self.wall_edge_index = segment.edge_index;
        if !self.free_rotate {
            self.rotation = segment.angle();
        }
    }

    /// Resolve the wall this door is bound to.
    pub fn resolve_wall(&self, shapes: &[Shape]) -> EditorResult<WallSegment> {
        wall_segment(shapes, self.wall_owner_id, self.wall_edge_index).ok_or(
            EditorError::DanglingWall {
                door: self.id,
                wall: self.wall_owner_id,
                edge: self.wall_edge_index,
            },
        )
    }

    /// Set the rotation, normalized into `[0, 360)`.
    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = normalize_degrees(degrees);
    }

    /// Unit vector along the door's opening.
    pub fn direction(&self) -> Vec2 {
        rotate_vec(Vec2::new(1.0, 0.0), self.rotation)
    }

    /// The two ends of the opening: `(start, end)`.
    pub fn endpoints(&self) -> (Point, Point) {
        let half = self.direction() * (self.width / 2.0);
        (self.position - half, self.position + half)
    }

    /// Check if a point (in world coordinates) is within `buffer` of the opening.
    pub fn hit_test(&self, point: Point, buffer: f64) -> bool {
        let (start, end) = self.endpoints();
        point_to_segment_dist(point, start, end) <= buffer
    }
}
