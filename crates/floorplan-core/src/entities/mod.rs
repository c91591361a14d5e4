//! Entity definitions for the floorplan.

mod door;
mod pathway;
mod rect_entity;
mod shape;

pub use door::{Door, DoorKind};
pub use pathway::Pathway;
pub use rect_entity::{RectEntity, RectKind, WidthCategory};
pub use shape::{Layer, Shape, ShapeKind};
pub(crate) use shape::rectangle_corners;

use crate::geometry::{bounding_box, rotate_point, rotated_outline};
use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for entities.
pub type EntityId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Paving material of driveways, patios and pathways.
///
/// Only recorded here; the renderer maps it to a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SurfaceType {
    #[default]
    Concrete,
    Asphalt,
    Gravel,
    Pavers,
    Decking,
    Flagstone,
}

/// The per-kind collections of a floorplan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Shape,
    Door,
    Driveway,
    Patio,
    Pathway,
}

impl EntityKind {
    /// Order in which collections are searched when a click could select
    /// several entities. Small, easily covered targets come first.
    pub const SELECTION_PRECEDENCE: [EntityKind; 5] = [
        EntityKind::Door,
        EntityKind::Patio,
        EntityKind::Pathway,
        EntityKind::Driveway,
        EntityKind::Shape,
    ];
}

/// A weak reference to an entity: its collection plus its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: EntityId,
}

impl EntityRef {
    pub fn new(kind: EntityKind, id: EntityId) -> Self {
        Self { kind, id }
    }
}

/// Common behaviour of vertex-based entities (everything except doors).
///
/// Vertices are stored in local, pre-rotation space. The drawn outline is the
/// vertex set turned by `rotation` degrees about the centre of its bounding
/// box.
pub trait VertexEntity {
    /// Get the unique identifier.
    fn id(&self) -> EntityId;

    /// Collection this entity lives in.
    fn kind(&self) -> EntityKind;

    /// Local (pre-rotation) vertices.
    fn vertices(&self) -> &[Point];

    /// Rotation in degrees, in `[0, 360)`.
    fn rotation(&self) -> f64;

    /// Fewest vertices the entity needs to be drawable.
    fn min_vertices(&self) -> usize;

    /// Whether the outline is a closed area (as opposed to a stroked path).
    fn is_closed(&self) -> bool;

    /// Width of the stroke or band drawn along an open outline (ft).
    fn band_width(&self) -> f64;

    /// Whether the entity satisfies its vertex-count invariant.
    fn is_well_formed(&self) -> bool {
        self.vertices().len() >= self.min_vertices()
    }

    /// Bounding box of the local vertices.
    fn local_bounds(&self) -> Option<Rect> {
        bounding_box(self.vertices())
    }

    /// Vertices as drawn, with rotation applied.
    fn outline(&self) -> Vec<Point> {
        rotated_outline(self.vertices(), self.rotation())
    }

    /// Bounding box of the drawn outline in world coordinates.
    fn bounds(&self) -> Option<Rect> {
        bounding_box(&self.outline())
    }

    /// Map a world point into the entity's local (unrotated) frame.
    fn to_local(&self, world: Point) -> Point {
        match self.local_bounds() {
            Some(bounds) => rotate_point(world, bounds.center(), -self.rotation()),
            None => world,
        }
    }
}

/// Enum wrapper over every entity type (for snapshots and serialization).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entity {
    Shape(Shape),
    Door(Door),
    Driveway(RectEntity),
    Patio(RectEntity),
    Pathway(Pathway),
}

impl Entity {
    pub fn id(&self) -> EntityId {
        match self {
            Entity::Shape(s) => s.id(),
            Entity::Door(d) => d.id,
            Entity::Driveway(r) | Entity::Patio(r) => r.id(),
            Entity::Pathway(p) => p.id(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Shape(_) => EntityKind::Shape,
            Entity::Door(_) => EntityKind::Door,
            Entity::Driveway(_) => EntityKind::Driveway,
            Entity::Patio(_) => EntityKind::Patio,
            Entity::Pathway(_) => EntityKind::Pathway,
        }
    }

    pub fn entity_ref(&self) -> EntityRef {
        EntityRef::new(self.kind(), self.id())
    }

    /// Rotation in degrees.
    pub fn rotation(&self) -> f64 {
        match self {
            Entity::Shape(s) => s.rotation,
            Entity::Door(d) => d.rotation,
            Entity::Driveway(r) | Entity::Patio(r) => r.rotation,
            Entity::Pathway(p) => p.rotation,
        }
    }

    /// The vertex-based view of this entity, if it has one.
    pub fn as_vertex_entity(&self) -> Option<&dyn VertexEntity> {
        match self {
            Entity::Shape(s) => Some(s),
            Entity::Driveway(r) | Entity::Patio(r) => Some(r),
            Entity::Pathway(p) => Some(p),
            Entity::Door(_) => None,
        }
    }

    /// Whether the entity satisfies its structural invariants.
    pub fn is_well_formed(&self) -> bool {
        match self {
            Entity::Door(d) => d.width > 0.0,
            other => other.as_vertex_entity().is_some_and(|e| e.is_well_formed()),
        }
    }

    /// Regenerate the entity's ID with a new unique identifier.
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            Entity::Shape(s) => s.id = new_id,
            Entity::Door(d) => d.id = new_id,
            Entity::Driveway(r) | Entity::Patio(r) => r.id = new_id,
            Entity::Pathway(p) => p.id = new_id,
        }
    }
}

impl From<Shape> for Entity {
    fn from(shape: Shape) -> Self {
        Entity::Shape(shape)
    }
}

impl From<Door> for Entity {
    fn from(door: Door) -> Self {
        Entity::Door(door)
    }
}

impl From<RectEntity> for Entity {
    fn from(rect: RectEntity) -> Self {
        match rect.kind {
            RectKind::Driveway => Entity::Driveway(rect),
            RectKind::Patio => Entity::Patio(rect),
        }
    }
}

impl From<Pathway> for Entity {
    fn from(pathway: Pathway) -> Self {
        Entity::Pathway(pathway)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_roundtrip_through_peniko() {
        let color = SerializableColor::new(12, 34, 56, 200);
        let peniko_color: Color = color.into();
        assert_eq!(SerializableColor::from(peniko_color), color);
    }

    #[test]
    fn test_selection_precedence_starts_with_doors() {
        assert_eq!(EntityKind::SELECTION_PRECEDENCE[0], EntityKind::Door);
        assert_eq!(EntityKind::SELECTION_PRECEDENCE[4], EntityKind::Shape);
    }

    #[test]
    fn test_rect_entity_converts_by_kind() {
        let patio = RectEntity::from_corners(
            RectKind::Patio,
            WidthCategory::Single,
            Point::new(0.0, 0.0),
            Point::new(10.0, 12.0),
        );
        let entity = Entity::from(patio);
        assert_eq!(entity.kind(), EntityKind::Patio);
    }

    #[test]
    fn test_local_frame_inverts_rotation() {
        let mut shape = Shape::rectangle(Point::new(0.0, 0.0), Point::new(10.0, 4.0), Layer::House);
        shape.rotation = 90.0;
        let outline = shape.outline();
        for (world, local) in outline.iter().zip(shape.vertices()) {
            let back = shape.to_local(*world);
            assert!((back - *local).hypot() < 1e-9);
        }
    }

    #[test]
    fn test_regenerate_id() {
        let mut entity = Entity::from(Pathway::new(vec![Point::ZERO, Point::new(5.0, 0.0)], 3.0));
        let before = entity.id();
        entity.regenerate_id();
        assert_ne!(before, entity.id());
    }
}
