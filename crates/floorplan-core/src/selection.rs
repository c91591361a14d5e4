//! Selection handles.
//!
//! Handles live in canvas pixels so their hit radius does not change with
//! zoom. They are laid out on the entity's local bounding box and turned with
//! the entity's rotation about the box centre.

use crate::config::EditorConfig;
use crate::entities::{Door, Entity, VertexEntity};
use crate::geometry::rotate_vec;
use crate::viewport::Viewport;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub fn opposite(self) -> Self {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }

    /// Unit offset from the box centre, in half extents.
    pub fn offset(self) -> Vec2 {
        match self {
            Corner::TopLeft => Vec2::new(-1.0, -1.0),
            Corner::TopRight => Vec2::new(1.0, -1.0),
            Corner::BottomLeft => Vec2::new(-1.0, 1.0),
            Corner::BottomRight => Vec2::new(1.0, 1.0),
        }
    }
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub fn opposite(self) -> Self {
        match self {
            Edge::Top => Edge::Bottom,
            Edge::Right => Edge::Left,
            Edge::Bottom => Edge::Top,
            Edge::Left => Edge::Right,
        }
    }

    /// Unit offset from the box centre, in half extents.
    pub fn offset(self) -> Vec2 {
        match self {
            Edge::Top => Vec2::new(0.0, -1.0),
            Edge::Right => Vec2::new(1.0, 0.0),
            Edge::Bottom => Vec2::new(0.0, 1.0),
            Edge::Left => Vec2::new(-1.0, 0.0),
        }
    }
}

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Bounding-box corner (shapes, pathways).
    Corner(Corner),
    /// Bounding-box edge midpoint (shapes, pathways).
    Edge(Edge),
    /// Vertex of a driveway or patio.
    Vertex(usize),
    /// Midpoint of edge `i → i+1` of a driveway or patio.
    EdgeMidpoint(usize),
    /// Door opening ends.
    DoorStart,
    DoorEnd,
    /// Door centre; dragging slides the door along walls.
    DoorCenter,
    /// Centre handle that translates the whole entity.
    Move,
    /// Rotation handle above the top edge.
    Rotate,
}

impl HandleKind {
    /// Lookup priority: resize handles first, then rotate, then move.
    pub fn priority(self) -> u8 {
        match self {
            HandleKind::Rotate => 1,
            HandleKind::Move | HandleKind::DoorCenter => 2,
            _ => 0,
        }
    }
}

/// Pixel sizes used to lay out and hit handles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleMetrics {
    pub radius: f64,
    pub rotate_radius: f64,
    /// Distance of the rotate handle above the top edge.
    pub rotate_offset: f64,
}

impl Default for HandleMetrics {
    fn default() -> Self {
        Self {
            radius: 8.0,
            rotate_radius: 12.0,
            rotate_offset: 30.0,
        }
    }
}

impl From<&EditorConfig> for HandleMetrics {
    fn from(config: &EditorConfig) -> Self {
        Self {
            radius: config.handle_radius_px,
            rotate_radius: config.rotate_handle_radius_px,
            rotate_offset: config.rotate_handle_offset_px,
        }
    }
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Position in canvas pixels.
    pub position: Point,
    /// Handle type.
    pub kind: HandleKind,
}

impl Handle {
    /// Create a new handle.
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a canvas point hits this handle.
    pub fn hit_test(&self, point: Point, radius: f64) -> bool {
        (point - self.position).hypot2() <= radius * radius
    }
}

/// Get the selection handles for an entity, in canvas pixels.
pub fn get_handles(entity: &Entity, viewport: &Viewport, metrics: &HandleMetrics) -> Vec<Handle> {
    match entity {
        Entity::Door(door) => door_handles(door, viewport, metrics),
        Entity::Driveway(rect) | Entity::Patio(rect) => vertex_handles(rect, viewport, metrics),
        Entity::Shape(shape) => box_handles(shape, viewport, metrics),
        Entity::Pathway(path) => box_handles(path, viewport, metrics),
    }
}

/// Find the handle under a canvas point, if any.
pub fn find_handle_at_point(
    entity: &Entity,
    canvas_point: Point,
    viewport: &Viewport,
    metrics: &HandleMetrics,
) -> Option<HandleKind> {
    let mut handles = get_handles(entity, viewport, metrics);
    // stable sort keeps layout order within a priority
    handles.sort_by_key(|h| h.kind.priority());
    handles
        .into_iter()
        .find(|h| {
            let radius = match h.kind {
                HandleKind::Rotate => metrics.rotate_radius,
                _ => metrics.radius,
            };
            h.hit_test(canvas_point, radius)
        })
        .map(|h| h.kind)
}

/// Canvas frame of an entity's local box: centre, half extents in pixels and
/// rotation.
struct CanvasBox {
    center: Point,
    half: Vec2,
    rotation: f64,
}

impl CanvasBox {
    fn of(entity: &dyn VertexEntity, viewport: &Viewport) -> Option<Self> {
        if !entity.is_well_formed() {
            return None;
        }
        let bounds = entity.local_bounds()?;
        let scale = viewport.pixels_per_foot();
        Some(Self {
            center: viewport.world_to_canvas(bounds.center()),
            half: Vec2::new(bounds.width() * scale / 2.0, bounds.height() * scale / 2.0),
            rotation: entity.rotation(),
        })
    }

    /// Point at `(dx, dy)` pixels from the centre in the unrotated frame.
    fn at(&self, dx: f64, dy: f64) -> Point {
        self.center + rotate_vec(Vec2::new(dx, dy), self.rotation)
    }

    fn at_offset(&self, unit: Vec2) -> Point {
        self.at(unit.x * self.half.x, unit.y * self.half.y)
    }

    fn rotate_handle(&self, metrics: &HandleMetrics) -> Handle {
        Handle::new(self.at(0.0, -self.half.y - metrics.rotate_offset), HandleKind::Rotate)
    }
}

fn box_handles(entity: &dyn VertexEntity, viewport: &Viewport, metrics: &HandleMetrics) -> Vec<Handle> {
    let Some(frame) = CanvasBox::of(entity, viewport) else {
        return Vec::new();
    };
    let corners = [Corner::TopLeft, Corner::TopRight, Corner::BottomRight, Corner::BottomLeft];
    let edges = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    let mut handles = Vec::with_capacity(10);
    handles.extend(corners.map(|c| Handle::new(frame.at_offset(c.offset()), HandleKind::Corner(c))));
    handles.extend(edges.map(|e| Handle::new(frame.at_offset(e.offset()), HandleKind::Edge(e))));
    handles.push(frame.rotate_handle(metrics));
    handles.push(Handle::new(frame.center, HandleKind::Move));
    handles
}

fn vertex_handles(entity: &dyn VertexEntity, viewport: &Viewport, metrics: &HandleMetrics) -> Vec<Handle> {
    let Some(frame) = CanvasBox::of(entity, viewport) else {
        return Vec::new();
    };
    let outline: Vec<Point> = entity.outline().iter().map(|p| viewport.world_to_canvas(*p)).collect();
    let n = outline.len();

    let mut handles = Vec::with_capacity(2 * n + 2);
    handles.extend(outline.iter().enumerate().map(|(i, p)| Handle::new(*p, HandleKind::Vertex(i))));
    handles.extend(
        (0..n).map(|i| Handle::new(outline[i].midpoint(outline[(i + 1) % n]), HandleKind::EdgeMidpoint(i))),
    );
    handles.push(frame.rotate_handle(metrics));
    handles.push(Handle::new(frame.center, HandleKind::Move));
    handles
}

fn door_handles(door: &Door, viewport: &Viewport, metrics: &HandleMetrics) -> Vec<Handle> {
    let (start, end) = door.endpoints();
    let center = viewport.world_to_canvas(door.position);
    let mut handles = vec![
        Handle::new(viewport.world_to_canvas(start), HandleKind::DoorStart),
        Handle::new(viewport.world_to_canvas(end), HandleKind::DoorEnd),
        Handle::new(center, HandleKind::DoorCenter),
    ];
    if door.free_rotate {
        let offset = rotate_vec(Vec2::new(0.0, -metrics.rotate_offset), door.rotation);
        handles.push(Handle::new(center + offset, HandleKind::Rotate));
    }
    handles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{DoorKind, Layer, Pathway, RectEntity, RectKind, Shape, ShapeKind, WidthCategory};
    use crate::walls::find_nearest_wall_segment;
    use kurbo::Size;

    fn viewport() -> Viewport {
        Viewport::from_config(&EditorConfig::default(), Size::new(1200.0, 900.0))
    }

    fn rect_shape() -> Entity {
        Shape::rectangle(Point::new(10.0, 10.0), Point::new(30.0, 20.0), Layer::House).into()
    }

    #[test]
    fn test_box_handles_layout() {
        let vp = viewport();
        let handles = get_handles(&rect_shape(), &vp, &HandleMetrics::default());
        assert_eq!(handles.len(), 10);

        let top_left = handles
            .iter()
            .find(|h| h.kind == HandleKind::Corner(Corner::TopLeft))
            .unwrap();
        assert!((top_left.position - vp.world_to_canvas(Point::new(10.0, 10.0))).hypot() < 1e-9);

        let rotate = handles.iter().find(|h| h.kind == HandleKind::Rotate).unwrap();
        let top_mid = vp.world_to_canvas(Point::new(20.0, 10.0));
        assert!((rotate.position - (top_mid - Vec2::new(0.0, 30.0))).hypot() < 1e-9);
    }

    #[test]
    fn test_handles_follow_rotation() {
        let vp = viewport();
        let mut shape = Shape::rectangle(Point::new(10.0, 10.0), Point::new(30.0, 20.0), Layer::House);
        shape.rotation = 90.0;
        let handles = get_handles(&shape.clone().into(), &vp, &HandleMetrics::default());

        // rotated top-left corner matches the drawn outline
        let outline = shape.outline();
        let top_left = handles
            .iter()
            .find(|h| h.kind == HandleKind::Corner(Corner::TopLeft))
            .unwrap();
        assert!((top_left.position - vp.world_to_canvas(outline[0])).hypot() < 1e-9);

        // rotate handle sits to the right of the centre after a 90 degree turn
        let center = vp.world_to_canvas(Point::new(20.0, 15.0));
        let rotate = handles.iter().find(|h| h.kind == HandleKind::Rotate).unwrap();
        let expected_dist = 5.0 * vp.pixels_per_foot() + 30.0;
        assert!((rotate.position.x - (center.x + expected_dist)).abs() < 1e-9);
        assert!((rotate.position.y - center.y).abs() < 1e-9);
    }

    #[test]
    fn test_find_handle_at_point() {
        let vp = viewport();
        let metrics = HandleMetrics::default();
        let entity = rect_shape();

        let corner = vp.world_to_canvas(Point::new(30.0, 20.0));
        assert_eq!(
            find_handle_at_point(&entity, corner + Vec2::new(5.0, -3.0), &vp, &metrics),
            Some(HandleKind::Corner(Corner::BottomRight))
        );
        let center = vp.world_to_canvas(Point::new(20.0, 15.0));
        assert_eq!(
            find_handle_at_point(&entity, center, &vp, &metrics),
            Some(HandleKind::Move)
        );
        assert_eq!(
            find_handle_at_point(&entity, corner + Vec2::new(9.0, 0.0), &vp, &metrics),
            None
        );
    }

    #[test]
    fn test_resize_beats_move_when_overlapping() {
        let vp = viewport();
        let metrics = HandleMetrics::default();
        // a tiny shape where every handle overlaps the centre
        let tiny: Entity = Shape::rectangle(Point::new(0.0, 0.0), Point::new(0.1, 0.1), Layer::House).into();
        let center = vp.world_to_canvas(Point::new(0.05, 0.05));
        assert!(matches!(
            find_handle_at_point(&tiny, center, &vp, &metrics),
            Some(HandleKind::Corner(_))
        ));
    }

    #[test]
    fn test_rect_entity_vertex_handles() {
        let vp = viewport();
        let patio: Entity = RectEntity::from_corners(
            RectKind::Patio,
            WidthCategory::Single,
            Point::new(0.0, 0.0),
            Point::new(30.0, 10.0),
        )
        .into();
        let handles = get_handles(&patio, &vp, &HandleMetrics::default());
        assert_eq!(handles.len(), 10);
        assert!(handles.iter().any(|h| h.kind == HandleKind::Vertex(3)));
        assert!(handles.iter().any(|h| h.kind == HandleKind::EdgeMidpoint(0)));
        assert!(!handles.iter().any(|h| matches!(h.kind, HandleKind::Corner(_))));

        let mid_top = vp.world_to_canvas(Point::new(15.0, 0.0));
        assert_eq!(
            find_handle_at_point(&patio, mid_top, &vp, &HandleMetrics::default()),
            Some(HandleKind::EdgeMidpoint(0))
        );
    }

    #[test]
    fn test_door_handles() {
        let vp = viewport();
        let shapes = vec![Shape::new(
            ShapeKind::Line,
            vec![Point::new(0.0, 0.0), Point::new(20.0, 0.0)],
            Layer::Wall,
        )];
        let hit = find_nearest_wall_segment(&shapes, Point::new(10.0, 0.0), 1.0).unwrap();
        let mut door = Door::on_wall(DoorKind::Single, &hit);

        let handles = get_handles(&door.clone().into(), &vp, &HandleMetrics::default());
        assert_eq!(handles.len(), 3);

        door.free_rotate = true;
        let entity: Entity = door.into();
        assert_eq!(get_handles(&entity, &vp, &HandleMetrics::default()).len(), 4);
        let end = vp.world_to_canvas(Point::new(11.5, 0.0));
        assert_eq!(
            find_handle_at_point(&entity, end, &vp, &HandleMetrics::default()),
            Some(HandleKind::DoorEnd)
        );
    }

    #[test]
    fn test_malformed_entity_has_no_handles() {
        let vp = viewport();
        let path: Entity = Pathway::new(vec![Point::new(1.0, 1.0)], 3.0).into();
        assert!(get_handles(&path, &vp, &HandleMetrics::default()).is_empty());
    }
}
