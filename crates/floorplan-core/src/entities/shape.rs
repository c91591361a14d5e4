//! Generic drawn shapes: plot boundaries, house outlines, walls, annotations.

use super::{EntityId, EntityKind, SerializableColor, VertexEntity};
use crate::error::{EditorError, EditorResult};
use crate::geometry::normalize_degrees;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Geometric kind of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Four vertices in corner order.
    Rectangle,
    /// Closed polygon with any number of vertices.
    Polygon,
    /// Two-point open segment.
    Line,
    /// Open polyline sampled from pointer motion.
    Freehand,
}

impl ShapeKind {
    /// Closed kinds enclose an area; open kinds are stroked paths.
    pub fn is_closed(self) -> bool {
        matches!(self, ShapeKind::Rectangle | ShapeKind::Polygon)
    }
}

/// Drawing layer of a shape. Determines default styling and whether doors
/// may attach to the shape's edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Layer {
    /// Property boundary.
    Plot,
    /// House outline.
    #[default]
    House,
    /// Interior or garden wall.
    Wall,
    /// Free annotations.
    Annotation,
}

impl Layer {
    /// Doors can only be placed on edges of wall-bearing shapes.
    pub fn is_wall_bearing(self) -> bool {
        matches!(self, Layer::House | Layer::Wall)
    }

    /// Default stroke color for new shapes on this layer.
    pub fn default_color(self) -> SerializableColor {
        match self {
            Layer::Plot => SerializableColor::new(46, 125, 50, 255),
            Layer::House => SerializableColor::black(),
            Layer::Wall => SerializableColor::new(66, 66, 66, 255),
            Layer::Annotation => SerializableColor::new(25, 118, 210, 255),
        }
    }
}

/// A generic shape made of vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub(crate) id: EntityId,
    pub kind: ShapeKind,
    /// Local (pre-rotation) vertices.
    pub vertices: Vec<Point>,
    /// Stroke width in feet.
    pub stroke_width: f64,
    pub color: SerializableColor,
    pub layer: Layer,
    /// Rotation in degrees about the bounding-box centre.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub name: Option<String>,
}

impl Shape {
    /// Default stroke width of new shapes (ft).
    pub const DEFAULT_STROKE_WIDTH: f64 = 0.5;

    /// Create a new shape.
    pub fn new(kind: ShapeKind, vertices: Vec<Point>, layer: Layer) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            vertices,
            stroke_width: Self::DEFAULT_STROKE_WIDTH,
            color: layer.default_color(),
            layer,
            rotation: 0.0,
            name: None,
        }
    }

    /// Create a rectangle from two opposite corners. Vertices are emitted in
    /// corner order starting at the minimum corner, whatever the drag direction.
    pub fn rectangle(p1: Point, p2: Point, layer: Layer) -> Self {
        Self::new(ShapeKind::Rectangle, rectangle_corners(p1, p2).to_vec(), layer)
    }

    /// Set the stroke width.
    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.stroke_width = stroke_width;
        self
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the rotation, normalized into `[0, 360)`.
    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = normalize_degrees(degrees);
    }

    /// Check the shape's structural invariants.
    pub fn validate(&self) -> EditorResult<()> {
        let required = self.min_vertices();
        let count_ok = match self.kind {
            ShapeKind::Rectangle => self.vertices.len() == 4,
            _ => self.vertices.len() >= required,
        };
        if count_ok {
            Ok(())
        } else {
            Err(EditorError::MalformedEntity {
                id: self.id,
                vertices: self.vertices.len(),
                required,
            })
        }
    }

    /// Number of addressable edges. Closed kinds include the closing edge.
    pub fn edge_count(&self) -> usize {
        let n = self.vertices.len();
        match n {
            0 | 1 => 0,
            2 => 1,
            _ if self.kind.is_closed() => n,
            _ => n - 1,
        }
    }

    /// Endpoints of edge `index` as drawn (rotation applied).
    pub fn edge(&self, index: usize) -> Option<(Point, Point)> {
        if index >= self.edge_count() {
            return None;
        }
        let outline = self.outline();
        let next = (index + 1) % outline.len();
        Some((outline[index], outline[next]))
    }
}

/// Corner-ordered rectangle vertices from two opposite corners.
pub(crate) fn rectangle_corners(p1: Point, p2: Point) -> [Point; 4] {
    let (x0, x1) = (p1.x.min(p2.x), p1.x.max(p2.x));
    let (y0, y1) = (p1.y.min(p2.y), p1.y.max(p2.y));
    [
        Point::new(x0, y0),
        Point::new(x1, y0),
        Point::new(x1, y1),
        Point::new(x0, y1),
    ]
}

impl VertexEntity for Shape {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Shape
    }

    fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    fn rotation(&self) -> f64 {
        self.rotation
    }

    fn min_vertices(&self) -> usize {
        match self.kind {
            ShapeKind::Rectangle => 4,
            _ => 2,
        }
    }

    fn is_closed(&self) -> bool {
        self.kind.is_closed() && self.vertices.len() >= 3
    }

    fn band_width(&self) -> f64 {
        self.stroke_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_from_drag() {
        let rect = Shape::rectangle(Point::new(0.0, 0.0), Point::new(50.0, 90.0), Layer::House);
        assert_eq!(rect.kind, ShapeKind::Rectangle);
        assert_eq!(
            rect.vertices,
            vec![
                Point::new(0.0, 0.0),
                Point::new(50.0, 0.0),
                Point::new(50.0, 90.0),
                Point::new(0.0, 90.0),
            ]
        );
    }

    #[test]
    fn test_rectangle_drag_direction_independent() {
        let a = Shape::rectangle(Point::new(50.0, 90.0), Point::new(0.0, 0.0), Layer::Plot);
        let b = Shape::rectangle(Point::new(0.0, 90.0), Point::new(50.0, 0.0), Layer::Plot);
        assert_eq!(a.vertices, b.vertices);
    }

    #[test]
    fn test_validate() {
        let line = Shape::new(ShapeKind::Line, vec![Point::ZERO], Layer::Wall);
        assert!(matches!(
            line.validate(),
            Err(EditorError::MalformedEntity { vertices: 1, required: 2, .. })
        ));

        let mut rect = Shape::rectangle(Point::ZERO, Point::new(1.0, 1.0), Layer::House);
        assert!(rect.validate().is_ok());
        rect.vertices.push(Point::new(2.0, 2.0));
        assert!(rect.validate().is_err());
    }

    #[test]
    fn test_edges_of_closed_and_open_shapes() {
        let rect = Shape::rectangle(Point::ZERO, Point::new(10.0, 5.0), Layer::House);
        assert_eq!(rect.edge_count(), 4);
        let (a, b) = rect.edge(3).unwrap();
        assert_eq!(a, Point::new(0.0, 5.0));
        assert_eq!(b, Point::new(0.0, 0.0));
        assert!(rect.edge(4).is_none());

        let wall = Shape::new(
            ShapeKind::Line,
            vec![Point::ZERO, Point::new(20.0, 0.0)],
            Layer::Wall,
        );
        assert_eq!(wall.edge_count(), 1);
    }

    #[test]
    fn test_set_rotation_normalizes() {
        let mut shape = Shape::rectangle(Point::ZERO, Point::new(1.0, 1.0), Layer::House);
        shape.set_rotation(-45.0);
        assert!((shape.rotation - 315.0).abs() < 1e-12);
    }

    #[test]
    fn test_wall_bearing_layers() {
        assert!(Layer::House.is_wall_bearing());
        assert!(Layer::Wall.is_wall_bearing());
        assert!(!Layer::Plot.is_wall_bearing());
        assert!(!Layer::Annotation.is_wall_bearing());
    }
}
