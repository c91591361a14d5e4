//! Fixed-width rectangular surfaces: driveways and patios.
//!
//! Both kinds share one record and one editing path; everything that differs
//! between them is looked up in [`RectKind`]'s tables.

use super::shape::rectangle_corners;
use super::{EntityId, EntityKind, SurfaceType, VertexEntity};
use crate::error::{EditorError, EditorResult};
use crate::geometry::normalize_degrees;
use crate::tools::constrain_rectangle_width;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which collection a rectangular surface belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RectKind {
    Driveway,
    Patio,
}

/// Size class that fixes the short axis of a rectangular surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WidthCategory {
    #[default]
    Single,
    Double,
    Triple,
}

impl RectKind {
    /// Fixed short-axis width (ft) for a category.
    pub fn fixed_width(self, category: WidthCategory) -> f64 {
        match (self, category) {
            (RectKind::Driveway, WidthCategory::Single) => 8.0,
            (RectKind::Driveway, WidthCategory::Double) => 16.0,
            (RectKind::Driveway, WidthCategory::Triple) => 24.0,
            (RectKind::Patio, WidthCategory::Single) => 10.0,
            (RectKind::Patio, WidthCategory::Double) => 12.0,
            (RectKind::Patio, WidthCategory::Triple) => 16.0,
        }
    }

    /// Display label for a category.
    pub fn label(self, category: WidthCategory) -> &'static str {
        match (self, category) {
            (RectKind::Driveway, WidthCategory::Single) => "Single-car driveway",
            (RectKind::Driveway, WidthCategory::Double) => "Double-car driveway",
            (RectKind::Driveway, WidthCategory::Triple) => "Triple-car driveway",
            (RectKind::Patio, WidthCategory::Single) => "Compact patio",
            (RectKind::Patio, WidthCategory::Double) => "Standard patio",
            (RectKind::Patio, WidthCategory::Triple) => "Large patio",
        }
    }

    /// Surface used for newly drawn entities of this kind.
    pub fn default_surface(self) -> SurfaceType {
        match self {
            RectKind::Driveway => SurfaceType::Asphalt,
            RectKind::Patio => SurfaceType::Pavers,
        }
    }

    pub fn entity_kind(self) -> EntityKind {
        match self {
            RectKind::Driveway => EntityKind::Driveway,
            RectKind::Patio => EntityKind::Patio,
        }
    }
}

/// A driveway or patio: four vertices forming a rectangle in local space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectEntity {
    pub(crate) id: EntityId,
    pub kind: RectKind,
    pub width_category: WidthCategory,
    pub surface_type: SurfaceType,
    /// Local (pre-rotation) corners.
    pub vertices: [Point; 4],
    /// Rotation in degrees about the bounding-box centre.
    #[serde(default)]
    pub rotation: f64,
}

impl RectEntity {
    /// Create an entity from explicit corners.
    pub fn new(kind: RectKind, width_category: WidthCategory, vertices: [Point; 4]) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            width_category,
            surface_type: kind.default_surface(),
            vertices,
            rotation: 0.0,
        }
    }

    /// Create an entity from a two-corner drag. The longer dragged axis is kept
    /// as the length; the shorter one is set to the category width.
    pub fn from_corners(kind: RectKind, width_category: WidthCategory, p1: Point, p2: Point) -> Self {
        let raw = rectangle_corners(p1, p2);
        let target = kind.fixed_width(width_category);
        let constrained = constrain_rectangle_width(&raw, target);
        let vertices = <[Point; 4]>::try_from(constrained.as_slice()).unwrap_or(raw);
        Self::new(kind, width_category, vertices)
    }

    /// Fixed short-axis width of this entity (ft).
    pub fn target_width(&self) -> f64 {
        self.kind.fixed_width(self.width_category)
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        self.kind.label(self.width_category)
    }

    /// Replace the corners from a transform result.
    pub fn set_vertices(&mut self, vertices: &[Point]) -> EditorResult<()> {
        self.vertices = <[Point; 4]>::try_from(vertices).map_err(|_| EditorError::MalformedEntity {
            id: self.id,
            vertices: vertices.len(),
            required: 4,
        })?;
        Ok(())
    }

    /// Set the rotation, normalized into `[0, 360)`.
    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = normalize_degrees(degrees);
    }
}

impl VertexEntity for RectEntity {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        self.kind.entity_kind()
    }

    fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    fn rotation(&self) -> f64 {
        self.rotation
    }

    fn min_vertices(&self) -> usize {
        4
    }

    fn is_closed(&self) -> bool {
        true
    }

    fn band_width(&self) -> f64 {
        self.target_width()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::bounding_box;

    #[test]
    fn test_single_driveway_from_any_corner() {
        let corners = [
            (Point::new(0.0, 0.0), Point::new(8.0, 30.0)),
            (Point::new(8.0, 0.0), Point::new(0.0, 30.0)),
            (Point::new(8.0, 30.0), Point::new(0.0, 0.0)),
            (Point::new(0.0, 30.0), Point::new(8.0, 0.0)),
        ];
        for (start, end) in corners {
            let driveway = RectEntity::from_corners(RectKind::Driveway, WidthCategory::Single, start, end);
            let bounds = bounding_box(&driveway.vertices).unwrap();
            assert!((bounds.width() - 8.0).abs() < 1e-12);
            assert!((bounds.height() - 30.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_width_tables_differ_by_kind() {
        assert!((RectKind::Driveway.fixed_width(WidthCategory::Double) - 16.0).abs() < f64::EPSILON);
        assert!((RectKind::Patio.fixed_width(WidthCategory::Double) - 12.0).abs() < f64::EPSILON);
        assert_eq!(RectKind::Patio.label(WidthCategory::Triple), "Large patio");
        assert_eq!(RectKind::Driveway.default_surface(), SurfaceType::Asphalt);
    }

    #[test]
    fn test_set_vertices_rejects_wrong_count() {
        let mut patio = RectEntity::from_corners(
            RectKind::Patio,
            WidthCategory::Single,
            Point::new(0.0, 0.0),
            Point::new(20.0, 5.0),
        );
        assert!(patio.set_vertices(&[Point::ZERO; 3]).is_err());
        assert!(patio.set_vertices(&[Point::ZERO; 4]).is_ok());
    }
}
