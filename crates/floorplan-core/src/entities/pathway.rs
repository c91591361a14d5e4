//! Freehand garden pathways.

use super::{EntityId, EntityKind, SurfaceType, VertexEntity};
use crate::error::{EditorError, EditorResult};
use crate::geometry::normalize_degrees;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An open polyline drawn as a band of `width` feet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pathway {
    pub(crate) id: EntityId,
    /// Band width (ft).
    pub width: f64,
    pub surface_type: SurfaceType,
    /// Local (pre-rotation) centre-line vertices.
    pub vertices: Vec<Point>,
    #[serde(default)]
    pub rotation: f64,
}

impl Pathway {
    pub fn new(vertices: Vec<Point>, width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            width,
            surface_type: SurfaceType::Gravel,
            vertices,
            rotation: 0.0,
        }
    }

    pub fn with_surface(mut self, surface_type: SurfaceType) -> Self {
        self.surface_type = surface_type;
        self
    }

    /// Set the rotation, normalized into `[0, 360)`.
    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = normalize_degrees(degrees);
    }

    pub fn validate(&self) -> EditorResult<()> {
        if self.is_well_formed() {
            Ok(())
        } else {
            Err(EditorError::MalformedEntity {
                id: self.id,
                vertices: self.vertices.len(),
                required: self.min_vertices(),
            })
        }
    }
}

impl VertexEntity for Pathway {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Pathway
    }

    fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    fn rotation(&self) -> f64 {
        self.rotation
    }

    fn min_vertices(&self) -> usize {
        2
    }

    fn is_closed(&self) -> bool {
        false
    }

    fn band_width(&self) -> f64 {
        self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pathway() {
        let path = Pathway::new(vec![Point::ZERO, Point::new(10.0, 0.0)], 3.0)
            .with_surface(SurfaceType::Flagstone);
        assert!(path.validate().is_ok());
        assert!(!path.is_closed());
        assert_eq!(path.surface_type, SurfaceType::Flagstone);
        assert!((path.band_width() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_single_vertex_is_malformed() {
        let path = Pathway::new(vec![Point::ZERO], 3.0);
        assert!(matches!(
            path.validate(),
            Err(EditorError::MalformedEntity { vertices: 1, required: 2, .. })
        ));
    }
}
