//! Error types for editor operations.

use crate::entities::EntityId;
use kurbo::Point;
use thiserror::Error;

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors raised by the editing core.
///
/// None of these are fatal: the editor reports them to the host as warnings
/// and leaves the document untouched.
#[derive(Debug, Error)]
pub enum EditorError {
    /// A placement was attempted where the entity cannot go.
    #[error("Invalid placement at ({x:.2}, {y:.2}): {reason}", x = .point.x, y = .point.y)]
    InvalidPlacement {
        /// World point of the attempted placement.
        point: Point,
        /// Human-readable reason shown to the user.
        reason: String,
    },

    /// An entity has fewer vertices than its kind requires.
    #[error("Malformed entity {id}: {vertices} vertices, at least {required} required")]
    MalformedEntity {
        id: EntityId,
        vertices: usize,
        required: usize,
    },

    /// No entity with this id exists in the document.
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    /// A door refers to a wall shape or edge that no longer exists.
    #[error("Door {door} refers to missing wall {wall} (edge {edge})")]
    DanglingWall {
        door: EntityId,
        wall: EntityId,
        edge: usize,
    },

    /// Document or configuration (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading or writing a configuration file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A rejected placement, kept separate from [`EditorError`] so tool events
/// stay cloneable and comparable.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementWarning {
    /// World point of the attempted placement.
    pub point: Point,
    pub reason: String,
}

impl From<PlacementWarning> for EditorError {
    fn from(warning: PlacementWarning) -> Self {
        EditorError::InvalidPlacement {
            point: warning.point,
            reason: warning.reason,
        }
    }
}

impl EditorError {
    /// Whether the error is a user-facing warning rather than a programming
    /// or environment problem.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            EditorError::InvalidPlacement { .. }
                | EditorError::MalformedEntity { .. }
                | EditorError::DanglingWall { .. }
        )
    }
}
