//! Floorplan Core Library
//!
//! Platform-agnostic geometry and interaction engine for the floorplan
//! editor: coordinate mapping, the entity model, hit-testing, handle-driven
//! transforms, drawing sessions and snapping.

pub mod config;
pub mod document;
pub mod editor;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod input;
pub mod manipulation;
pub mod selection;
pub mod snap;
pub mod tools;
pub mod viewport;
pub mod walls;

pub use config::EditorConfig;
pub use document::FloorplanDocument;
pub use editor::{Editor, EditorResponse};
pub use entities::{
    Door, DoorKind, Entity, EntityId, EntityKind, EntityRef, Layer, Pathway, RectEntity, RectKind, Shape,
    ShapeKind, SurfaceType, VertexEntity, WidthCategory,
};
pub use error::{EditorError, EditorResult, PlacementWarning};
pub use hit_test::{HitOptions, find_at_point, find_entity_at_point};
pub use input::{Instant, Key, Modifiers};
pub use manipulation::{DragContext, DragSession, EdgeStretchMode, TransformOutput, transform_vertices};
pub use selection::{Handle, HandleKind, find_handle_at_point, get_handles};
pub use snap::{GRID_SIZE, SnapMode, SnapResult, snap_point, snap_to_grid};
pub use tools::{DrawingSession, SessionEvent, ToolKind, ToolManager, constrain_rectangle_width, smooth_pathway};
pub use viewport::{View, Viewport, canvas_to_world, world_to_canvas};
pub use walls::{find_nearest_wall_segment, find_wall_for_width};
