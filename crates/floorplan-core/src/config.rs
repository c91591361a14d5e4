//! Editor configuration.
//!
//! Every tunable constant of the editing core lives here so hosts can load a
//! single JSON file. Missing fields fall back to the defaults below.

use crate::document::MAX_UNDO_HISTORY;
use crate::entities::Door;
use crate::error::EditorResult;
use crate::manipulation::EdgeStretchMode;
use crate::snap::{GRID_SIZE, SnapMode, VERTEX_SNAP_THRESHOLD};
use crate::tools::PATHWAY_MIN_DISTANCE;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Height of the physical drawing sheet in pixels at resolution 1.0
/// (A4 landscape, 210 mm at 96 DPI).
pub const PHYSICAL_SHEET_HEIGHT_PX: f64 = 794.0;

/// Tunable parameters of the editing core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// World width of the drawing sheet in feet.
    pub sheet_width_ft: f64,
    /// World height of the drawing sheet in feet.
    pub sheet_height_ft: f64,
    /// Physical sheet height in pixels at resolution 1.0.
    pub physical_sheet_height_px: f64,
    /// Output resolution multiplier (device pixel ratio or export DPI factor).
    pub resolution: f64,
    /// Minimum view zoom.
    pub min_zoom: f64,
    /// Maximum view zoom.
    pub max_zoom: f64,

    /// Grid spacing in feet.
    pub grid_spacing: f64,
    /// Which snaps are active while drawing.
    pub snap_mode: SnapMode,
    /// Distance within which a candidate point snaps onto an existing vertex (ft).
    pub vertex_snap_threshold: f64,

    /// Bounding-box pre-filter tolerance for closed outlines (ft).
    pub hit_tolerance: f64,
    /// Extra distance beyond half the stroke width accepted on open outlines (ft).
    pub hit_buffer: f64,
    /// Pick radius for resize and move handles (canvas px).
    pub handle_radius_px: f64,
    /// Pick radius for the rotate handle (canvas px).
    pub rotate_handle_radius_px: f64,
    /// Distance of the rotate handle above the top edge (canvas px).
    pub rotate_handle_offset_px: f64,

    /// Maximum wall distance when placing a door (ft).
    pub door_place_threshold: f64,
    /// Maximum wall distance when dragging a door between walls (ft).
    pub door_drag_threshold: f64,
    /// Damping applied to door resize drags.
    pub door_resize_damping: f64,
    /// Smallest allowed door width (ft).
    pub door_min_width: f64,

    /// Decimation distance for freehand pathways (ft).
    pub pathway_min_distance: f64,
    /// Width of newly drawn pathways (ft).
    pub pathway_width: f64,
    /// Stroke width of newly drawn shapes (ft).
    pub stroke_width: f64,

    /// Behaviour of edge-midpoint drags on driveways and patios.
    pub edge_stretch: EdgeStretchMode,
    /// Maximum number of undo snapshots kept.
    pub max_undo_history: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            sheet_width_ft: 100.0,
            sheet_height_ft: 70.0,
            physical_sheet_height_px: PHYSICAL_SHEET_HEIGHT_PX,
            resolution: 1.0,
            min_zoom: 0.1,
            max_zoom: 10.0,
            grid_spacing: GRID_SIZE,
            snap_mode: SnapMode::All,
            vertex_snap_threshold: VERTEX_SNAP_THRESHOLD,
            hit_tolerance: 0.5,
            hit_buffer: 0.5,
            handle_radius_px: 8.0,
            rotate_handle_radius_px: 12.0,
            rotate_handle_offset_px: 30.0,
            door_place_threshold: 1.0,
            door_drag_threshold: 2.0,
            door_resize_damping: 0.5,
            door_min_width: Door::MIN_WIDTH,
            pathway_min_distance: PATHWAY_MIN_DISTANCE,
            pathway_width: 3.0,
            stroke_width: 0.5,
            edge_stretch: EdgeStretchMode::default(),
            max_undo_history: MAX_UNDO_HISTORY,
        }
    }
}

impl EditorConfig {
    /// Pixels per foot at zoom 1.0.
    ///
    /// Independent of the view zoom; export uses the same value so rendered
    /// output matches on-screen geometry.
    pub fn output_scale(&self) -> f64 {
        self.physical_sheet_height_px / self.sheet_height_ft * self.resolution
    }

    /// World size of the drawing sheet.
    pub fn sheet_size(&self) -> Size {
        Size::new(self.sheet_width_ft, self.sheet_height_ft)
    }

    /// Parse a configuration from JSON. Unknown fields are ignored.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json(&self) -> EditorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> EditorResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::debug!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Write the configuration to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> EditorResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
