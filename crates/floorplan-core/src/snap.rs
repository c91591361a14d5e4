//! Snap functionality for aligning points to the grid and to existing vertices.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Default grid spacing (ft).
pub const GRID_SIZE: f64 = 5.0;

/// Default vertex snap threshold (ft).
pub const VERTEX_SNAP_THRESHOLD: f64 = 0.5;

/// Snap mode for aligning drawn points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SnapMode {
    /// No snapping.
    #[default]
    None,
    /// Snap to grid intersections.
    Grid,
    /// Snap to vertices of existing entities.
    Vertices,
    /// Snap to both grid and vertices.
    All,
}

impl SnapMode {
    /// Cycle to the next snap mode.
    pub fn next(self) -> Self {
        match self {
            SnapMode::None => SnapMode::Grid,
            SnapMode::Grid => SnapMode::Vertices,
            SnapMode::Vertices => SnapMode::All,
            SnapMode::All => SnapMode::None,
        }
    }

    /// Check if grid snapping is enabled.
    pub fn snaps_to_grid(self) -> bool {
        matches!(self, SnapMode::Grid | SnapMode::All)
    }

    /// Check if vertex snapping is enabled.
    pub fn snaps_to_vertices(self) -> bool {
        matches!(self, SnapMode::Vertices | SnapMode::All)
    }

    /// Check if any snapping is enabled.
    pub fn is_enabled(self) -> bool {
        self != SnapMode::None
    }
}

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    /// Whether the point was moved to a grid intersection.
    pub grid_snapped: bool,
    /// The existing vertex the point was moved onto, for highlighting.
    pub vertex: Option<Point>,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            grid_snapped: false,
            vertex: None,
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.grid_snapped || self.vertex.is_some()
    }
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> SnapResult {
    if grid_size <= 0.0 {
        return SnapResult::none(point);
    }
    let snapped_x = (point.x / grid_size).round() * grid_size;
    let snapped_y = (point.y / grid_size).round() * grid_size;

    SnapResult {
        point: Point::new(snapped_x, snapped_y),
        grid_snapped: true,
        vertex: None,
    }
}

/// Nearest target vertex within `threshold` of `point`.
///
/// Ties keep the first target, so earlier (lower) entities win.
pub fn snap_to_vertices(point: Point, targets: &[Point], threshold: f64) -> Option<Point> {
    let mut best: Option<Point> = None;
    let mut best_dist_sq = threshold * threshold;

    for target in targets {
        let dist_sq = (point - *target).hypot2();
        if dist_sq <= best_dist_sq && best.is_none_or(|_| dist_sq < best_dist_sq) {
            best_dist_sq = dist_sq;
            best = Some(*target);
        }
    }
    best
}

/// Snap a point according to `mode`.
///
/// Grid snapping is applied first. A vertex within `threshold` of the raw
/// pointer position then replaces the candidate exactly, so abutting shapes
/// share corners even when those corners are off-grid.
pub fn snap_point(
    point: Point,
    mode: SnapMode,
    grid_size: f64,
    targets: &[Point],
    threshold: f64,
) -> SnapResult {
    let result = if mode.snaps_to_grid() {
        snap_to_grid(point, grid_size)
    } else {
        SnapResult::none(point)
    };

    if !mode.snaps_to_vertices() {
        return result;
    }
    match snap_to_vertices(point, targets, threshold) {
        Some(vertex) => SnapResult {
            point: vertex,
            grid_snapped: false,
            vertex: Some(vertex),
        },
        None => result,
    }
}
