//! One in-progress drawing interaction.

use super::ToolKind;
use super::post_process::{constrain_rectangle_width, smooth_pathway};
use crate::config::EditorConfig;
use crate::entities::{
    Door, DoorKind, Entity, Layer, Pathway, RectEntity, Shape, ShapeKind, rectangle_corners,
};
use crate::error::PlacementWarning;
use crate::geometry::bounding_box;
use crate::walls::{find_nearest_wall_segment, find_wall_for_width};
use kurbo::Point;

/// Extents below this (ft) count as a click without a drag.
const MIN_EXTENT: f64 = 1e-6;

/// What a finished session needs to know about the document.
#[derive(Debug, Clone, Copy)]
pub struct SessionContext<'a> {
    pub config: &'a EditorConfig,
    /// Existing shapes, for door placement.
    pub shapes: &'a [Shape],
    /// Layer new shapes are drawn on.
    pub layer: Layer,
}

/// Result of trying to finish a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// A new entity to add to the document.
    Finished(Entity),
    /// Nothing worth keeping was drawn (e.g. a click without a drag).
    Discarded,
    /// The session cannot finish yet; keep collecting input.
    NotReady,
}

/// Points collected for one drawing tool between start and finish.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingSession {
    tool: ToolKind,
    /// Committed points: the start point, polygon clicks or freehand samples.
    points: Vec<Point>,
    /// Latest pointer position (second corner, or polygon rubber band).
    cursor: Point,
}

impl DrawingSession {
    /// Start a session at `point`. Returns `None` for tools that do not draw
    /// through a session (selection tools and doors).
    pub fn begin(tool: ToolKind, point: Point) -> Option<Self> {
        if !tool.starts_session() {
            return None;
        }
        Some(Self {
            tool,
            points: vec![point],
            cursor: point,
        })
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Whether the session collects clicks rather than a single drag.
    pub fn is_click_sequence(&self) -> bool {
        self.tool == ToolKind::Polygon
    }

    /// Commit a point: a polygon click or a freehand sample.
    pub fn append_point(&mut self, point: Point) {
        self.cursor = point;
        match self.tool {
            ToolKind::Polygon | ToolKind::Pathway => self.points.push(point),
            ToolKind::Freehand => {
                if self.points.last() != Some(&point) {
                    self.points.push(point);
                }
            }
            _ => {}
        }
    }

    /// Pointer motion. Sampling tools record the point; the others only move
    /// the provisional cursor.
    pub fn update(&mut self, point: Point) {
        match self.tool {
            ToolKind::Freehand | ToolKind::Pathway => self.append_point(point),
            _ => self.cursor = point,
        }
    }

    /// Remove the last committed point. Returns how many remain.
    pub fn pop_point(&mut self) -> usize {
        self.points.pop();
        self.points.len()
    }

    /// Outline to draw while the session is in progress.
    pub fn preview(&self) -> Vec<Point> {
        let start = self.points.first().copied().unwrap_or(self.cursor);
        match self.tool {
            ToolKind::Line => vec![start, self.cursor],
            ToolKind::Rectangle => rectangle_corners(start, self.cursor).to_vec(),
            ToolKind::Driveway(category) | ToolKind::Patio(category) => {
                let raw = rectangle_corners(start, self.cursor);
                let width = self.tool.rect_kind().map_or(0.0, |kind| kind.fixed_width(category));
                constrain_rectangle_width(&raw, width)
            }
            ToolKind::Polygon => {
                let mut outline = self.points.clone();
                outline.push(self.cursor);
                outline
            }
            _ => self.points.clone(),
        }
    }

    /// Build the finished entity.
    pub fn finalize(&self, ctx: &SessionContext<'_>) -> SessionOutcome {
        let start = match self.points.first() {
            Some(p) => *p,
            None => return SessionOutcome::Discarded,
        };
        let stroke_width = ctx.config.stroke_width;

        match self.tool {
            ToolKind::Line => {
                if (self.cursor - start).hypot() < MIN_EXTENT {
                    return SessionOutcome::Discarded;
                }
                let shape = Shape::new(ShapeKind::Line, vec![start, self.cursor], ctx.layer)
                    .with_stroke_width(stroke_width);
                SessionOutcome::Finished(shape.into())
            }
            ToolKind::Rectangle => {
                let extent = self.cursor - start;
                if extent.x.abs() < MIN_EXTENT || extent.y.abs() < MIN_EXTENT {
                    return SessionOutcome::Discarded;
                }
                let shape = Shape::rectangle(start, self.cursor, ctx.layer).with_stroke_width(stroke_width);
                SessionOutcome::Finished(shape.into())
            }
            ToolKind::Polygon => {
                let vertices = collapse_polygon_clicks(&self.points);
                if vertices.len() < 2 {
                    return SessionOutcome::NotReady;
                }
                let shape = Shape::new(ShapeKind::Polygon, vertices, ctx.layer).with_stroke_width(stroke_width);
                SessionOutcome::Finished(shape.into())
            }
            ToolKind::Freehand => {
                let vertices = dedup_consecutive(&self.points);
                if vertices.len() < 2 {
                    return SessionOutcome::Discarded;
                }
                let shape = Shape::new(ShapeKind::Freehand, vertices, ctx.layer).with_stroke_width(stroke_width);
                SessionOutcome::Finished(shape.into())
            }
            ToolKind::Driveway(category) | ToolKind::Patio(category) => {
                let Some(kind) = self.tool.rect_kind() else {
                    return SessionOutcome::Discarded;
                };
                let extent = self.cursor - start;
                if extent.x.abs().max(extent.y.abs()) < MIN_EXTENT {
                    return SessionOutcome::Discarded;
                }
                SessionOutcome::Finished(RectEntity::from_corners(kind, category, start, self.cursor).into())
            }
            ToolKind::Pathway => {
                let vertices = smooth_pathway(&self.points, ctx.config.pathway_min_distance);
                let degenerate = bounding_box(&vertices)
                    .is_none_or(|b| b.width().max(b.height()) < MIN_EXTENT);
                if vertices.len() < 2 || degenerate {
                    return SessionOutcome::Discarded;
                }
                SessionOutcome::Finished(Pathway::new(vertices, ctx.config.pathway_width).into())
            }
            _ => SessionOutcome::Discarded,
        }
    }
}

/// Place a door on the nearest wall segment within the placement threshold
/// that is long enough for the minimum door width.
pub fn place_door(kind: DoorKind, point: Point, ctx: &SessionContext<'_>) -> Result<Door, PlacementWarning> {
    let threshold = ctx.config.door_place_threshold;
    let min_width = ctx.config.door_min_width;
    if let Some(hit) = find_wall_for_width(ctx.shapes, point, threshold, min_width) {
        return Ok(Door::on_wall(kind, &hit));
    }
    let reason = match find_nearest_wall_segment(ctx.shapes, point, threshold) {
        Some(hit) => format!(
            "wall segment is {:.2} ft long, a door needs at least {min_width} ft",
            hit.segment.length()
        ),
        None => format!("no wall within {threshold} ft"),
    };
    Err(PlacementWarning { point, reason })
}

fn dedup_consecutive(points: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &point in points {
        if out.last().is_none_or(|last| (point - *last).hypot() >= MIN_EXTENT) {
            out.push(point);
        }
    }
    out
}

/// Polygon clicks with repeated clicks (from a finishing double click) and a
/// closing click on the first vertex removed.
fn collapse_polygon_clicks(points: &[Point]) -> Vec<Point> {
    let mut vertices = dedup_consecutive(points);
    if vertices.len() > 3 {
        let (first, last) = (vertices[0], vertices[vertices.len() - 1]);
        if (last - first).hypot() < MIN_EXTENT {
            vertices.pop();
        }
    }
    vertices
}
