//! Handle-driven transforms: move, resize and rotate, plus door editing.
//!
//! Resizing happens in the entity's local (unrotated) frame. Because the
//! drawn outline is rotated about the centre of the local bounding box, and
//! resizing moves that centre, rotated entities are translated afterwards so
//! the resize anchor stays where it was on screen.

use crate::config::EditorConfig;
use crate::entities::{Door, Entity, EntityRef, Shape, VertexEntity};
use crate::error::EditorResult;
use crate::geometry::{angle_between, bounding_box, rotate_point, rotate_vec};
use crate::input::Modifiers;
use crate::selection::{Edge, HandleKind};
use crate::walls::find_wall_for_width;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest box extent a resize may produce (ft).
pub const MIN_EXTENT: f64 = 0.1;

/// Spans shorter than this are treated as a degenerate axis.
const DEGENERATE_SPAN: f64 = 1e-9;

/// How edge-midpoint handles of driveways and patios move their edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EdgeStretchMode {
    /// Both edge vertices follow the pointer; off-axis drags can produce a
    /// general quadrilateral.
    #[default]
    Free,
    /// Only the component of the drag along the edge normal is applied, so
    /// rectangles stay rectangular.
    AxisAligned,
}

/// Per-entity parameters of a transform.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransformInfo {
    /// Current rotation of the entity (degrees).
    pub rotation: f64,
    pub edge_stretch: EdgeStretchMode,
}

/// New local vertices, plus a rotation to add for rotate drags.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutput {
    pub vertices: Vec<Point>,
    pub rotation_delta: Option<f64>,
}

/// Compute the result of dragging `handle` from `drag_start` to
/// `drag_current` (world points) on an entity whose local vertices are
/// `original`.
///
/// Handles that do not apply to vertex entities (door handles, out of range
/// vertex indices) return the vertices unchanged.
pub fn transform_vertices(
    original: &[Point],
    handle: HandleKind,
    drag_start: Point,
    drag_current: Point,
    modifiers: Modifiers,
    info: &TransformInfo,
) -> TransformOutput {
    let unchanged = || TransformOutput {
        vertices: original.to_vec(),
        rotation_delta: None,
    };
    let Some(bounds) = bounding_box(original) else {
        return unchanged();
    };
    let center = bounds.center();
    let world_delta = drag_current - drag_start;
    let local_delta = rotate_vec(world_delta, -info.rotation);
    let n = original.len();

    let vertices = match handle {
        HandleKind::Move => original.iter().map(|p| *p + world_delta).collect(),
        HandleKind::Rotate => {
            return TransformOutput {
                vertices: original.to_vec(),
                rotation_delta: Some(angle_between(center, drag_start, drag_current)),
            };
        }
        HandleKind::Corner(corner) => {
            let handle_pos = box_point(bounds, corner.offset());
            let anchor = if modifiers.alt {
                center
            } else {
                box_point(bounds, corner.opposite().offset())
            };
            let (sx, sy) = corner_scale(handle_pos, anchor, local_delta, modifiers.shift);
            let scaled = scale_about(original, anchor, sx, sy);
            keep_anchor_fixed(scaled, anchor, center, info.rotation)
        }
        HandleKind::Edge(edge) => {
            let handle_pos = box_point(bounds, edge.offset());
            let anchor = if modifiers.alt {
                center
            } else {
                box_point(bounds, edge.opposite().offset())
            };
            let (sx, sy) = match edge {
                Edge::Top | Edge::Bottom => (1.0, axis_scale(handle_pos.y - anchor.y, local_delta.y)),
                Edge::Left | Edge::Right => (axis_scale(handle_pos.x - anchor.x, local_delta.x), 1.0),
            };
            let scaled = scale_about(original, anchor, sx, sy);
            keep_anchor_fixed(scaled, anchor, center, info.rotation)
        }
        HandleKind::Vertex(i) if i < n => {
            let mut moved = original.to_vec();
            moved[i] += local_delta;
            keep_anchor_fixed(moved, original[(i + 2) % n], center, info.rotation)
        }
        HandleKind::EdgeMidpoint(i) if i < n && n >= 3 => {
            let j = (i + 1) % n;
            let delta = match info.edge_stretch {
                EdgeStretchMode::Free => local_delta,
                EdgeStretchMode::AxisAligned => project_on_normal(original[i], original[j], local_delta),
            };
            let mut moved = original.to_vec();
            moved[i] += delta;
            moved[j] += delta;
            keep_anchor_fixed(moved, original[(i + 2) % n], center, info.rotation)
        }
        _ => return unchanged(),
    };

    TransformOutput {
        vertices,
        rotation_delta: None,
    }
}

/// Point of `bounds` at a unit offset from its centre.
fn box_point(bounds: Rect, unit: Vec2) -> Point {
    let center = bounds.center();
    Point::new(
        center.x + unit.x * bounds.width() / 2.0,
        center.y + unit.y * bounds.height() / 2.0,
    )
}

/// Scale factor that moves a handle `span` away from its anchor by `delta`.
/// Degenerate axes keep scale 1; results never shrink below `MIN_EXTENT`.
fn axis_scale(span: f64, delta: f64) -> f64 {
    if span.abs() < DEGENERATE_SPAN {
        return 1.0;
    }
    let scale = (span + delta) / span;
    if (scale * span).abs() < MIN_EXTENT {
        MIN_EXTENT / span.abs() * if scale < 0.0 { -1.0 } else { 1.0 }
    } else {
        scale
    }
}

fn corner_scale(handle: Point, anchor: Point, delta: Vec2, uniform: bool) -> (f64, f64) {
    let span = handle - anchor;
    let sx = axis_scale(span.x, delta.x);
    let sy = axis_scale(span.y, delta.y);
    if !uniform {
        return (sx, sy);
    }
    let s = if span.x.abs() < DEGENERATE_SPAN {
        sy
    } else if span.y.abs() < DEGENERATE_SPAN || sx.abs() >= sy.abs() {
        sx
    } else {
        sy
    };
    (s, s)
}

fn scale_about(points: &[Point], anchor: Point, sx: f64, sy: f64) -> Vec<Point> {
    points
        .iter()
        .map(|p| Point::new(anchor.x + (p.x - anchor.x) * sx, anchor.y + (p.y - anchor.y) * sy))
        .collect()
}

/// Translate edited local vertices so that `anchor` (a local point that the
/// edit did not move) is drawn where it was before the edit.
fn keep_anchor_fixed(mut vertices: Vec<Point>, anchor: Point, old_center: Point, rotation: f64) -> Vec<Point> {
    if rotation == 0.0 {
        return vertices;
    }
    let Some(new_bounds) = bounding_box(&vertices) else {
        return vertices;
    };
    let before = rotate_point(anchor, old_center, rotation);
    let after = rotate_point(anchor, new_bounds.center(), rotation);
    let shift = before - after;
    for v in &mut vertices {
        *v += shift;
    }
    vertices
}

/// Component of `delta` along the normal of edge a→b.
fn project_on_normal(a: Point, b: Point, delta: Vec2) -> Vec2 {
    let edge = b - a;
    let len = edge.hypot();
    if len < DEGENERATE_SPAN {
        return delta;
    }
    let normal = Vec2::new(-edge.y, edge.x) / len;
    normal * delta.dot(normal)
}

/// Resize a door by one frame of pointer motion on its start or end handle.
///
/// The motion is projected onto the wall direction and damped; the opposite
/// end of the opening stays put. The width is clamped to
/// `[min_width, wall length]`.
pub fn resize_door(
    door: &Door,
    handle: HandleKind,
    frame_delta: Vec2,
    shapes: &[Shape],
    damping: f64,
    min_width: f64,
) -> EditorResult<Door> {
    let segment = door.resolve_wall(shapes)?;
    let dir = segment.direction().unwrap_or_else(|| door.direction());
    let change = frame_delta.dot(dir) * damping;

    let sign = match handle {
        HandleKind::DoorEnd => 1.0,
        HandleKind::DoorStart => -1.0,
        _ => return Ok(door.clone()),
    };
    let width = (door.width + sign * change).max(min_width).min(segment.length());
    let applied = width - door.width;

    let mut resized = door.clone();
    resized.width = width;
    resized.position = segment.fit_position(door.position + dir * (sign * applied / 2.0), width);
    Ok(resized)
}

/// Slide a door towards `point`, re-binding it to the nearest wall segment
/// within `threshold` that is at least `min_width` long.
///
/// The width is `door.width` clamped to `[min_width, segment length]`.
/// Returns `None` when no such segment is in range.
pub fn move_door(door: &Door, point: Point, shapes: &[Shape], threshold: f64, min_width: f64) -> Option<Door> {
    let hit = find_wall_for_width(shapes, point, threshold, min_width)?;
    let mut moved = door.clone();
    moved.width = door.width.max(min_width);
    moved.bind_to(&hit.segment, hit.position);
    Some(moved)
}

/// Turn a free-rotating door by the angle swept around its centre.
pub fn rotate_door(door: &Door, drag_start: Point, drag_current: Point) -> Door {
    let mut rotated = door.clone();
    if door.free_rotate {
        rotated.set_rotation(door.rotation + angle_between(door.position, drag_start, drag_current));
    }
    rotated
}

/// Apply a handle drag to any vertex entity.
pub fn transform_entity(
    entity: &Entity,
    handle: HandleKind,
    drag_start: Point,
    drag_current: Point,
    modifiers: Modifiers,
    edge_stretch: EdgeStretchMode,
) -> Entity {
    let Some(view) = entity.as_vertex_entity() else {
        return entity.clone();
    };
    if !view.is_well_formed() {
        log::trace!("Not transforming malformed {:?} {}", view.kind(), view.id());
        return entity.clone();
    }
    let info = TransformInfo {
        rotation: view.rotation(),
        edge_stretch,
    };
    let output = transform_vertices(view.vertices(), handle, drag_start, drag_current, modifiers, &info);
    apply_output(entity, output)
}

fn apply_output(entity: &Entity, output: TransformOutput) -> Entity {
    let mut next = entity.clone();
    match &mut next {
        Entity::Shape(shape) => {
            shape.vertices = output.vertices;
            if let Some(delta) = output.rotation_delta {
                shape.set_rotation(shape.rotation + delta);
            }
        }
        Entity::Driveway(rect) | Entity::Patio(rect) => {
            if let Err(err) = rect.set_vertices(&output.vertices) {
                log::trace!("{err}");
            }
            if let Some(delta) = output.rotation_delta {
                rect.set_rotation(rect.rotation + delta);
            }
        }
        Entity::Pathway(path) => {
            path.vertices = output.vertices;
            if let Some(delta) = output.rotation_delta {
                path.set_rotation(path.rotation + delta);
            }
        }
        Entity::Door(_) => {}
    }
    next
}

/// What a drag needs to know about the document.
#[derive(Debug, Clone, Copy)]
pub struct DragContext<'a> {
    pub config: &'a EditorConfig,
    /// Wall-bearing shapes doors can bind to.
    pub shapes: &'a [Shape],
}

/// One handle drag, from pointer down to pointer up.
///
/// Vertex entities are recomputed from the original snapshot on every
/// update. Door resizing is incremental: each frame applies the motion since
/// the previous frame.
#[derive(Debug, Clone)]
pub struct DragSession {
    handle: HandleKind,
    start: Point,
    /// Pointer position of the previous frame.
    anchor: Point,
    original: Entity,
    current: Entity,
}

impl DragSession {
    pub fn begin(original: Entity, handle: HandleKind, start: Point) -> Self {
        log::debug!("Begin {handle:?} drag on {:?} {}", original.kind(), original.id());
        Self {
            handle,
            start,
            anchor: start,
            current: original.clone(),
            original,
        }
    }

    pub fn target(&self) -> EntityRef {
        self.original.entity_ref()
    }

    pub fn handle(&self) -> HandleKind {
        self.handle
    }

    /// The entity as it was when the drag began.
    pub fn original(&self) -> &Entity {
        &self.original
    }

    /// The entity with the drag applied so far.
    pub fn current(&self) -> &Entity {
        &self.current
    }

    /// Whether the drag changed the entity.
    pub fn is_changed(&self) -> bool {
        self.current != self.original
    }

    /// Move the pointer to `point` and recompute the entity.
    pub fn update(&mut self, point: Point, modifiers: Modifiers, ctx: &DragContext<'_>) -> &Entity {
        let next = match (&self.original, &self.current) {
            (Entity::Door(original), Entity::Door(current)) => Entity::Door(self.update_door(original, current, point, ctx)),
            (original, _) => transform_entity(
                original,
                self.handle,
                self.start,
                point,
                modifiers,
                ctx.config.edge_stretch,
            ),
        };
        self.current = next;
        self.anchor = point;
        &self.current
    }

    /// Finish the drag and return the final entity.
    pub fn end(self) -> Entity {
        log::debug!("End {:?} drag on {}", self.handle, self.original.id());
        self.current
    }

    fn update_door(&self, original: &Door, current: &Door, point: Point, ctx: &DragContext<'_>) -> Door {
        let config = ctx.config;
        match self.handle {
            HandleKind::DoorStart | HandleKind::DoorEnd => {
                match resize_door(
                    current,
                    self.handle,
                    point - self.anchor,
                    ctx.shapes,
                    config.door_resize_damping,
                    config.door_min_width,
                ) {
                    Ok(door) => door,
                    Err(err) => {
                        log::warn!("{err}");
                        current.clone()
                    }
                }
            }
            HandleKind::DoorCenter | HandleKind::Move => {
                // Rebound from the drag-start door; widths never carry over
                // between frames
                let target = original.position + (point - self.start);
                move_door(original, target, ctx.shapes, config.door_drag_threshold, config.door_min_width)
                    .unwrap_or_else(|| current.clone())
            }
            HandleKind::Rotate => rotate_door(original, self.start, point),
            _ => current.clone(),
        }
    }
}
