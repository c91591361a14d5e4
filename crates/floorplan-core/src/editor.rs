//! The editor controller: routes pointer and key input to tools, selection
//! and drags, and commits the results to the document.

use crate::config::EditorConfig;
use crate::document::FloorplanDocument;
use crate::entities::{Entity, EntityRef, Layer};
use crate::error::EditorError;
use crate::hit_test::{HitOptions, find_at_point};
use crate::input::{ClickTracker, Instant, Key, Modifiers};
use crate::manipulation::{DragContext, DragSession};
use crate::selection::{Handle, HandleKind, HandleMetrics, find_handle_at_point, get_handles};
use crate::snap::{SnapMode, SnapResult, snap_point};
use crate::tools::{SessionContext, SessionEvent, ToolKind, ToolManager};
use crate::viewport::Viewport;
use kurbo::{Point, Size};

/// What the host should do after an input event.
#[derive(Debug)]
pub enum EditorResponse {
    /// Nothing changed.
    None,
    /// Previews, selection or the view changed: redraw.
    Redraw,
    /// The document changed: redraw and persist if desired.
    DocumentChanged,
    /// The input was rejected; show the message. The document is unchanged.
    Warning(EditorError),
}

impl EditorResponse {
    pub fn needs_redraw(&self) -> bool {
        !matches!(self, EditorResponse::None)
    }
}

/// Editor state for one open floorplan.
#[derive(Debug)]
pub struct Editor {
    document: FloorplanDocument,
    viewport: Viewport,
    config: EditorConfig,
    tools: ToolManager,
    selection: Option<EntityRef>,
    drag: Option<DragSession>,
    /// Last canvas point of an active pan gesture.
    pan_anchor: Option<Point>,
    clicks: ClickTracker,
    /// Snap applied to the latest drawing-tool pointer event.
    last_snap: Option<SnapResult>,
}

impl Editor {
    /// Create an editor with an empty document.
    pub fn new(config: EditorConfig, surface_size: Size) -> Self {
        Self::with_document(FloorplanDocument::default(), config, surface_size)
    }

    /// Create an editor for an existing document.
    pub fn with_document(mut document: FloorplanDocument, config: EditorConfig, surface_size: Size) -> Self {
        document.set_history_limit(config.max_undo_history);
        Self {
            document,
            viewport: Viewport::from_config(&config, surface_size),
            config,
            tools: ToolManager::new(),
            selection: None,
            drag: None,
            pan_anchor: None,
            clicks: ClickTracker::new(),
            last_snap: None,
        }
    }

    pub fn document(&self) -> &FloorplanDocument {
        &self.document
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Mutable viewport, for surface resizes and wheel zoom.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    pub fn selection(&self) -> Option<EntityRef> {
        self.selection
    }

    /// Outline of the drawing session in progress, in world coordinates.
    pub fn preview(&self) -> Option<Vec<Point>> {
        self.tools.preview()
    }

    /// Vertex the latest drawing input snapped to, for highlighting.
    pub fn snap_indicator(&self) -> Option<Point> {
        self.last_snap.and_then(|s| s.vertex)
    }

    /// The selected entity, with any drag in progress applied.
    pub fn selected_entity(&self) -> Option<Entity> {
        match &self.drag {
            Some(drag) => Some(drag.current().clone()),
            None => self.selection.and_then(|r| self.document.get(r)),
        }
    }

    /// Handles of the selected entity, in canvas pixels.
    pub fn handles(&self) -> Vec<Handle> {
        self.selected_entity()
            .map(|entity| get_handles(&entity, &self.viewport, &HandleMetrics::from(&self.config)))
            .unwrap_or_default()
    }

    /// Switch tools, abandoning any session or drag in progress.
    pub fn set_tool(&mut self, tool: ToolKind) -> EditorResponse {
        self.drag = None;
        self.pan_anchor = None;
        self.last_snap = None;
        self.clicks.reset();
        let event = self.tools.set_tool(tool);
        if tool.is_drawing() {
            self.selection = None;
        }
        match self.apply_session_event(event) {
            EditorResponse::None => EditorResponse::Redraw,
            other => other,
        }
    }

    /// Layer new shapes are drawn on.
    pub fn set_layer(&mut self, layer: Layer) {
        self.tools.layer = layer;
    }

    pub fn set_snap_mode(&mut self, mode: SnapMode) {
        self.config.snap_mode = mode;
    }

    /// Advance to the next snap mode and return it.
    pub fn cycle_snap_mode(&mut self) -> SnapMode {
        self.config.snap_mode = self.config.snap_mode.next();
        self.config.snap_mode
    }

    /// Pointer pressed at a canvas point.
    pub fn handle_pointer_down(&mut self, canvas_point: Point, _modifiers: Modifiers) -> EditorResponse {
        let world = self.viewport.canvas_to_world(canvas_point);
        match self.tools.current_tool {
            ToolKind::Pan => {
                self.pan_anchor = Some(canvas_point);
                EditorResponse::None
            }
            ToolKind::Select => self.select_at(canvas_point, world),
            ToolKind::Delete => match find_at_point(&self.document, world, &HitOptions::from(&self.config)) {
                Some(target) => self.delete(target),
                None => EditorResponse::None,
            },
            tool => {
                let point = self.snap(world, tool);
                let ctx = SessionContext {
                    config: &self.config,
                    shapes: self.document.shapes(),
                    layer: self.tools.layer,
                };
                let event = self.tools.pointer_down(point, &ctx);
                self.apply_session_event(event)
            }
        }
    }

    /// Pointer pressed, for hosts that do not report double clicks: while a
    /// click-sequence session is open, a second press close in time and
    /// space counts as a double click. Every other press is a plain press.
    pub fn handle_pointer_down_at(&mut self, canvas_point: Point, modifiers: Modifiers, at: Instant) -> EditorResponse {
        let repeated = self.clicks.register(canvas_point, at);
        let collecting = self.tools.session().is_some_and(|s| s.is_click_sequence());
        if repeated && collecting {
            return self.handle_double_click(canvas_point);
        }
        self.handle_pointer_down(canvas_point, modifiers)
    }

    /// Pointer moved to a canvas point.
    pub fn handle_pointer_move(&mut self, canvas_point: Point, modifiers: Modifiers) -> EditorResponse {
        if let Some(anchor) = self.pan_anchor {
            self.viewport.pan(canvas_point - anchor);
            self.pan_anchor = Some(canvas_point);
            return EditorResponse::Redraw;
        }

        let world = self.viewport.canvas_to_world(canvas_point);
        if let Some(drag) = &mut self.drag {
            let ctx = DragContext {
                config: &self.config,
                shapes: self.document.shapes(),
            };
            drag.update(world, modifiers, &ctx);
            return EditorResponse::Redraw;
        }

        let tool = self.tools.current_tool;
        if !tool.starts_session() {
            return EditorResponse::None;
        }
        let point = self.snap_sample(world, tool);
        let event = self.tools.pointer_move(point);
        self.apply_session_event(event)
    }

    /// Pointer released at a canvas point.
    pub fn handle_pointer_up(&mut self, canvas_point: Point, _modifiers: Modifiers) -> EditorResponse {
        if self.pan_anchor.take().is_some() {
            return EditorResponse::None;
        }

        if let Some(drag) = self.drag.take() {
            return self.finish_drag(drag);
        }

        let tool = self.tools.current_tool;
        if !tool.starts_session() {
            return EditorResponse::None;
        }
        let world = self.viewport.canvas_to_world(canvas_point);
        let point = self.snap_sample(world, tool);
        let ctx = SessionContext {
            config: &self.config,
            shapes: self.document.shapes(),
            layer: self.tools.layer,
        };
        let event = self.tools.pointer_up(point, &ctx);
        self.apply_session_event(event)
    }

    /// Double click: finishes a polygon in progress.
    pub fn handle_double_click(&mut self, _canvas_point: Point) -> EditorResponse {
        let ctx = SessionContext {
            config: &self.config,
            shapes: self.document.shapes(),
            layer: self.tools.layer,
        };
        let event = self.tools.double_click(&ctx);
        self.apply_session_event(event)
    }

    /// Key pressed.
    pub fn handle_key(&mut self, key: Key) -> EditorResponse {
        if self.tools.is_active() {
            let ctx = SessionContext {
                config: &self.config,
                shapes: self.document.shapes(),
                layer: self.tools.layer,
            };
            let event = self.tools.key(key, &ctx);
            return self.apply_session_event(event);
        }

        match key {
            Key::Escape if self.drag.is_some() => {
                self.drag = None;
                EditorResponse::Redraw
            }
            Key::Escape if self.selection.is_some() => {
                self.selection = None;
                EditorResponse::Redraw
            }
            Key::Delete | Key::Backspace => self.delete_selected(),
            _ => EditorResponse::None,
        }
    }

    /// Delete the selected entity (and, for walls, the doors bound to it).
    pub fn delete_selected(&mut self) -> EditorResponse {
        self.drag = None;
        match self.selection.take() {
            Some(target) => self.delete(target),
            None => EditorResponse::None,
        }
    }

    pub fn undo(&mut self) -> EditorResponse {
        self.restore(FloorplanDocument::undo)
    }

    pub fn redo(&mut self) -> EditorResponse {
        self.restore(FloorplanDocument::redo)
    }

    fn restore(&mut self, step: fn(&mut FloorplanDocument) -> bool) -> EditorResponse {
        self.drag = None;
        self.tools.cancel();
        if !step(&mut self.document) {
            return EditorResponse::None;
        }
        if self.selection.is_some_and(|r| !self.document.contains(r)) {
            self.selection = None;
        }
        EditorResponse::DocumentChanged
    }

    fn select_at(&mut self, canvas_point: Point, world: Point) -> EditorResponse {
        // Handles of the current selection take priority over other entities
        if let Some(selected) = self.selection.and_then(|r| self.document.get(r)) {
            let metrics = HandleMetrics::from(&self.config);
            if let Some(handle) = find_handle_at_point(&selected, canvas_point, &self.viewport, &metrics) {
                self.drag = Some(DragSession::begin(selected, handle, world));
                return EditorResponse::Redraw;
            }
        }

        let hit = find_at_point(&self.document, world, &HitOptions::from(&self.config));
        let changed = hit != self.selection;
        self.selection = hit;
        self.drag = hit.and_then(|r| self.document.get(r)).map(|entity| {
            let handle = match entity {
                Entity::Door(_) => HandleKind::DoorCenter,
                _ => HandleKind::Move,
            };
            DragSession::begin(entity, handle, world)
        });
        if changed {
            EditorResponse::Redraw
        } else {
            EditorResponse::None
        }
    }

    fn finish_drag(&mut self, drag: DragSession) -> EditorResponse {
        if !drag.is_changed() {
            return EditorResponse::None;
        }
        let handle = drag.handle();
        let entity = drag.end();
        let target = entity.entity_ref();
        self.document.push_undo();
        match self.document.update(entity) {
            Ok(()) => {
                log::info!("Applied {handle:?} to {:?} {}", target.kind, target.id);
                EditorResponse::DocumentChanged
            }
            Err(err) => {
                self.document.undo();
                log::warn!("{err}");
                EditorResponse::Warning(err)
            }
        }
    }

    fn delete(&mut self, target: EntityRef) -> EditorResponse {
        if !self.document.contains(target) {
            return EditorResponse::None;
        }
        self.document.push_undo();
        match self.document.remove(target) {
            Ok(_) => {
                log::info!("Deleted {:?} {}", target.kind, target.id);
                if self.selection == Some(target) {
                    self.selection = None;
                }
                EditorResponse::DocumentChanged
            }
            Err(err) => {
                self.document.undo();
                log::warn!("{err}");
                EditorResponse::Warning(err)
            }
        }
    }

    fn snap(&mut self, world: Point, tool: ToolKind) -> Point {
        if !tool.uses_snapping() || !self.config.snap_mode.is_enabled() {
            self.last_snap = None;
            return world;
        }
        let targets = self.document.vertex_targets();
        let result = snap_point(
            world,
            self.config.snap_mode,
            self.config.grid_spacing,
            &targets,
            self.config.vertex_snap_threshold,
        );
        self.last_snap = Some(result);
        result.point
    }

    /// Snap a point that extends the session in progress.
    fn snap_sample(&mut self, world: Point, tool: ToolKind) -> Point {
        if tool.snaps_samples() {
            return self.snap(world, tool);
        }
        self.last_snap = None;
        world
    }

    fn apply_session_event(&mut self, event: SessionEvent) -> EditorResponse {
        match event {
            SessionEvent::None => EditorResponse::None,
            SessionEvent::Started | SessionEvent::Updated => EditorResponse::Redraw,
            SessionEvent::Discarded | SessionEvent::Cancelled => {
                self.last_snap = None;
                EditorResponse::Redraw
            }
            SessionEvent::Finished(entity) => {
                self.last_snap = None;
                self.document.push_undo();
                let added = self.document.add(entity);
                log::info!("Added {:?} {}", added.kind, added.id);
                EditorResponse::DocumentChanged
            }
            SessionEvent::Rejected(warning) => EditorResponse::Warning(warning.into()),
        }
    }
}
