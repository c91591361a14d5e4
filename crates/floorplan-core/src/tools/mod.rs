//! Tool system for the floorplan editor.

mod post_process;
mod session;

pub use post_process::{PATHWAY_MIN_DISTANCE, constrain_rectangle_width, smooth_pathway};
pub use session::{DrawingSession, SessionContext, SessionOutcome, place_door};

use crate::entities::{DoorKind, Entity, Layer, RectKind, WidthCategory};
use crate::error::PlacementWarning;
use crate::input::Key;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Pan,
    Delete,
    Line,
    Rectangle,
    Polygon,
    Freehand,
    Door(DoorKind),
    Driveway(WidthCategory),
    Patio(WidthCategory),
    Pathway,
}

impl ToolKind {
    /// Tools that create entities on pointer input.
    pub fn is_drawing(self) -> bool {
        !matches!(self, ToolKind::Select | ToolKind::Pan | ToolKind::Delete)
    }

    /// Tools that collect points in a [`DrawingSession`]. Doors are placed
    /// with a single click instead.
    pub fn starts_session(self) -> bool {
        self.is_drawing() && !matches!(self, ToolKind::Door(_))
    }

    /// Whether grid and vertex snapping apply to this tool's input.
    ///
    /// Pathway capture is never snapped so curves stay smooth; door clicks
    /// are projected onto walls instead.
    pub fn uses_snapping(self) -> bool {
        self.starts_session() && self != ToolKind::Pathway
    }

    /// Whether points after the first are snapped too. Freehand strokes snap
    /// their start only.
    pub fn snaps_samples(self) -> bool {
        self.uses_snapping() && self != ToolKind::Freehand
    }

    /// The rectangular-surface kind this tool draws, if any.
    pub fn rect_kind(self) -> Option<RectKind> {
        match self {
            ToolKind::Driveway(_) => Some(RectKind::Driveway),
            ToolKind::Patio(_) => Some(RectKind::Patio),
            _ => None,
        }
    }
}

/// State of the drawing interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    /// Waiting for the first point.
    #[default]
    Idle,
    /// Collecting points for the current tool.
    Drawing(DrawingSession),
}

/// What a tool input did.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Input ignored.
    None,
    /// A drawing session started.
    Started,
    /// The in-progress session changed.
    Updated,
    /// An entity was completed and should be added to the document.
    Finished(Entity),
    /// The session ended without producing anything.
    Discarded,
    /// The user aborted the session.
    Cancelled,
    /// The input was rejected; nothing changed.
    Rejected(PlacementWarning),
}

/// Manages the current tool and its drawing session.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Current drawing session.
    pub state: SessionState,
    /// Layer new shapes are drawn on.
    pub layer: Layer,
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool, abandoning any session in progress.
    pub fn set_tool(&mut self, tool: ToolKind) -> SessionEvent {
        let event = self.cancel();
        self.current_tool = tool;
        event
    }

    /// Check if a drawing session is active.
    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Drawing(_))
    }

    pub fn session(&self) -> Option<&DrawingSession> {
        match &self.state {
            SessionState::Drawing(session) => Some(session),
            SessionState::Idle => None,
        }
    }

    /// Outline of the session in progress.
    pub fn preview(&self) -> Option<Vec<Point>> {
        self.session().map(DrawingSession::preview)
    }

    /// Pointer pressed at a world point (already snapped by the caller).
    pub fn pointer_down(&mut self, point: Point, ctx: &SessionContext<'_>) -> SessionEvent {
        if let SessionState::Drawing(session) = &mut self.state {
            if !session.is_click_sequence() {
                return SessionEvent::None;
            }
            session.append_point(point);
            return SessionEvent::Updated;
        }

        let tool = self.current_tool;
        if let ToolKind::Door(kind) = tool {
            return match place_door(kind, point, ctx) {
                Ok(door) => {
                    log::debug!("Placed door on wall {} edge {}", door.wall_owner_id, door.wall_edge_index);
                    SessionEvent::Finished(door.into())
                }
                Err(warning) => {
                    log::warn!("Door rejected at ({:.2}, {:.2}): {}", point.x, point.y, warning.reason);
                    SessionEvent::Rejected(warning)
                }
            };
        }

        match DrawingSession::begin(tool, point) {
            Some(session) => {
                log::debug!("Started {tool:?} session at ({:.2}, {:.2})", point.x, point.y);
                self.state = SessionState::Drawing(session);
                SessionEvent::Started
            }
            None => SessionEvent::None,
        }
    }

    /// Pointer moved to a world point.
    pub fn pointer_move(&mut self, point: Point) -> SessionEvent {
        match &mut self.state {
            SessionState::Drawing(session) => {
                session.update(point);
                SessionEvent::Updated
            }
            SessionState::Idle => SessionEvent::None,
        }
    }

    /// Pointer released. Drag tools finish here; polygons keep collecting.
    pub fn pointer_up(&mut self, point: Point, ctx: &SessionContext<'_>) -> SessionEvent {
        match &mut self.state {
            SessionState::Drawing(session) if !session.is_click_sequence() => {
                session.update(point);
                self.finish(ctx)
            }
            _ => SessionEvent::None,
        }
    }

    /// Keyboard input.
    pub fn key(&mut self, key: Key, ctx: &SessionContext<'_>) -> SessionEvent {
        match key {
            Key::Escape => self.cancel(),
            Key::Backspace => {
                let remaining = match &mut self.state {
                    SessionState::Drawing(session) if session.is_click_sequence() => session.pop_point(),
                    _ => return SessionEvent::None,
                };
                if remaining == 0 {
                    self.state = SessionState::Idle;
                    SessionEvent::Cancelled
                } else {
                    SessionEvent::Updated
                }
            }
            Key::Enter => self.finish_click_sequence(ctx),
            Key::Delete | Key::Other => SessionEvent::None,
        }
    }

    /// Double click: finishes a polygon.
    pub fn double_click(&mut self, ctx: &SessionContext<'_>) -> SessionEvent {
        self.finish_click_sequence(ctx)
    }

    /// Abort the session in progress without producing an entity.
    pub fn cancel(&mut self) -> SessionEvent {
        match std::mem::take(&mut self.state) {
            SessionState::Drawing(session) => {
                log::debug!("Cancelled {:?} session", session.tool());
                SessionEvent::Cancelled
            }
            SessionState::Idle => SessionEvent::None,
        }
    }

    fn finish_click_sequence(&mut self, ctx: &SessionContext<'_>) -> SessionEvent {
        match &self.state {
            SessionState::Drawing(session) if session.is_click_sequence() => self.finish(ctx),
            _ => SessionEvent::None,
        }
    }

    fn finish(&mut self, ctx: &SessionContext<'_>) -> SessionEvent {
        let (tool, outcome) = match &self.state {
            SessionState::Drawing(session) => (session.tool(), session.finalize(ctx)),
            SessionState::Idle => return SessionEvent::None,
        };
        match outcome {
            SessionOutcome::Finished(entity) => {
                log::debug!("Finished {tool:?} session");
                self.state = SessionState::Idle;
                SessionEvent::Finished(entity)
            }
            SessionOutcome::Discarded => {
                log::debug!("Discarded empty {tool:?} session");
                self.state = SessionState::Idle;
                SessionEvent::Discarded
            }
            SessionOutcome::NotReady => SessionEvent::None,
        }
    }
}
