//! The floorplan document: per-kind entity collections and undo history.

use crate::entities::{Door, Entity, EntityId, EntityKind, EntityRef, Pathway, RectEntity, Shape, VertexEntity};
use crate::error::{EditorError, EditorResult};
use crate::walls::wall_segment;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Default number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Every entity collection at one point in time.
///
/// Collection order is z-order: later entries are drawn on top.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Collections {
    #[serde(default)]
    shapes: Vec<Shape>,
    #[serde(default)]
    doors: Vec<Door>,
    #[serde(default)]
    driveways: Vec<RectEntity>,
    #[serde(default)]
    patios: Vec<RectEntity>,
    #[serde(default)]
    pathways: Vec<Pathway>,
}

fn default_history_limit() -> usize {
    MAX_UNDO_HISTORY
}

/// A floorplan document.
///
/// Every mutation builds the affected collection anew and swaps it in, so
/// snapshots taken for undo are never observed half-edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorplanDocument {
    /// Document name.
    pub name: String,
    #[serde(flatten)]
    entities: Collections,
    #[serde(skip)]
    undo_stack: Vec<Collections>,
    #[serde(skip)]
    redo_stack: Vec<Collections>,
    #[serde(skip, default = "default_history_limit")]
    history_limit: usize,
}

impl Default for FloorplanDocument {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

impl FloorplanDocument {
    /// Create a new empty document.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entities: Collections::default(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            history_limit: MAX_UNDO_HISTORY,
        }
    }

    /// Set the maximum number of undo states kept.
    pub fn set_history_limit(&mut self, limit: usize) {
        self.history_limit = limit;
        self.trim_history();
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.entities.shapes
    }

    pub fn doors(&self) -> &[Door] {
        &self.entities.doors
    }

    pub fn driveways(&self) -> &[RectEntity] {
        &self.entities.driveways
    }

    pub fn patios(&self) -> &[RectEntity] {
        &self.entities.patios
    }

    pub fn pathways(&self) -> &[Pathway] {
        &self.entities.pathways
    }

    /// Total number of entities.
    pub fn len(&self) -> usize {
        let e = &self.entities;
        e.shapes.len() + e.doors.len() + e.driveways.len() + e.patios.len() + e.pathways.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Push the current state to the undo stack (call before making changes).
    pub fn push_undo(&mut self) {
        self.undo_stack.push(self.entities.clone());
        self.redo_stack.clear();
        self.trim_history();
    }

    fn trim_history(&mut self) {
        if self.undo_stack.len() > self.history_limit {
            let excess = self.undo_stack.len() - self.history_limit;
            self.undo_stack.drain(..excess);
        }
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(snapshot) => {
                let current = std::mem::replace(&mut self.entities, snapshot);
                self.redo_stack.push(current);
                true
            }
            None => false,
        }
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(snapshot) => {
                let current = std::mem::replace(&mut self.entities, snapshot);
                self.undo_stack.push(current);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Look up an entity by reference.
    pub fn get(&self, entity: EntityRef) -> Option<Entity> {
        let id = entity.id;
        let e = &self.entities;
        match entity.kind {
            EntityKind::Shape => e.shapes.iter().find(|s| s.id() == id).cloned().map(Entity::Shape),
            EntityKind::Door => e.doors.iter().find(|d| d.id() == id).cloned().map(Entity::Door),
            EntityKind::Driveway => e.driveways.iter().find(|r| r.id() == id).cloned().map(Entity::Driveway),
            EntityKind::Patio => e.patios.iter().find(|r| r.id() == id).cloned().map(Entity::Patio),
            EntityKind::Pathway => e.pathways.iter().find(|p| p.id() == id).cloned().map(Entity::Pathway),
        }
    }

    pub fn contains(&self, entity: EntityRef) -> bool {
        self.get(entity).is_some()
    }

    /// Append an entity on top of its collection.
    pub fn add(&mut self, entity: Entity) -> EntityRef {
        let entity_ref = entity.entity_ref();
        match entity {
            Entity::Shape(s) => self.entities.shapes = appended(&self.entities.shapes, s),
            Entity::Door(d) => self.entities.doors = appended(&self.entities.doors, d),
            Entity::Driveway(r) => self.entities.driveways = appended(&self.entities.driveways, r),
            Entity::Patio(r) => self.entities.patios = appended(&self.entities.patios, r),
            Entity::Pathway(p) => self.entities.pathways = appended(&self.entities.pathways, p),
        }
        entity_ref
    }

    /// Replace the stored entity with the same id and kind.
    ///
    /// Editing a wall-bearing shape re-projects the doors bound to it; doors
    /// whose edge no longer exists are removed.
    pub fn update(&mut self, entity: Entity) -> EditorResult<()> {
        let id = entity.id();
        match entity {
            Entity::Shape(shape) => {
                let fractions = self.door_fractions(id);
                self.entities.shapes = replaced(&self.entities.shapes, id, shape, Shape::id)?;
                self.reproject_doors(id, &fractions);
            }
            Entity::Door(door) => {
                self.entities.doors = replaced(&self.entities.doors, id, door, Door::id)?;
            }
            Entity::Driveway(rect) => {
                self.entities.driveways = replaced(&self.entities.driveways, id, rect, RectEntity::id)?;
            }
            Entity::Patio(rect) => {
                self.entities.patios = replaced(&self.entities.patios, id, rect, RectEntity::id)?;
            }
            Entity::Pathway(path) => {
                self.entities.pathways = replaced(&self.entities.pathways, id, path, Pathway::id)?;
            }
        }
        Ok(())
    }

    /// Remove an entity. Removing a shape also removes every door bound to it.
    pub fn remove(&mut self, entity: EntityRef) -> EditorResult<Entity> {
        let removed = self.get(entity).ok_or(EditorError::EntityNotFound(entity.id))?;
        let id = entity.id;
        let e = &mut self.entities;
        match entity.kind {
            EntityKind::Shape => {
                e.shapes = without(&e.shapes, |s| s.id() == id);
                let before = e.doors.len();
                e.doors = without(&e.doors, |d| d.wall_owner_id == id);
                let cascaded = before - e.doors.len();
                if cascaded > 0 {
                    log::info!("Removed {cascaded} door(s) bound to shape {id}");
                }
            }
            EntityKind::Door => e.doors = without(&e.doors, |d| d.id() == id),
            EntityKind::Driveway => e.driveways = without(&e.driveways, |r| r.id() == id),
            EntityKind::Patio => e.patios = without(&e.patios, |r| r.id() == id),
            EntityKind::Pathway => e.pathways = without(&e.pathways, |p| p.id() == id),
        }
        Ok(removed)
    }

    /// Where each door bound to `owner` sits along its edge, as a fraction
    /// of the edge length.
    fn door_fractions(&self, owner: EntityId) -> Vec<(EntityId, f64)> {
        self.entities
            .doors
            .iter()
            .filter(|d| d.wall_owner_id == owner)
            .filter_map(|door| {
                let segment = wall_segment(&self.entities.shapes, owner, door.wall_edge_index)?;
                let length = segment.length();
                if length < f64::EPSILON {
                    return Some((door.id(), 0.5));
                }
                let along = (door.position - segment.start).dot(segment.end - segment.start) / (length * length);
                Some((door.id(), along.clamp(0.0, 1.0)))
            })
            .collect()
    }

    fn reproject_doors(&mut self, owner: EntityId, fractions: &[(EntityId, f64)]) {
        let shapes = &self.entities.shapes;
        self.entities.doors = self
            .entities
            .doors
            .iter()
            .filter_map(|door| {
                if door.wall_owner_id != owner {
                    return Some(door.clone());
                }
                let Some(segment) = wall_segment(shapes, owner, door.wall_edge_index) else {
                    log::warn!("Removing door {}: wall edge {} is gone", door.id(), door.wall_edge_index);
                    return None;
                };
                let t = fractions
                    .iter()
                    .find(|(id, _)| *id == door.id())
                    .map_or(0.5, |(_, t)| *t);
                let mut moved = door.clone();
                moved.bind_to(&segment, segment.start.lerp(segment.end, t));
                Some(moved)
            })
            .collect();
    }

    /// Outline vertices of every vertex entity, as vertex-snap targets.
    pub fn vertex_targets(&self) -> Vec<Point> {
        let e = &self.entities;
        let shapes = e.shapes.iter().map(|s| s as &dyn VertexEntity);
        let rects = e.driveways.iter().chain(&e.patios).map(|r| r as &dyn VertexEntity);
        let paths = e.pathways.iter().map(|p| p as &dyn VertexEntity);
        shapes
            .chain(rects)
            .chain(paths)
            .filter(|v| v.is_well_formed())
            .flat_map(|v| v.outline())
            .collect()
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> EditorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn appended<T: Clone>(items: &[T], item: T) -> Vec<T> {
    let mut next = Vec::with_capacity(items.len() + 1);
    next.extend_from_slice(items);
    next.push(item);
    next
}

fn replaced<T: Clone>(items: &[T], id: EntityId, item: T, id_of: fn(&T) -> EntityId) -> EditorResult<Vec<T>> {
    let index = items
        .iter()
        .position(|existing| id_of(existing) == id)
        .ok_or(EditorError::EntityNotFound(id))?;
    let mut next = items.to_vec();
    next[index] = item;
    Ok(next)
}

fn without<T: Clone>(items: &[T], remove: impl Fn(&T) -> bool) -> Vec<T> {
    items.iter().filter(|item| !remove(item)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{DoorKind, Layer, RectKind, ShapeKind, WidthCategory};
    use crate::walls::find_nearest_wall_segment;

    fn house() -> Shape {
        Shape::rectangle(Point::new(0.0, 0.0), Point::new(40.0, 30.0), Layer::House)
    }

    fn door_on(shapes: &[Shape], at: Point) -> Door {
        let hit = find_nearest_wall_segment(shapes, at, 1.0).unwrap();
        Door::on_wall(DoorKind::Single, &hit)
    }

    #[test]
    fn test_add_and_get() {
        let mut doc = FloorplanDocument::new("Plan");
        let shape = house();
        let r = doc.add(shape.clone().into());
        assert_eq!(r, EntityRef::new(EntityKind::Shape, shape.id()));
        assert_eq!(doc.get(r), Some(Entity::Shape(shape)));
        assert_eq!(doc.len(), 1);
        assert!(doc.get(EntityRef::new(EntityKind::Patio, r.id)).is_none());
    }

    #[test]
    fn test_update_missing_entity() {
        let mut doc = FloorplanDocument::new("Plan");
        let shape = house();
        let id = shape.id();
        assert!(matches!(
            doc.update(shape.into()),
            Err(EditorError::EntityNotFound(missing)) if missing == id
        ));
    }

    #[test]
    fn test_removing_wall_cascades_to_doors() {
        let mut doc = FloorplanDocument::new("Plan");
        let shape = house();
        let other = Shape::new(
            ShapeKind::Line,
            vec![Point::new(60.0, 0.0), Point::new(60.0, 20.0)],
            Layer::Wall,
        );
        doc.add(shape.clone().into());
        doc.add(other.clone().into());
        doc.add(door_on(doc.shapes(), Point::new(20.0, 0.0)).into());
        doc.add(door_on(doc.shapes(), Point::new(60.0, 10.0)).into());
        assert_eq!(doc.doors().len(), 2);

        doc.remove(EntityRef::new(EntityKind::Shape, shape.id())).unwrap();
        assert_eq!(doc.shapes().len(), 1);
        assert_eq!(doc.doors().len(), 1);
        assert_eq!(doc.doors()[0].wall_owner_id, other.id());
    }

    #[test]
    fn test_moving_wall_carries_doors() {
        let mut doc = FloorplanDocument::new("Plan");
        let shape = house();
        doc.add(shape.clone().into());
        doc.add(door_on(doc.shapes(), Point::new(10.0, 0.0)).into());

        let mut moved = shape.clone();
        for v in &mut moved.vertices {
            *v += kurbo::Vec2::new(5.0, 3.0);
        }
        doc.update(moved.into()).unwrap();

        let door = &doc.doors()[0];
        assert!((door.position - Point::new(15.0, 3.0)).hypot() < 1e-9);
        assert!(door.resolve_wall(doc.shapes()).is_ok());
    }

    #[test]
    fn test_lost_edge_removes_door() {
        let mut doc = FloorplanDocument::new("Plan");
        let shape = house();
        doc.add(shape.clone().into());
        // edge 3 is the closing edge (0,30)→(0,0)
        doc.add(door_on(doc.shapes(), Point::new(0.0, 15.0)).into());
        assert_eq!(doc.doors()[0].wall_edge_index, 3);

        let mut line = shape.clone();
        line.kind = ShapeKind::Line;
        line.vertices.truncate(2);
        doc.update(line.into()).unwrap();
        assert!(doc.doors().is_empty());
    }

    #[test]
    fn test_undo_redo() {
        let mut doc = FloorplanDocument::new("Plan");
        assert!(!doc.undo());

        doc.push_undo();
        doc.add(house().into());
        doc.push_undo();
        doc.add(
            RectEntity::from_corners(RectKind::Driveway, WidthCategory::Single, Point::ZERO, Point::new(8.0, 30.0))
                .into(),
        );
        assert_eq!(doc.len(), 2);

        assert!(doc.undo());
        assert_eq!(doc.len(), 1);
        assert!(doc.undo());
        assert!(doc.is_empty());
        assert!(doc.can_redo());

        assert!(doc.redo());
        assert_eq!(doc.shapes().len(), 1);

        // a new change clears the redo stack
        doc.push_undo();
        doc.add(house().into());
        assert!(!doc.can_redo());
    }

    #[test]
    fn test_history_limit() {
        let mut doc = FloorplanDocument::new("Plan");
        doc.set_history_limit(3);
        for _ in 0..5 {
            doc.push_undo();
            doc.add(house().into());
        }
        let mut undone = 0;
        while doc.undo() {
            undone += 1;
        }
        assert_eq!(undone, 3);
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_vertex_targets_use_outlines() {
        let mut doc = FloorplanDocument::new("Plan");
        let mut shape = Shape::rectangle(Point::new(0.0, 0.0), Point::new(10.0, 10.0), Layer::House);
        shape.rotation = 90.0;
        doc.add(shape.into());
        doc.add(Pathway::new(vec![Point::new(50.0, 50.0)], 3.0).into());
        let targets = doc.vertex_targets();
        assert_eq!(targets.len(), 4);
        // a quarter turn about (5, 5) sends (0, 0) to (10, 0)
        assert!((targets[0] - Point::new(10.0, 0.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_json_round_trip() {
        let mut doc = FloorplanDocument::new("Smith residence");
        doc.add(house().into());
        doc.add(door_on(doc.shapes(), Point::new(20.0, 0.0)).into());
        doc.add(Pathway::new(vec![Point::new(0.0, 40.0), Point::new(20.0, 40.0)], 3.0).into());
        doc.push_undo();

        let json = doc.to_json().unwrap();
        let restored = FloorplanDocument::from_json(&json).unwrap();
        assert_eq!(restored.name, "Smith residence");
        assert_eq!(restored.shapes(), doc.shapes());
        assert_eq!(restored.doors(), doc.doors());
        assert_eq!(restored.pathways(), doc.pathways());
        assert!(!restored.can_undo());
    }

    #[test]
    fn test_missing_collections_default_to_empty() {
        let doc = FloorplanDocument::from_json(r#"{"name": "Empty"}"#).unwrap();
        assert!(doc.is_empty());
        assert!(matches!(
            FloorplanDocument::from_json("not json"),
            Err(EditorError::Serialization(_))
        ));
    }
}
