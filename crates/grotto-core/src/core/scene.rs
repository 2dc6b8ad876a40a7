use crate::api::types::{EntityId, Outbox, Rect, SimEvent};
use crate::entities::entity::{Entity, EntityKind};

/// Flat-Vec entity storage. Levels hold tens of entities, not thousands;
/// linear scans beat any indexing scheme at this scale.
pub struct Scene {
    entities: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(64),
        }
    }

    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.entities.push(entity);
        id
    }

    /// Remove an entity by ID. Returns the removed entity if found.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.swap_remove(idx))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn iter_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.kind == kind)
    }

    /// IDs of every entity of a kind; useful when updates need disjoint
    /// mutable access entity-by-entity.
    pub fn ids_of_kind(&self, kind: EntityKind) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.id)
            .collect()
    }

    /// Find the interactable whose link id matches `link_id`.
    /// Link ids come from the level descriptor and are assumed unique
    /// within a level; lookup is a linear scan of the live set.
    pub fn interactable_by_link(&self, link_id: u32) -> Option<EntityId> {
        self.entities
            .iter()
            .find(|e| {
                e.interactable
                    .as_ref()
                    .map(|data| data.link_id == link_id)
                    .unwrap_or(false)
            })
            .map(|e| e.id)
    }

    /// First live entity of `kind` whose collision rect overlaps `rect`.
    pub fn first_overlapping(&self, kind: EntityKind, rect: &Rect) -> Option<EntityId> {
        self.entities
            .iter()
            .find(|e| e.kind == kind && !e.dead && !e.suspended && e.collision_rect().overlaps(rect))
            .map(|e| e.id)
    }

    /// Drop every entity marked dead, reporting each removal.
    pub fn sweep_dead(&mut self, out: &mut Outbox) {
        let mut i = 0;
        while i < self.entities.len() {
            if self.entities[i].dead {
                let e = self.entities.swap_remove(i);
                out.event(SimEvent::EntityRemoved(e.id));
            } else {
                i += 1;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
