use glam::Vec2;
use slotmap::SlotMap;
use std::fmt;
use tickline_common::{DrawTarget, EntityId, SimTime};

use crate::entity::{Behavior, Entity, EntityDesc, UpdateContext};

struct Slot {
    entity: Entity,
    /// `None` only while the behavior is checked out for its own update.
    behavior: Option<Box<dyn Behavior>>,
}

/// Counters from one [`Registry::update`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateStats {
    /// Entities whose behavior ran this tick.
    pub updated: usize,
    /// Entities removed by the post-update sweep.
    pub reaped: usize,
}

/// Owns every live entity and the two ordered collections over them.
///
/// `all` and `collidable` keep enrollment order; the sweep filters them
/// stably, so survivors never change relative order.
#[derive(Default)]
pub struct Registry {
    slots: SlotMap<EntityId, Slot>,
    all: Vec<EntityId>,
    collidable: Vec<EntityId>,
    /// Number of update passes started; stamps which pass visited an entity.
    pass: u64,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("all", &self.all.len())
            .field("collidable", &self.collidable.len())
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enroll a new entity. It is visible to queries and render immediately.
    pub fn spawn(&mut self, desc: EntityDesc, behavior: impl Behavior + 'static) -> EntityId {
        self.spawn_boxed(desc, Box::new(behavior))
    }

    pub fn spawn_boxed(&mut self, desc: EntityDesc, behavior: Box<dyn Behavior>) -> EntityId {
        let id = self.slots.insert(Slot {
            entity: Entity::from_desc(&desc),
            behavior: Some(behavior),
        });
        self.all.push(id);
        if desc.collidable {
            self.collidable.push(id);
        }
        tracing::trace!(?id, collidable = desc.collidable, "entity enrolled");
        id
    }

    /// Mark an entity destroyed. Returns `true` if it was live.
    ///
    /// Nothing is unlinked until the next sweep; the entity stays addressable
    /// and keeps its slot in both collections until then.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        match self.slots.get_mut(id) {
            Some(slot) if !slot.entity.destroyed => {
                slot.entity.destroyed = true;
                true
            }
            _ => false,
        }
    }

    /// Mark every entity destroyed. They are reaped by the next update.
    pub fn clear(&mut self) {
        for slot in self.slots.values_mut() {
            slot.entity.destroyed = true;
        }
    }

    /// True for marked entities and for handles that no longer resolve.
    pub fn is_destroyed(&self, id: EntityId) -> bool {
        self.slots.get(id).is_none_or(|slot| slot.entity.destroyed)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.slots.contains_key(id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots.get(id).map(|slot| &slot.entity)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slots.get_mut(id).map(|slot| &mut slot.entity)
    }

    /// Infallible lookup for handles known to be enrolled.
    pub(crate) fn entity(&self, id: EntityId) -> &Entity {
        &self.slots[id].entity
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> &mut Entity {
        &mut self.slots[id].entity
    }

    /// Every enrolled entity, in enrollment order.
    pub fn all(&self) -> &[EntityId] {
        &self.all
    }

    /// The collidable subset, in enrollment order.
    pub fn collidable(&self) -> &[EntityId] {
        &self.collidable
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Entities in enrollment order, destroyed ones included.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.all
            .iter()
            .filter_map(|&id| self.slots.get(id).map(|slot| (id, &slot.entity)))
    }

    /// Attach `child` under `parent` at `local_offset`.
    ///
    /// The child must not already have a parent and must not be an ancestor
    /// of `parent`. Violations assert in debug builds and are ignored in
    /// release builds.
    pub fn add_child(&mut self, parent: EntityId, child: EntityId, local_offset: Vec2) -> bool {
        let valid = parent != child
            && self.contains(parent)
            && self.get(child).is_some_and(|c| c.parent.is_none())
            && !self.is_ancestor(child, parent);
        debug_assert!(valid, "invalid parent link {parent:?} -> {child:?}");
        if !valid {
            return false;
        }

        let position = self.entity(parent).child_position(local_offset);
        self.entity_mut(parent).children.push(child);
        let entity = self.entity_mut(child);
        entity.parent = Some(parent);
        entity.local_offset = local_offset;
        entity.position = position;
        true
    }

    /// Unlink `child` from its parent. Its world position is kept.
    pub fn detach(&mut self, child: EntityId) -> bool {
        let Some(parent) = self.get(child).and_then(Entity::parent) else {
            return false;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|&c| c != child);
        }
        let entity = self.entity_mut(child);
        entity.parent = None;
        entity.local_offset = Vec2::ZERO;
        true
    }

    /// True if `id` and every ancestor above it are enrolled and not destroyed.
    fn lineage_live(&self, mut id: EntityId) -> bool {
        loop {
            match self.get(id) {
                Some(e) if !e.destroyed => match e.parent {
                    Some(parent) => id = parent,
                    None => return true,
                },
                _ => return false,
            }
        }
    }

    fn is_ancestor(&self, ancestor: EntityId, mut id: EntityId) -> bool {
        while let Some(parent) = self.get(id).and_then(Entity::parent) {
            if parent == ancestor {
                return true;
            }
            id = parent;
        }
        false
    }

    /// Run one fixed step: update every live root and its subtree, then
    /// sweep destroyed entities out of both collections.
    ///
    /// Every entity is updated at most once per pass. Roots enrolled during
    /// the pass are appended to `all` and updated in the same pass; an
    /// entity detached after it already ran is not run again as a root.
    pub fn update(&mut self, time: SimTime) -> UpdateStats {
        let _span = tracing::trace_span!("registry_update", tick = time.tick).entered();

        self.pass += 1;
        let mut updated = 0;
        let mut i = 0;
        while i < self.all.len() {
            let id = self.all[i];
            i += 1;
            if self.get(id).is_some_and(|e| e.parent.is_none()) {
                updated += self.update_subtree(id, time);
            }
        }

        let reaped = self.sweep();
        UpdateStats { updated, reaped }
    }

    fn update_subtree(&mut self, id: EntityId, time: SimTime) -> usize {
        let pass = self.pass;
        let behavior = match self.slots.get_mut(id) {
            Some(slot) if !slot.entity.destroyed && slot.entity.visited_pass != pass => {
                slot.entity.visited_pass = pass;
                slot.behavior.take()
            }
            _ => return 0,
        };

        if let Some(mut behavior) = behavior {
            behavior.update(&mut UpdateContext::new(id, time, self));
            if let Some(slot) = self.slots.get_mut(id) {
                slot.behavior = Some(behavior);
            }
        }

        let mut updated = 1;
        let children = match self.get(id) {
            Some(e) if !e.destroyed => e.children.clone(),
            _ => return updated,
        };
        for child in children {
            // Anything updated so far may have destroyed this entity or one
            // of its ancestors.
            if !self.lineage_live(id) {
                break;
            }
            let parent = self.entity(id);
            let Some(offset) = self
                .get(child)
                .filter(|c| c.parent == Some(id))
                .map(|c| c.local_offset)
            else {
                continue;
            };
            let position = parent.child_position(offset);
            self.entity_mut(child).position = position;
            updated += self.update_subtree(child, time);
        }
        updated
    }

    /// Remove every destroyed entity. The only place entities are unlinked.
    fn sweep(&mut self) -> usize {
        let slots = &self.slots;
        let live = |id: &EntityId| slots.get(*id).is_some_and(|s| !s.entity.destroyed);

        let mut dead = Vec::new();
        self.all.retain(|id| {
            let keep = live(id);
            if !keep {
                dead.push(*id);
            }
            keep
        });
        self.collidable.retain(live);

        for &id in &dead {
            let Some(slot) = self.slots.remove(id) else {
                continue;
            };
            if let Some(parent) = slot.entity.parent.and_then(|p| self.slots.get_mut(p)) {
                parent.entity.children.retain(|&c| c != id);
            }
            // Orphans become roots; they are not destroyed with the parent.
            for child in slot.entity.children {
                if let Some(c) = self.slots.get_mut(child) {
                    c.entity.parent = None;
                    c.entity.local_offset = Vec2::ZERO;
                }
            }
        }

        if !dead.is_empty() {
            tracing::debug!(
                reaped = dead.len(),
                remaining = self.all.len(),
                "swept destroyed entities"
            );
        }
        dead.len()
    }

    /// Draw one entity through its behavior.
    pub fn render(&self, id: EntityId, target: &mut dyn DrawTarget) {
        if let Some(Slot {
            entity,
            behavior: Some(behavior),
        }) = self.slots.get(id)
        {
            behavior.render(id, entity, target);
        }
    }
}
