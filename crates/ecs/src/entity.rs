use glam::Vec2;
use tickline_common::{Color, DrawTarget, EntityId, Quad, SimTime};

use crate::registry::Registry;

/// Everything needed to enroll a new entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityDesc {
    pub position: Vec2,
    pub size: Vec2,
    pub angle: f32,
    pub color: Color,
    pub render_order: i32,
    /// Enroll into the collidable collection. Fixed for the entity's lifetime.
    pub collidable: bool,
}

impl Default for EntityDesc {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            size: Vec2::ONE,
            angle: 0.0,
            color: Color::WHITE,
            render_order: 0,
            collidable: false,
        }
    }
}

impl EntityDesc {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    pub fn with_render_order(mut self, render_order: i32) -> Self {
        self.render_order = render_order;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn collidable(mut self) -> Self {
        self.collidable = true;
        self
    }
}

/// Per-entity record stored in the registry arena.
#[derive(Debug, Clone)]
pub struct Entity {
    /// World-space center. For parented entities this is rewritten from the
    /// parent's transform and `local_offset` right before the entity updates.
    pub position: Vec2,
    pub size: Vec2,
    /// Rotation in radians.
    pub angle: f32,
    pub color: Color,
    pub render_order: i32,
    /// Offset from the parent's position, rotated by the parent's angle.
    pub local_offset: Vec2,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
    pub(crate) destroyed: bool,
    pub(crate) collidable: bool,
    /// Registry pass that last ran this entity's update.
    pub(crate) visited_pass: u64,
}

impl Entity {
    pub(crate) fn from_desc(desc: &EntityDesc) -> Self {
        Self {
            position: desc.position,
            size: desc.size,
            angle: desc.angle,
            color: desc.color,
            render_order: desc.render_order,
            local_offset: Vec2::ZERO,
            parent: None,
            children: Vec::new(),
            destroyed: false,
            collidable: desc.collidable,
            visited_pass: 0,
        }
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Owned children in insertion order.
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn is_collidable(&self) -> bool {
        self.collidable
    }

    /// The quad this entity draws with the default render.
    pub fn quad(&self, id: EntityId) -> Quad {
        Quad {
            entity: id,
            center: self.position,
            size: self.size,
            angle: self.angle,
            color: self.color,
            render_order: self.render_order,
        }
    }

    /// World position of a child placed at `offset` from this entity.
    pub(crate) fn child_position(&self, offset: Vec2) -> Vec2 {
        self.position + Vec2::from_angle(self.angle).rotate(offset)
    }
}

/// Per-variant entity logic.
///
/// Every entity carries one behavior. `update` runs once per fixed step while
/// the entity is live; `render` runs once per display frame for entities that
/// are not destroyed, in ascending render order.
pub trait Behavior {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let _ = ctx;
    }

    fn render(&self, id: EntityId, entity: &Entity, target: &mut dyn DrawTarget) {
        target.draw_quad(entity.quad(id));
    }
}

/// Static scenery: never updates, draws its quad.
impl Behavior for () {}

/// What an entity sees while its `update` runs.
///
/// The entity's behavior is checked out of the registry for the duration of
/// the call, so the registry can be mutated freely: spawning, destroying any
/// entity (including this one), and running spatial queries.
pub struct UpdateContext<'a> {
    id: EntityId,
    time: SimTime,
    registry: &'a mut Registry,
}

impl<'a> UpdateContext<'a> {
    pub(crate) fn new(id: EntityId, time: SimTime, registry: &'a mut Registry) -> Self {
        Self { id, time, registry }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Simulation time of the step being run.
    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn entity(&self) -> &Entity {
        self.registry.entity(self.id)
    }

    pub fn entity_mut(&mut self) -> &mut Entity {
        self.registry.entity_mut(self.id)
    }

    pub fn registry(&self) -> &Registry {
        self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        self.registry
    }

    /// Mark this entity destroyed. Its children are skipped for this tick.
    pub fn destroy_self(&mut self) {
        self.registry.destroy(self.id);
    }

    pub fn spawn(&mut self, desc: EntityDesc, behavior: impl Behavior + 'static) -> EntityId {
        self.registry.spawn(desc, behavior)
    }

    /// Spawn a new entity owned by this one, placed at `local_offset`.
    pub fn spawn_child(
        &mut self,
        desc: EntityDesc,
        local_offset: Vec2,
        behavior: impl Behavior + 'static,
    ) -> EntityId {
        let child = self.registry.spawn(desc, behavior);
        self.registry.add_child(self.id, child, local_offset);
        child
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn desc_builder_sets_fields() {
        let desc = EntityDesc::at(Vec2::new(1.0, 2.0))
            .with_size(Vec2::splat(3.0))
            .with_render_order(-4)
            .collidable();
        assert_eq!(desc.position, Vec2::new(1.0, 2.0));
        assert_eq!(desc.size, Vec2::splat(3.0));
        assert_eq!(desc.render_order, -4);
        assert!(desc.collidable);
    }

    #[test]
    fn child_position_rotates_offset_by_parent_angle() {
        let mut parent = Entity::from_desc(&EntityDesc::at(Vec2::new(10.0, 0.0)));
        parent.angle = std::f32::consts::FRAC_PI_2;
        let p = parent.child_position(Vec2::new(1.0, 0.0));
        assert_relative_eq!(p.x, 10.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn default_render_draws_own_quad() {
        let entity = Entity::from_desc(&EntityDesc::at(Vec2::ONE).with_render_order(7));
        let mut quads: Vec<Quad> = Vec::new();
        ().render(EntityId::default(), &entity, &mut quads);
        assert_eq!(quads.len(), 1);
        assert_eq!(quads[0].render_order, 7);
        assert_eq!(quads[0].center, Vec2::ONE);
    }
}
