use tickline_common::{DrawTarget, EntityId};
use tickline_ecs::{Entity, Registry};

/// Produces the draw order once per display frame.
///
/// The pass keeps its scratch buffers between frames, so steady-state
/// sorting does not allocate.
#[derive(Debug, Default)]
pub struct RenderOrderingPass {
    keyed: Vec<(i32, EntityId)>,
    order: Vec<EntityId>,
}

impl RenderOrderingPass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stably sort the registry's live entities by ascending render order.
    ///
    /// Ties keep enrollment order. Entities marked destroyed are left out even
    /// though the registry has not reaped them yet.
    pub fn sort<'a>(&'a mut self, registry: &'a Registry) -> DrawSequence<'a> {
        let _span = tracing::trace_span!("render_order").entered();

        self.keyed.clear();
        self.keyed.extend(
            registry
                .iter()
                .filter(|(_, e)| !e.is_destroyed())
                .map(|(id, e)| (e.render_order, id)),
        );
        // `sort_by_key` is stable.
        self.keyed.sort_by_key(|&(order, _)| order);

        self.order.clear();
        self.order.extend(self.keyed.iter().map(|&(_, id)| id));

        DrawSequence {
            registry,
            order: &self.order,
        }
    }
}

/// One frame's worth of entities in draw order.
#[derive(Debug, Clone, Copy)]
pub struct DrawSequence<'a> {
    registry: &'a Registry,
    order: &'a [EntityId],
}

impl<'a> DrawSequence<'a> {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn ids(&self) -> &'a [EntityId] {
        self.order
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub fn iter(self) -> impl Iterator<Item = (EntityId, &'a Entity)> + 'a {
        let registry = self.registry;
        self.order
            .iter()
            .filter_map(move |&id| registry.get(id).map(|e| (id, e)))
    }

    /// Walk the sequence, letting each entity's behavior issue its draws.
    pub fn draw(&self, target: &mut dyn DrawTarget) {
        for &id in self.order {
            if !self.registry.is_destroyed(id) {
                self.registry.render(id, target);
            }
        }
    }
}
