slotmap::new_key_type! {
    /// Handle to an entity slot in the registry arena.
    ///
    /// Handles are generational: once an entity is reaped its handle never
    /// resolves again, even if the slot is reused.
    pub struct EntityId;
}

/// Linear RGBA color used by draw commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    pub const RED: Self = Self::rgba(1.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::{Key, SlotMap};

    #[test]
    fn default_entity_id_is_null() {
        assert!(EntityId::default().is_null());
    }

    #[test]
    fn reused_slot_gets_fresh_handle() {
        let mut arena: SlotMap<EntityId, u32> = SlotMap::with_key();
        let a = arena.insert(1);
        arena.remove(a);
        let b = arena.insert(2);
        assert_ne!(a, b);
        assert!(arena.get(a).is_none());
    }

    #[test]
    fn with_alpha_keeps_rgb() {
        let c = Color::RED.with_alpha(0.5);
        assert_eq!(c, Color::rgba(1.0, 0.0, 0.0, 0.5));
    }
}
