use glam::Vec2;

use crate::types::{Color, EntityId};

/// A single textured-or-flat quad to be drawn by a backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// Entity that issued the draw, for debugging and picking.
    pub entity: EntityId,
    pub center: Vec2,
    pub size: Vec2,
    /// Rotation in radians.
    pub angle: f32,
    pub color: Color,
    pub render_order: i32,
}

/// Sink for draw commands.
///
/// Entities describe what they look like through this trait; the backend
/// that turns quads into pixels lives outside the engine core. Commands
/// arrive in ascending `render_order` and backends must keep that order.
pub trait DrawTarget {
    fn draw_quad(&mut self, quad: Quad);
}

impl DrawTarget for Vec<Quad> {
    fn draw_quad(&mut self, quad: Quad) {
        self.push(quad);
    }
}
