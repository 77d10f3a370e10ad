//! Rendering adapter: per-frame draw ordering and a renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers never mutate the registry; they only read a draw sequence.
//! - Draw order is ascending `render_order`, ties in enrollment order, and is
//!   identical every frame for identical registry contents.
//! - Entities marked destroyed are never drawn, even before they are reaped.
//!
//! The GPU backend is an external collaborator. [`DebugTextRenderer`] stands
//! in for it in tools and tests.

mod order;
mod renderer;

pub use order::{DrawSequence, RenderOrderingPass};
pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "tickline-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
