use std::fmt::Write;

use tickline_common::{DrawTarget, Quad, SimTime};

use crate::order::DrawSequence;

/// Renderer-agnostic interface. All backends implement this trait.
///
/// A renderer consumes one frame's draw sequence and produces output. It
/// never mutates the registry; entity state is owned by the simulation.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame. `time` is the simulation time the frame shows.
    fn render(&mut self, time: SimTime, frame: &DrawSequence<'_>) -> Self::Output;
}

/// Debug text renderer, standing in for a GPU backend.
///
/// Produces one line per quad, in draw order. Useful for CLI output,
/// logging, and testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    out: String,
    quads: usize,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DrawTarget for DebugTextRenderer {
    fn draw_quad(&mut self, quad: Quad) {
        self.quads += 1;
        let _ = writeln!(
            self.out,
            "  [{:>4}] {:?} pos=({:.2}, {:.2}) size=({:.2}, {:.2})",
            quad.render_order, quad.entity, quad.center.x, quad.center.y, quad.size.x, quad.size.y
        );
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, time: SimTime, frame: &DrawSequence<'_>) -> String {
        self.out.clear();
        self.quads = 0;
        frame.draw(self);

        let mut header = format!(
            "=== Frame (tick={}, t={:.3}s) ===\n",
            time.tick,
            time.as_secs_f64()
        );
        let _ = writeln!(header, "Entities: {}  Quads: {}", frame.len(), self.quads);
        header.push_str(&self.out);
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::RenderOrderingPass;
    use glam::Vec2;
    use tickline_ecs::{EntityDesc, Registry};

    #[test]
    fn debug_renderer_empty_frame() {
        let reg = Registry::new();
        let mut pass = RenderOrderingPass::new();
        let mut renderer = DebugTextRenderer::new();
        let output = renderer.render(SimTime::new(0, 60), &pass.sort(&reg));

        assert!(output.contains("tick=0"));
        assert!(output.contains("Entities: 0"));
    }

    #[test]
    fn debug_renderer_lists_quads_in_order() {
        let mut reg = Registry::new();
        reg.spawn(
            EntityDesc::at(Vec2::new(1.0, 2.0)).with_render_order(5),
            (),
        );
        reg.spawn(EntityDesc::default().with_render_order(-1), ());

        let mut pass = RenderOrderingPass::new();
        let mut renderer = DebugTextRenderer::new();
        let output = renderer.render(SimTime::new(120, 60), &pass.sort(&reg));

        assert!(output.contains("t=2.000s"));
        assert!(output.contains("Quads: 2"));
        let back = output.find("[  -1]").unwrap();
        let front = output.find("[   5]").unwrap();
        assert!(back < front);
        assert!(output.contains("pos=(1.00, 2.00)"));
    }
}
