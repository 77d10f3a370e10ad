//! Particle fountain used by `tickline-cli run`.
//!
//! Emitters spray particles with a glow child attached. Particles fall under
//! gravity, expire after their lifetime, and pop when they touch a collidable
//! bumper. Everything is seeded, so two runs with the same arguments match.

use glam::Vec2;
use tickline_common::{Color, DrawTarget, EntityId, SimTime};
use tickline_ecs::{Behavior, Entity, EntityDesc, Region, UpdateContext, UpdateStats};
use tickline_kernel::{FrameHooks, World};
use tickline_render::{DebugTextRenderer, DrawSequence, Renderer};

const GRAVITY: Vec2 = Vec2::new(0.0, -0.02);

/// Demo parameters, loaded once before the first frame.
#[derive(Debug, Clone)]
pub struct DemoSettings {
    pub seed: u64,
    /// Ticks between new emitters.
    pub emitter_interval: u64,
    pub max_emitters: usize,
    pub half_extent: f32,
}

/// Splitmix64: small deterministic generator for demo randomness.
#[derive(Debug, Clone)]
pub struct SplitMix(u64);

impl SplitMix {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in `[lo, hi)`.
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        let unit = (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32;
        lo + unit * (hi - lo)
    }
}

/// Sprays a particle every few ticks until its charge runs out.
pub struct Emitter {
    rng: SplitMix,
    charge: u32,
    every: u64,
}

impl Emitter {
    pub fn new(seed: u64, charge: u32) -> Self {
        Self {
            rng: SplitMix::new(seed),
            charge,
            every: 3,
        }
    }
}

impl Behavior for Emitter {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        if self.charge == 0 {
            ctx.destroy_self();
            return;
        }
        if ctx.time().tick % self.every != 0 {
            return;
        }
        self.charge -= 1;

        let origin = ctx.entity().position;
        let velocity = Vec2::new(self.rng.range(-0.3, 0.3), self.rng.range(0.4, 0.8));
        let lifetime = 40 + (self.rng.next_u64() % 60) as u32;
        let particle = ctx.spawn(
            EntityDesc::at(origin)
                .with_size(Vec2::splat(0.5))
                .with_render_order(1)
                .with_color(Color::rgba(1.0, 0.6, 0.1, 1.0)),
            Particle { velocity, lifetime },
        );
        let glow = ctx.registry_mut().spawn(
            EntityDesc::default()
                .with_size(Vec2::splat(1.5))
                .with_render_order(0)
                .with_color(Color::rgba(1.0, 0.8, 0.3, 0.25)),
            Glow,
        );
        ctx.registry_mut().add_child(particle, glow, Vec2::ZERO);
    }
}

/// Ballistic particle with a fixed lifetime in ticks.
pub struct Particle {
    velocity: Vec2,
    lifetime: u32,
}

impl Behavior for Particle {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        if self.lifetime == 0 {
            pop(ctx);
            return;
        }
        self.lifetime -= 1;
        self.velocity += GRAVITY;
        let entity = ctx.entity_mut();
        entity.position += self.velocity;
        entity.angle += 0.1;

        let (position, size) = (ctx.entity().position, ctx.entity().size);
        let hit = ctx
            .registry()
            .query(position, Region::Box(size), true)
            .into_iter()
            .any(|id| id != ctx.id());
        if hit {
            pop(ctx);
        }
    }
}

/// Destroy a particle together with its glow.
fn pop(ctx: &mut UpdateContext<'_>) {
    let children = ctx.entity().children().to_vec();
    for child in children {
        ctx.registry_mut().destroy(child);
    }
    ctx.destroy_self();
}

/// Soft halo that follows its parent particle: a faint outer quad and a
/// brighter core.
pub struct Glow;

impl Behavior for Glow {
    fn render(&self, id: EntityId, entity: &Entity, target: &mut dyn DrawTarget) {
        let halo = entity.quad(id);
        target.draw_quad(halo);
        target.draw_quad(tickline_common::Quad {
            size: halo.size * 0.5,
            color: halo.color.with_alpha((halo.color.a * 2.0).min(1.0)),
            ..halo
        });
    }
}

/// Static collidable obstacle.
pub struct Bumper;

impl Behavior for Bumper {}

/// Lay out the static scene: a row of bumpers across the floor.
pub fn populate(world: &mut World, settings: DemoSettings) {
    let floor = -settings.half_extent * 0.5;
    for i in 0..5 {
        let x = -settings.half_extent + (i as f32 + 0.5) * settings.half_extent * 0.4;
        world.spawn(
            EntityDesc::at(Vec2::new(x, floor))
                .with_size(Vec2::new(2.0, 0.5))
                .with_render_order(-1)
                .with_color(Color::BLACK)
                .collidable(),
            Bumper,
        );
    }
    world.resources_mut().insert(settings);
}

/// Frame hooks for the demo: spawns emitters, tracks totals, renders text.
pub struct DemoHooks {
    rng: SplitMix,
    renderer: DebugTextRenderer,
    emitters: usize,
    pub total_updated: usize,
    pub total_reaped: usize,
    pub peak_entities: usize,
    pub last_frame: String,
}

impl DemoHooks {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SplitMix::new(seed),
            renderer: DebugTextRenderer::new(),
            emitters: 0,
            total_updated: 0,
            total_reaped: 0,
            peak_entities: 0,
            last_frame: String::new(),
        }
    }
}

impl FrameHooks for DemoHooks {
    fn pre_update(&mut self, world: &mut World) {
        let Some(settings) = world.resources().get::<DemoSettings>().cloned() else {
            return;
        };
        if self.emitters >= settings.max_emitters || world.tick() % settings.emitter_interval != 0
        {
            return;
        }
        self.emitters += 1;
        let x = self.rng.range(-settings.half_extent, settings.half_extent) * 0.5;
        let seed = settings.seed ^ self.rng.next_u64();
        world.spawn(
            EntityDesc::at(Vec2::new(x, 0.0)).with_render_order(2),
            Emitter::new(seed, 20),
        );
        tracing::debug!(tick = world.tick(), emitters = self.emitters, "emitter spawned");
    }

    fn post_update(&mut self, world: &mut World) {
        self.peak_entities = self.peak_entities.max(world.entity_count());
    }

    fn diagnostic(&mut self, _world: &World, stats: &UpdateStats) {
        self.total_updated += stats.updated;
        self.total_reaped += stats.reaped;
    }

    fn render(&mut self, time: SimTime, frame: &DrawSequence<'_>) {
        self.last_frame = self.renderer.render(time, frame);
    }
}
