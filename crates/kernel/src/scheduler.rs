use tickline_common::SimTime;
use tickline_ecs::UpdateStats;
use tickline_render::{DrawSequence, RenderOrderingPass};

use crate::config::{ConfigError, SchedulerConfig};
use crate::world::World;

/// Collaborator callbacks driven by the scheduler.
///
/// Per fixed step the order is always `pre_update`, registry update,
/// `post_update`, `diagnostic`. Per wall frame, after the step loop, `render`
/// runs exactly once, paused or not.
pub trait FrameHooks {
    fn pre_update(&mut self, world: &mut World) {
        let _ = world;
    }

    fn post_update(&mut self, world: &mut World) {
        let _ = world;
    }

    fn diagnostic(&mut self, world: &World, stats: &UpdateStats) {
        let _ = (world, stats);
    }

    /// Runs once per wall frame while paused, in place of the step loop.
    fn paused(&mut self, world: &mut World) {
        let _ = world;
    }

    fn render(&mut self, time: SimTime, frame: &DrawSequence<'_>) {
        let _ = (time, frame);
    }
}

impl FrameHooks for () {}

/// What one call to [`FrameScheduler::on_frame`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Fixed steps executed this frame.
    pub steps: u32,
    /// The accumulator hit the clamp ceiling and buffered time was dropped.
    pub clamped: bool,
    pub paused: bool,
    /// Tick after the frame.
    pub tick: u64,
    /// Entity updates summed over all steps.
    pub updated: usize,
    /// Entities reaped summed over all steps.
    pub reaped: usize,
    /// Entities handed to the render hook.
    pub drawn: usize,
}

/// Turns variable wall-clock frame deltas into fixed simulation steps.
#[derive(Debug)]
pub struct FrameScheduler {
    config: SchedulerConfig,
    max_steps: u32,
    time_scale: f64,
    world: World,
    render_pass: RenderOrderingPass,
}

impl FrameScheduler {
    /// Validate `config` and create a scheduler with an empty world.
    pub fn new(config: SchedulerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        tracing::info!(
            fixed_rate = config.fixed_rate,
            clamp_ms = config.clamp_ceiling_ms,
            epsilon_ms = config.smoothing_epsilon_ms,
            time_scale = config.time_scale,
            "frame scheduler configured"
        );
        Ok(Self {
            max_steps: config.max_steps_per_frame(),
            time_scale: config.time_scale,
            world: World::new(config.fixed_rate),
            render_pass: RenderOrderingPass::new(),
            config,
        })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Upper bound on steps a single frame can run.
    pub fn max_steps_per_frame(&self) -> u32 {
        self.max_steps
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Change the debug time scale. Only wall deltas are scaled; the step
    /// size never changes.
    pub fn set_time_scale(&mut self, scale: f64) {
        debug_assert!(
            scale.is_finite() && scale > 0.0,
            "time scale must be positive, got {scale}"
        );
        if scale.is_finite() && scale > 0.0 {
            self.time_scale = scale;
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.world.set_paused(paused);
    }

    pub fn is_paused(&self) -> bool {
        self.world.is_paused()
    }

    /// Handle one wall-clock frame of `wall_delta_ms` milliseconds.
    ///
    /// Runs as many fixed steps as the buffered time allows (bounded by
    /// [`Self::max_steps_per_frame`]) and then the render hook.
    pub fn on_frame(&mut self, wall_delta_ms: f64, hooks: &mut impl FrameHooks) -> FrameReport {
        let _span =
            tracing::trace_span!("frame", frame = self.world.clock().frame_count()).entered();

        // Clocks can stutter backwards; treat that as no time passing.
        let wall_delta_ms = if wall_delta_ms.is_finite() {
            wall_delta_ms.max(0.0)
        } else {
            0.0
        };
        self.world.clock_mut().record_frame(wall_delta_ms);

        let mut report = FrameReport {
            paused: self.world.is_paused(),
            ..FrameReport::default()
        };

        if report.paused {
            hooks.paused(&mut self.world);
        } else {
            self.run_steps(wall_delta_ms * self.time_scale, hooks, &mut report);
        }

        report.tick = self.world.tick();
        report.drawn = self.render(hooks);
        report
    }

    fn run_steps(&mut self, scaled_ms: f64, hooks: &mut impl FrameHooks, report: &mut FrameReport) {
        let step_ms = self.config.step_ms();
        let clamp_ms = self.config.clamp_ceiling_ms;
        let epsilon_ms = self.config.smoothing_epsilon_ms;

        let acc = self.world.clock_mut().accumulator_mut();
        *acc += scaled_ms;
        if *acc > clamp_ms {
            tracing::debug!(dropped_ms = *acc - clamp_ms, "frame stall clamped");
            *acc = clamp_ms;
            report.clamped = true;
        }

        // Absorb a small deficit left over from display/step cadence
        // mismatch so it does not push the step to the next frame.
        let mut smoothing = 0.0;
        if *acc < 0.0 && *acc > -epsilon_ms {
            smoothing = *acc;
            *acc = 0.0;
        }

        while self.world.clock().accumulator_ms() >= 0.0 && report.steps < self.max_steps {
            let stats = self.step(hooks);
            report.steps += 1;
            report.updated += stats.updated;
            report.reaped += stats.reaped;
            *self.world.clock_mut().accumulator_mut() -= step_ms;
        }

        *self.world.clock_mut().accumulator_mut() += smoothing;

        tracing::trace!(
            steps = report.steps,
            accumulator_ms = self.world.clock().accumulator_ms(),
            "frame steps complete"
        );
    }

    fn step(&mut self, hooks: &mut impl FrameHooks) -> UpdateStats {
        hooks.pre_update(&mut self.world);
        let stats = self.world.step();
        hooks.post_update(&mut self.world);
        hooks.diagnostic(&self.world, &stats);
        stats
    }

    /// Run exactly one fixed step, even while paused, without touching the
    /// accumulator. Frame-by-frame debugging aid.
    pub fn step_once(&mut self, hooks: &mut impl FrameHooks) -> UpdateStats {
        self.step(hooks)
    }

    fn render(&mut self, hooks: &mut impl FrameHooks) -> usize {
        let time = self.world.time();
        let frame = self.render_pass.sort(self.world.registry());
        hooks.render(time, &frame);
        frame.len()
    }
}
