use tickline_common::SimTime;

/// Simulation clock: fixed-rate tick counter plus the wall-time accumulator
/// that feeds it.
///
/// Only the scheduler moves the accumulator and the tick; everything else
/// reads.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    tick: u64,
    rate: u32,
    /// Buffered wall time not yet converted into steps, in milliseconds.
    /// Sits slightly below zero between frames.
    accumulator_ms: f64,
    paused: bool,
    frames: u64,
    real_time_ms: f64,
}

impl SimulationClock {
    pub fn new(rate: u32) -> Self {
        debug_assert!(rate > 0, "fixed rate must be positive");
        Self {
            tick: 0,
            rate,
            accumulator_ms: 0.0,
            paused: false,
            frames: 0,
            real_time_ms: 0.0,
        }
    }

    /// Fixed steps executed so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Fixed steps per second.
    pub fn rate(&self) -> u32 {
        self.rate
    }

    /// Current simulation time, exact.
    pub fn time(&self) -> SimTime {
        SimTime::new(self.tick, self.rate)
    }

    /// Duration of one fixed step in milliseconds.
    pub fn step_ms(&self) -> f64 {
        1000.0 / self.rate as f64
    }

    pub fn accumulator_ms(&self) -> f64 {
        self.accumulator_ms
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Wall frames delivered to the scheduler, paused or not.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Unscaled wall time delivered to the scheduler, in seconds. Keeps
    /// running while paused.
    pub fn real_time_secs(&self) -> f64 {
        self.real_time_ms / 1000.0
    }

    pub(crate) fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub(crate) fn record_frame(&mut self, wall_delta_ms: f64) {
        self.frames += 1;
        self.real_time_ms += wall_delta_ms;
    }

    pub(crate) fn advance_tick(&mut self) {
        self.tick += 1;
    }

    pub(crate) fn accumulator_mut(&mut self) -> &mut f64 {
        &mut self.accumulator_ms
    }
}
