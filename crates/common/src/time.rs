use std::time::Duration;

/// Exact simulation time: `tick / rate` seconds.
///
/// Time is never accumulated as a float. Conversions divide the integer tick
/// count once, so there is no drift no matter how long the simulation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimTime {
    pub tick: u64,
    /// Fixed steps per second.
    pub rate: u32,
}

impl SimTime {
    pub fn new(tick: u64, rate: u32) -> Self {
        debug_assert!(rate > 0, "fixed rate must be positive");
        Self { tick, rate }
    }

    /// Seconds since tick 0.
    pub fn as_secs_f64(&self) -> f64 {
        self.tick as f64 / self.rate as f64
    }

    /// Exact elapsed duration, rounded down to the nanosecond.
    pub fn as_duration(&self) -> Duration {
        let nanos = self.tick as u128 * 1_000_000_000 / self.rate as u128;
        let secs = (nanos / 1_000_000_000) as u64;
        Duration::new(secs, (nanos % 1_000_000_000) as u32)
    }

    /// Length of one fixed step in seconds.
    pub fn step_secs(&self) -> f64 {
        1.0 / self.rate as f64
    }

    /// Length of one fixed step in milliseconds.
    pub fn step_ms(&self) -> f64 {
        1000.0 / self.rate as f64
    }

    /// The time one tick later.
    pub fn next(self) -> Self {
        Self {
            tick: self.tick + 1,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sixty_ticks_is_one_second() {
        let t = SimTime::new(60, 60);
        assert_eq!(t.as_secs_f64(), 1.0);
        assert_eq!(t.as_duration(), Duration::from_secs(1));
    }

    #[test]
    fn no_drift_over_long_runs() {
        let t = SimTime::new(60 * 10_000_000, 60);
        assert_eq!(t.as_secs_f64(), 10_000_000.0);
        assert_eq!(t.as_duration(), Duration::from_secs(10_000_000));
    }

    #[test]
    fn duration_is_exact_for_non_divisible_rates() {
        let t = SimTime::new(1, 60);
        assert_eq!(t.as_duration(), Duration::from_nanos(16_666_666));
        assert_relative_eq!(t.step_ms(), 16.666_666_666, epsilon = 1e-6);
    }

    #[test]
    fn next_advances_one_tick() {
        let t = SimTime::new(5, 30).next();
        assert_eq!(t.tick, 6);
        assert_eq!(t.rate, 30);
    }
}
