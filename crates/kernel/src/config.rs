use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating scheduler configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("fixed rate must be at least 1 step per second")]
    ZeroRate,
    #[error("clamp ceiling must be positive and finite, got {0} ms")]
    InvalidClamp(f64),
    #[error("smoothing epsilon must be non-negative and finite, got {0} ms")]
    InvalidEpsilon(f64),
    #[error("time scale must be positive and finite, got {0}")]
    InvalidTimeScale(f64),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Frame pacing parameters, consumed once when the scheduler is created.
///
/// Missing fields fall back to the defaults, so partial YAML files are fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Fixed simulation steps per second.
    pub fixed_rate: u32,
    /// Upper bound on buffered wall time, in milliseconds. Bounds catch-up
    /// work after a stall.
    pub clamp_ceiling_ms: f64,
    /// A leftover accumulator in `(-epsilon, 0)` is absorbed instead of
    /// delaying the next step, in milliseconds.
    pub smoothing_epsilon_ms: f64,
    /// Multiplier on wall deltas (fast-forward above 1, slow motion below).
    pub time_scale: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            fixed_rate: 60,
            clamp_ceiling_ms: 50.0,
            smoothing_epsilon_ms: 9.0,
            time_scale: 1.0,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fixed_rate == 0 {
            return Err(ConfigError::ZeroRate);
        }
        if !(self.clamp_ceiling_ms.is_finite() && self.clamp_ceiling_ms > 0.0) {
            return Err(ConfigError::InvalidClamp(self.clamp_ceiling_ms));
        }
        if !(self.smoothing_epsilon_ms.is_finite() && self.smoothing_epsilon_ms >= 0.0) {
            return Err(ConfigError::InvalidEpsilon(self.smoothing_epsilon_ms));
        }
        if !(self.time_scale.is_finite() && self.time_scale > 0.0) {
            return Err(ConfigError::InvalidTimeScale(self.time_scale));
        }
        Ok(())
    }

    /// Duration of one fixed step in milliseconds.
    pub fn step_ms(&self) -> f64 {
        1000.0 / self.fixed_rate as f64
    }

    /// Most fixed steps a single frame may run: `ceil(clamp / step)`.
    pub fn max_steps_per_frame(&self) -> u32 {
        ((self.clamp_ceiling_ms / self.step_ms()).ceil() as u32).max(1)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_path(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = SchedulerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fixed_rate, 60);
        assert_eq!(config.clamp_ceiling_ms, 50.0);
        assert_eq!(config.smoothing_epsilon_ms, 9.0);
        assert_eq!(config.max_steps_per_frame(), 3);
    }

    #[test]
    fn max_steps_rounds_up() {
        let config = SchedulerConfig {
            fixed_rate: 100,
            clamp_ceiling_ms: 25.0,
            ..SchedulerConfig::default()
        };
        assert_eq!(config.max_steps_per_frame(), 3);
    }

    #[test]
    fn rejects_bad_values() {
        let zero = SchedulerConfig {
            fixed_rate: 0,
            ..SchedulerConfig::default()
        };
        assert!(matches!(zero.validate(), Err(ConfigError::ZeroRate)));

        let clamp = SchedulerConfig {
            clamp_ceiling_ms: f64::NAN,
            ..SchedulerConfig::default()
        };
        assert!(matches!(clamp.validate(), Err(ConfigError::InvalidClamp(_))));

        let scale = SchedulerConfig {
            time_scale: 0.0,
            ..SchedulerConfig::default()
        };
        assert!(matches!(
            scale.validate(),
            Err(ConfigError::InvalidTimeScale(_))
        ));
    }

    #[test]
    fn partial_yaml_uses_defaults() {
        let config = SchedulerConfig::from_yaml_str("fixed_rate: 120\n").unwrap();
        assert_eq!(config.fixed_rate, 120);
        assert_eq!(config.clamp_ceiling_ms, 50.0);
    }

    #[test]
    fn invalid_yaml_values_are_rejected() {
        let err = SchedulerConfig::from_yaml_str("smoothing_epsilon_ms: -1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEpsilon(_)));
        assert!(err.to_string().contains("-1"));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fixed_rate: 30\nclamp_ceiling_ms: 100.0").unwrap();
        let config = SchedulerConfig::from_yaml_path(file.path()).unwrap();
        assert_eq!(config.fixed_rate, 30);
        assert_eq!(config.max_steps_per_frame(), 3);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SchedulerConfig::from_yaml_path(Path::new("/nonexistent/tickline.yaml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
