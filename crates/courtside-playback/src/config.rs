//! Playback session configuration.

use std::time::Duration;

use crate::matcher::DEFAULT_TOLERANCE_SECS;
use crate::overlay::DEFAULT_DWELL;
use crate::timeline::SKIP_SECONDS;

/// Playback session configuration.
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Max distance (seconds) between position and shot for the shot to be active
    pub tolerance_secs: f64,
    /// How long the overlay stays up once shown
    pub dwell: Duration,
    /// Position sampling cadence
    pub sample_interval: Duration,
    /// Samples closer than this to the last forwarded one are dropped
    pub sample_epsilon_secs: f64,
    /// Skip forward/backward distance
    pub skip_secs: f64,
    /// Buffered samples between tracker and session
    pub sample_buffer: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
            dwell: DEFAULT_DWELL,
            sample_interval: Duration::from_millis(100),
            sample_epsilon_secs: 0.05,
            skip_secs: SKIP_SECONDS,
            sample_buffer: 32,
        }
    }
}

impl PlaybackConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            tolerance_secs: std::env::var("OVERLAY_TOLERANCE_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|v: &f64| v.is_finite() && *v > 0.0)
                .unwrap_or(defaults.tolerance_secs),
            dwell: std::env::var("OVERLAY_DWELL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.dwell),
            sample_interval: std::env::var("POSITION_SAMPLE_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|ms: &u64| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.sample_interval),
            sample_epsilon_secs: std::env::var("POSITION_EPSILON_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|v: &f64| v.is_finite() && *v >= 0.0)
                .unwrap_or(defaults.sample_epsilon_secs),
            ..defaults
        }
    }

    pub fn with_tolerance(mut self, tolerance_secs: f64) -> Self {
        self.tolerance_secs = tolerance_secs;
        self
    }

    pub fn with_dwell(mut self, dwell: Duration) -> Self {
        self.dwell = dwell;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_module_constants() {
        let config = PlaybackConfig::default();
        assert_eq!(config.tolerance_secs, DEFAULT_TOLERANCE_SECS);
        assert_eq!(config.dwell, DEFAULT_DWELL);
        assert_eq!(config.skip_secs, SKIP_SECONDS);
    }
}
