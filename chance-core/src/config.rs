use crate::error::{ChanceError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LotteryConfig {
    #[serde(default)]
    pub spin: SpinConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
}

/// Wheel animation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    pub min_spins: f64,
    pub max_spins: f64,
    pub duration: Duration,
    pub frame_interval: Duration,
    /// Pause between clearing a stored result and spinning again
    pub respin_delay: Duration,
}

/// Sequential reveal timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Delay before the first reveal on first view
    pub initial_delay: Duration,
    /// Delay before the first reveal after "run again"
    pub rerun_delay: Duration,
    pub step_delay: Duration,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            min_spins: 5.0,
            max_spins: 8.0,
            duration: Duration::from_millis(5000),
            frame_interval: Duration::from_millis(16), // ~60 fps
            respin_delay: Duration::from_millis(100),
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(3000),
            rerun_delay: Duration::from_millis(1000),
            step_delay: Duration::from_millis(2000),
        }
    }
}

impl LotteryConfig {
    /// Same spin range, no waiting anywhere
    pub fn instant() -> Self {
        let mut config = Self::default();
        config.spin.duration = Duration::ZERO;
        config.spin.respin_delay = Duration::ZERO;
        config.reveal = RevealConfig {
            initial_delay: Duration::ZERO,
            rerun_delay: Duration::ZERO,
            step_delay: Duration::ZERO,
        };
        config
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.spin.min_spins.is_finite() && self.spin.max_spins.is_finite()) {
            return Err(ChanceError::config("Spin counts must be finite"));
        }

        if self.spin.min_spins <= 0.0 {
            return Err(ChanceError::config("Minimum spins must be greater than 0"));
        }

        if self.spin.max_spins < self.spin.min_spins {
            return Err(ChanceError::config(
                "Maximum spins cannot be lower than minimum spins",
            ));
        }

        if self.spin.frame_interval.is_zero() {
            return Err(ChanceError::config("Frame interval must be greater than 0"));
        }

        Ok(())
    }
}
