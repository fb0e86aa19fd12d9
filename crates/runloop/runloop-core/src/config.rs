//! Scheduler configuration and the per-run quantization settings derived from it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tick::Tick;

/// Default quantization step, in percentage points.
pub const DEFAULT_BASE: u8 = 5;

/// Step used by runs shorter than [`SHORT_RUN_THRESHOLD_MS`].
pub const SHORT_RUN_BASE: u8 = 10;

/// Runs requested with a duration below this use [`SHORT_RUN_BASE`].
pub const SHORT_RUN_THRESHOLD_MS: u64 = 500;

/// How raw progress is snapped onto the quantization grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundType {
    /// Truncate down to the nearest step.
    #[default]
    Floor,
    /// Round to the nearest step (halves round up).
    Round,
}

/// Errors produced while loading or validating a [`Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("quantization base must be at least 1")]
    ZeroBase,
    #[error("quantization base {0} exceeds 100 percentage points")]
    BaseTooLarge(u8),
    #[error("config json parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration for a scheduler instance.
///
/// Deserializes from the camelCase shape `{ "roundType": "round", "base": 10 }`;
/// missing fields keep their defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub round_type: RoundType,
    /// Quantization step in percentage points.
    ///
    /// Any value in 1..=100 is accepted. A base that does not divide 100 (e.g. 3)
    /// never quantizes onto 100, so the 100% keyframe and the `play` callback do
    /// not fire for such runs; keyframes are reached only at multiples of the base.
    pub base: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            round_type: RoundType::Floor,
            base: DEFAULT_BASE,
        }
    }
}

impl Config {
    /// Parse and validate a JSON config object.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Config = serde_json::from_str(json)?;
        cfg.validate()
    }

    /// Reject bases that cannot produce ticks inside 0..=100.
    pub fn validate(self) -> Result<Self, ConfigError> {
        match self.base {
            0 => Err(ConfigError::ZeroBase),
            b if b > 100 => Err(ConfigError::BaseTooLarge(b)),
            _ => Ok(self),
        }
    }

    /// Quantization settings for a run requested with `duration_ms`.
    ///
    /// The stored config is never modified; short runs only coarsen the derived copy.
    pub fn for_run(&self, duration_ms: u64) -> RunConfig {
        let base = if duration_ms < SHORT_RUN_THRESHOLD_MS {
            SHORT_RUN_BASE
        } else {
            self.base
        };
        RunConfig {
            round_type: self.round_type,
            base,
        }
    }
}

/// Quantization settings in effect for a single run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunConfig {
    pub round_type: RoundType,
    pub base: u8,
}

impl RunConfig {
    /// Coarsen to the short-run base when a resume asks for a short duration.
    pub(crate) fn coarsen_for(&mut self, duration_ms: u64) {
        if duration_ms < SHORT_RUN_THRESHOLD_MS {
            self.base = SHORT_RUN_BASE;
        }
    }

    /// Snap raw progress (0..=100) onto the grid.
    pub fn quantize(&self, progress: f64) -> Tick {
        let base = f64::from(self.base.max(1));
        let steps = match self.round_type {
            RoundType::Floor => (progress / base).floor(),
            RoundType::Round => (progress / base).round(),
        };
        Tick::saturating((steps * base) as i64)
    }
}
