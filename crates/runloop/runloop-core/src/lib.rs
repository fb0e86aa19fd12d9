//! Runloop Core (engine-agnostic)
//!
//! Drives a single progress timer from 0 to 100 over a duration and fires callbacks
//! registered at percentage keyframes (`"25%"`, `"50%"`, ...) exactly once per run.
//! Progress is quantized onto a 5% grid (10% for runs shorter than 500 ms), so a
//! keyframe fires on the first progress report that lands in its step.
//!
//! The timer itself is pluggable through [`ProgressTicker`]; [`LinearTicker`] is a
//! headless implementation advanced by [`KeyframeScheduler::update`].

pub mod config;
pub mod control;
pub mod duration;
pub mod keymap;
pub mod scheduler;
pub mod state;
pub mod tick;
pub mod ticker;

// Re-exports for consumers (bindings)
pub use config::{Config, ConfigError, RoundType, RunConfig};
pub use control::{Command, RunControl};
pub use duration::{duration_from_f64, normalize_duration, parse_duration, DEFAULT_DURATION_MS};
pub use keymap::{KeyframeFn, KeyframeMap};
pub use scheduler::KeyframeScheduler;
pub use state::RunState;
pub use tick::{KeyLabel, LabelError, Tick};
pub use ticker::{LinearTicker, ProgressTicker, TickerEvent};

/// Crate version, reported by bindings.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
