//! KeyframeScheduler: one progress timer, percentage keyframes, fire-once per run.
//!
//! Methods:
//! - registration: add_key, remove_key, add_map, get_map
//! - run control: play, pause, reset, control (deferred pause/reset from callbacks)
//! - driving: update (owned ticker), handle_step / handle_complete (external drivers)

use hashbrown::HashSet;
use log::{debug, trace};

use crate::config::{Config, RunConfig};
use crate::control::{Command, RunControl};
use crate::duration::normalize_duration;
use crate::keymap::{KeyframeFn, KeyframeMap};
use crate::state::RunState;
use crate::tick::{KeyLabel, Tick};
use crate::ticker::{LinearTicker, ProgressTicker, TickerEvent};

/// Value the progress timer runs toward.
const TARGET: f64 = 100.0;

/// Keyframe scheduler driving a single [`ProgressTicker`].
#[derive(Debug)]
pub struct KeyframeScheduler<T: ProgressTicker = LinearTicker> {
    config: Config,
    keyframes: KeyframeMap,
    exec_log: HashSet<Tick>,

    state: RunState,
    run: Option<RunConfig>,
    current_duration: Option<u64>,
    remaining_duration: Option<u64>,
    current_step: f64,

    ticker: T,
    control: RunControl,
    // Reused per update to collect ticker events.
    events: Vec<TickerEvent>,
}

impl KeyframeScheduler<LinearTicker> {
    /// Create a scheduler backed by the headless [`LinearTicker`].
    pub fn new(config: Config) -> Self {
        Self::with_ticker(config, LinearTicker::new())
    }
}

impl Default for KeyframeScheduler<LinearTicker> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<T: ProgressTicker> KeyframeScheduler<T> {
    /// Create a scheduler driving a caller-supplied ticker.
    pub fn with_ticker(config: Config, ticker: T) -> Self {
        Self {
            config,
            keyframes: KeyframeMap::new(),
            exec_log: HashSet::new(),
            state: RunState::Idle,
            run: None,
            current_duration: None,
            remaining_duration: None,
            current_step: 0.0,
            ticker,
            control: RunControl::new(),
            events: Vec::with_capacity(4),
        }
    }

    // ---- registration ----------------------------------------------------

    /// Register `callback` at the tick named by `label`.
    ///
    /// Callbacks already at that tick run first. Labels without digits (or past 100)
    /// are ignored.
    pub fn add_key<L, F>(&mut self, label: L, callback: F)
    where
        L: KeyLabel,
        F: FnMut() + 'static,
    {
        match label.to_tick() {
            Ok(tick) => {
                let len = self.keyframes.insert(tick, Box::new(callback));
                debug!("keyframe added at {tick} (chain length {len})");
            }
            Err(err) => debug!("add_key ignored: {err}"),
        }
    }

    /// Remove every callback at the tick named by `label`. Unknown ticks are ignored.
    pub fn remove_key<L: KeyLabel>(&mut self, label: L) {
        match label.to_tick() {
            Ok(tick) => {
                let removed = self.keyframes.remove(tick);
                debug!("removed {removed} callback(s) at {tick}");
            }
            Err(err) => debug!("remove_key ignored: {err}"),
        }
    }

    /// Bulk [`add_key`](Self::add_key). Entries with unusable labels are skipped;
    /// the rest are still applied.
    pub fn add_map<I, L, F>(&mut self, mapping: I)
    where
        I: IntoIterator<Item = (L, F)>,
        L: KeyLabel,
        F: FnMut() + 'static,
    {
        for (label, callback) in mapping {
            self.add_key(label, callback);
        }
    }

    /// The live keyframe map.
    #[inline]
    pub fn get_map(&self) -> &KeyframeMap {
        &self.keyframes
    }

    // ---- run control -----------------------------------------------------

    /// Start a run, or resume a paused one.
    ///
    /// Ignored while already running. `duration_ms` of `None` or `0` means 500 ms.
    /// A resume runs for the remaining duration computed by [`pause`](Self::pause)
    /// instead of the requested one. `on_complete` is appended to the 100% keyframe
    /// and stays registered after the run.
    pub fn play(&mut self, duration_ms: Option<u64>, on_complete: Option<KeyframeFn>) {
        if self.state.is_playing() {
            debug!("play ignored: already running");
            return;
        }
        if let Some(stale) = self.control.take() {
            debug!("dropping {stale:?} queued outside a run");
        }
        let requested = normalize_duration(duration_ms);

        let (duration, run) = if self.state.can_resume() {
            let mut run = self.run.unwrap_or_else(|| self.config.for_run(requested));
            run.coarsen_for(requested);
            let remaining = self.remaining_duration.unwrap_or(requested);
            self.ticker.set_value(self.current_step.floor());
            debug!(
                "resuming at {:.2}% for {remaining} ms (base {})",
                self.current_step, run.base
            );
            (remaining, run)
        } else {
            let run = self.config.for_run(requested);
            debug!("starting run of {requested} ms (base {})", run.base);
            (requested, run)
        };

        if let Some(callback) = on_complete {
            self.keyframes.insert(Tick::MAX, callback);
        }

        self.state = RunState::Running;
        self.run = Some(run);
        self.current_duration = Some(duration);
        self.ticker.start(TARGET, duration);
    }

    /// Freeze the run at its current position.
    ///
    /// Only acts while running. Side effects already started by keyframe callbacks
    /// keep going.
    pub fn pause(&mut self) {
        if !self.state.can_pause() {
            debug!("pause ignored: state is {}", self.state.name());
            return;
        }
        let current = self.current_duration.unwrap_or(0);
        let elapsed = (current as f64 * (self.current_step.floor() / 100.0)).round() as u64;
        let remaining = current.saturating_sub(elapsed);
        self.remaining_duration = Some(remaining);
        self.ticker.stop();
        self.state = RunState::Paused;
        debug!(
            "paused at {:.2}% with {remaining} ms remaining",
            self.current_step
        );
    }

    /// Clear all run state and rewind the ticker, from any state.
    pub fn reset(&mut self) {
        self.control.take();
        self.ticker.stop();
        self.ticker.reset();
        self.exec_log.clear();
        self.current_duration = None;
        self.remaining_duration = None;
        self.current_step = 0.0;
        self.run = None;
        self.state = RunState::Idle;
        debug!("run reset");
    }

    /// Handle for pausing or resetting this scheduler from inside a keyframe callback.
    ///
    /// Requests are applied right after the firing chain returns; the rest of the
    /// chain still runs. Outside a dispatch they are applied on the next
    /// [`update`](Self::update).
    pub fn control(&self) -> RunControl {
        self.control.clone()
    }

    fn apply_pending(&mut self) {
        match self.control.take() {
            Some(Command::Pause) => self.pause(),
            Some(Command::Reset) => self.reset(),
            None => {}
        }
    }

    // ---- driving ---------------------------------------------------------

    /// Advance the owned ticker by `elapsed_ms` and process what it reports.
    ///
    /// Events left in the batch after a keyframe pauses or resets the run are dropped.
    pub fn update(&mut self, elapsed_ms: f64) -> RunState {
        self.apply_pending();
        let mut events = std::mem::take(&mut self.events);
        events.clear();
        self.ticker.advance(elapsed_ms, &mut |e| events.push(e));
        for event in events.drain(..) {
            if !self.state.is_playing() {
                break;
            }
            match event {
                TickerEvent::Step(value) => self.handle_step(value),
                TickerEvent::Complete => self.handle_complete(),
            }
        }
        self.events = events;
        self.state
    }

    /// Process one progress report (0..=100).
    ///
    /// The quantized tick fires its chain if it has not fired yet this run.
    pub fn handle_step(&mut self, progress: f64) {
        if !self.state.is_playing() {
            return;
        }
        self.current_step = progress;
        let Some(run) = self.run else {
            return;
        };
        let tick = run.quantize(progress);
        if !self.exec_log.contains(&tick) && self.keyframes.contains(tick) {
            self.exec_log.insert(tick);
            trace!("firing keyframe {tick} at {progress:.3}");
            self.keyframes.fire(tick);
            self.apply_pending();
        }
    }

    /// Process the ticker reaching 100: the run ends and all run state is cleared.
    pub fn handle_complete(&mut self) {
        if !self.state.is_playing() {
            return;
        }
        debug!("run complete");
        self.reset();
    }

    // ---- inspection ------------------------------------------------------

    #[inline]
    pub fn state(&self) -> RunState {
        self.state
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    /// Last raw progress value reported by the ticker.
    #[inline]
    pub fn current_step(&self) -> f64 {
        self.current_step
    }

    #[inline]
    pub fn current_duration(&self) -> Option<u64> {
        self.current_duration
    }

    #[inline]
    pub fn remaining_duration(&self) -> Option<u64> {
        self.remaining_duration
    }

    /// Whether `tick` already fired during the current run.
    #[inline]
    pub fn has_fired(&self, tick: Tick) -> bool {
        self.exec_log.contains(&tick)
    }

    /// Ticks fired during the current run, ascending.
    pub fn fired_ticks(&self) -> Vec<Tick> {
        let mut ticks: Vec<Tick> = self.exec_log.iter().copied().collect();
        ticks.sort_unstable();
        ticks
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Quantization in effect for the current run, if any.
    #[inline]
    pub fn run_config(&self) -> Option<RunConfig> {
        self.run
    }

    #[inline]
    pub fn ticker(&self) -> &T {
        &self.ticker
    }
}
