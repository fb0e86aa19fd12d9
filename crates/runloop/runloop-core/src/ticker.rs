//! Progress ticker contract and the headless linear implementation.
//!
//! A ticker owns a single scalar that it moves toward a target over a duration.
//! Hosts advance it with wall-clock deltas; each advance reports the new value as a
//! [`TickerEvent::Step`] and, once the target is reached, a single
//! [`TickerEvent::Complete`].

/// Notifications produced while a ticker advances.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickerEvent {
    /// The scalar moved; carries the current value.
    Step(f64),
    /// The scalar reached its target. Emitted once per `start`.
    Complete,
}

/// Drives a scalar toward a target over time.
pub trait ProgressTicker {
    /// Begin advancing linearly from the current value toward `target` over `duration_ms`.
    fn start(&mut self, target: f64, duration_ms: u64);

    /// Halt immediately, leaving the value where it is.
    fn stop(&mut self);

    /// Seed the value without animating.
    fn set_value(&mut self, value: f64);

    /// Halt and return the value to its start position (0).
    fn reset(&mut self);

    /// Advance by `elapsed_ms` of wall time, reporting events to `sink`.
    fn advance(&mut self, elapsed_ms: f64, sink: &mut dyn FnMut(TickerEvent));

    fn value(&self) -> f64;

    fn is_running(&self) -> bool;
}

#[inline]
fn lerp_f64(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Timer-driven interpolator with no rendering dependency.
///
/// Every `advance` while running yields exactly one step, including the first call
/// after `start` (which reports the start value when no time has elapsed).
#[derive(Clone, Debug, Default)]
pub struct LinearTicker {
    value: f64,
    from: f64,
    target: f64,
    duration_ms: u64,
    elapsed_ms: f64,
    running: bool,
}

impl LinearTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wall time spent in the current animation, in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Length of the current animation, in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}

impl ProgressTicker for LinearTicker {
    fn start(&mut self, target: f64, duration_ms: u64) {
        self.from = self.value;
        self.target = target;
        self.duration_ms = duration_ms;
        self.elapsed_ms = 0.0;
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    fn reset(&mut self) {
        self.running = false;
        self.value = 0.0;
        self.from = 0.0;
        self.elapsed_ms = 0.0;
    }

    fn advance(&mut self, elapsed_ms: f64, sink: &mut dyn FnMut(TickerEvent)) {
        if !self.running {
            return;
        }
        if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            self.elapsed_ms += elapsed_ms;
        }
        let t = if self.duration_ms == 0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms as f64).min(1.0)
        };
        self.value = if t >= 1.0 {
            self.target
        } else {
            lerp_f64(self.from, self.target, t)
        };
        sink(TickerEvent::Step(self.value));
        if t >= 1.0 {
            self.running = false;
            sink(TickerEvent::Complete);
        }
    }

    fn value(&self) -> f64 {
        self.value
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(ticker: &mut LinearTicker, dt: f64) -> Vec<TickerEvent> {
        let mut out = Vec::new();
        ticker.advance(dt, &mut |e| out.push(e));
        out
    }

    fn approx(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "left={a} right={b}");
    }

    #[test]
    fn first_advance_reports_start_value() {
        let mut t = LinearTicker::new();
        t.start(100.0, 1000);
        assert_eq!(drain(&mut t, 0.0), vec![TickerEvent::Step(0.0)]);
    }

    #[test]
    fn linear_progress_and_single_completion() {
        let mut t = LinearTicker::new();
        t.start(100.0, 1000);
        assert_eq!(drain(&mut t, 250.0), vec![TickerEvent::Step(25.0)]);
        assert_eq!(
            drain(&mut t, 900.0),
            vec![TickerEvent::Step(100.0), TickerEvent::Complete]
        );
        assert!(!t.is_running());
        assert!(drain(&mut t, 16.0).is_empty());
    }

    #[test]
    fn start_continues_from_seeded_value() {
        let mut t = LinearTicker::new();
        t.set_value(40.0);
        t.start(100.0, 600);
        assert_eq!(t.duration_ms(), 600);
        match drain(&mut t, 300.0).as_slice() {
            [TickerEvent::Step(v)] => approx(*v, 70.0),
            other => panic!("unexpected events: {other:?}"),
        }
    }

    #[test]
    fn stop_freezes_and_reset_rewinds() {
        let mut t = LinearTicker::new();
        t.start(100.0, 100);
        drain(&mut t, 50.0);
        t.stop();
        assert!(drain(&mut t, 50.0).is_empty());
        approx(t.value(), 50.0);
        t.reset();
        approx(t.value(), 0.0);
        assert!(!t.is_running());
    }

    #[test]
    fn zero_duration_completes_on_first_advance() {
        let mut t = LinearTicker::new();
        t.start(100.0, 0);
        assert_eq!(
            drain(&mut t, 0.0),
            vec![TickerEvent::Step(100.0), TickerEvent::Complete]
        );
    }
}
