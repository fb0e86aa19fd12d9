use std::cell::{Cell, RefCell};
use std::rc::Rc;

use runloop_core::{Config, KeyframeScheduler, ProgressTicker, RunState, Tick, TickerEvent};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Start { target: f64, duration_ms: u64 },
    Stop,
    SetValue(f64),
    Reset,
}

/// Ticker that records every call and replays queued progress values on advance.
#[derive(Debug, Default)]
struct ScriptedTicker {
    calls: Rc<RefCell<Vec<Call>>>,
    queued: Vec<TickerEvent>,
    value: f64,
    running: bool,
}

impl ProgressTicker for ScriptedTicker {
    fn start(&mut self, target: f64, duration_ms: u64) {
        self.calls
            .borrow_mut()
            .push(Call::Start { target, duration_ms });
        self.running = true;
    }

    fn stop(&mut self) {
        self.calls.borrow_mut().push(Call::Stop);
        self.running = false;
    }

    fn set_value(&mut self, value: f64) {
        self.calls.borrow_mut().push(Call::SetValue(value));
        self.value = value;
    }

    fn reset(&mut self) {
        self.calls.borrow_mut().push(Call::Reset);
        self.value = 0.0;
        self.running = false;
    }

    fn advance(&mut self, _elapsed_ms: f64, sink: &mut dyn FnMut(TickerEvent)) {
        if !self.running {
            return;
        }
        for event in self.queued.drain(..) {
            if let TickerEvent::Step(v) = event {
                self.value = v;
            }
            sink(event);
        }
    }

    fn value(&self) -> f64 {
        self.value
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

fn scripted() -> (Rc<RefCell<Vec<Call>>>, KeyframeScheduler<ScriptedTicker>) {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let ticker = ScriptedTicker {
        calls: Rc::clone(&calls),
        ..Default::default()
    };
    (calls, KeyframeScheduler::with_ticker(Config::default(), ticker))
}

/// it should start the ticker toward 100 over the requested duration
#[test]
fn play_starts_ticker_toward_target() {
    let (calls, mut s) = scripted();
    s.play(Some(1200), None);
    assert_eq!(
        *calls.borrow(),
        vec![Call::Start {
            target: 100.0,
            duration_ms: 1200
        }]
    );
}

/// it should fall back to the default duration for zero
#[test]
fn zero_duration_uses_default() {
    let (calls, mut s) = scripted();
    s.play(Some(0), None);
    assert_eq!(s.current_duration(), Some(500));
    assert!(matches!(
        calls.borrow().as_slice(),
        [Call::Start {
            duration_ms: 500,
            ..
        }]
    ));
}

/// it should stop on pause and seed the floored position before restarting on resume
#[test]
fn pause_and_resume_call_sequence() {
    let (calls, mut s) = scripted();
    s.play(Some(1000), None);
    s.handle_step(62.8);
    s.pause();
    s.play(None, None);

    assert_eq!(
        *calls.borrow(),
        vec![
            Call::Start {
                target: 100.0,
                duration_ms: 1000
            },
            Call::Stop,
            Call::SetValue(62.0),
            Call::Start {
                target: 100.0,
                duration_ms: 380
            },
        ]
    );
}

/// it should stop and rewind the ticker on reset
#[test]
fn reset_stops_and_rewinds() {
    let (calls, mut s) = scripted();
    s.play(Some(1000), None);
    calls.borrow_mut().clear();
    s.reset();
    assert_eq!(*calls.borrow(), vec![Call::Stop, Call::Reset]);
}

/// it should process queued events synchronously within update
#[test]
fn update_dispatches_ticker_events_in_order() {
    let (_calls, mut s) = scripted();
    let seen = Rc::new(Cell::new(0u32));
    let hits = Rc::clone(&seen);
    s.add_key("50%", move || hits.set(hits.get() + 1));

    s.play(Some(1000), None);
    s.update(0.0);
    assert_eq!(seen.get(), 0);

    // Irregular, repeated reports inside the 50% step.
    for v in [49.0, 50.0, 50.0, 54.9, 51.0] {
        s.handle_step(v);
    }
    assert_eq!(seen.get(), 1);
    assert!(s.has_fired(Tick::new(50).unwrap()));
}

/// it should reset run state when the ticker reports completion
#[test]
fn completion_event_returns_to_idle() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let ticker = ScriptedTicker {
        calls: Rc::clone(&calls),
        queued: vec![TickerEvent::Step(100.0), TickerEvent::Complete],
        ..Default::default()
    };
    let mut s = KeyframeScheduler::with_ticker(Config::default(), ticker);
    let done = Rc::new(Cell::new(false));
    let flag = Rc::clone(&done);
    s.play(Some(700), Some(Box::new(move || flag.set(true))));

    assert_eq!(s.update(16.0), RunState::Idle);
    assert!(done.get());
    assert_eq!(s.current_duration(), None);
    assert!(calls.borrow().ends_with(&[Call::Stop, Call::Reset]));
}

/// it should keep a short first run's grid when resumed with the default duration
#[test]
fn resumed_short_run_keeps_coarse_grid() {
    let (_calls, mut s) = scripted();
    s.play(Some(300), None);
    s.handle_step(20.0);
    s.pause();
    s.play(None, None);
    assert_eq!(s.run_config().map(|r| r.base), Some(10));
    assert_eq!(s.config().base, 5);
}

/// it should drop the rest of a batch once a keyframe pauses the run
#[test]
fn pause_from_keyframe_skips_remaining_events() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let ticker = ScriptedTicker {
        calls: Rc::clone(&calls),
        queued: vec![
            TickerEvent::Step(50.0),
            TickerEvent::Step(60.0),
            TickerEvent::Complete,
        ],
        ..Default::default()
    };
    let mut s = KeyframeScheduler::with_ticker(Config::default(), ticker);
    let control = s.control();
    s.add_key("50%", move || control.pause());
    let later = Rc::new(Cell::new(false));
    let flag = Rc::clone(&later);
    s.add_key("60%", move || flag.set(true));

    s.play(Some(1000), None);
    assert_eq!(s.update(16.0), RunState::Paused);
    assert!(!later.get());
    assert_eq!(s.current_step(), 50.0);
    assert_eq!(s.remaining_duration(), Some(500));
    assert_eq!(calls.borrow().last(), Some(&Call::Stop));
}
