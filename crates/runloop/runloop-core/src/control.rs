//! Deferred run control for code that cannot borrow the scheduler.
//!
//! Keyframe callbacks run while the scheduler is mutably borrowed, so they cannot
//! call [`pause`](crate::KeyframeScheduler::pause) or
//! [`reset`](crate::KeyframeScheduler::reset) directly. A [`RunControl`] handle
//! queues the request instead; the scheduler applies it as soon as the current
//! callback chain returns, before any further progress is processed.

use std::cell::Cell;
use std::rc::Rc;

/// A queued run-control request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Pause,
    Reset,
}

/// Cloneable handle onto a scheduler's pending command slot.
///
/// Only one command is held at a time. A reset outranks a pause queued in the
/// same dispatch.
#[derive(Clone, Debug, Default)]
pub struct RunControl {
    pending: Rc<Cell<Option<Command>>>,
}

impl RunControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the scheduler to pause once the current callback chain returns.
    pub fn pause(&self) {
        self.request(Command::Pause);
    }

    /// Ask the scheduler to reset once the current callback chain returns.
    pub fn reset(&self) {
        self.request(Command::Reset);
    }

    /// The command waiting to be applied, if any.
    #[inline]
    pub fn pending(&self) -> Option<Command> {
        self.pending.get()
    }

    fn request(&self, command: Command) {
        if self.pending.get() != Some(Command::Reset) {
            self.pending.set(Some(command));
        }
    }

    pub(crate) fn take(&self) -> Option<Command> {
        self.pending.take()
    }
}
