//! Open/close state machine for the feedback panel.
//!
//! DESIGN
//! ======
//! The panel is `Closed -> Opening -> Open -> Closing -> Closed`. "Rendered"
//! (mounted) and "visible" (transitioned in) are separate so CSS transitions
//! have a frame to run from:
//!
//! - `open()` mounts now and flips visible on the next frame.
//! - `close()` flips visible off now and unmounts after the duration.
//!
//! Timing is delegated to a [`Scheduler`]. The controller only remembers the
//! one task it is waiting on; any `open()`/`close()` cancels that task before
//! scheduling a new one, so a late completion can never land on a newer
//! state. Hosts feed fired tasks back through [`VisibilityController::complete`],
//! and stale ids are ignored.
//!
//! With animation off (or a zero duration) both transitions are synchronous.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::trace;

use crate::animation::AnimationState;
use crate::types::Callbacks;

pub type TaskId = u64;

/// One display frame at 60 Hz; what "next paint" means off the browser.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    NextFrame,
    After(Duration),
}

/// Cancelable deferred work. Implementations report fired tasks back to the
/// owner out of band (see [`ManualScheduler`], [`TokioScheduler`]).
pub trait Scheduler {
    fn schedule(&mut self, when: Schedule) -> TaskId;
    fn cancel(&mut self, task: TaskId);
}

// =============================================================================
// MANUAL SCHEDULER
// =============================================================================

/// Deterministic scheduler: frames and time only advance when told to.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: TaskId,
    now: Duration,
    frames: Vec<TaskId>,
    timers: Vec<(TaskId, Duration)>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.frames.len() + self.timers.len()
    }

    /// Fire every task waiting for the next frame.
    pub fn run_frame(&mut self) -> Vec<TaskId> {
        std::mem::take(&mut self.frames)
    }

    /// Move the clock forward and fire timers whose deadline has passed.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<TaskId> {
        self.now += elapsed;
        let now = self.now;
        let (due, waiting): (Vec<_>, Vec<_>) = self.timers.drain(..).partition(|(_, at)| *at <= now);
        self.timers = waiting;
        due.into_iter().map(|(id, _)| id).collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, when: Schedule) -> TaskId {
        self.next_id += 1;
        let id = self.next_id;
        match when {
            Schedule::NextFrame => self.frames.push(id),
            Schedule::After(delay) => self.timers.push((id, self.now + delay)),
        }
        id
    }

    fn cancel(&mut self, task: TaskId) {
        self.frames.retain(|id| *id != task);
        self.timers.retain(|(id, _)| *id != task);
    }
}

// =============================================================================
// TOKIO SCHEDULER
// =============================================================================

/// Runs deferred work on a tokio runtime and reports fired ids on a channel.
#[derive(Debug)]
pub struct TokioScheduler {
    handle: tokio::runtime::Handle,
    fired: mpsc::UnboundedSender<TaskId>,
    next_id: TaskId,
    running: HashMap<TaskId, AbortHandle>,
}

impl TokioScheduler {
    /// Returns the scheduler and the receiver its fired ids arrive on.
    #[must_use]
    pub fn new(handle: tokio::runtime::Handle) -> (Self, mpsc::UnboundedReceiver<TaskId>) {
        let (fired, rx) = mpsc::unbounded_channel();
        (Self { handle, fired, next_id: 0, running: HashMap::new() }, rx)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, when: Schedule) -> TaskId {
        self.next_id += 1;
        let id = self.next_id;
        let delay = match when {
            Schedule::NextFrame => FRAME_INTERVAL,
            Schedule::After(delay) => delay,
        };
        let fired = self.fired.clone();
        let task = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = fired.send(id);
        });
        self.running.retain(|_, handle| !handle.is_finished());
        self.running.insert(id, task.abort_handle());
        id
    }

    fn cancel(&mut self, task: TaskId) {
        if let Some(handle) = self.running.remove(&task) {
            handle.abort();
        }
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityPhase {
    Closed,
    Opening,
    Open,
    Closing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityTiming {
    pub animate: bool,
    pub duration: Duration,
}

impl VisibilityTiming {
    pub const INSTANT: Self = Self { animate: false, duration: Duration::ZERO };

    #[must_use]
    pub fn from_state(state: &AnimationState) -> Self {
        Self { animate: state.should_animate, duration: Duration::from_millis(state.duration_ms) }
    }

    fn is_instant(self) -> bool {
        !self.animate || self.duration.is_zero()
    }
}

pub struct VisibilityController<S: Scheduler> {
    scheduler: S,
    timing: VisibilityTiming,
    callbacks: Callbacks,
    phase: VisibilityPhase,
    pending: Option<TaskId>,
}

impl<S: Scheduler> std::fmt::Debug for VisibilityController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityController")
            .field("timing", &self.timing)
            .field("phase", &self.phase)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl<S: Scheduler> VisibilityController<S> {
    pub fn new(scheduler: S, timing: VisibilityTiming, callbacks: Callbacks) -> Self {
        Self { scheduler, timing, callbacks, phase: VisibilityPhase::Closed, pending: None }
    }

    #[must_use]
    pub fn phase(&self) -> VisibilityPhase {
        self.phase
    }

    #[must_use]
    pub fn is_rendered(&self) -> bool {
        self.phase != VisibilityPhase::Closed
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.phase == VisibilityPhase::Open
    }

    #[must_use]
    pub fn pending_task(&self) -> Option<TaskId> {
        self.pending
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Applies to the next transition; an in-flight one keeps its schedule.
    pub fn set_timing(&mut self, timing: VisibilityTiming) {
        self.timing = timing;
    }

    pub fn set_callbacks(&mut self, callbacks: Callbacks) {
        self.callbacks = callbacks;
    }

    pub fn open(&mut self) {
        self.cancel_pending();
        if self.timing.is_instant() {
            self.phase = VisibilityPhase::Open;
        } else {
            // Stay visible if already open; only the mount is guaranteed now.
            if self.phase != VisibilityPhase::Open {
                self.phase = VisibilityPhase::Opening;
            }
            self.pending = Some(self.scheduler.schedule(Schedule::NextFrame));
        }
        trace!(phase = ?self.phase, "panel open requested");
        self.callbacks.emit_open();
    }

    pub fn close(&mut self) {
        self.cancel_pending();
        if self.timing.is_instant() {
            self.phase = VisibilityPhase::Closed;
        } else if self.phase != VisibilityPhase::Closed {
            self.phase = VisibilityPhase::Closing;
            self.pending = Some(self.scheduler.schedule(Schedule::After(self.timing.duration)));
        }
        trace!(phase = ?self.phase, "panel close requested");
        self.callbacks.emit_close();
    }

    pub fn toggle(&mut self) {
        if self.is_visible() || self.phase == VisibilityPhase::Opening {
            self.close();
        } else {
            self.open();
        }
    }

    /// Apply a fired task. Returns `false` for ids that are no longer pending.
    pub fn complete(&mut self, task: TaskId) -> bool {
        if self.pending != Some(task) {
            return false;
        }
        self.pending = None;
        self.phase = match self.phase {
            VisibilityPhase::Opening | VisibilityPhase::Open => VisibilityPhase::Open,
            VisibilityPhase::Closing | VisibilityPhase::Closed => VisibilityPhase::Closed,
        };
        true
    }

    /// Escape closes the panel while it is mounted. Returns whether the key
    /// was handled.
    pub fn handle_key(&mut self, key: &str) -> bool {
        if key == "Escape" && self.is_rendered() {
            self.close();
            return true;
        }
        false
    }

    /// Cancel outstanding work; later completions are ignored.
    pub fn dispose(&mut self) {
        self.cancel_pending();
    }

    fn cancel_pending(&mut self) {
        if let Some(task) = self.pending.take() {
            self.scheduler.cancel(task);
        }
    }
}

impl<S: Scheduler> Drop for VisibilityController<S> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
#[path = "visibility_test.rs"]
mod tests;
