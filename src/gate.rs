// 🔐 Access Gate - Code entry, validation and the unlock sequence
//
// Lifecycle:
//   Entering ──submit──> Validating ──match──> Unlocking ──transition──> Granted
//                                    └─miss──> Error ──1.5s──> Entering
//
// All timed behavior runs through the gate's own Scheduler. Granted is
// terminal: nothing re-locks the gate, and the Granted event is raised once.

use crate::entry::{EntryAttempt, SLOT_COUNT};
use crate::feedback::{Feedback, ERROR_PATTERN, SUCCESS_CHIME, SUCCESS_PATTERN};
use crate::timer::{Scheduler, TimerId};
use crate::transition::{TransitionPhase, TransitionPlan, TransitionStep};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// The shared passphrase
pub const ACCESS_CODE: &str = "KFO";

/// How long the error indicator stays up after a wrong code
pub const ERROR_DISPLAY: Duration = Duration::from_millis(1500);

/// Delay between filling the last slot and validating, so the filled state renders
pub const AUTO_SUBMIT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Pause after the success pulse before the transition begins
pub const UNLOCK_DELAY: Duration = Duration::from_millis(500);

// ============================================================================
// STATE & EVENTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateState {
    Entering,
    Validating,
    Error,
    Unlocking,
    Granted,
}

impl GateState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateState::Entering => "entering",
            GateState::Validating => "validating",
            GateState::Error => "error",
            GateState::Unlocking => "unlocking",
            GateState::Granted => "granted",
        }
    }
}

/// Observable changes, in the order they happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateEvent {
    StateChanged(GateState),
    FocusMoved(usize),
    PhaseChanged(TransitionPhase),
    Granted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateTimer {
    AutoSubmit,
    ClearError,
    StartTransition,
    Transition(TransitionStep),
}

// ============================================================================
// ACCESS SEQUENCER
// ============================================================================

#[derive(Debug)]
pub struct AccessSequencer {
    attempt: EntryAttempt,
    state: GateState,
    focus: usize,
    phase: Option<TransitionPhase>,
    transition_started_at: Option<Duration>,
    reduced_motion: bool,
    timers: Scheduler<GateTimer>,
    auto_submit: Option<TimerId>,
    error_clear: Option<TimerId>,
    feedback: Feedback,
    events: Vec<GateEvent>,
    granted_emitted: bool,
    granted_unclaimed: bool,
    mounted: bool,
}

impl AccessSequencer {
    pub fn new(reduced_motion: bool) -> Self {
        AccessSequencer {
            attempt: EntryAttempt::new(),
            state: GateState::Entering,
            focus: 0,
            phase: None,
            transition_started_at: None,
            reduced_motion,
            timers: Scheduler::new(),
            auto_submit: None,
            error_clear: None,
            feedback: Feedback::none(),
            events: Vec::new(),
            granted_emitted: false,
            granted_unclaimed: false,
            mounted: true,
        }
    }

    pub fn with_feedback(mut self, feedback: Feedback) -> Self {
        self.feedback = feedback;
        self
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn attempt(&self) -> &EntryAttempt {
        &self.attempt
    }

    /// Slot that currently has input focus
    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn phase(&self) -> Option<TransitionPhase> {
        self.phase
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Input is frozen from the moment validation succeeds
    pub fn is_locked(&self) -> bool {
        matches!(self.state, GateState::Unlocking | GateState::Granted)
    }

    /// Simulated time since mount
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Time spent in the transition so far, `None` before it starts
    pub fn transition_elapsed(&self) -> Option<Duration> {
        self.transition_started_at
            .map(|started| self.timers.now().saturating_sub(started))
    }

    /// Take every event raised since the last call
    pub fn drain_events(&mut self) -> Vec<GateEvent> {
        std::mem::take(&mut self.events)
    }

    /// True exactly once, after the Granted event has been raised
    pub fn take_granted(&mut self) -> bool {
        std::mem::take(&mut self.granted_unclaimed)
    }

    // ========================================================================
    // INPUT
    // ========================================================================

    /// Apply a raw input value to slot `index`
    ///
    /// Only the last character counts. Non-letters leave the slot as it was;
    /// an empty value clears it. Filling slot 0 or 1 moves focus on, filling
    /// the last slot schedules a debounced submit.
    pub fn edit_slot(&mut self, index: usize, raw: &str) -> &EntryAttempt {
        if !self.accepts_input() || index >= SLOT_COUNT {
            return &self.attempt;
        }

        match raw.chars().last() {
            None => self.attempt.clear_slot(index),
            Some(c) => {
                if !self.attempt.set(index, c) {
                    return &self.attempt;
                }

                if index + 1 < SLOT_COUNT {
                    self.move_focus(index + 1);
                } else {
                    self.schedule_auto_submit();
                }
            }
        }

        &self.attempt
    }

    /// Fill slots from pasted text, submitting once all three are filled
    pub fn paste_sequence(&mut self, raw: &str) -> &EntryAttempt {
        if !self.accepts_input() {
            return &self.attempt;
        }

        let filled = self.attempt.fill_from(raw);
        debug!("pasted {} letter(s) into the gate", filled);
        if filled == 0 {
            return &self.attempt;
        }

        match self.attempt.first_empty() {
            Some(index) => self.move_focus(index),
            None => {
                self.move_focus(SLOT_COUNT - 1);
                self.schedule_auto_submit();
            }
        }

        &self.attempt
    }

    /// Backspace in an empty slot steps back to the previous one
    pub fn backspace(&mut self, index: usize) {
        if !self.accepts_input() || index >= SLOT_COUNT {
            return;
        }

        if index > 0 && self.attempt.is_slot_empty(index) {
            self.move_focus(index - 1);
        }
    }

    /// Move focus directly, e.g. by clicking or arrow keys
    pub fn focus_slot(&mut self, index: usize) {
        if self.accepts_input() && index < SLOT_COUNT {
            self.move_focus(index);
        }
    }

    // ========================================================================
    // VALIDATION
    // ========================================================================

    /// Validate the current attempt
    ///
    /// Ignored while locked or while any slot is empty.
    pub fn submit(&mut self) -> GateState {
        if !self.accepts_input() || !self.attempt.is_complete() {
            return self.state;
        }

        if let Some(id) = self.auto_submit.take() {
            self.timers.cancel(id);
        }
        if let Some(id) = self.error_clear.take() {
            self.timers.cancel(id);
        }

        self.set_state(GateState::Validating);

        let matched = self
            .attempt
            .code()
            .map(|code| code.eq_ignore_ascii_case(ACCESS_CODE))
            .unwrap_or(false);

        if matched {
            self.unlock();
        } else {
            self.reject();
        }

        self.state
    }

    fn unlock(&mut self) {
        info!("gate code accepted");
        self.set_state(GateState::Unlocking);
        self.feedback.vibrate(SUCCESS_PATTERN);
        self.feedback.chime(SUCCESS_CHIME);

        // Reduced motion goes straight into the fade
        if self.reduced_motion {
            self.start_transition();
        } else {
            self.timers.schedule(UNLOCK_DELAY, GateTimer::StartTransition);
        }
    }

    fn reject(&mut self) {
        info!("gate code rejected");
        self.set_state(GateState::Error);
        self.feedback.vibrate(ERROR_PATTERN);
        self.attempt.clear();
        self.move_focus(0);
        self.error_clear = Some(self.timers.schedule(ERROR_DISPLAY, GateTimer::ClearError));
    }

    // ========================================================================
    // TIME
    // ========================================================================

    /// Advance the simulated clock, firing every timer that comes due
    pub fn advance(&mut self, dt: Duration) {
        if !self.mounted {
            return;
        }

        let until = self.timers.now().saturating_add(dt);
        while let Some(timer) = self.timers.pop_due(until) {
            self.fire(timer);
        }
        self.timers.settle(until);
    }

    /// Tear the gate down, cancelling everything still pending
    pub fn unmount(&mut self) {
        let cancelled = self.timers.cancel_all();
        self.auto_submit = None;
        self.error_clear = None;
        self.mounted = false;
        debug!("gate unmounted, {} timer(s) cancelled", cancelled);
    }

    fn fire(&mut self, timer: GateTimer) {
        match timer {
            GateTimer::AutoSubmit => {
                self.auto_submit = None;
                self.submit();
            }
            GateTimer::ClearError => {
                self.error_clear = None;
                if self.state == GateState::Error {
                    self.set_state(GateState::Entering);
                }
            }
            GateTimer::StartTransition => self.start_transition(),
            GateTimer::Transition(step) => self.apply_step(step),
        }
    }

    fn start_transition(&mut self) {
        let plan = TransitionPlan::for_preference(self.reduced_motion);
        self.transition_started_at = Some(self.timers.now());
        debug!("transition started, {:?} total", plan.total_duration());

        for step in plan.steps() {
            if step.offset.is_zero() {
                self.apply_step(step.step);
            } else {
                self.timers.schedule(step.offset, GateTimer::Transition(step.step));
            }
        }
    }

    fn apply_step(&mut self, step: TransitionStep) {
        match step {
            TransitionStep::Enter(phase) => {
                self.phase = Some(phase);
                self.events.push(GateEvent::PhaseChanged(phase));
            }
            TransitionStep::Complete => self.grant(),
        }
    }

    fn grant(&mut self) {
        self.set_state(GateState::Granted);
        self.timers.cancel_all();

        if !self.granted_emitted {
            self.granted_emitted = true;
            self.granted_unclaimed = true;
            self.events.push(GateEvent::Granted);
            info!("access granted");
        }
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn accepts_input(&self) -> bool {
        self.mounted && matches!(self.state, GateState::Entering | GateState::Error)
    }

    fn schedule_auto_submit(&mut self) {
        if let Some(id) = self.auto_submit.take() {
            self.timers.cancel(id);
        }
        self.auto_submit = Some(self.timers.schedule(AUTO_SUBMIT_DEBOUNCE, GateTimer::AutoSubmit));
    }

    fn move_focus(&mut self, index: usize) {
        self.focus = index;
        self.events.push(GateEvent::FocusMoved(index));
    }

    fn set_state(&mut self, state: GateState) {
        if self.state != state {
            self.state = state;
            self.events.push(GateEvent::StateChanged(state));
        }
    }
}

impl Default for AccessSequencer {
    fn default() -> Self {
        Self::new(false)
    }
}

// ============================================================================
// TESTS
// ============================================================================
