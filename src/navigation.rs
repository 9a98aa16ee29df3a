//! Page position tracking with a transition lock.
//!
//! Page turns are animated; while an animation runs, further turn requests
//! are dropped so a rapid double tap can never skip or repeat a page. The
//! lock is a deadline rather than a timer, so the host drives it with
//! `tick` and tests can use synthetic instants.

use serde::Serialize;
use std::time::{Duration, Instant};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    Moved(usize),
    /// A transition is still running; the request was dropped.
    Locked,
    /// `go_next` on the last position: the caller decides what comes next.
    Exhausted,
    /// `go_prev` on the first position.
    AtStart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct NavigationState {
    pub current_index: usize,
    pub total: usize,
    pub transition_locked: bool,
}

#[derive(Debug, Clone)]
pub struct PagePositionController {
    current_index: usize,
    total: usize,
    transition_window: Duration,
    locked_until: Option<Instant>,
}

impl PagePositionController {
    /// A controller over `total` positions. Zero is treated as one so the
    /// index always stays in range.
    pub fn new(total: usize, transition_window: Duration) -> Self {
        Self {
            current_index: 0,
            total: total.max(1),
            transition_window,
            locked_until: None,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_first_page(&self) -> bool {
        self.current_index == 0
    }

    pub fn is_last_page(&self) -> bool {
        self.current_index == self.total - 1
    }

    pub fn is_locked(&self, now: Instant) -> bool {
        self.locked_until.is_some_and(|deadline| now < deadline)
    }

    pub fn state(&self, now: Instant) -> NavigationState {
        NavigationState {
            current_index: self.current_index,
            total: self.total,
            transition_locked: self.is_locked(now),
        }
    }

    pub fn go_next(&mut self, now: Instant) -> NavOutcome {
        if self.is_locked(now) {
            return NavOutcome::Locked;
        }
        if self.is_last_page() {
            return NavOutcome::Exhausted;
        }
        self.current_index += 1;
        self.lock(now);
        NavOutcome::Moved(self.current_index)
    }

    pub fn go_prev(&mut self, now: Instant) -> NavOutcome {
        if self.is_locked(now) {
            return NavOutcome::Locked;
        }
        if self.is_first_page() {
            return NavOutcome::AtStart;
        }
        self.current_index -= 1;
        self.lock(now);
        NavOutcome::Moved(self.current_index)
    }

    /// Release an expired lock. Returns true when the lock was released.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.locked_until {
            Some(deadline) if now >= deadline => {
                self.locked_until = None;
                true
            }
            _ => false,
        }
    }

    /// Drop any pending transition, e.g. on teardown.
    pub fn cancel_transition(&mut self) {
        self.locked_until = None;
    }

    /// Start over on a new list of `total` positions.
    pub fn reset(&mut self, total: usize) {
        self.total = total.max(1);
        self.current_index = 0;
        self.locked_until = None;
    }

    /// Jump without animation, clamped into range.
    pub fn jump_to(&mut self, index: usize) {
        self.current_index = index.min(self.total - 1);
        self.locked_until = None;
    }

    fn lock(&mut self, now: Instant) {
        if !self.transition_window.is_zero() {
            self.locked_until = Some(now + self.transition_window);
        }
    }
}
