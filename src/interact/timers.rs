//! Deferred-work primitives for bursty input.
//!
//! [`Debouncer`] is trailing-edge: every submission replaces the pending
//! value and restarts the delay, so a burst settles into exactly one firing
//! carrying the last value. [`Throttler`] is leading-edge: the first event
//! passes and the gate then stays closed for the interval.
//!
//! Neither owns a clock. Callers pass `Instant`s in, which keeps the types
//! deterministic under test and lets the TUI runtime drive them from its
//! own deadline wheel.

use std::time::{Duration, Instant};

struct Pending<T> {
    value: T,
    deadline: Instant,
    generation: u64,
}

/// Trailing-edge debouncer over values of type `T`.
///
/// Submissions are stamped with a monotonically increasing generation so a
/// runtime that schedules wake-ups as messages can tell a stale wake-up
/// (superseded by a later submission) from the live one.
pub struct Debouncer<T> {
    delay: Duration,
    generation: u64,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending value with `value` and restart the delay from
    /// `now`. Returns the generation stamped on this submission.
    pub fn submit(&mut self, value: T, now: Instant) -> u64 {
        self.generation += 1;
        self.pending = Some(Pending {
            value,
            deadline: now + self.delay,
            generation: self.generation,
        });
        self.generation
    }

    /// Fire the pending value if its delay has elapsed by `now`.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.pending.as_ref()?.deadline > now {
            return None;
        }
        self.pending.take().map(|pending| pending.value)
    }

    /// Fire the pending value only if `generation` is still the latest
    /// submission. A stale generation consumes nothing.
    pub fn take_if_current(&mut self, generation: u64) -> Option<T> {
        if self.pending.as_ref()?.generation != generation {
            return None;
        }
        self.pending.take().map(|pending| pending.value)
    }

    /// Fire the pending value immediately, delay notwithstanding.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|pending| pending.value)
    }

    /// Discard the pending value without firing.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline of the pending value, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    /// Generation of the most recent submission.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// Leading-edge rate gate.
pub struct Throttler {
    interval: Duration,
    last_pass: Option<Instant>,
}

impl Throttler {
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_pass: None,
        }
    }

    /// Whether an event at `now` passes the gate. A passing event closes
    /// the gate for the interval.
    pub fn allow(&mut self, now: Instant) -> bool {
        let open = self
            .last_pass
            .is_none_or(|last| now.duration_since(last) >= self.interval);
        if open {
            self.last_pass = Some(now);
        }
        open
    }

    /// Reopen the gate regardless of elapsed time.
    pub fn reset(&mut self) {
        self.last_pass = None;
    }
}
