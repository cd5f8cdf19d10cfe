//! Delta-Encoded Event Scheduler.
//!
//! This module implements the cycle-driven event queue that times the COP0 compare
//! interrupt and bounded runs. It provides:
//! 1. **Ordering:** Events are kept sorted by absolute due time.
//! 2. **Delta Encoding:** Each entry stores its distance from the previous entry, so
//!    advancing time only touches the head.
//! 3. **Dispatch:** Due events are removed before their handler runs, so handlers may
//!    freely schedule new events (including re-adding their own type).
//!
//! Invariant: summing `delta` from the head up to and including an entry yields that
//! entry's remaining countdown, and at most one event of each type is queued.

use std::collections::VecDeque;
use std::fmt;

use crate::common::error::EventError;

/// Identifies a scheduled event. At most one event per type may be queued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Count reaches Compare; raises the timer interrupt.
    Compare,
    /// Forced exit from the run loop after a cycle budget.
    RunForCycles,
    /// Caller-defined event.
    Custom(u32),
}

impl EventType {
    /// Short name used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Compare => "compare",
            Self::RunForCycles => "run-for-cycles",
            Self::Custom(_) => "custom",
        }
    }
}

/// Callback invoked when an event becomes due.
pub type EventHandler<C> = fn(&mut C);

struct Event<C> {
    kind: EventType,
    delta: i64,
    handler: EventHandler<C>,
}

/// Delta-encoded queue of pending events for a context type `C`.
pub struct EventQueue<C> {
    events: VecDeque<Event<C>>,
}

impl<C> EventQueue<C> {
    /// Creates an empty queue.
    pub const fn new() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }

    /// Schedules `handler` to run after `countdown` cycles.
    ///
    /// # Arguments
    ///
    /// * `kind` - Event type; must not already be queued.
    /// * `countdown` - Cycles from now; must be strictly positive.
    /// * `handler` - Callback run once the countdown expires.
    ///
    /// # Returns
    ///
    /// `EventError::Duplicate` or `EventError::NonPositiveCountdown` on misuse; the
    /// queue is left unchanged in both cases.
    pub fn add_event(
        &mut self,
        kind: EventType,
        countdown: i64,
        handler: EventHandler<C>,
    ) -> Result<(), EventError> {
        if countdown <= 0 {
            return Err(EventError::NonPositiveCountdown(countdown));
        }
        if self.events.iter().any(|e| e.kind == kind) {
            return Err(EventError::Duplicate(kind.name()));
        }

        let mut remaining = countdown;
        let mut pos = self.events.len();
        for (i, e) in self.events.iter_mut().enumerate() {
            if remaining <= e.delta {
                e.delta -= remaining;
                pos = i;
                break;
            }
            remaining -= e.delta;
        }
        self.events.insert(
            pos,
            Event {
                kind,
                delta: remaining,
                handler,
            },
        );
        Ok(())
    }

    /// Removes the event of type `kind`, folding its delta into its successor.
    ///
    /// # Returns
    ///
    /// The absolute countdown the event had left, or `None` if it was not queued.
    pub fn remove_events_of_type(&mut self, kind: EventType) -> Option<i64> {
        let idx = self.events.iter().position(|e| e.kind == kind)?;
        let absolute: i64 = self.events.iter().take(idx + 1).map(|e| e.delta).sum();
        let removed = self.events.remove(idx)?;
        if let Some(next) = self.events.get_mut(idx) {
            next.delta += removed.delta;
        }
        Some(absolute)
    }

    /// Returns the absolute countdown of the event of type `kind`.
    pub fn cycles_until_event(&self, kind: EventType) -> Option<i64> {
        let mut total = 0;
        for e in &self.events {
            total += e.delta;
            if e.kind == kind {
                return Some(total);
            }
        }
        None
    }

    /// Returns the countdown of the head event, if any.
    #[inline]
    pub fn cycles_until_next(&self) -> Option<i64> {
        self.events.front().map(|e| e.delta)
    }

    /// Fast-forwards the head event down to `min_remaining` cycles.
    ///
    /// # Returns
    ///
    /// The number of cycles skipped; zero if the queue is empty or the head is already
    /// within `min_remaining`.
    pub fn skip_to_next_event(&mut self, min_remaining: i64) -> i64 {
        match self.events.front_mut() {
            Some(head) if head.delta > min_remaining => {
                let skipped = head.delta - min_remaining;
                head.delta = min_remaining;
                skipped
            }
            _ => 0,
        }
    }

    /// Subtracts `cycles` from the head countdown without dispatching anything.
    #[inline]
    pub fn advance(&mut self, cycles: i64) {
        if let Some(head) = self.events.front_mut() {
            head.delta -= cycles;
        }
    }

    /// Removes the head if it is due and returns its handler.
    ///
    /// Any overshoot (a negative countdown) carries into the next entry so later
    /// events keep their absolute due time.
    pub fn pop_due(&mut self) -> Option<EventHandler<C>> {
        if self.events.front()?.delta > 0 {
            return None;
        }
        let due = self.events.pop_front()?;
        if let Some(next) = self.events.front_mut() {
            next.delta += due.delta;
        }
        Some(due.handler)
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drops every queued event.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<C> Default for EventQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for EventQueue<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.events.iter().map(|e| (e.kind, e.delta)))
            .finish()
    }
}

/// A context that owns an event queue for itself.
pub trait Scheduled: Sized {
    /// Returns the queue whose handlers receive `self`.
    fn event_queue(&mut self) -> &mut EventQueue<Self>;
}

/// Advances time by `cycles` and runs every handler that became due, in order.
///
/// Handlers run with the queue already updated, so they may schedule new events.
pub fn increment_count<C: Scheduled>(ctx: &mut C, cycles: i64) {
    ctx.event_queue().advance(cycles);
    while let Some(handler) = ctx.event_queue().pop_due() {
        handler(ctx);
    }
}
