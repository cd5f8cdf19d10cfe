//! Event Queue Tests.
//!
//! Verifies the delta-encoded scheduler:
//! - Insertion order and delta bookkeeping
//! - Removal folding into the successor
//! - Dispatch order, overshoot carry, and re-entrant scheduling
//! - Idle-loop fast-forward

use proptest::prelude::*;
use vrsim_core::common::EventError;
use vrsim_core::core::units::events::{EventQueue, EventType, Scheduled, increment_count};

// ══════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════

const A: EventType = EventType::Custom(0);
const B: EventType = EventType::Custom(1);
const C: EventType = EventType::Custom(2);

/// Context recording which handlers ran, in order.
#[derive(Default)]
struct Log {
    queue: EventQueue<Self>,
    fired: Vec<&'static str>,
}

impl Scheduled for Log {
    fn event_queue(&mut self) -> &mut EventQueue<Self> {
        &mut self.queue
    }
}

fn on_a(log: &mut Log) {
    log.fired.push("a");
}

fn on_b(log: &mut Log) {
    log.fired.push("b");
}

fn on_c(log: &mut Log) {
    log.fired.push("c");
}

/// Re-arms itself every 10 cycles.
fn periodic(log: &mut Log) {
    log.fired.push("tick");
    log.queue.add_event(A, 10, periodic).unwrap();
}

// ══════════════════════════════════════════════════════════
// 1. Insertion
// ══════════════════════════════════════════════════════════

#[test]
fn insertion_keeps_absolute_countdowns() {
    let mut q: EventQueue<Log> = EventQueue::new();
    q.add_event(A, 100, on_a).unwrap();
    q.add_event(B, 50, on_b).unwrap();
    q.add_event(C, 75, on_c).unwrap();

    assert_eq!(q.cycles_until_next(), Some(50));
    assert_eq!(q.cycles_until_event(B), Some(50));
    assert_eq!(q.cycles_until_event(C), Some(75));
    assert_eq!(q.cycles_until_event(A), Some(100));
    assert_eq!(q.len(), 3);
}

#[test]
fn equal_countdowns_both_fire_on_the_same_cycle() {
    let mut log = Log::default();
    log.queue.add_event(A, 20, on_a).unwrap();
    log.queue.add_event(B, 20, on_b).unwrap();
    increment_count(&mut log, 19);
    assert!(log.fired.is_empty());
    increment_count(&mut log, 1);
    assert_eq!(log.fired.len(), 2);
    assert!(log.queue.is_empty());
}

#[test]
fn duplicate_type_is_rejected() {
    let mut q: EventQueue<Log> = EventQueue::new();
    q.add_event(A, 10, on_a).unwrap();
    assert_eq!(q.add_event(A, 5, on_a), Err(EventError::Duplicate("custom")));
    assert_eq!(q.len(), 1);
    assert_eq!(q.cycles_until_event(A), Some(10));
}

#[test]
fn non_positive_countdown_is_rejected() {
    let mut q: EventQueue<Log> = EventQueue::new();
    assert_eq!(q.add_event(A, 0, on_a), Err(EventError::NonPositiveCountdown(0)));
    assert_eq!(q.add_event(A, -3, on_a), Err(EventError::NonPositiveCountdown(-3)));
    assert!(q.is_empty());
}

// ══════════════════════════════════════════════════════════
// 2. Removal
// ══════════════════════════════════════════════════════════

#[test]
fn removal_folds_delta_into_successor() {
    let mut q: EventQueue<Log> = EventQueue::new();
    q.add_event(A, 100, on_a).unwrap();
    q.add_event(B, 50, on_b).unwrap();

    assert_eq!(q.remove_events_of_type(B), Some(50));
    assert_eq!(q.cycles_until_event(A), Some(100));
    assert_eq!(q.cycles_until_next(), Some(100));
}

#[test]
fn removing_absent_type_returns_none() {
    let mut q: EventQueue<Log> = EventQueue::new();
    q.add_event(A, 10, on_a).unwrap();
    assert_eq!(q.remove_events_of_type(B), None);
    assert_eq!(q.cycles_until_event(B), None);
    assert_eq!(q.len(), 1);
}

// ══════════════════════════════════════════════════════════
// 3. Dispatch
// ══════════════════════════════════════════════════════════

#[test]
fn dispatch_runs_due_events_in_time_order() {
    let mut log = Log::default();
    log.queue.add_event(A, 100, on_a).unwrap();
    log.queue.add_event(B, 50, on_b).unwrap();
    log.queue.add_event(C, 75, on_c).unwrap();

    increment_count(&mut log, 60);
    assert_eq!(log.fired, ["b"]);
    assert_eq!(log.queue.cycles_until_event(C), Some(15));

    increment_count(&mut log, 40);
    assert_eq!(log.fired, ["b", "c", "a"]);
    assert!(log.queue.is_empty());
}

#[test]
fn overshoot_carries_into_the_next_event() {
    let mut log = Log::default();
    log.queue.add_event(A, 10, on_a).unwrap();
    log.queue.add_event(B, 30, on_b).unwrap();

    increment_count(&mut log, 15);
    assert_eq!(log.fired, ["a"]);
    assert_eq!(log.queue.cycles_until_event(B), Some(15));
}

#[test]
fn handler_may_reschedule_itself() {
    let mut log = Log::default();
    log.queue.add_event(A, 10, periodic).unwrap();
    for _ in 0..3 {
        increment_count(&mut log, 10);
    }
    assert_eq!(log.fired, ["tick", "tick", "tick"]);
    assert_eq!(log.queue.cycles_until_event(A), Some(10));
}

// ══════════════════════════════════════════════════════════
// 4. Fast-forward
// ══════════════════════════════════════════════════════════

#[test]
fn skip_stops_short_of_the_head() {
    let mut q: EventQueue<Log> = EventQueue::new();
    q.add_event(A, 100, on_a).unwrap();
    q.add_event(B, 150, on_b).unwrap();

    assert_eq!(q.skip_to_next_event(1), 99);
    assert_eq!(q.cycles_until_next(), Some(1));
    assert_eq!(q.cycles_until_event(B), Some(51));
    assert_eq!(q.skip_to_next_event(1), 0);
}

#[test]
fn skip_on_empty_queue_is_zero() {
    let mut q: EventQueue<Log> = EventQueue::new();
    assert_eq!(q.skip_to_next_event(1), 0);
}

// ══════════════════════════════════════════════════════════
// 5. Properties
// ══════════════════════════════════════════════════════════

proptest! {
    /// Any insertion order yields the same absolute countdowns.
    #[test]
    fn countdowns_survive_any_insertion_order(
        counts in proptest::collection::vec(1i64..10_000, 1..8),
        advance in 0i64..5_000,
    ) {
        let mut q: EventQueue<Log> = EventQueue::new();
        for (i, &c) in counts.iter().enumerate() {
            q.add_event(EventType::Custom(i as u32), c, on_a).unwrap();
        }
        let min = counts.iter().copied().min().unwrap_or(1);
        let step = advance.min(min - 1);
        q.advance(step);
        for (i, &c) in counts.iter().enumerate() {
            prop_assert_eq!(q.cycles_until_event(EventType::Custom(i as u32)), Some(c - step));
        }
    }

    /// Events fire exactly once each.
    #[test]
    fn every_event_fires_once(counts in proptest::collection::vec(1i64..1_000, 1..8)) {
        let mut log = Log::default();
        for (i, &c) in counts.iter().enumerate() {
            log.queue.add_event(EventType::Custom(i as u32), c, on_a).unwrap();
        }
        increment_count(&mut log, 1_000);
        prop_assert_eq!(log.fired.len(), counts.len());
        prop_assert!(log.queue.is_empty());
    }
}
