//! # sirsim-engine::queue
//!
//! The generic, single-threaded, time-ordered event scheduler. `Queued`
//! wraps a payload with its scheduled firing time and an insertion sequence
//! number for deterministic tie-breaking, making it suitable for the
//! `BinaryHeap` used as a priority queue. The queue carries a monotone
//! clock: popped events never move time backwards, and scheduling behind
//! the clock is a contract violation.

use sirsim_types::time::{Day, DAY_ZERO};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A payload wrapped with scheduling information.
/// This is the type stored in the scheduler's priority queue.
#[derive(Debug)]
pub struct Queued<E> {
    /// Scheduled firing time.
    pub time: Day,
    /// A monotonic sequence number to ensure stable FIFO ordering for
    /// events scheduled at the exact same time.
    pub seq: u64,
    pub payload: E,
}

// The following implementations are crucial for the `BinaryHeap` to
// function as a min-heap and to maintain deterministic ordering. `seq` is
// unique per queue, so equality on (time, seq) is consistent with `cmp`.

impl<E> PartialEq for Queued<E> {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}

impl<E> Eq for Queued<E> {}

impl<E> PartialOrd for Queued<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Queued<E> {
    /// Compares events for the priority queue.
    /// `BinaryHeap` is a max-heap, so the ordering is reversed to make it a
    /// min-heap. The primary sort key is `time` (earlier is greater); the
    /// secondary key is `seq`, which makes equal-time events FIFO.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A min-priority queue of `(time, payload)` pairs with a monotone clock.
///
/// The payload is opaque to the queue; the driver owns dispatch. Events may
/// insert further events while one is being fired, but nothing can observe
/// or remove entries other than the driver popping the earliest one.
#[derive(Debug)]
pub struct EventQueue<E> {
    heap: BinaryHeap<Queued<E>>,
    /// Next insertion sequence number.
    seq: u64,
    /// Time of the most recently popped event.
    clock: Day,
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            seq: 0,
            clock: DAY_ZERO,
        }
    }

    /// Inserts a payload to fire at `when`.
    ///
    /// Scheduling before the current clock is a programmer error, not a
    /// runtime-recoverable condition; it is caught in debug builds.
    pub fn schedule(&mut self, when: Day, payload: E) {
        debug_assert!(
            when >= self.clock,
            "event scheduled in the past: t={when} < clock={}",
            self.clock
        );
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Queued {
            time: when,
            seq,
            payload,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// The earliest scheduled event, if any.
    pub fn peek(&self) -> Option<&Queued<E>> {
        self.heap.peek()
    }

    /// Firing time of the earliest scheduled event, if any.
    pub fn peek_time(&self) -> Option<Day> {
        self.heap.peek().map(|q| q.time)
    }

    /// Removes and returns the earliest event, advancing the clock to its
    /// firing time. The clock never decreases across successive pops.
    pub fn pop(&mut self) -> Option<Queued<E>> {
        let queued = self.heap.pop()?;
        debug_assert!(queued.time >= self.clock, "time went backwards");
        self.clock = queued.time;
        Some(queued)
    }

    /// The current simulation time: the firing time of the last popped
    /// event.
    pub fn now(&self) -> Day {
        self.clock
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_time_order() {
        let mut queue = EventQueue::new();
        assert!(queue.is_empty());
        queue.schedule(3.0, "c");
        queue.schedule(1.0, "a");
        queue.schedule(2.0, "b");
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.peek().map(|q| q.payload), Some("a"));
        assert_eq!(queue.peek_time(), Some(1.0));

        let mut order = Vec::new();
        while let Some(q) = queue.pop() {
            order.push(q.payload);
        }
        assert_eq!(order, vec!["a", "b", "c"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn equal_times_are_fifo() {
        let mut queue = EventQueue::new();
        queue.schedule(1.0, "first");
        queue.schedule(1.0, "second");
        queue.schedule(0.5, "zeroth");
        queue.schedule(1.0, "third");

        let order: Vec<_> = std::iter::from_fn(|| queue.pop().map(|q| q.payload)).collect();
        assert_eq!(order, vec!["zeroth", "first", "second", "third"]);
    }

    #[test]
    fn clock_is_monotone_across_pops() {
        let mut queue = EventQueue::new();
        for when in [5.0, 0.25, 2.5, 2.5, 4.0] {
            queue.schedule(when, ());
        }
        let mut last = DAY_ZERO;
        while let Some(q) = queue.pop() {
            assert!(q.time >= last);
            assert_eq!(queue.now(), q.time);
            last = q.time;
        }
    }

    #[test]
    fn events_may_enqueue_successors_while_draining() {
        // A fired event schedules a follow-up; the drain loop sees it.
        let mut queue = EventQueue::new();
        queue.schedule(0.0, 0u32);

        let mut fired = Vec::new();
        while let Some(q) = queue.pop() {
            fired.push(q.payload);
            if q.payload < 3 {
                queue.schedule(q.time + 1.0, q.payload + 1);
            }
        }
        assert_eq!(fired, vec![0, 1, 2, 3]);
    }

    #[test]
    #[should_panic(expected = "scheduled in the past")]
    #[cfg(debug_assertions)]
    fn scheduling_behind_the_clock_panics_in_debug() {
        let mut queue = EventQueue::new();
        queue.schedule(2.0, ());
        queue.pop();
        queue.schedule(1.0, ());
    }
}
