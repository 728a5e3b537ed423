use super::event::Event;
use super::types::{EntityId, Ticks};
use log::trace;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug)]
pub struct ScheduledEvent {
    pub time: Ticks,
    pub sequence_num: u64,
    pub event: Event,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.sequence_num == other.sequence_num
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.sequence_num.cmp(&self.sequence_num))
    }
}

/// Time-ordered event queue.
///
/// Events fire in nondecreasing time order; events due at the same tick fire
/// in the order they were scheduled. A zero delay never runs synchronously:
/// the event is queued behind everything already due at the current tick.
pub struct EventScheduler {
    event_queue: BinaryHeap<ScheduledEvent>,
    sequence_counter: u64,
    current_time: Ticks,
    model_precision: u64,
}

impl EventScheduler {
    /// Create a new EventScheduler with the given ticks-per-second precision
    pub fn new(model_precision: u64) -> Self {
        Self {
            event_queue: BinaryHeap::new(),
            sequence_counter: 0,
            current_time: 0,
            model_precision,
        }
    }

    /// Ticks per simulated second
    pub fn model_precision(&self) -> u64 {
        self.model_precision
    }

    /// Convert a duration in seconds to ticks
    pub fn apply_model_precision(&self, seconds: u64) -> Ticks {
        seconds.saturating_mul(self.model_precision)
    }

    pub fn current_time(&self) -> Ticks {
        self.current_time
    }

    /// Schedule an event to fire `delay` ticks from now on `lane`
    pub fn schedule_after(&mut self, lane: u32, delay: Ticks, mut event: Event) {
        event.lane = lane;
        let time = self.current_time.saturating_add(delay);
        trace!(
            "scheduling {} for {} at tick {} (seq {})",
            event.kind.label(),
            event.entity,
            time,
            self.sequence_counter
        );

        self.event_queue.push(ScheduledEvent {
            time,
            sequence_num: self.sequence_counter,
            event,
        });
        self.sequence_counter += 1;
    }

    /// Pop the next event if it is due at or before `limit`, advancing the
    /// clock to its time
    pub fn pop_due(&mut self, limit: Ticks) -> Option<ScheduledEvent> {
        if self.peek_next_time()? > limit {
            return None;
        }
        let scheduled = self.event_queue.pop()?;
        self.current_time = scheduled.time;
        Some(scheduled)
    }

    /// Move the clock forward without firing anything. Never moves it back.
    pub fn advance_to(&mut self, time: Ticks) {
        self.current_time = self.current_time.max(time);
    }

    /// Check if there are any events remaining in the queue
    pub fn has_events(&self) -> bool {
        !self.event_queue.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.event_queue.len()
    }

    /// Get the next event time without removing events
    pub fn peek_next_time(&self) -> Option<Ticks> {
        self.event_queue.peek().map(|event| event.time)
    }

    /// Pending events handled by `entity`, in no particular order
    pub fn pending_for(&self, entity: EntityId) -> impl Iterator<Item = &ScheduledEvent> + '_ {
        self.event_queue
            .iter()
            .filter(move |scheduled| scheduled.event.entity == entity)
    }

    /// Pending events on `lane`, in no particular order
    pub fn pending_on_lane(&self, lane: u32) -> impl Iterator<Item = &ScheduledEvent> + '_ {
        self.event_queue
            .iter()
            .filter(move |scheduled| scheduled.event.lane == lane)
    }
}
