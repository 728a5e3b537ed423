// Tests for EventScheduler ordering and clock handling
#[cfg(test)]
mod tests {
    use crate::core::event::{Event, EventKind};
    use crate::core::event_scheduler::EventScheduler;
    use crate::core::types::{EntityId, MODEL_LANE};

    fn event(index: u32) -> Event {
        Event::new(EntityId::new(index, 0), EventKind::QueueCheck)
    }

    fn drain(scheduler: &mut EventScheduler) -> Vec<(u64, u32)> {
        let mut fired = Vec::new();
        while let Some(scheduled) = scheduler.pop_due(u64::MAX) {
            fired.push((scheduled.time, scheduled.event.entity.index()));
        }
        fired
    }

    #[test]
    fn test_events_fire_in_time_order() {
        let mut scheduler = EventScheduler::new(1);
        scheduler.schedule_after(MODEL_LANE, 10, event(0));
        scheduler.schedule_after(MODEL_LANE, 3, event(1));
        scheduler.schedule_after(MODEL_LANE, 7, event(2));

        assert_eq!(drain(&mut scheduler), vec![(3, 1), (7, 2), (10, 0)]);
        assert_eq!(scheduler.current_time(), 10);
    }

    #[test]
    fn test_same_tick_events_fire_in_submission_order() {
        let mut scheduler = EventScheduler::new(1);
        for index in 0..5 {
            scheduler.schedule_after(MODEL_LANE, 4, event(index));
        }

        let order: Vec<u32> = drain(&mut scheduler).into_iter().map(|(_, i)| i).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_zero_delay_runs_after_already_due_events() {
        let mut scheduler = EventScheduler::new(1);
        scheduler.schedule_after(MODEL_LANE, 5, event(0));
        scheduler.schedule_after(MODEL_LANE, 5, event(1));

        let first = scheduler.pop_due(u64::MAX).unwrap();
        assert_eq!(first.event.entity.index(), 0);

        // Scheduled while handling tick 5: queued behind event 1
        scheduler.schedule_after(MODEL_LANE, 0, event(2));
        assert_eq!(drain(&mut scheduler), vec![(5, 1), (5, 2)]);
    }

    #[test]
    fn test_pop_due_respects_limit() {
        let mut scheduler = EventScheduler::new(1);
        scheduler.schedule_after(MODEL_LANE, 10, event(0));

        assert!(scheduler.pop_due(9).is_none());
        assert_eq!(scheduler.current_time(), 0);
        assert!(scheduler.pop_due(10).is_some());
        assert_eq!(scheduler.current_time(), 10);
    }

    #[test]
    fn test_delays_are_relative_to_current_time() {
        let mut scheduler = EventScheduler::new(1);
        scheduler.advance_to(100);
        scheduler.schedule_after(MODEL_LANE, 5, event(0));
        assert_eq!(scheduler.peek_next_time(), Some(105));

        scheduler.advance_to(50);
        assert_eq!(scheduler.current_time(), 100, "clock never moves back");
    }

    #[test]
    fn test_model_precision_conversion() {
        let scheduler = EventScheduler::new(1000);
        assert_eq!(scheduler.model_precision(), 1000);
        assert_eq!(scheduler.apply_model_precision(7), 7000);
        assert_eq!(scheduler.apply_model_precision(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_pending_queries() {
        let mut scheduler = EventScheduler::new(1);
        scheduler.schedule_after(MODEL_LANE, 1, event(0));
        scheduler.schedule_after(MODEL_LANE, 2, event(0));
        scheduler.schedule_after(1, 2, event(1));

        assert_eq!(scheduler.pending_count(), 3);
        assert_eq!(scheduler.pending_for(EntityId::new(0, 0)).count(), 2);
        assert_eq!(scheduler.pending_on_lane(1).count(), 1);
        assert_eq!(scheduler.pending_on_lane(MODEL_LANE).count(), 2);
        assert!(scheduler.has_events());
    }
}
