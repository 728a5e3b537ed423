use super::behavior::Behavior;
use super::context::SimContext;
use crate::core::errors::ModelResult;
use crate::core::types::EntityId;
use log::debug;
use serde::Serialize;

/// Terminal consumer: counts and destroys every arriving product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SinkBehavior {
    received: u64,
}

impl SinkBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn received(&self) -> u64 {
        self.received
    }
}

pub(crate) fn on_entered(
    ctx: &mut SimContext<'_>,
    id: EntityId,
    product: EntityId,
) -> ModelResult<()> {
    debug!("[Sink:{}] received {}", ctx.label(id), ctx.label(product));
    ctx.destroy_product(product)?;
    if let Some(Behavior::Sink(s)) = ctx.world.get_mut::<Behavior>(id) {
        s.received += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ModelError;
    use crate::core::event_scheduler::EventScheduler;
    use crate::core::relation::{self, Relation};
    use crate::core::trace::TraceLog;
    use crate::core::world::World;
    use crate::line::context::ProductStats;

    fn sink_world() -> (World, EntityId) {
        let mut world = World::new();
        let sink = world.create_entity("Sink1");
        world.add_component(sink, Relation::new()).unwrap();
        world
            .add_component(sink, Behavior::Sink(SinkBehavior::new()))
            .unwrap();
        (world, sink)
    }

    fn received(world: &World, sink: EntityId) -> u64 {
        match world.get::<Behavior>(sink) {
            Some(Behavior::Sink(s)) => s.received(),
            other => panic!("not a sink: {:?}", other),
        }
    }

    #[test]
    fn test_sink_counts_and_destroys_products() {
        let (mut world, sink) = sink_world();
        let mut scheduler = EventScheduler::new(1);
        let mut trace = TraceLog::new(true, 0);
        let mut stats = ProductStats::default();
        let mut ctx = SimContext {
            world: &mut world,
            scheduler: &mut scheduler,
            trace: &mut trace,
            stats: &mut stats,
        };

        let product = ctx.create_product("Product1".to_string()).unwrap();
        relation::move_entity(ctx.world, product, sink).unwrap();
        on_entered(&mut ctx, sink, product).unwrap();

        assert!(!world.is_alive(product));
        assert_eq!(received(&world, sink), 1);
        assert_eq!(stats.destroyed, 1);
    }

    #[test]
    fn test_failed_destroy_is_not_counted() {
        let (mut world, sink) = sink_world();
        let intruder = world.create_entity("Intruder");
        relation::move_entity(&mut world, intruder, sink).unwrap();

        let mut scheduler = EventScheduler::new(1);
        let mut trace = TraceLog::new(true, 0);
        let mut stats = ProductStats::default();
        let mut ctx = SimContext {
            world: &mut world,
            scheduler: &mut scheduler,
            trace: &mut trace,
            stats: &mut stats,
        };

        assert!(matches!(
            on_entered(&mut ctx, sink, intruder),
            Err(ModelError::InvariantViolation(_))
        ));
        assert_eq!(received(&world, sink), 0);
        assert_eq!(stats.destroyed, 0);
    }
}
