use super::behavior;
use super::product::Product;
use crate::core::errors::{ModelError, ModelResult};
use crate::core::event::{Event, EventKind};
use crate::core::event_scheduler::EventScheduler;
use crate::core::relation;
use crate::core::trace::{TraceKind, TraceLog};
use crate::core::types::{EntityId, Ticks, MODEL_LANE};
use crate::core::world::World;
use log::trace;

/// Product lifecycle counters, used to check conservation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductStats {
    pub created: u64,
    pub destroyed: u64,
}

/// Everything a behavior may touch while handling an arrival or an event.
pub struct SimContext<'a> {
    pub world: &'a mut World,
    pub scheduler: &'a mut EventScheduler,
    pub trace: &'a mut TraceLog,
    pub stats: &'a mut ProductStats,
}

impl<'a> SimContext<'a> {
    pub fn now(&self) -> Ticks {
        self.scheduler.current_time()
    }

    /// Convert seconds to ticks
    pub fn ticks(&self, seconds: u64) -> Ticks {
        self.scheduler.apply_model_precision(seconds)
    }

    /// Schedule `kind` for `entity` on the model lane, `seconds` from now
    pub fn schedule(&mut self, entity: EntityId, seconds: u64, kind: EventKind) {
        let delay = self.ticks(seconds);
        self.scheduler
            .schedule_after(MODEL_LANE, delay, Event::new(entity, kind));
    }

    pub fn label(&self, id: EntityId) -> String {
        self.world.label(id)
    }

    pub fn record(&mut self, entity: EntityId, kind: TraceKind) {
        let now = self.now();
        self.trace.record(now, entity, kind);
    }

    /// Create a fresh, unfilled product with no location yet
    pub fn create_product(&mut self, name: String) -> ModelResult<EntityId> {
        let product = self.world.create_entity(name);
        self.world.add_component(product, Product::default())?;
        self.stats.created += 1;
        trace!("created {} as {}", self.label(product), product);
        Ok(product)
    }

    /// Move an entity into a location and run the location's arrival handler
    pub fn move_entity(&mut self, entity: EntityId, to: EntityId) -> ModelResult<()> {
        relation::move_entity(self.world, entity, to)?;
        self.arrived(entity, to)
    }

    /// Move an entity that must currently sit in `from`
    pub fn move_entity_from(
        &mut self,
        entity: EntityId,
        from: EntityId,
        to: EntityId,
    ) -> ModelResult<()> {
        relation::move_entity_from(self.world, entity, from, to)?;
        self.arrived(entity, to)
    }

    /// Detach and destroy a product
    pub fn destroy_product(&mut self, product: EntityId) -> ModelResult<()> {
        self.world.name(product)?;
        if !self.world.has::<Product>(product) {
            return Err(ModelError::InvariantViolation(format!(
                "'{}' is not a product",
                self.label(product)
            )));
        }

        let location = relation::parent_of(self.world, product).unwrap_or(product);
        relation::destroy_entity(self.world, product)?;
        self.stats.destroyed += 1;
        self.record(location, TraceKind::Destroyed { product });
        Ok(())
    }

    fn arrived(&mut self, entity: EntityId, location: EntityId) -> ModelResult<()> {
        self.record(location, TraceKind::Entered { product: entity });
        behavior::on_entered(self, location, entity)
    }
}
