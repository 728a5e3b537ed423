use super::behavior::{self, behavior_of, Behavior, LocationKind};
use super::context::{ProductStats, SimContext};
use super::product::Product;
use super::snapshot::{LocationView, ProductView, Snapshot};
use crate::core::config::SimulationConfig;
use crate::core::errors::{ModelError, ModelResult};
use crate::core::event_scheduler::{EventScheduler, ScheduledEvent};
use crate::core::relation::{self, Parent, Relation};
use crate::core::trace::{TraceKind, TraceLog};
use crate::core::types::{EntityId, Position, Ticks};
use crate::core::world::World;
use log::{debug, info};

/// Observer trait for simulation events
pub trait SimulationObserver {
    /// Called when the simulation clock advances
    fn on_time_advance(&mut self, _old_time: Ticks, _new_time: Ticks) {}

    /// Called after each fired event, once its handler has returned
    fn on_event_complete(
        &mut self,
        _event: &ScheduledEvent,
        _world: &World,
        _scheduler: &EventScheduler,
    ) {
    }
}

/// A built production line and the clock that drives it.
pub struct Simulation {
    world: World,
    scheduler: EventScheduler,
    trace: TraceLog,
    stats: ProductStats,
    locations: Vec<EntityId>,
    config: SimulationConfig,
    observers: Vec<Box<dyn SimulationObserver>>,
    started: bool,
    injected: u64,
}

impl Simulation {
    pub(crate) fn new(
        world: World,
        locations: Vec<EntityId>,
        config: SimulationConfig,
    ) -> ModelResult<Self> {
        config.validate()?;
        Ok(Self {
            world,
            scheduler: EventScheduler::new(config.model_precision),
            trace: TraceLog::new(config.enable_trace, config.trace_capacity),
            stats: ProductStats::default(),
            locations,
            config,
            observers: Vec::new(),
            started: false,
            injected: 0,
        })
    }

    fn context(&mut self) -> SimContext<'_> {
        SimContext {
            world: &mut self.world,
            scheduler: &mut self.scheduler,
            trace: &mut self.trace,
            stats: &mut self.stats,
        }
    }

    /// Add an observer to the simulation
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver>) {
        self.observers.push(observer);
    }

    /// Run every location's start hook. Only the first call has an effect.
    pub fn start(&mut self) -> ModelResult<()> {
        if self.started {
            return Ok(());
        }
        self.started = true;

        let locations = self.locations.clone();
        let mut ctx = self.context();
        for id in locations {
            behavior::on_start(&mut ctx, id)?;
        }
        info!(
            "Simulation started with {} locations, precision {} ticks/s",
            self.locations.len(),
            self.config.model_precision
        );
        Ok(())
    }

    /// Fire the next pending event, returns true if events remain
    pub fn step(&mut self) -> ModelResult<bool> {
        self.start()?;
        let old_time = self.scheduler.current_time();
        if let Some(scheduled) = self.scheduler.pop_due(Ticks::MAX) {
            self.execute(old_time, scheduled)?;
        }
        Ok(self.scheduler.has_events())
    }

    /// Fire every event due at or before `end`, then set the clock to `end`.
    /// Returns the final time.
    pub fn run_until(&mut self, end: Ticks) -> ModelResult<Ticks> {
        self.start()?;
        loop {
            let old_time = self.scheduler.current_time();
            let Some(scheduled) = self.scheduler.pop_due(end) else {
                break;
            };
            self.execute(old_time, scheduled)?;
        }

        let old_time = self.scheduler.current_time();
        self.scheduler.advance_to(end);
        self.notify_time_advance(old_time, self.scheduler.current_time());
        Ok(self.current_time())
    }

    /// Advance the clock by `delta` ticks
    pub fn update(&mut self, delta: Ticks) -> ModelResult<Ticks> {
        let end = self.current_time().saturating_add(delta);
        self.run_until(end)
    }

    /// Run until the configured end time
    pub fn run(&mut self) -> ModelResult<Ticks> {
        let end = self.ticks(self.config.end_time);
        let final_time = self.run_until(end)?;
        info!(
            "Simulation finished at tick {} ({} products created, {} destroyed)",
            final_time, self.stats.created, self.stats.destroyed
        );
        Ok(final_time)
    }

    fn execute(&mut self, old_time: Ticks, scheduled: ScheduledEvent) -> ModelResult<()> {
        self.notify_time_advance(old_time, scheduled.time);

        let event = scheduled.event;
        self.trace
            .record(scheduled.time, event.entity, TraceKind::Fired(event.kind));
        debug!(
            "tick {}: {} for {}",
            scheduled.time,
            event.kind.label(),
            self.world.label(event.entity)
        );

        let mut ctx = self.context();
        behavior::handle_event(&mut ctx, event)?;

        for observer in &mut self.observers {
            observer.on_event_complete(&scheduled, &self.world, &self.scheduler);
        }
        Ok(())
    }

    fn notify_time_advance(&mut self, old_time: Ticks, new_time: Ticks) {
        if old_time == new_time {
            return;
        }
        for observer in &mut self.observers {
            observer.on_time_advance(old_time, new_time);
        }
    }

    /// Create a product and move it straight into `location`.
    ///
    /// The location's capacity is checked first and its arrival handler runs
    /// as for any other move.
    pub fn inject_product(&mut self, location: EntityId) -> ModelResult<EntityId> {
        behavior_of(&self.world, location)?;
        if !relation::has_room(&self.world, location)? {
            return Err(ModelError::CapacityExceeded {
                location: self.world.label(location),
                capacity: relation::capacity(&self.world, location).unwrap_or_default(),
            });
        }

        self.injected += 1;
        let name = format!("Injected{}", self.injected);
        let mut ctx = self.context();
        let product = ctx.create_product(name)?;
        ctx.move_entity(product, location)?;
        Ok(product)
    }

    /// Remove a product from wherever it is and destroy it.
    /// Events already scheduled for it are not cancelled.
    pub fn destroy_product(&mut self, product: EntityId) -> ModelResult<()> {
        self.context().destroy_product(product)
    }

    pub fn current_time(&self) -> Ticks {
        self.scheduler.current_time()
    }

    /// Convert seconds to ticks
    pub fn ticks(&self, seconds: u64) -> Ticks {
        self.scheduler.apply_model_precision(seconds)
    }

    pub fn model_precision(&self) -> u64 {
        self.scheduler.model_precision()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn scheduler(&self) -> &EventScheduler {
        &self.scheduler
    }

    pub fn trace(&self) -> &TraceLog {
        &self.trace
    }

    pub fn pending_events(&self) -> usize {
        self.scheduler.pending_count()
    }

    pub fn product_stats(&self) -> ProductStats {
        self.stats
    }

    /// Location entities in creation order
    pub fn locations(&self) -> &[EntityId] {
        &self.locations
    }

    pub fn find(&self, name: &str) -> Option<EntityId> {
        self.world.find_by_name(name)
    }

    pub fn name(&self, id: EntityId) -> ModelResult<&str> {
        self.world.name(id)
    }

    pub fn behavior(&self, location: EntityId) -> ModelResult<&Behavior> {
        behavior_of(&self.world, location)
    }

    pub fn occupant_count(&self, location: EntityId) -> ModelResult<u64> {
        relation::child_count(&self.world, location)
    }

    /// Occupants of a location, oldest first
    pub fn occupants(&self, location: EntityId) -> ModelResult<Vec<EntityId>> {
        behavior_of(&self.world, location)?;
        Ok(self
            .world
            .get::<Relation>(location)
            .map(|rel| rel.children().collect())
            .unwrap_or_default())
    }

    /// Capacity of a location, `None` when unbounded
    pub fn capacity(&self, location: EntityId) -> Option<u64> {
        relation::capacity(&self.world, location)
    }

    pub fn location_of(&self, product: EntityId) -> Option<EntityId> {
        relation::parent_of(&self.world, product)
    }

    pub fn is_filled(&self, product: EntityId) -> ModelResult<bool> {
        self.world.name(product)?;
        self.world
            .get::<Product>(product)
            .map(|p| p.filled)
            .ok_or_else(|| {
                ModelError::InvariantViolation(format!(
                    "'{}' is not a product",
                    self.world.label(product)
                ))
            })
    }

    pub fn produced(&self, source: EntityId) -> ModelResult<u64> {
        match self.behavior(source)? {
            Behavior::Source(s) => Ok(s.produced()),
            _ => Err(behavior::mismatch(&self.world, source, LocationKind::Source)),
        }
    }

    pub fn generation_attempts(&self, source: EntityId) -> ModelResult<u64> {
        match self.behavior(source)? {
            Behavior::Source(s) => Ok(s.attempts()),
            _ => Err(behavior::mismatch(&self.world, source, LocationKind::Source)),
        }
    }

    pub fn received(&self, sink: EntityId) -> ModelResult<u64> {
        match self.behavior(sink)? {
            Behavior::Sink(s) => Ok(s.received()),
            _ => Err(behavior::mismatch(&self.world, sink, LocationKind::Sink)),
        }
    }

    /// Live products, in slot order
    pub fn products(&self) -> Vec<EntityId> {
        self.world.entities_with::<Product>()
    }

    /// Verify relationship, capacity and conservation invariants
    pub fn check_invariants(&self) -> ModelResult<()> {
        let violation = |msg: String| Err(ModelError::InvariantViolation(msg));
        let mut resident = 0u64;

        for &location in &self.locations {
            let Some(rel) = self.world.get::<Relation>(location) else {
                return violation(format!("'{}' has no relation", self.world.label(location)));
            };
            if let Some(cap) = relation::capacity(&self.world, location) {
                if rel.child_count() > cap {
                    return violation(format!(
                        "'{}' holds {} products, capacity {}",
                        self.world.label(location),
                        rel.child_count(),
                        cap
                    ));
                }
            }
            for child in rel.children() {
                if !self.world.has::<Product>(child) {
                    return violation(format!(
                        "'{}' lists {} which is not a live product",
                        self.world.label(location),
                        child
                    ));
                }
                if self.world.get::<Parent>(child).map(|p| p.0) != Some(location) {
                    return violation(format!(
                        "'{}' lists '{}' whose parent disagrees",
                        self.world.label(location),
                        self.world.label(child)
                    ));
                }
                resident += 1;
            }
        }

        let live = self.products().len() as u64;
        if resident != live {
            return violation(format!(
                "{} live products but {} resident in locations",
                live, resident
            ));
        }
        if self.stats.created != self.stats.destroyed + live {
            return violation(format!(
                "{} products created, {} destroyed, {} live",
                self.stats.created, self.stats.destroyed, live
            ));
        }
        Ok(())
    }

    /// Read-only view for inspection and visualization
    pub fn snapshot(&self) -> Snapshot {
        let locations = self
            .locations
            .iter()
            .filter_map(|&id| {
                let behavior = self.world.get::<Behavior>(id)?;
                let (produced, received) = match behavior {
                    Behavior::Source(s) => (Some(s.produced()), None),
                    Behavior::Sink(s) => (None, Some(s.received())),
                    _ => (None, None),
                };
                Some(LocationView {
                    id,
                    name: self.world.label(id),
                    kind: behavior.kind(),
                    position: self.world.get::<Position>(id).copied().unwrap_or_default(),
                    occupants: relation::child_count(&self.world, id).unwrap_or(0),
                    capacity: relation::capacity(&self.world, id),
                    target: behavior.target(),
                    produced,
                    received,
                })
            })
            .collect();

        let products = self
            .products()
            .into_iter()
            .map(|id| ProductView {
                id,
                name: self.world.label(id),
                location: relation::parent_of(&self.world, id),
                filled: self.world.get::<Product>(id).is_some_and(|p| p.filled),
            })
            .collect();

        Snapshot {
            time: self.current_time(),
            locations,
            products,
        }
    }
}
