use super::behavior::{Behavior, LocationKind};
use super::queue::QueueBehavior;
use super::server::ServerBehavior;
use super::simulation_engine::Simulation;
use super::sink::SinkBehavior;
use super::source::SourceBehavior;
use crate::core::config::SimulationConfig;
use crate::core::errors::{ModelError, ModelResult};
use crate::core::relation::{Relation, Resource};
use crate::core::types::{EntityId, Position};
use crate::core::world::World;
use log::debug;

/// Imperative API for creating and wiring a production line
///
/// Locations are created up front; `connect` validates each target link as it
/// is made, and `build` rejects any location left without a target.
pub struct LineBuilder {
    world: World,
    /// Location entities in creation order
    locations: Vec<EntityId>,
    config: SimulationConfig,
}

impl LineBuilder {
    /// Create a new builder
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            world: World::new(),
            locations: Vec::new(),
            config,
        }
    }

    fn add_location(
        &mut self,
        name: &str,
        position: Position,
        behavior: Behavior,
        capacity: Option<u64>,
    ) -> ModelResult<EntityId> {
        let id = self.world.create_entity(name);
        self.world.add_component(id, position)?;
        self.world.add_component(id, Relation::new())?;
        self.world.add_component(id, behavior)?;
        if let Some(capacity) = capacity {
            self.world.add_component(id, Resource { capacity })?;
        }

        debug!("Added {} '{}' as {}", behavior.kind().label(), name, id);
        self.locations.push(id);
        Ok(id)
    }

    /// Add a source generating a product every `generation_time` seconds
    pub fn add_source(
        &mut self,
        name: &str,
        position: impl Into<Position>,
        generation_time: u64,
    ) -> ModelResult<EntityId> {
        let behavior = Behavior::Source(SourceBehavior::new(generation_time));
        self.add_location(name, position.into(), behavior, None)
    }

    /// Add a queue holding at most `capacity` products
    pub fn add_queue(
        &mut self,
        name: &str,
        position: impl Into<Position>,
        capacity: u64,
        retry_time: u64,
    ) -> ModelResult<EntityId> {
        let behavior = Behavior::Queue(QueueBehavior::new(retry_time));
        self.add_location(name, position.into(), behavior, Some(capacity))
    }

    /// Add a single-slot server
    pub fn add_server(
        &mut self,
        name: &str,
        position: impl Into<Position>,
        process_time: u64,
        move_out_time: u64,
    ) -> ModelResult<EntityId> {
        let behavior = Behavior::Server(ServerBehavior::new(process_time, move_out_time));
        self.add_location(
            name,
            position.into(),
            behavior,
            Some(ServerBehavior::CAPACITY),
        )
    }

    /// Add an unbounded sink
    pub fn add_sink(
        &mut self,
        name: &str,
        position: impl Into<Position>,
    ) -> ModelResult<EntityId> {
        let behavior = Behavior::Sink(SinkBehavior::new());
        self.add_location(name, position.into(), behavior, None)
    }

    /// Set `to` as the downstream target of `from`
    pub fn connect(&mut self, from: EntityId, to: EntityId) -> ModelResult<()> {
        let from_kind = self.kind_of(from)?;
        let to_kind = self.kind_of(to)?;
        let invalid = |reason| ModelError::InvalidTarget {
            from: self.world.label(from),
            to: self.world.label(to),
            reason,
        };

        if from == to {
            return Err(invalid("a location cannot target itself"));
        }
        if from_kind == LocationKind::Sink {
            return Err(invalid("a sink has no downstream target"));
        }
        if to_kind == LocationKind::Source {
            return Err(invalid("a source cannot receive products"));
        }

        let already_connected = self
            .world
            .get::<Behavior>(from)
            .and_then(Behavior::target)
            .is_some();
        if already_connected {
            return Err(ModelError::AlreadyConnected(self.world.label(from)));
        }

        if let Some(behavior) = self.world.get_mut::<Behavior>(from) {
            behavior.set_target(to);
        }
        debug!(
            "Connected '{}' -> '{}'",
            self.world.label(from),
            self.world.label(to)
        );
        Ok(())
    }

    /// Validate the wiring and timing, and hand the line to a simulation
    pub fn build(self) -> ModelResult<Simulation> {
        self.config.validate()?;
        self.validate_locations()?;
        Simulation::new(self.world, self.locations, self.config)
    }

    fn validate_locations(&self) -> ModelResult<()> {
        for &id in &self.locations {
            let Some(behavior) = self.world.get::<Behavior>(id) else {
                return Err(ModelError::NotALocation(self.world.label(id)));
            };
            let name = self.world.label(id);

            match behavior {
                Behavior::Source(s) if s.generation_time() == 0 => {
                    return Err(ModelError::InvalidConfig(format!(
                        "source '{}' needs a generation time greater than 0",
                        name
                    )));
                }
                Behavior::Queue(q) if q.retry_time() == 0 => {
                    return Err(ModelError::InvalidConfig(format!(
                        "queue '{}' needs a retry time greater than 0",
                        name
                    )));
                }
                _ => {}
            }

            if behavior.kind() == LocationKind::Sink {
                continue;
            }
            let target = behavior
                .target()
                .ok_or_else(|| ModelError::MissingTarget(name.clone()))?;
            if !self.world.is_alive(target) || !self.world.has::<Behavior>(target) {
                return Err(ModelError::InvalidTarget {
                    from: name,
                    to: target.to_string(),
                    reason: "target is not a location",
                });
            }
        }
        Ok(())
    }

    fn kind_of(&self, id: EntityId) -> ModelResult<LocationKind> {
        self.world.name(id)?;
        self.world
            .get::<Behavior>(id)
            .map(Behavior::kind)
            .ok_or_else(|| ModelError::NotALocation(self.world.label(id)))
    }

    /// Location IDs created so far
    pub fn location_ids(&self) -> &[EntityId] {
        &self.locations
    }

    /// Check if a location exists
    pub fn has_location(&self, id: EntityId) -> bool {
        self.locations.contains(&id)
    }
}

impl Default for LineBuilder {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}
