use super::context::SimContext;
use super::queue::{self, QueueBehavior};
use super::server::{self, ServerBehavior};
use super::sink::{self, SinkBehavior};
use super::source::{self, SourceBehavior};
use crate::core::component::impl_component;
use crate::core::errors::{ModelError, ModelResult};
use crate::core::event::{Event, EventKind};
use crate::core::types::EntityId;
use crate::core::world::World;
use serde::Serialize;

/// The four kinds of location on a production line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LocationKind {
    Source,
    Queue,
    Server,
    Sink,
}

impl LocationKind {
    pub fn label(&self) -> &'static str {
        match self {
            LocationKind::Source => "source",
            LocationKind::Queue => "queue",
            LocationKind::Server => "server",
            LocationKind::Sink => "sink",
        }
    }
}

/// Behavior attached to a location entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Behavior {
    Source(SourceBehavior),
    Queue(QueueBehavior),
    Server(ServerBehavior),
    Sink(SinkBehavior),
}

impl_component!(Behavior);

impl Behavior {
    pub fn kind(&self) -> LocationKind {
        match self {
            Behavior::Source(_) => LocationKind::Source,
            Behavior::Queue(_) => LocationKind::Queue,
            Behavior::Server(_) => LocationKind::Server,
            Behavior::Sink(_) => LocationKind::Sink,
        }
    }

    /// Downstream location, if this kind has one and it is wired
    pub fn target(&self) -> Option<EntityId> {
        match self {
            Behavior::Source(s) => s.target(),
            Behavior::Queue(q) => q.target(),
            Behavior::Server(s) => s.target(),
            Behavior::Sink(_) => None,
        }
    }

    pub(crate) fn set_target(&mut self, target: EntityId) {
        match self {
            Behavior::Source(s) => s.target = Some(target),
            Behavior::Queue(q) => q.target = Some(target),
            Behavior::Server(s) => s.target = Some(target),
            Behavior::Sink(_) => {}
        }
    }
}

/// Look up the behavior of a location
pub fn behavior_of(world: &World, id: EntityId) -> ModelResult<&Behavior> {
    world.name(id)?;
    world
        .get::<Behavior>(id)
        .ok_or_else(|| ModelError::NotALocation(world.label(id)))
}

pub(crate) fn mismatch(world: &World, id: EntityId, expected: LocationKind) -> ModelError {
    ModelError::BehaviorMismatch {
        entity: world.label(id),
        expected: expected.label(),
    }
}

/// Start hook, run once per location when the simulation starts
pub(crate) fn on_start(ctx: &mut SimContext<'_>, id: EntityId) -> ModelResult<()> {
    match behavior_of(ctx.world, id)?.kind() {
        LocationKind::Source => source::on_start(ctx, id),
        LocationKind::Queue | LocationKind::Server | LocationKind::Sink => Ok(()),
    }
}

/// Arrival handler of `location`, run right after `product` was moved in
pub(crate) fn on_entered(
    ctx: &mut SimContext<'_>,
    location: EntityId,
    product: EntityId,
) -> ModelResult<()> {
    let Some(kind) = ctx.world.get::<Behavior>(location).map(Behavior::kind) else {
        return Ok(());
    };
    match kind {
        LocationKind::Source => Ok(()),
        LocationKind::Queue => queue::on_entered(ctx, location, product),
        LocationKind::Server => server::on_entered(ctx, location, product),
        LocationKind::Sink => sink::on_entered(ctx, location, product),
    }
}

/// Dispatch a fired event to the behavior that scheduled it
pub(crate) fn handle_event(ctx: &mut SimContext<'_>, event: Event) -> ModelResult<()> {
    match event.kind {
        EventKind::Generate => source::generate(ctx, event.entity),
        EventKind::QueueCheck => queue::check_move_out(ctx, event.entity),
        EventKind::QueueMove => queue::move_out(ctx, event.entity),
        EventKind::ProcessComplete { product } => {
            server::process_complete(ctx, event.entity, product)
        }
        EventKind::ServerMoveOut { product } => server::move_out(ctx, event.entity, product),
    }
}
