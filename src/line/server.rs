use super::behavior::{behavior_of, mismatch, Behavior, LocationKind};
use super::context::SimContext;
use super::product::Product;
use crate::core::errors::{ModelError, ModelResult};
use crate::core::event::EventKind;
use crate::core::relation;
use crate::core::types::EntityId;
use crate::core::world::World;
use log::debug;
use serde::Serialize;

/// Single-slot processing station.
///
/// Each occupant goes `unfilled -> filled -> gone`: processing takes
/// `process_time`, the hand-over follows `move_out_time` later. The server
/// does not check its target's capacity before moving out; a full bounded
/// target makes the move fail with [`ModelError::CapacityExceeded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServerBehavior {
    pub(crate) target: Option<EntityId>,
    process_time: u64,
    move_out_time: u64,
    completed: u64,
}

impl ServerBehavior {
    pub const CAPACITY: u64 = 1;
    pub const DEFAULT_PROCESS_TIME: u64 = 7;
    pub const DEFAULT_MOVE_OUT_TIME: u64 = 3;

    pub fn new(process_time: u64, move_out_time: u64) -> Self {
        Self {
            target: None,
            process_time,
            move_out_time,
            completed: 0,
        }
    }

    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    pub fn process_time(&self) -> u64 {
        self.process_time
    }

    pub fn move_out_time(&self) -> u64 {
        self.move_out_time
    }

    /// Products processed so far
    pub fn completed(&self) -> u64 {
        self.completed
    }
}

impl Default for ServerBehavior {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROCESS_TIME, Self::DEFAULT_MOVE_OUT_TIME)
    }
}

fn state(world: &World, id: EntityId) -> ModelResult<ServerBehavior> {
    match behavior_of(world, id)? {
        Behavior::Server(server) => Ok(*server),
        _ => Err(mismatch(world, id, LocationKind::Server)),
    }
}

fn ensure_resident(ctx: &SimContext<'_>, id: EntityId, product: EntityId) -> ModelResult<()> {
    ctx.world.name(product)?;
    if relation::parent_of(ctx.world, product) != Some(id) {
        return Err(ModelError::NotResident {
            entity: ctx.label(product),
            expected: ctx.label(id),
        });
    }
    Ok(())
}

pub(crate) fn on_entered(
    ctx: &mut SimContext<'_>,
    id: EntityId,
    product: EntityId,
) -> ModelResult<()> {
    let server = state(ctx.world, id)?;
    ctx.schedule(
        id,
        server.process_time,
        EventKind::ProcessComplete { product },
    );
    debug!(
        "[Server:{}] started processing {}",
        ctx.label(id),
        ctx.label(product)
    );
    Ok(())
}

pub(crate) fn process_complete(
    ctx: &mut SimContext<'_>,
    id: EntityId,
    product: EntityId,
) -> ModelResult<()> {
    let server = state(ctx.world, id)?;
    ensure_resident(ctx, id, product)?;

    match ctx.world.get_mut::<Product>(product) {
        Some(p) => p.filled = true,
        None => {
            return Err(ModelError::InvariantViolation(format!(
                "'{}' in '{}' is not a product",
                ctx.label(product),
                ctx.label(id)
            )))
        }
    }
    if let Some(Behavior::Server(s)) = ctx.world.get_mut::<Behavior>(id) {
        s.completed += 1;
    }

    debug!(
        "[Server:{}] finished processing {}",
        ctx.label(id),
        ctx.label(product)
    );
    ctx.schedule(
        id,
        server.move_out_time,
        EventKind::ServerMoveOut { product },
    );
    Ok(())
}

pub(crate) fn move_out(
    ctx: &mut SimContext<'_>,
    id: EntityId,
    product: EntityId,
) -> ModelResult<()> {
    let server = state(ctx.world, id)?;
    let target = server
        .target
        .ok_or_else(|| ModelError::MissingTarget(ctx.label(id)))?;

    debug!(
        "[Server:{}] moving {} to {}",
        ctx.label(id),
        ctx.label(product),
        ctx.label(target)
    );
    ctx.move_entity_from(product, id, target)
}
