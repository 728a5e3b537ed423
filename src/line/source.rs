use super::behavior::{behavior_of, mismatch, Behavior, LocationKind};
use super::context::SimContext;
use crate::core::errors::{ModelError, ModelResult};
use crate::core::event::EventKind;
use crate::core::relation;
use crate::core::trace::TraceKind;
use crate::core::types::EntityId;
use crate::core::world::World;
use log::debug;
use serde::Serialize;

/// Generates products into its target at a fixed cadence.
///
/// Generation is lossy: when the target is full the attempt is dropped and
/// the next one is scheduled as usual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceBehavior {
    pub(crate) target: Option<EntityId>,
    generation_time: u64,
    produced: u64,
    attempts: u64,
}

impl SourceBehavior {
    /// Seconds between generation attempts
    pub fn new(generation_time: u64) -> Self {
        Self {
            target: None,
            generation_time,
            produced: 0,
            attempts: 0,
        }
    }

    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    pub fn generation_time(&self) -> u64 {
        self.generation_time
    }

    /// Products created and handed to the target
    pub fn produced(&self) -> u64 {
        self.produced
    }

    /// Generation events fired so far
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Attempts dropped because the target was full
    pub fn dropped(&self) -> u64 {
        self.attempts - self.produced
    }
}

fn state(world: &World, id: EntityId) -> ModelResult<SourceBehavior> {
    match behavior_of(world, id)? {
        Behavior::Source(source) => Ok(*source),
        _ => Err(mismatch(world, id, LocationKind::Source)),
    }
}

pub(crate) fn on_start(ctx: &mut SimContext<'_>, id: EntityId) -> ModelResult<()> {
    let source = state(ctx.world, id)?;
    debug!(
        "[Source:{}] first generation in {}s",
        ctx.label(id),
        source.generation_time
    );
    ctx.schedule(id, source.generation_time, EventKind::Generate);
    Ok(())
}

pub(crate) fn generate(ctx: &mut SimContext<'_>, id: EntityId) -> ModelResult<()> {
    let source = state(ctx.world, id)?;
    let target = source
        .target
        .ok_or_else(|| ModelError::MissingTarget(ctx.label(id)))?;

    if let Some(Behavior::Source(s)) = ctx.world.get_mut::<Behavior>(id) {
        s.attempts += 1;
    }

    if relation::has_room(ctx.world, target)? {
        let product = ctx.create_product(format!("Product{}", source.produced + 1))?;
        debug!(
            "[Source:{}] created product: {}",
            ctx.label(id),
            ctx.label(product)
        );
        ctx.move_entity(product, target)?;

        if let Some(Behavior::Source(s)) = ctx.world.get_mut::<Behavior>(id) {
            s.produced += 1;
        }
    } else {
        debug!(
            "[Source:{}] {} is full, generation dropped",
            ctx.label(id),
            ctx.label(target)
        );
        ctx.record(id, TraceKind::Dropped);
    }

    ctx.schedule(id, source.generation_time, EventKind::Generate);
    Ok(())
}
