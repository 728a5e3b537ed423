//! Parent/child membership of locations and the atomic move that updates it.

use super::component::impl_component;
use super::errors::{ModelError, ModelResult};
use super::types::EntityId;
use super::world::World;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Capacity limit of a location. Locations without one are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub capacity: u64,
}

/// Ordered occupants of a location, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relation {
    children: VecDeque<EntityId>,
}

impl Relation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn child_count(&self) -> u64 {
        self.children.len() as u64
    }

    /// Oldest occupant
    pub fn first(&self) -> Option<EntityId> {
        self.children.front().copied()
    }

    pub fn children(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.children.iter().copied()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.children.contains(&id)
    }

    fn push(&mut self, id: EntityId) {
        self.children.push_back(id);
    }

    fn remove(&mut self, id: EntityId) -> bool {
        match self.children.iter().position(|c| *c == id) {
            Some(pos) => {
                self.children.remove(pos);
                true
            }
            None => false,
        }
    }
}

/// Back-link from a child to the location holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent(pub EntityId);

impl_component!(Resource, Relation, Parent);

/// Current occupant count of a location
pub fn child_count(world: &World, location: EntityId) -> ModelResult<u64> {
    Ok(relation(world, location)?.child_count())
}

/// Capacity of a location, `None` when unbounded
pub fn capacity(world: &World, location: EntityId) -> Option<u64> {
    world.get::<Resource>(location).map(|r| r.capacity)
}

/// Whether one more occupant would still respect the location's capacity
pub fn has_room(world: &World, location: EntityId) -> ModelResult<bool> {
    let count = child_count(world, location)?;
    Ok(capacity(world, location).map_or(true, |cap| count < cap))
}

/// Location currently holding an entity
pub fn parent_of(world: &World, entity: EntityId) -> Option<EntityId> {
    world.get::<Parent>(entity).map(|p| p.0)
}

/// Atomically reparent `entity` under `new_parent`.
///
/// Either the whole transfer happens or nothing changes: the entity is never
/// listed under two parents, or under none when it had one before.
/// A move into a full bounded location is refused.
pub fn move_entity(world: &mut World, entity: EntityId, new_parent: EntityId) -> ModelResult<()> {
    world.name(entity)?;
    relation(world, new_parent)?;

    if !has_room(world, new_parent)? {
        return Err(ModelError::CapacityExceeded {
            location: world.label(new_parent),
            capacity: capacity(world, new_parent).unwrap_or_default(),
        });
    }

    detach(world, entity)?;
    if let Some(rel) = world.get_mut::<Relation>(new_parent) {
        rel.push(entity);
    }
    world.add_component(entity, Parent(new_parent))
}

/// Like [`move_entity`], but first asserts that `entity` currently sits in
/// `expected_parent`.
pub fn move_entity_from(
    world: &mut World,
    entity: EntityId,
    expected_parent: EntityId,
    new_parent: EntityId,
) -> ModelResult<()> {
    world.name(entity)?;
    if parent_of(world, entity) != Some(expected_parent) {
        return Err(ModelError::NotResident {
            entity: world.label(entity),
            expected: world.label(expected_parent),
        });
    }
    move_entity(world, entity, new_parent)
}

/// Remove an entity from its parent's relation and destroy it
pub fn destroy_entity(world: &mut World, entity: EntityId) -> ModelResult<()> {
    world.name(entity)?;
    detach(world, entity)?;
    world.destroy_entity(entity)
}

/// Unlink an entity from its current parent, returning that parent
fn detach(world: &mut World, entity: EntityId) -> ModelResult<Option<EntityId>> {
    let Some(parent) = parent_of(world, entity) else {
        return Ok(None);
    };

    let removed = world
        .get_mut::<Relation>(parent)
        .is_some_and(|rel| rel.remove(entity));
    if !removed {
        return Err(ModelError::NotResident {
            entity: world.label(entity),
            expected: world.label(parent),
        });
    }

    world.remove_component::<Parent>(entity)?;
    Ok(Some(parent))
}

fn relation(world: &World, location: EntityId) -> ModelResult<&Relation> {
    world.name(location)?;
    world
        .get::<Relation>(location)
        .ok_or_else(|| ModelError::NotALocation(world.label(location)))
}
