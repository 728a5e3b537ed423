use super::component::{downcast_component, downcast_component_mut, Component};
use super::errors::{ModelError, ModelResult};
use super::types::{EntityId, Name};
use std::any::TypeId;
use std::collections::HashMap;

struct EntitySlot {
    generation: u32,
    alive: bool,
    components: HashMap<TypeId, Box<dyn Component>>,
}

/// Entity table with typed component storage.
///
/// Entities are addressed by generational [`EntityId`]s; destroyed slots go on
/// a free list and are reused with a bumped generation.
#[derive(Default)]
pub struct World {
    slots: Vec<EntitySlot>,
    free: Vec<u32>,
    live: usize,
}

impl World {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a named entity with no other components
    pub fn create_entity(&mut self, name: impl Into<String>) -> EntityId {
        let index = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.alive = true;
                index
            }
            None => {
                self.slots.push(EntitySlot {
                    generation: 0,
                    alive: true,
                    components: HashMap::new(),
                });
                (self.slots.len() - 1) as u32
            }
        };
        self.live += 1;

        let slot = &mut self.slots[index as usize];
        slot.components
            .insert(TypeId::of::<Name>(), Box::new(Name(name.into())));
        EntityId::new(index, slot.generation)
    }

    /// Destroy an entity and drop all of its components.
    ///
    /// Destroying an entity twice is an error: the second call sees a stale
    /// generation and reports [`ModelError::AlreadyDestroyed`].
    pub fn destroy_entity(&mut self, id: EntityId) -> ModelResult<()> {
        let slot = self.slot_mut(id)?;
        slot.alive = false;
        slot.components.clear();
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Ok(())
    }

    /// Check whether a handle still refers to a live entity
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.slot(id).is_ok()
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Entity name
    pub fn name(&self, id: EntityId) -> ModelResult<&str> {
        self.slot(id)?;
        Ok(self.get::<Name>(id).map(|n| n.0.as_str()).unwrap_or(""))
    }

    /// Entity name, or the handle itself when the entity is gone.
    /// Used for log and error messages.
    pub fn label(&self, id: EntityId) -> String {
        match self.get::<Name>(id) {
            Some(name) => name.0.clone(),
            None => id.to_string(),
        }
    }

    /// Find the first live entity with the given name
    pub fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.entities()
            .find(|id| self.get::<Name>(*id).is_some_and(|n| n.0 == name))
    }

    /// Attach a component, replacing any previous component of the same type
    pub fn add_component<T: Component>(&mut self, id: EntityId, component: T) -> ModelResult<()> {
        self.slot_mut(id)?
            .components
            .insert(TypeId::of::<T>(), Box::new(component));
        Ok(())
    }

    /// Detach a component, returning whether one was present
    pub fn remove_component<T: Component>(&mut self, id: EntityId) -> ModelResult<bool> {
        Ok(self
            .slot_mut(id)?
            .components
            .remove(&TypeId::of::<T>())
            .is_some())
    }

    /// Borrow a component of a live entity
    pub fn get<T: Component>(&self, id: EntityId) -> Option<&T> {
        let slot = self.slot(id).ok()?;
        let component = slot.components.get(&TypeId::of::<T>())?;
        downcast_component::<T>(component.as_ref())
    }

    /// Mutably borrow a component of a live entity
    pub fn get_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        let slot = self.slot_mut(id).ok()?;
        let component = slot.components.get_mut(&TypeId::of::<T>())?;
        downcast_component_mut::<T>(component.as_mut())
    }

    pub fn has<T: Component>(&self, id: EntityId) -> bool {
        self.get::<T>(id).is_some()
    }

    /// Iterate live entities in slot order
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.alive)
            .map(|(index, slot)| EntityId::new(index as u32, slot.generation))
    }

    /// Live entities carrying a component of type `T`, in slot order
    pub fn entities_with<T: Component>(&self) -> Vec<EntityId> {
        self.entities().filter(|id| self.has::<T>(*id)).collect()
    }

    fn slot(&self, id: EntityId) -> ModelResult<&EntitySlot> {
        let slot = self
            .slots
            .get(id.index as usize)
            .ok_or(ModelError::EntityNotFound(id))?;
        if !slot.alive || slot.generation != id.generation {
            return Err(ModelError::AlreadyDestroyed(id));
        }
        Ok(slot)
    }

    fn slot_mut(&mut self, id: EntityId) -> ModelResult<&mut EntitySlot> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .ok_or(ModelError::EntityNotFound(id))?;
        if !slot.alive || slot.generation != id.generation {
            return Err(ModelError::AlreadyDestroyed(id));
        }
        Ok(slot)
    }
}
