use serde::{Deserialize, Serialize};

/// Simulated time, in scheduler ticks.
pub type Ticks = u64;

/// Execution lane used by every behavior of the production line.
pub const MODEL_LANE: u32 = 0;

/// Generational handle into the entity table.
///
/// A slot can be reused after its entity is destroyed, but the generation is
/// bumped, so a stale handle never resolves to the new occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl EntityId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Get the slot index
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Get the slot generation
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Placement of a location, only consumed by visualization.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<[f32; 3]> for Position {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// Human-readable entity name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_display() {
        let id = EntityId::new(3, 1);
        assert_eq!(id.to_string(), "#3v1");
        assert_eq!(id.index(), 3);
        assert_eq!(id.generation(), 1);
    }

    #[test]
    fn test_entity_id_ordering_by_index_first() {
        assert!(EntityId::new(1, 9) < EntityId::new(2, 0));
        assert_ne!(EntityId::new(1, 0), EntityId::new(1, 1));
    }
}
