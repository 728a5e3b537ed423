use super::behavior::LocationKind;
use crate::core::types::{EntityId, Position, Ticks};
use serde::Serialize;

/// Observable state of one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationView {
    pub id: EntityId,
    pub name: String,
    pub kind: LocationKind,
    pub position: Position,
    pub occupants: u64,
    pub capacity: Option<u64>,
    pub target: Option<EntityId>,
    pub produced: Option<u64>,
    pub received: Option<u64>,
}

/// Observable state of one live product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductView {
    pub id: EntityId,
    pub name: String,
    pub location: Option<EntityId>,
    pub filled: bool,
}

/// Point-in-time copy of the line for the inspection layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub time: Ticks,
    pub locations: Vec<LocationView>,
    pub products: Vec<ProductView>,
}

impl Snapshot {
    pub fn location(&self, name: &str) -> Option<&LocationView> {
        self.locations.iter().find(|l| l.name == name)
    }
}
