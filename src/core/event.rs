use super::types::{EntityId, MODEL_LANE};
use serde::{Deserialize, Serialize};

/// What a scheduled event does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Source generation cycle
    Generate,
    /// Queue checks whether its target has room
    QueueCheck,
    /// Queue hands its oldest occupant to its target
    QueueMove,
    /// Server finished processing a product
    ProcessComplete { product: EntityId },
    /// Server hands a processed product to its target
    ServerMoveOut { product: EntityId },
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Generate => "generate",
            EventKind::QueueCheck => "queue_check",
            EventKind::QueueMove => "queue_move",
            EventKind::ProcessComplete { .. } => "process_complete",
            EventKind::ServerMoveOut { .. } => "server_move_out",
        }
    }
}

/// Event descriptor: which entity handles it, on which lane, and what it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub lane: u32,
    pub entity: EntityId,
    pub kind: EventKind,
}

impl Event {
    /// Event on the model lane; the scheduler stamps the final lane
    pub fn new(entity: EntityId, kind: EventKind) -> Self {
        Self {
            lane: MODEL_LANE,
            entity,
            kind,
        }
    }
}
