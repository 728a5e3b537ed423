use super::types::EntityId;

pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised by the simulation core.
///
/// Configuration errors are reported at build time. Everything else signals
/// a broken relationship or capacity contract and aborts the running step.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("entity {0} does not exist")]
    EntityNotFound(EntityId),

    #[error("entity {0} was already destroyed")]
    AlreadyDestroyed(EntityId),

    #[error("entity '{0}' is not a location")]
    NotALocation(String),

    #[error("entity '{entity}' has no {expected} behavior")]
    BehaviorMismatch { entity: String, expected: &'static str },

    #[error("location '{0}' has no target")]
    MissingTarget(String),

    #[error("location '{0}' is already connected")]
    AlreadyConnected(String),

    #[error("cannot connect '{from}' to '{to}': {reason}")]
    InvalidTarget {
        from: String,
        to: String,
        reason: &'static str,
    },

    #[error("location '{location}' is full ({capacity}/{capacity})")]
    CapacityExceeded { location: String, capacity: u64 },

    #[error("entity '{entity}' is not resident in '{expected}'")]
    NotResident { entity: String, expected: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}
