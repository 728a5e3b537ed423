pub mod core;
pub mod line;

// Re-export commonly used types
pub use crate::core::config::{ConcurrencyMode, SimulationConfig};
pub use crate::core::errors::{ModelError, ModelResult};
pub use crate::core::event::{Event, EventKind};
pub use crate::core::types::{EntityId, Position, Ticks};
pub use crate::line::{LineBuilder, LineConfig, Simulation};
