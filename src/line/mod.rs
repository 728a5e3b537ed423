pub mod behavior;
pub mod builder;
pub mod context;
pub mod line_config;
pub mod product;
pub mod queue;
pub mod replication;
pub mod server;
pub mod simulation_engine;
pub mod sink;
pub mod snapshot;
pub mod source;

pub use behavior::{Behavior, LocationKind};
pub use builder::LineBuilder;
pub use line_config::LineConfig;
pub use product::Product;
pub use replication::{run_line, run_replications, RunSummary};
pub use simulation_engine::{Simulation, SimulationObserver};
pub use snapshot::{LocationView, ProductView, Snapshot};
