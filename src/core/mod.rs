pub mod component;
pub mod config;
pub mod errors;
pub mod event;
pub mod event_scheduler;
pub mod relation;
pub mod trace;
pub mod types;
pub mod world;

#[cfg(test)]
mod tests;
