use super::builder::LineBuilder;
use super::queue::QueueBehavior;
use super::server::ServerBehavior;
use super::simulation_engine::Simulation;
use crate::core::config::SimulationConfig;
use crate::core::errors::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};

/// Parameters of the standard Source -> Queue -> Server -> Sink line.
/// All times are in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineConfig {
    pub generation_time: u64,
    pub queue_capacity: u64,
    pub retry_time: u64,
    pub process_time: u64,
    pub move_out_time: u64,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            generation_time: 5,
            queue_capacity: 5,
            retry_time: QueueBehavior::DEFAULT_RETRY_TIME,
            process_time: ServerBehavior::DEFAULT_PROCESS_TIME,
            move_out_time: ServerBehavior::DEFAULT_MOVE_OUT_TIME,
        }
    }
}

impl LineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_generation_time(mut self, seconds: u64) -> Self {
        self.generation_time = seconds;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: u64) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_retry_time(mut self, seconds: u64) -> Self {
        self.retry_time = seconds;
        self
    }

    pub fn with_process_time(mut self, seconds: u64) -> Self {
        self.process_time = seconds;
        self
    }

    pub fn with_move_out_time(mut self, seconds: u64) -> Self {
        self.move_out_time = seconds;
        self
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.generation_time == 0 {
            return Err(ModelError::InvalidConfig(
                "generation time must be greater than 0".to_string(),
            ));
        }
        if self.retry_time == 0 {
            return Err(ModelError::InvalidConfig(
                "retry time must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Build `Source1 -> Queue1 -> Server1 -> Sink1`, laid out left to right
    pub fn build(&self, sim_config: SimulationConfig) -> ModelResult<Simulation> {
        self.validate()?;

        let mut builder = LineBuilder::new(sim_config);
        let source = builder.add_source("Source1", [0.0, 0.0, 0.0], self.generation_time)?;
        let queue = builder.add_queue(
            "Queue1",
            [5.0, 0.0, 0.0],
            self.queue_capacity,
            self.retry_time,
        )?;
        let server = builder.add_server(
            "Server1",
            [10.0, 0.0, 0.0],
            self.process_time,
            self.move_out_time,
        )?;
        let sink = builder.add_sink("Sink1", [15.0, 0.0, 0.0])?;

        builder.connect(source, queue)?;
        builder.connect(queue, server)?;
        builder.connect(server, sink)?;
        builder.build()
    }
}
