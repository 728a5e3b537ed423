//! Configuration for simulation execution
//!
//! This module provides configuration types for controlling how a line model
//! is run: clock precision, run length, tracing, and how independent
//! replications are spread over threads.

use super::errors::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};

/// Enumeration of supported concurrency modes for replications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConcurrencyMode {
    /// Replications run one after another on the calling thread
    #[default]
    Sequential,
    /// Replications run in parallel on a Rayon pool
    Rayon,
}

/// Configuration for simulation execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Scheduler ticks per simulated second
    pub model_precision: u64,
    /// Run length in seconds used by `Simulation::run`
    pub end_time: u64,
    /// Record executed events in the trace log
    pub enable_trace: bool,
    /// Maximum trace entries kept (0 = unlimited)
    pub trace_capacity: usize,
    /// The concurrency mode to use for replications
    pub concurrency_mode: ConcurrencyMode,
    /// The size of the thread pool for parallel replications
    /// Only relevant when concurrency_mode is Rayon
    pub thread_pool_size: Option<usize>,
}

impl SimulationConfig {
    /// Create a new simulation configuration with default values
    ///
    /// One tick per second, a one hour run, unlimited tracing, sequential
    /// replications.
    pub fn new() -> Self {
        Self {
            model_precision: 1,
            end_time: 3600,
            enable_trace: true,
            trace_capacity: 0,
            concurrency_mode: ConcurrencyMode::default(),
            thread_pool_size: None,
        }
    }

    pub fn with_model_precision(mut self, ticks_per_second: u64) -> Self {
        self.model_precision = ticks_per_second;
        self
    }

    pub fn with_end_time(mut self, seconds: u64) -> Self {
        self.end_time = seconds;
        self
    }

    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.enable_trace = enabled;
        self
    }

    pub fn with_trace_capacity(mut self, capacity: usize) -> Self {
        self.trace_capacity = capacity;
        self
    }

    /// Set the concurrency mode for replications
    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    /// Set the thread pool size for parallel replications
    ///
    /// This setting only affects execution when concurrency_mode is Rayon
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.model_precision == 0 {
            return Err(ModelError::InvalidConfig(
                "model precision must be greater than 0".to_string(),
            ));
        }
        if self.thread_pool_size == Some(0) {
            return Err(ModelError::InvalidConfig(
                "thread pool size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}
