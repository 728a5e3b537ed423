use super::behavior::Behavior;
use super::line_config::LineConfig;
use super::simulation_engine::Simulation;
use crate::core::config::{ConcurrencyMode, SimulationConfig};
use crate::core::errors::{ModelError, ModelResult};
use crate::core::types::Ticks;
use log::info;
use rayon::prelude::*;
use serde::Serialize;

/// Totals of one finished run, summed over every location of each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub end_time: Ticks,
    pub attempts: u64,
    pub produced: u64,
    pub dropped: u64,
    pub received: u64,
    /// Products still inside the line
    pub in_process: u64,
}

impl RunSummary {
    pub fn from_simulation(sim: &Simulation) -> Self {
        let mut summary = RunSummary {
            end_time: sim.current_time(),
            attempts: 0,
            produced: 0,
            dropped: 0,
            received: 0,
            in_process: sim.products().len() as u64,
        };

        for &id in sim.locations() {
            match sim.behavior(id) {
                Ok(Behavior::Source(s)) => {
                    summary.attempts += s.attempts();
                    summary.produced += s.produced();
                    summary.dropped += s.dropped();
                }
                Ok(Behavior::Sink(s)) => summary.received += s.received(),
                _ => {}
            }
        }
        summary
    }
}

/// Build one standard line and run it to the configured end time
pub fn run_line(config: &LineConfig, sim_config: &SimulationConfig) -> ModelResult<RunSummary> {
    let mut sim = config.build(sim_config.clone())?;
    sim.run()?;
    let summary = RunSummary::from_simulation(&sim);
    info!(
        "Run {:?}: produced {}, received {}, dropped {}",
        config, summary.produced, summary.received, summary.dropped
    );
    Ok(summary)
}

/// Run independent lines, one per configuration.
///
/// Each run owns its whole state, so runs can be spread over a Rayon pool.
/// Results come back in input order either way.
pub fn run_replications(
    configs: &[LineConfig],
    sim_config: &SimulationConfig,
) -> ModelResult<Vec<RunSummary>> {
    sim_config.validate()?;

    match sim_config.concurrency_mode {
        ConcurrencyMode::Sequential => configs
            .iter()
            .map(|config| run_line(config, sim_config))
            .collect(),
        ConcurrencyMode::Rayon => {
            let run_all = || {
                configs
                    .par_iter()
                    .map(|config| run_line(config, sim_config))
                    .collect::<ModelResult<Vec<_>>>()
            };
            match sim_config.thread_pool_size {
                Some(threads) => {
                    let pool = rayon::ThreadPoolBuilder::new()
                        .num_threads(threads)
                        .build()
                        .map_err(|e| ModelError::InvalidConfig(e.to_string()))?;
                    pool.install(run_all)
                }
                None => run_all(),
            }
        }
    }
}
