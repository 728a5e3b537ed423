use linesim::line::RunSummary;
use linesim::{LineConfig, SimulationConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let line_config = LineConfig::default();
    let sim_config = SimulationConfig::default();

    println!("Source -> Queue -> Server -> Sink");
    println!(
        "  generation={}s queue_capacity={} retry={}s process={}s move_out={}s",
        line_config.generation_time,
        line_config.queue_capacity,
        line_config.retry_time,
        line_config.process_time,
        line_config.move_out_time
    );

    let mut sim = line_config.build(sim_config.clone())?;

    // One simulated second per update, like an interactive host would drive it
    let end = sim.ticks(sim_config.end_time);
    while sim.current_time() < end {
        sim.update(sim.ticks(1))?;
    }
    sim.check_invariants()?;

    let summary = RunSummary::from_simulation(&sim);
    println!("\nAfter {} ticks:", summary.end_time);
    println!("  attempts:   {}", summary.attempts);
    println!("  produced:   {}", summary.produced);
    println!("  dropped:    {}", summary.dropped);
    println!("  received:   {}", summary.received);
    println!("  in process: {}", summary.in_process);

    println!("\n{}", serde_json::to_string_pretty(&sim.snapshot())?);
    Ok(())
}
