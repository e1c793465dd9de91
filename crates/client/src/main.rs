//! Arena simulator binary.
//!
//! Plays one scripted scenario headlessly and logs every match event.
//!
//! # Examples
//!
//! ```bash
//! # Bundled duel at the default 10 ms step
//! cargo run -p arena-sim
//!
//! # Parry rally, paced to wall-clock time, with debug logs in a file
//! ARENA_REALTIME=1 ARENA_LOG_FILE=logs/rally.log RUST_LOG=debug cargo run -p arena-sim -- rally
//! ```

use anyhow::Result;
use arena_content::ContentFactory;
use arena_runtime::{EventBus, ScenarioRunner};
use arena_sim::{SimConfig, logging, report};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // 1. Load configuration from environment
    let config = SimConfig::from_env().with_scenario_arg(std::env::args().nth(1));

    // 2. Setup logging
    let _log_guard = logging::setup_logging(&config)?;
    tracing::info!("Starting arena simulator");
    tracing::info!("Scenario: {}", config.scenario);
    tracing::info!("Step: {:?}, realtime: {}", config.step, config.realtime);

    // 3. Load content
    let factory = match &config.data_dir {
        Some(dir) => ContentFactory::new(dir),
        None => ContentFactory::bundled(),
    };
    tracing::debug!("Loading content from {}", factory.data_dir().display());
    let rules = factory.load_rules()?;
    let roster = factory.load_roster()?;
    let scenario = factory.load_scenario(&config.scenario)?;

    // 4. Build the session and attach the event log
    let bus = EventBus::with_capacity(config.bus_capacity);
    let loggers = report::spawn_event_log(&bus);
    let mut runner =
        ScenarioRunner::with_bus(&scenario, &roster, rules, bus)?.with_step(config.step);

    // 5. Play
    let outcome = if config.realtime {
        runner.run_paced().await
    } else {
        loop {
            if let Some(outcome) = runner.tick() {
                break outcome;
            }
            tokio::task::yield_now().await;
        }
    };

    let summary = report::Summary::new(&scenario.name, outcome, &runner);

    // 6. Dropping the runner closes the bus and lets the loggers drain
    drop(runner);
    let mut logged = 0;
    for logger in loggers {
        logged += logger.await?;
    }
    tracing::info!("Simulation complete, {} events logged", logged);

    println!("{summary}");
    Ok(())
}
