//! Simulator configuration.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Simulator settings.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Content directory; the bundled data when unset.
    pub data_dir: Option<PathBuf>,
    /// Scenario file name under `scenarios/`, without extension.
    pub scenario: String,
    /// Simulation step.
    pub step: Duration,
    /// Pace the simulation to wall-clock time.
    pub realtime: bool,
    /// Per-topic event buffer.
    pub bus_capacity: usize,
    /// Also write logs to this file.
    pub log_file: Option<PathBuf>,
}

impl SimConfig {
    pub const DEFAULT_SCENARIO: &'static str = "duel";
    pub const DEFAULT_STEP: Duration = Duration::from_millis(10);
    pub const DEFAULT_BUS_CAPACITY: usize = 4096;

    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_DATA_DIR` - content directory (default: bundled data)
    /// - `ARENA_SCENARIO` - scenario name (default: `duel`)
    /// - `ARENA_STEP_MS` - simulation step in milliseconds (default: 10, min: 1)
    /// - `ARENA_REALTIME` - pace to wall-clock time (default: false)
    /// - `ARENA_BUS_CAPACITY` - events buffered per topic (default: 4096)
    /// - `ARENA_LOG_FILE` - additional log file (default: none)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = read_env::<PathBuf>("ARENA_DATA_DIR") {
            config.data_dir = Some(dir);
        }
        if let Some(name) = read_env::<String>("ARENA_SCENARIO") {
            config.scenario = name;
        }
        if let Some(ms) = read_env::<u64>("ARENA_STEP_MS") {
            config.step = Duration::from_millis(ms.max(1));
        }
        if let Some(realtime) = read_env_bool("ARENA_REALTIME") {
            config.realtime = realtime;
        }
        if let Some(capacity) = read_env::<usize>("ARENA_BUS_CAPACITY") {
            config.bus_capacity = capacity.max(1);
        }
        if let Some(path) = read_env::<PathBuf>("ARENA_LOG_FILE") {
            config.log_file = Some(path);
        }

        config
    }

    /// Applies a scenario name given on the command line.
    pub fn with_scenario_arg(mut self, arg: Option<String>) -> Self {
        if let Some(name) = arg.filter(|name| !name.is_empty()) {
            self.scenario = name;
        }
        self
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            scenario: Self::DEFAULT_SCENARIO.to_string(),
            step: Self::DEFAULT_STEP,
            realtime: false,
            bus_capacity: Self::DEFAULT_BUS_CAPACITY,
            log_file: None,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    parse_bool(&env::var(key).ok()?)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
