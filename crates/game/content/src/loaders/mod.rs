//! Content loaders for reading match data from files.
//!
//! Rules are TOML; rosters and scenarios are RON. Each loader has a `load`
//! that reads a path and a `parse` that works on text already in memory.

pub mod factory;
pub mod roster;
pub mod rules;
pub mod scenario;

pub use factory::ContentFactory;
pub use roster::{Roster, RosterLoader};
pub use rules::RulesLoader;
pub use scenario::ScenarioLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
