//! Data-driven content definitions and loaders.
//!
//! This crate houses the data a match is built from and the loaders for it:
//! - Match rules (data-driven via TOML)
//! - Character rosters (data-driven via RON)
//! - Scripted scenarios (data-driven via RON)
//!
//! Content feeds the runtime and never appears in engine state. All loaders
//! deserialize arena-core types directly through serde.

pub mod scenario;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use scenario::{Intent, Scenario, ScriptedIntent};

#[cfg(feature = "loaders")]
pub use loaders::{ContentFactory, LoadResult, Roster, RosterLoader, RulesLoader, ScenarioLoader};
