//! Headless match simulator.
//!
//! Loads rules, roster and a scenario, plays the scenario against a match
//! session at a fixed step and logs every event the session publishes.
//!
//! - [`config`] reads simulator settings from the environment
//! - [`logging`] installs the tracing subscriber
//! - [`report`] consumes the event bus and summarizes the result

pub mod config;
pub mod logging;
pub mod report;

pub use config::SimConfig;
