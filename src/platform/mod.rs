// LeadSweep - platform/mod.rs
//
// Platform abstraction layer: config directory resolution, config.toml
// loading, filesystem helpers.
// Must NOT depend on: app.

pub mod config;
pub mod fs;
