// LeadSweep - app/mod.rs
//
// Application layer: input loading and run orchestration.
// Dependencies: core, platform.

pub mod import;
pub mod runner;
