//! Application shell: command line, configuration, orchestration

pub mod cli;
pub mod config;
pub mod simulation;
pub mod startup;
