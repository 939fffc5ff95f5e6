//! Simulation Integration Test Modules

pub mod bounded_run;
pub mod cancellation;
