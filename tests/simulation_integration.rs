//! Simulation Integration Tests
//!
//! Full runs through the library API:
//! - `simulation::bounded_run` - runs that stop on their own
//! - `simulation::cancellation` - runs stopped from outside

mod common;
mod simulation;
