//! Core services and infrastructure

pub mod cancellation;
pub mod error;
pub mod error_handling;
pub mod logging;
pub mod shutdown;
pub mod sync;
pub mod version;
