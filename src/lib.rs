pub mod app;
pub mod channel;
pub mod core;
pub mod ranking;
pub mod report;
pub mod sensor;
