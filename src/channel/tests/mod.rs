//! Test modules for the bounded channel
//!
//! Tests are organized by functional area.
