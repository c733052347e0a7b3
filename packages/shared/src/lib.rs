//! Utilities shared by the meetroom packages.
//!
//! - `logger`: tracing subscriber setup
//! - `time`: clock abstraction and timestamp helpers

pub mod logger;
pub mod time;
