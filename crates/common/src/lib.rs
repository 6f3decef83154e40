//! Runtimer Common Utilities
//!
//! Shared infrastructure for all Runtimer crates:
//! - Error types and result aliases
//! - Frame clock: conversions between frame indices and seconds
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
