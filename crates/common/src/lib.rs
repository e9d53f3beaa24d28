//! PixelPop Common Utilities
//!
//! Shared infrastructure for all PixelPop crates:
//! - Error types and result aliases
//! - Clock helpers for file names and caption dates
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
