//! PixelPop Booth Model
//!
//! Defines the core data contracts for a photobooth session:
//! - **Layouts:** Fixed stacked-slot arrangements and their geometry
//! - **Filters:** Per-pixel RGB transforms
//! - **Borders:** Stroked-rectangle decorations
//! - **Photos:** Encoded snapshots and data-URL conversion
//!
//! This crate is pure data and pure math. It performs no I/O and decodes no images.

pub mod border;
pub mod color;
pub mod filter;
pub mod layout;
pub mod photo;
pub mod settings;

pub use border::*;
pub use color::*;
pub use filter::*;
pub use layout::*;
pub use photo::*;
pub use settings::*;

/// Error returned when a descriptor identifier is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseDescriptorError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}
