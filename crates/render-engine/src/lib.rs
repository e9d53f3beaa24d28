//! PixelPop Render Engine
//!
//! Turns camera frames into finished booth output.
//!
//! # Pipeline Architecture
//!
//! ```text
//! camera frame ──┐
//!                ├── Filter (per pixel)
//!                ├── Border strokes
//!                ▼
//!          snapshot.jpg ×N ──┐
//!                            ├── Decode all (barrier)
//!                            ├── Draw slots in index order
//!                            ├── Caption
//!                            ▼
//!                      final layout ──┐
//!                                     ├── Upscale + mirror
//!                                     ▼
//!                              export.jpg (download / print)
//! ```

pub mod caption;
pub mod compositor;
pub mod effects;
pub mod encode;
pub mod export;
pub mod frame;
pub mod snapshot;

pub use caption::{CaptionFont, CaptionText};
pub use compositor::{compose_layout, FinalStrip};
pub use export::*;
pub use snapshot::*;
