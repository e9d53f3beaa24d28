//! PixelPop Capture Engine
//!
//! Runs the interactive part of a booth session: camera acquisition, the
//! countdown before each shot, snapshot capture and layout assembly.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 BoothSession                 │
//! │  ┌─────────────┐ ┌───────────┐ ┌──────────┐  │
//! │  │ CameraMgr   │ │ Countdown │ │ Settings │  │
//! │  │ (source →   │ │ (cancel   │ │ layout / │  │
//! │  │  stream)    │ │  handle)  │ │ filter.. │  │
//! │  └──────┬──────┘ └─────┬─────┘ └────┬─────┘  │
//! │         ▼              ▼            ▼        │
//! │  ┌────────────────────────────────────────┐  │
//! │  │  snapshot → photos[..N] → FinalStrip   │  │
//! │  └────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────┘
//! ```

pub mod backend;
pub mod camera;
pub mod countdown;
pub mod session;

pub use camera::*;
pub use countdown::*;
pub use session::*;
