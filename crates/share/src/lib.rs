//! PixelPop Share
//!
//! What happens to a finished layout once the booth is done with it:
//!
//! ```text
//!  FinalStrip ──► export raster (2×, mirrored, JPEG)
//!                   │
//!                   ├──► download file / print document
//!                   │
//!                   └──► UploadCollaborator ──► share link ──► ShareCodeRenderer
//! ```

pub mod actions;
pub mod client;
pub mod print;
pub mod share_code;

pub use actions::*;
pub use client::*;
pub use print::*;
pub use share_code::*;
