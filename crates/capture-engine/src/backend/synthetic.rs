//! Synthetic camera producing a generated test pattern.
//!
//! Used by tests and by the CLI when no camera is present.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;

use pixelpop_common::error::{PixelpopError, PixelpopResult};

use crate::camera::{CameraConstraints, CameraSource, VideoStream};

/// A camera that renders a test pattern at the requested resolution.
#[derive(Debug)]
pub struct SyntheticCamera {
    deny: bool,
    size: Option<(u32, u32)>,
    active: Arc<AtomicUsize>,
}

impl SyntheticCamera {
    pub fn new() -> Self {
        Self {
            deny: false,
            size: None,
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A camera whose permission request is always refused.
    pub fn denied() -> Self {
        Self {
            deny: true,
            ..Self::new()
        }
    }

    /// Force a native resolution regardless of the requested one.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = Some((width, height));
        self
    }

    /// Counter of streams opened and not yet stopped.
    pub fn active_streams(&self) -> Arc<AtomicUsize> {
        self.active.clone()
    }
}

impl Default for SyntheticCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CameraSource for SyntheticCamera {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn open(&self, constraints: &CameraConstraints) -> PixelpopResult<Box<dyn VideoStream>> {
        if self.deny {
            return Err(PixelpopError::permission_denied(
                "Synthetic camera configured to deny access",
            ));
        }
        let (width, height) = self
            .size
            .unwrap_or((constraints.ideal_width, constraints.ideal_height));
        if width == 0 || height == 0 {
            return Err(PixelpopError::camera(format!(
                "Unsupported resolution {width}x{height}"
            )));
        }
        self.active.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(SyntheticStream {
            width,
            height,
            frames: 0,
            live: true,
            active: self.active.clone(),
        }))
    }
}

struct SyntheticStream {
    width: u32,
    height: u32,
    frames: u64,
    live: bool,
    active: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl VideoStream for SyntheticStream {
    async fn grab_frame(&mut self) -> PixelpopResult<RgbaImage> {
        if !self.is_live() {
            return Err(PixelpopError::capture("Synthetic stream stopped"));
        }
        let index = self.frames;
        self.frames += 1;
        Ok(test_pattern(self.width, self.height, index))
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn stop(&mut self) {
        if self.live {
            self.live = false;
            self.active.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn is_live(&self) -> bool {
        self.live
    }
}

impl Drop for SyntheticStream {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Diagonal gradient with a marker that moves one step per frame.
pub fn test_pattern(width: u32, height: u32, frame_index: u64) -> RgbaImage {
    let mut img = RgbaImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        Rgba([r, g, 160, 255])
    });

    let radius = (width.min(height) / 10).max(1) as i32;
    let travel = (width as i32 - 2 * radius).max(1);
    let cx = radius + (frame_index as i32 * radius / 2).rem_euclid(travel);
    let cy = height as i32 / 2;
    draw_filled_circle_mut(&mut img, (cx, cy), radius, Rgba([255, 255, 255, 255]));
    img
}
