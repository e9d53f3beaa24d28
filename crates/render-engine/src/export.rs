//! Export rasters for download and print.
//!
//! The camera preview is mirrored, so the exported image is flipped back
//! horizontally after being upscaled onto a white canvas.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use pixelpop_booth_model::EncodedPhoto;
use pixelpop_common::error::{PixelpopError, PixelpopResult};

use crate::encode::encode_jpeg;

pub const DEFAULT_SCALE_FACTOR: u32 = 2;
pub const DEFAULT_EXPORT_QUALITY: u8 = 100;
pub const PRINT_TITLE: &str = "PixelPop Studio Photos";

/// Export raster settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub scale_factor: u32,
    pub quality: u8,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            quality: DEFAULT_EXPORT_QUALITY,
        }
    }
}

/// Upscale and mirror the final layout, returning the raw raster.
pub fn mirrored_raster(layout: &RgbaImage, scale_factor: u32) -> PixelpopResult<RgbaImage> {
    if scale_factor == 0 {
        return Err(PixelpopError::invalid_input("Export scale factor must be at least 1"));
    }
    let (width, height) = layout.dimensions();
    let (out_w, out_h) = (width * scale_factor, height * scale_factor);

    let mut canvas = RgbaImage::from_pixel(out_w, out_h, Rgba([255, 255, 255, 255]));
    let scaled = imageops::resize(layout, out_w, out_h, FilterType::Triangle);
    imageops::overlay(&mut canvas, &scaled, 0, 0);
    Ok(imageops::flip_horizontal(&canvas))
}

/// Produce the encoded export raster.
pub fn export_raster(layout: &RgbaImage, options: &ExportOptions) -> PixelpopResult<EncodedPhoto> {
    let raster = mirrored_raster(layout, options.scale_factor)?;
    let photo = encode_jpeg(&raster, options.quality)?;
    tracing::debug!(
        width = raster.width(),
        height = raster.height(),
        bytes = photo.len(),
        "Encoded export raster"
    );
    Ok(photo)
}

/// A standalone HTML document that shows the raster and opens the print
/// dialog once loaded.
pub fn print_document(photo: &EncodedPhoto) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>{PRINT_TITLE}</title>
    <style>
      body {{ margin: 0; display: flex; justify-content: center; align-items: center; min-height: 100vh; }}
      img {{ max-width: 100%; height: auto; }}
    </style>
  </head>
  <body onload="window.print()">
    <img src="{}" alt="{PRINT_TITLE}" />
  </body>
</html>
"#,
        photo.to_data_url()
    )
}
