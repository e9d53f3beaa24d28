//! Decorative frame overlay for a single photo.

use image::imageops::{self, FilterType};
use image::RgbaImage;

use pixelpop_booth_model::EncodedPhoto;
use pixelpop_common::error::{PixelpopError, PixelpopResult};

use crate::encode::{decode_bytes, encode_png};

/// Draw `frame` stretched over `photo`, keeping the photo's natural size.
pub fn overlay_frame(photo: &RgbaImage, frame: &RgbaImage) -> PixelpopResult<RgbaImage> {
    let (width, height) = photo.dimensions();
    if width == 0 || height == 0 {
        return Err(PixelpopError::invalid_input("Photo has no pixels"));
    }
    let mut canvas = photo.clone();
    let stretched = imageops::resize(frame, width, height, FilterType::Triangle);
    imageops::overlay(&mut canvas, &stretched, 0, 0);
    Ok(canvas)
}

/// Decode both images, apply the frame and encode the result as PNG.
pub fn frame_photo(photo: &[u8], frame: &[u8]) -> PixelpopResult<EncodedPhoto> {
    let photo = decode_bytes(photo)?;
    let frame = decode_bytes(frame)?;
    let framed = overlay_frame(&photo, &frame)?;
    tracing::debug!(
        width = framed.width(),
        height = framed.height(),
        "Applied frame overlay"
    );
    encode_png(&framed)
}
