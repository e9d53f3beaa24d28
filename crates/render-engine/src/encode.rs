//! Raster encode/decode helpers.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageEncoder, RgbaImage};

use pixelpop_booth_model::EncodedPhoto;
use pixelpop_common::error::{PixelpopError, PixelpopResult};

/// Encode an RGBA raster as JPEG at the given quality (1-100).
///
/// JPEG has no alpha channel; the raster is flattened to RGB first.
pub fn encode_jpeg(image: &RgbaImage, quality: u8) -> PixelpopResult<EncodedPhoto> {
    let rgb = DynamicImage::ImageRgba8(image.clone()).into_rgb8();
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
    encoder.encode_image(&rgb)?;
    Ok(EncodedPhoto::jpeg(bytes))
}

/// Encode an RGBA raster as PNG, keeping transparency.
pub fn encode_png(image: &RgbaImage) -> PixelpopResult<EncodedPhoto> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(EncodedPhoto::new(bytes, "image/png"))
}

/// Decode an encoded photo into an RGBA raster.
pub fn decode_photo(photo: &EncodedPhoto) -> PixelpopResult<RgbaImage> {
    decode_bytes(&photo.bytes)
}

/// Decode any supported image bytes into an RGBA raster.
pub fn decode_bytes(bytes: &[u8]) -> PixelpopResult<RgbaImage> {
    if bytes.is_empty() {
        return Err(PixelpopError::render("Cannot decode an empty image"));
    }
    Ok(image::load_from_memory(bytes)?.into_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_jpeg_round_trip_keeps_dimensions() {
        let img = RgbaImage::from_pixel(32, 16, Rgba([200, 40, 40, 255]));
        let photo = encode_jpeg(&img, 90).unwrap();
        assert_eq!(photo.mime, "image/jpeg");
        assert_eq!(&photo.bytes[..2], &[0xff, 0xd8]);

        let decoded = decode_photo(&photo).unwrap();
        assert_eq!(decoded.dimensions(), (32, 16));
        let px = decoded.get_pixel(8, 8).0;
        assert!(px[0] > 180 && px[1] < 70, "{px:?}");
    }

    #[test]
    fn test_png_keeps_alpha() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 40]));
        let photo = encode_png(&img).unwrap();
        assert_eq!(photo.extension(), "png");
        assert_eq!(decode_photo(&photo).unwrap(), img);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_bytes(b"not an image").is_err());
        assert!(decode_bytes(&[]).is_err());
    }
}
