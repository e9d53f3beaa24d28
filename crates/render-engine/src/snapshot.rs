//! Snapshot rendering: frame → filter → border → JPEG.

use image::RgbaImage;

use pixelpop_booth_model::{BorderStyle, EncodedPhoto, FilterKind};
use pixelpop_common::error::{PixelpopError, PixelpopResult};

use crate::effects::{apply_filter, draw_border};
use crate::encode::encode_jpeg;

/// Default JPEG quality for snapshots.
pub const DEFAULT_SNAPSHOT_QUALITY: u8 = 90;

/// Effects applied to a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotOptions {
    pub filter: FilterKind,
    pub border: BorderStyle,
    pub quality: u8,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            filter: FilterKind::None,
            border: BorderStyle::None,
            quality: DEFAULT_SNAPSHOT_QUALITY,
        }
    }
}

/// Render one snapshot at the frame's native resolution.
///
/// The filter is applied before the border, so border colors are never
/// filtered.
pub fn render_snapshot(frame: &RgbaImage, options: &SnapshotOptions) -> PixelpopResult<EncodedPhoto> {
    let (width, height) = frame.dimensions();
    if width == 0 || height == 0 {
        return Err(PixelpopError::capture("Camera frame has no pixels"));
    }

    let mut canvas = frame.clone();
    apply_filter(&mut canvas, options.filter);
    draw_border(&mut canvas, options.border);

    let photo = encode_jpeg(&canvas, options.quality)?;
    tracing::debug!(
        width,
        height,
        filter = %options.filter,
        border = %options.border,
        bytes = photo.len(),
        "Rendered snapshot"
    );
    Ok(photo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::decode_photo;
    use image::Rgba;

    #[test]
    fn test_snapshot_keeps_native_resolution() {
        let frame = RgbaImage::from_pixel(640, 360, Rgba([100, 150, 200, 255]));
        let photo = render_snapshot(&frame, &SnapshotOptions::default()).unwrap();
        assert_eq!(decode_photo(&photo).unwrap().dimensions(), (640, 360));
    }

    #[test]
    fn test_border_is_not_filtered() {
        let frame = RgbaImage::from_pixel(200, 200, Rgba([100, 150, 200, 255]));
        let options = SnapshotOptions {
            filter: FilterKind::Grayscale,
            border: BorderStyle::Modern,
            quality: 100,
        };
        let decoded = decode_photo(&render_snapshot(&frame, &options).unwrap()).unwrap();

        // Pink survives in the border band; the middle is gray.
        let edge = decoded.get_pixel(3, 100).0;
        assert!(edge[0] > 230 && edge[1] < 130, "{edge:?}");
        let centre = decoded.get_pixel(100, 100).0;
        assert!(centre[0].abs_diff(centre[2]) <= 3, "{centre:?}");
        assert!(centre[0].abs_diff(141) <= 3, "{centre:?}");
    }

    #[test]
    fn test_empty_frame_is_rejected() {
        let frame = RgbaImage::new(0, 0);
        assert!(render_snapshot(&frame, &SnapshotOptions::default()).is_err());
    }
}
