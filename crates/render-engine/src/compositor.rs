//! Final layout compositor.
//!
//! Photos are decoded concurrently, but nothing is drawn until every decode
//! has finished. Slots are then filled strictly in index order and the
//! caption goes on last, so the caption can never precede a photo.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use tokio::task::JoinSet;

use pixelpop_booth_model::{EncodedPhoto, LayoutKind};
use pixelpop_common::error::{PixelpopError, PixelpopResult};

use crate::caption::{draw_caption, CaptionFont, CaptionText};
use crate::encode::decode_photo;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// The assembled layout.
#[derive(Debug, Clone)]
pub struct FinalStrip {
    pub layout: LayoutKind,
    pub image: RgbaImage,
    /// Caption text the layout was assembled with.
    pub caption: CaptionText,
    /// `false` when no caption font was available.
    pub caption_drawn: bool,
}

impl FinalStrip {
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Assemble `photos` into `layout`.
///
/// Only the first `layout.required_photos()` photos are used; fewer than
/// that is an error.
pub async fn compose_layout(
    layout: LayoutKind,
    photos: &[EncodedPhoto],
    caption: &CaptionText,
    font: Option<&CaptionFont>,
) -> PixelpopResult<FinalStrip> {
    let spec = layout.spec();
    if photos.len() < spec.photo_count {
        return Err(PixelpopError::invalid_input(format!(
            "Layout {layout} needs {} photos, got {}",
            spec.photo_count,
            photos.len()
        )));
    }

    let decoded = decode_all(&photos[..spec.photo_count]).await?;

    let mut canvas = RgbaImage::from_pixel(spec.width, spec.height, BACKGROUND);
    for (index, photo) in decoded.iter().enumerate() {
        let Some(slot) = spec.slot(index) else {
            break;
        };
        let scaled = imageops::resize(photo, slot.width, slot.height, FilterType::Triangle);
        imageops::overlay(&mut canvas, &scaled, slot.x as i64, slot.y as i64);
    }

    let caption_drawn = match font {
        Some(font) => {
            draw_caption(&mut canvas, caption, font);
            true
        }
        None => {
            tracing::warn!("No caption font available; layout saved without caption");
            false
        }
    };

    tracing::info!(
        layout = %layout,
        photos = spec.photo_count,
        width = spec.width,
        height = spec.height,
        caption_drawn,
        "Assembled final layout"
    );

    Ok(FinalStrip {
        layout,
        image: canvas,
        caption: caption.clone(),
        caption_drawn,
    })
}

/// Decode every photo on the blocking pool and return them in input order.
async fn decode_all(photos: &[EncodedPhoto]) -> PixelpopResult<Vec<RgbaImage>> {
    let mut tasks = JoinSet::new();
    for (index, photo) in photos.iter().cloned().enumerate() {
        tasks.spawn_blocking(move || (index, decode_photo(&photo)));
    }

    let mut slots: Vec<Option<RgbaImage>> = vec![None; photos.len()];
    while let Some(joined) = tasks.join_next().await {
        let (index, result) =
            joined.map_err(|e| PixelpopError::render(format!("Photo decode task failed: {e}")))?;
        let image = result.map_err(|e| {
            PixelpopError::render(format!("Photo {} could not be decoded: {e}", index + 1))
        })?;
        slots[index] = Some(image);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, image)| {
            image.ok_or_else(|| PixelpopError::render(format!("Photo {} missing", index + 1)))
        })
        .collect()
}
